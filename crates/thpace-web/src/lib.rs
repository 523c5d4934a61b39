#![cfg(target_arch = "wasm32")]

mod constants;
mod dom;
mod frame;
mod options;
mod raster;
mod render;
mod stats;

use std::cell::RefCell;
use std::rc::Rc;
use thpace_core::{Action, Engine, Renderer, SeedableRng, Settings, StdRng};
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("thpace-web loaded");
    Ok(())
}

struct Instance {
    engine: Engine<Box<dyn Renderer>>,
    canvas: web::HtmlCanvasElement,
    stats: Option<stats::StatsOverlay>,
}

impl Instance {
    fn frame(&mut self, now_ms: f64) {
        if !self.engine.frame(now_ms) {
            return;
        }
        if let Some(overlay) = &mut self.stats {
            let engine = &self.engine;
            overlay.update(now_ms, || {
                stats::format_timings(
                    &engine.timings(),
                    engine.mesh().len(),
                    engine.particles().len(),
                )
            });
        }
    }

    fn fit_to_parent(&mut self) {
        let (w, h) = dom::sync_canvas_to_parent(&self.canvas);
        self.engine.resize(w, h);
    }
}

fn settings_from_js(options: &JsValue) -> Option<Settings> {
    options::patch_from_js(options).map(|patch| Settings::from_patch(&patch))
}

#[wasm_bindgen]
pub struct Thpace {
    inner: Rc<RefCell<Instance>>,
    frame_loop: Option<frame::FrameLoop>,
    resize: Option<dom::ResizeListener>,
}

impl Thpace {
    fn launch(canvas: web::HtmlCanvasElement, renderer: Box<dyn Renderer>, settings: Settings) -> Thpace {
        let (w, h) = dom::sync_canvas_to_parent(&canvas);
        let automatic_resize = settings.automatic_resize;
        let engine = Engine::new(renderer, settings, w, h, StdRng::from_entropy());
        log::info!(
            "thpace started at {}x{}: {} points, {} triangles, {} particles",
            w,
            h,
            engine.points().len(),
            engine.mesh().len(),
            engine.particles().len()
        );
        let inner = Rc::new(RefCell::new(Instance {
            engine,
            canvas,
            stats: None,
        }));
        let loop_inner = inner.clone();
        let frame_loop = frame::start_loop(move |now| loop_inner.borrow_mut().frame(now));
        let mut thpace = Thpace {
            inner,
            frame_loop: Some(frame_loop),
            resize: None,
        };
        thpace.follow_resize(automatic_resize);
        thpace
    }

    fn follow_resize(&mut self, enabled: bool) {
        if !enabled {
            self.resize = None;
            return;
        }
        if self.resize.is_some() {
            return;
        }
        let inner = self.inner.clone();
        match dom::ResizeListener::new(move || inner.borrow_mut().fit_to_parent()) {
            Ok(listener) => self.resize = Some(listener),
            Err(e) => log::warn!("resize listener unavailable: {:?}", e),
        }
    }
}

#[wasm_bindgen]
impl Thpace {
    /// Start a Canvas2D background on `canvas`. Yields `null` when there is
    /// no canvas, no 2d context or the settings are unreadable.
    pub fn create(canvas: Option<web::HtmlCanvasElement>, settings: JsValue) -> Option<Thpace> {
        let Some(canvas) = canvas else {
            log::warn!("Thpace.create: a canvas element is required");
            return None;
        };
        let settings = settings_from_js(&settings)?;
        let ctx = match dom::context_2d(&canvas) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("Thpace.create: {:?}", e);
                return None;
            }
        };
        let renderer = raster::RasterRenderer::new(canvas.clone(), ctx);
        Some(Thpace::launch(canvas, Box::new(renderer), settings))
    }

    /// Start a WebGPU background on `canvas`. Resolves to `null` when WebGPU
    /// is unavailable or the device cannot be acquired.
    #[wasm_bindgen(js_name = createGpu)]
    pub async fn create_gpu(canvas: Option<web::HtmlCanvasElement>, settings: JsValue) -> JsValue {
        let Some(canvas) = canvas else {
            log::warn!("Thpace.createGpu: a canvas element is required");
            return JsValue::NULL;
        };
        let Some(settings) = settings_from_js(&settings) else {
            return JsValue::NULL;
        };
        match web::window() {
            Some(w) if dom::has_webgpu(&w) => {}
            _ => {
                log::warn!("Thpace.createGpu: navigator.gpu is not available");
                return JsValue::NULL;
            }
        }
        dom::sync_canvas_to_parent(&canvas);
        match render::GpuRenderer::new(canvas.clone()).await {
            Ok(renderer) => Thpace::launch(canvas, Box::new(renderer), settings).into(),
            Err(e) => {
                log::warn!("Thpace.createGpu: {:?}", e);
                JsValue::NULL
            }
        }
    }

    /// Merge `settings` into the current ones and regenerate only what the
    /// changed keys require.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&mut self, settings: JsValue) {
        let Some(patch) = options::patch_from_js(&settings) else {
            return;
        };
        let plan = self.inner.borrow_mut().engine.update_settings(&patch);
        for action in plan.iter() {
            if let Action::SubscribeResize(enabled) = *action {
                self.follow_resize(enabled);
            }
        }
    }

    pub fn resize(&self) {
        self.inner.borrow_mut().fit_to_parent();
    }

    pub fn stop(&self) {
        self.inner.borrow_mut().engine.stop();
    }

    pub fn resume(&self) {
        self.inner.borrow_mut().engine.resume();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().engine.is_running()
    }

    pub fn debug(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.stats.is_some() {
            return;
        }
        inner.stats = dom::window_document()
            .and_then(|doc| stats::StatsOverlay::attach(&doc, constants::STATS_REFRESH_MS));
        if inner.stats.is_none() {
            log::warn!("debug overlay could not be attached");
        }
    }

    pub fn destroy(&mut self) {
        self.frame_loop.take();
        self.resize.take();
        let mut inner = self.inner.borrow_mut();
        inner.engine.stop();
        if let Some(overlay) = inner.stats.take() {
            overlay.detach();
        }
    }

    pub fn settings(&self) -> JsValue {
        options::settings_to_js(self.inner.borrow().engine.settings())
    }
}
