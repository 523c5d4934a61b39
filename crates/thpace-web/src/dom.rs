use crate::constants::{CONTEXT_2D, RESIZE_EVENT};
use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn parent_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    match canvas.parent_element() {
        Some(parent) => (
            parent.client_width().max(0) as u32,
            parent.client_height().max(0) as u32,
        ),
        None => (canvas.width(), canvas.height()),
    }
}

pub fn sync_canvas_to_parent(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let (w, h) = parent_size(canvas);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context(CONTEXT_2D)
        .map_err(|e| anyhow!(format!("{:?}", e)))?
        .ok_or_else(|| anyhow!("canvas has no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow!(format!("{:?}", e)))
}

pub fn has_webgpu(window: &web::Window) -> bool {
    js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
        .unwrap_or(false)
}

/// A window resize subscription. Dropping it removes the listener.
pub struct ResizeListener {
    closure: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub fn new(handler: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback(RESIZE_EVENT, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        Ok(Self { closure })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            let _ = w.remove_event_listener_with_callback(
                RESIZE_EVENT,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}
