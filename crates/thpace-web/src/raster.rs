use crate::constants::OVERLAY_REPETITION;
use std::f64::consts::TAU;
use thpace_core::{RenderError, Renderer, Scene};
use web_sys as web;

fn js_err(e: wasm_bindgen::JsValue) -> RenderError {
    RenderError::Backend(format!("{:?}", e))
}

#[derive(Default)]
struct Overlay {
    url: Option<String>,
    image: Option<web::HtmlImageElement>,
    pattern: Option<web::CanvasPattern>,
}

impl Overlay {
    fn pattern(
        &mut self,
        ctx: &web::CanvasRenderingContext2d,
        url: Option<&str>,
    ) -> Option<&web::CanvasPattern> {
        if self.url.as_deref() != url {
            self.pattern = None;
            self.image = url.and_then(|u| {
                let image = web::HtmlImageElement::new().ok()?;
                image.set_src(u);
                Some(image)
            });
            self.url = url.map(str::to_string);
        }
        if self.pattern.is_none() {
            let image = self.image.as_ref()?;
            if !image.complete() || image.natural_width() == 0 {
                return None;
            }
            self.pattern = ctx
                .create_pattern_with_html_image_element(image, OVERLAY_REPETITION)
                .ok()
                .flatten();
        }
        self.pattern.as_ref()
    }
}

pub struct RasterRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    overlay: Overlay,
}

impl RasterRenderer {
    pub fn new(canvas: web::HtmlCanvasElement, ctx: web::CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            overlay: Overlay::default(),
        }
    }
}

impl Renderer for RasterRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }

    fn begin_frame(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        self.ctx
            .clear_rect(0.0, 0.0, scene.width as f64, scene.height as f64);
        Ok(())
    }

    fn draw_mesh(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let noise = scene.settings.noise;
        for t in scene.mesh.triangles() {
            let [a, b, c] = t.vertices(scene.points, noise);
            let css = t.color.to_css();
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.line_to(c.x, c.y);
            ctx.close_path();
            ctx.set_fill_style_str(&css);
            ctx.set_stroke_style_str(&css);
            ctx.fill();
            ctx.stroke();
        }
        Ok(())
    }

    fn draw_particles(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        for p in scene.particles {
            let pos = p.position(scene.now_ms);
            ctx.begin_path();
            ctx.arc(pos.x, pos.y, p.radius.max(0.0), 0.0, TAU)
                .map_err(js_err)?;
            ctx.set_fill_style_str(&p.fill().to_css());
            ctx.fill();
        }
        Ok(())
    }

    fn end_frame(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        let settings = scene.settings;
        if let Some(pattern) = self.overlay.pattern(&self.ctx, settings.image.as_deref()) {
            self.ctx.set_global_alpha(settings.image_opacity);
            self.ctx.set_fill_style_canvas_pattern(pattern);
            self.ctx
                .fill_rect(0.0, 0.0, scene.width as f64, scene.height as f64);
            self.ctx.set_global_alpha(1.0);
        }
        Ok(())
    }
}
