// Frame-timing overlay shown by `debug()`.

use thpace_core::{FrameTimings, Timings};
use web_sys as web;

const OVERLAY_STYLE: &str = "position:fixed;top:0;left:0;z-index:10000;\
padding:4px 8px;background:rgba(0,0,0,0.65);color:#fff;\
font:11px/1.4 monospace;white-space:pre;pointer-events:none";

fn line(label: &str, t: &Timings) -> String {
    if t.min.is_finite() {
        format!(
            "{label:<10}{:>7.2} ms  min {:.2}  max {:.2}",
            t.current, t.min, t.max
        )
    } else {
        format!("{label:<10}      -")
    }
}

pub fn format_timings(timings: &FrameTimings, triangles: usize, particles: usize) -> String {
    format!(
        "{}\n{}\nframes    {}\nmesh      {} tris, {} particles",
        line("triangles", &timings.triangles),
        line("particles", &timings.particles),
        timings.frames,
        triangles,
        particles
    )
}

pub struct StatsOverlay {
    element: web::HtmlElement,
    last_refresh_ms: f64,
    refresh_ms: f64,
}

impl StatsOverlay {
    pub fn attach(document: &web::Document, refresh_ms: f64) -> Option<Self> {
        let body = document.body()?;
        let element = document.create_element("div").ok()?;
        let _ = element.set_attribute("style", OVERLAY_STYLE);
        body.append_child(&element).ok()?;
        let element = wasm_bindgen::JsCast::dyn_into::<web::HtmlElement>(element).ok()?;
        Some(Self {
            element,
            last_refresh_ms: f64::NEG_INFINITY,
            refresh_ms,
        })
    }

    pub fn update(&mut self, now_ms: f64, text: impl FnOnce() -> String) {
        if now_ms - self.last_refresh_ms < self.refresh_ms {
            return;
        }
        self.last_refresh_ms = now_ms;
        self.element.set_inner_text(&text());
    }

    pub fn detach(&self) {
        self.element.remove();
    }
}
