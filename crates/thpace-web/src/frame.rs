use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A running frame loop. The callback receives the rAF timestamp, which
/// shares its clock with `performance.now()`.
pub struct FrameLoop {
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
}

pub fn start_loop(mut on_frame: impl FnMut(f64) + 'static) -> FrameLoop {
    let tick: Tick = Rc::new(RefCell::new(None));
    let handle = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let handle_tick = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        handle_tick.set(None);
        on_frame(now);
        request_frame(&tick_clone, &handle_tick);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick, &handle);
    FrameLoop { tick, handle }
}

fn request_frame(tick: &Tick, handle: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        handle.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

impl FrameLoop {
    pub fn cancel(&self) {
        if let (Some(w), Some(id)) = (web::window(), self.handle.take()) {
            let _ = w.cancel_animation_frame(id);
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
