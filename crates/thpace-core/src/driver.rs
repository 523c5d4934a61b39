use crate::constants::MS_PER_SECOND;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

#[derive(Clone, Debug, Default)]
pub struct AnimationDriver {
    state: RunState,
    last_draw_ms: f64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Stopped {
            self.state = RunState::Running;
        }
    }

    /// Decide whether the frame at `now_ms` should be drawn.
    ///
    /// With a positive `max_fps` a frame is accepted once at least
    /// `1000 / max_fps` ms have passed since the last accepted one, and the
    /// remainder is carried over so the average rate holds. Zero or negative
    /// `max_fps` accepts every frame.
    pub fn tick(&mut self, now_ms: f64, max_fps: f64) -> bool {
        if self.state == RunState::Stopped {
            return false;
        }
        if !(max_fps > 0.0) {
            self.last_draw_ms = now_ms;
            return true;
        }
        let interval = MS_PER_SECOND / max_fps;
        let elapsed = now_ms - self.last_draw_ms;
        if elapsed < interval {
            return false;
        }
        self.last_draw_ms = now_ms - elapsed % interval;
        true
    }

    pub fn last_draw_ms(&self) -> f64 {
        self.last_draw_ms
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timings {
    pub min: f64,
    pub max: f64,
    pub current: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: 0.0,
            current: 0.0,
        }
    }
}

impl Timings {
    pub fn record(&mut self, ms: f64) {
        self.min = self.min.min(ms);
        self.max = self.max.max(ms);
        self.current = ms;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTimings {
    pub triangles: Timings,
    pub particles: Timings,
    pub frames: u64,
}
