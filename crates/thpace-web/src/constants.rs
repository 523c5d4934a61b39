// DOM and GPU constants for the web front-end

pub const RESIZE_EVENT: &str = "resize";
pub const CONTEXT_2D: &str = "2d";
pub const OVERLAY_REPETITION: &str = "repeat";
pub const STATS_REFRESH_MS: f64 = 250.0;
pub const PARTICLE_QUAD_VERTICES: u32 = 6;
pub const MAX_FRAME_LATENCY: u32 = 2;
