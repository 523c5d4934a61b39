// Shared geometry/animation tuning constants used by the engine and both renderers.

// Particle density: one unit cell is 100x100 px of canvas area
pub const PARTICLE_CELL_AREA: f64 = 100.0 * 100.0;

// Noised triangulation input is rounded to this many decimals
pub const TRIANGULATION_DECIMALS: i32 = 14;

// Frame budget
pub const MS_PER_SECOND: f64 = 1000.0;

// Full turn, used by both motion laws
pub const TAU: f64 = std::f64::consts::PI * 2.0;

// Settings defaults (px unless noted)
pub const DEFAULT_TRIANGLE_SIZE: f64 = 130.0;
pub const DEFAULT_BLEED: f64 = 120.0;
pub const DEFAULT_NOISE: f64 = 60.0;
pub const DEFAULT_COLORS: [&str; 2] = ["rgba(11,135,147,1)", "rgba(54,0,51,1)"];
pub const DEFAULT_POINT_VARIATION_X: f64 = 20.0;
pub const DEFAULT_POINT_VARIATION_Y: f64 = 35.0;
pub const DEFAULT_POINT_ANIMATION_SPEED: f64 = 7500.0; // ms per loop
pub const DEFAULT_MAX_FPS: f64 = 144.0; // <= 0 means unlimited
pub const DEFAULT_ANIMATION_OFFSET: f64 = 250.0;
pub const DEFAULT_IMAGE_OPACITY: f64 = 0.4;

// Particle defaults, all [min, max] ranges except color
pub const DEFAULT_PARTICLE_COUNT: [f64; 2] = [2.0, 5.0]; // per unit cell
pub const DEFAULT_PARTICLE_INTERVAL: [f64; 2] = [5000.0, 10000.0]; // ms
pub const DEFAULT_PARTICLE_RADIUS: [f64; 2] = [1.0, 2.0];
pub const DEFAULT_PARTICLE_OPACITY: [f64; 2] = [0.1, 0.7];
pub const DEFAULT_PARTICLE_COLOR: &str = "#ffffff";
pub const DEFAULT_PARTICLE_VARIATION_X: [f64; 2] = [5.0, 15.0];
pub const DEFAULT_PARTICLE_VARIATION_Y: [f64; 2] = [2.5, 7.5];
