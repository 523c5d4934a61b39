pub mod color;
pub mod constants;
pub mod driver;
pub mod engine;
pub mod mesh;
pub mod particles;
pub mod points;
pub mod reconcile;
pub mod settings;

pub use color::{parse_color, Gradient, Rgba};
pub use driver::{AnimationDriver, FrameTimings, RunState, Timings};
pub use engine::{Engine, RebuildStats, RenderError, Renderer, Scene};
pub use mesh::{Mesh, Triangle};
pub use particles::{Particle, ParticleFields};
pub use points::{Point, PointMotion};
pub use reconcile::{diff, reconcile, Action, Plan, Uniform};
pub use settings::{ParticlePatch, ParticleSettings, Settings, SettingsPatch, Spread};

// Re-exported so hosts seed the engine without naming `rand` themselves.
pub use rand::{rngs::StdRng, SeedableRng};
