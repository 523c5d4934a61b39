use crate::color::Gradient;
use crate::driver::{AnimationDriver, FrameTimings, RunState};
use crate::mesh::Mesh;
use crate::particles::{self, Particle, ParticleFields};
use crate::points::{self, Point, PointMotion};
use crate::reconcile::{reconcile, Action, Plan, Uniform};
use crate::settings::{Settings, SettingsPatch};
use instant::Instant;
use rand::rngs::StdRng;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface unavailable: {0}")]
    Surface(String),
    #[error("render backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub settings: &'a Settings,
    pub width: u32,
    pub height: u32,
    pub points: &'a [Point],
    pub mesh: &'a Mesh,
    pub particles: &'a [Particle],
    pub now_ms: f64,
}

/// Drawing backend. Upload hooks fire after the matching state was rebuilt;
/// draw hooks fire once per accepted frame, in order.
pub trait Renderer {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn upload_mesh(&mut self, _scene: &Scene<'_>) {}

    fn upload_colors(&mut self, _scene: &Scene<'_>) {}

    fn upload_particles(&mut self, _scene: &Scene<'_>) {}

    fn set_uniform(&mut self, _uniform: Uniform, _value: f64) {}

    /// Whether the engine should move points on the CPU after each frame.
    /// Backends that animate in a shader return `false`.
    fn cpu_motion(&self) -> bool {
        true
    }

    fn begin_frame(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw_mesh(&mut self, scene: &Scene<'_>) -> Result<(), RenderError>;

    fn draw_particles(&mut self, scene: &Scene<'_>) -> Result<(), RenderError>;

    fn end_frame(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }
    fn upload_mesh(&mut self, scene: &Scene<'_>) {
        (**self).upload_mesh(scene)
    }
    fn upload_colors(&mut self, scene: &Scene<'_>) {
        (**self).upload_colors(scene)
    }
    fn upload_particles(&mut self, scene: &Scene<'_>) {
        (**self).upload_particles(scene)
    }
    fn set_uniform(&mut self, uniform: Uniform, value: f64) {
        (**self).set_uniform(uniform, value)
    }
    fn cpu_motion(&self) -> bool {
        (**self).cpu_motion()
    }
    fn begin_frame(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        (**self).begin_frame(scene)
    }
    fn draw_mesh(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        (**self).draw_mesh(scene)
    }
    fn draw_particles(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        (**self).draw_particles(scene)
    }
    fn end_frame(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        (**self).end_frame(scene)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub grid: u32,
    pub mesh: u32,
    pub recolor: u32,
    pub particles: u32,
    pub particle_patches: u32,
}

pub struct Engine<R: Renderer> {
    renderer: R,
    settings: Settings,
    gradient: Gradient,
    gradient_colors: Vec<String>,
    width: u32,
    height: u32,
    points: Vec<Point>,
    mesh: Mesh,
    particles: Vec<Particle>,
    driver: AnimationDriver,
    rng: StdRng,
    stats: RebuildStats,
    timings: FrameTimings,
}

macro_rules! scene {
    ($e:expr, $now:expr) => {
        Scene {
            settings: &$e.settings,
            width: $e.width,
            height: $e.height,
            points: &$e.points,
            mesh: &$e.mesh,
            particles: &$e.particles,
            now_ms: $now,
        }
    };
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, settings: Settings, width: u32, height: u32, rng: StdRng) -> Self {
        let gradient = Gradient::parse(&settings.colors);
        let gradient_colors = settings.colors.clone();
        let mut engine = Self {
            renderer,
            settings,
            gradient,
            gradient_colors,
            width,
            height,
            points: Vec::new(),
            mesh: Mesh::default(),
            particles: Vec::new(),
            driver: AnimationDriver::new(),
            rng,
            stats: RebuildStats::default(),
            timings: FrameTimings::default(),
        };
        engine.renderer.resize(width, height);
        for u in Uniform::ALL {
            engine.renderer.set_uniform(u, u.value(&engine.settings));
        }
        engine.init();
        engine.resume();
        engine
    }

    // Regeneration pauses the driver; a host-stopped engine stays stopped.
    fn init(&mut self) {
        let state = self.driver.state();
        self.stop();
        self.rebuild_grid();
        self.rebuild_mesh();
        self.rebuild_particles();
        if state == RunState::Running {
            self.resume();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        log::debug!("resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.renderer.resize(width, height);
        self.init();
        true
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Plan {
        let plan = reconcile(&mut self.settings, patch);
        if !plan.is_empty() {
            log::debug!("settings plan: {:?}", plan);
        }
        for action in plan.iter() {
            self.apply(*action);
        }
        plan
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::RebuildGrid => self.rebuild_grid(),
            Action::RebuildMesh => self.rebuild_mesh(),
            Action::RecolorMesh => self.recolor_mesh(),
            Action::SetUniform(u) => self.renderer.set_uniform(u, u.value(&self.settings)),
            Action::RebuildParticles => self.rebuild_particles(),
            Action::PatchParticles(fields) => self.patch_particles(fields),
            // The host owns the event subscription.
            Action::SubscribeResize(_) => {}
        }
    }

    fn refresh_gradient(&mut self) {
        if self.gradient_colors != self.settings.colors {
            self.gradient = Gradient::parse(&self.settings.colors);
            self.gradient_colors = self.settings.colors.clone();
        }
    }

    fn rebuild_grid(&mut self) {
        self.points = points::build_grid(
            self.width as f64,
            self.height as f64,
            self.settings.triangle_size,
            self.settings.bleed,
            &mut self.rng,
        );
        self.stats.grid += 1;
    }

    fn rebuild_mesh(&mut self) {
        self.refresh_gradient();
        self.mesh = Mesh::build(
            &self.points,
            self.settings.noise,
            &self.gradient,
            self.width as f64,
            self.height as f64,
        );
        self.stats.mesh += 1;
        let scene = scene!(self, 0.0);
        self.renderer.upload_mesh(&scene);
    }

    fn recolor_mesh(&mut self) {
        self.refresh_gradient();
        self.mesh.recolor(
            &self.points,
            &self.gradient,
            self.settings.noise,
            self.width as f64,
            self.height as f64,
        );
        self.stats.recolor += 1;
        let scene = scene!(self, 0.0);
        self.renderer.upload_colors(&scene);
    }

    fn rebuild_particles(&mut self) {
        self.particles = particles::populate(
            self.width as f64,
            self.height as f64,
            &self.settings.particle_settings,
            &mut self.rng,
        );
        self.stats.particles += 1;
        let scene = scene!(self, 0.0);
        self.renderer.upload_particles(&scene);
    }

    fn patch_particles(&mut self, fields: ParticleFields) {
        particles::patch(
            &mut self.particles,
            fields,
            &self.settings.particle_settings,
            &mut self.rng,
        );
        self.stats.particle_patches += 1;
        let scene = scene!(self, 0.0);
        self.renderer.upload_particles(&scene);
    }

    /// One host callback. Returns whether a frame was drawn.
    ///
    /// Draws the mesh and then the particles as they stand, then advances the
    /// points so the next frame picks up the new positions.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.driver.tick(now_ms, self.settings.max_fps) {
            return false;
        }
        let scene = scene!(self, now_ms);
        if let Err(e) = draw(&mut self.renderer, &mut self.timings, &scene) {
            log::error!("render error: {}", e);
        }
        if self.renderer.cpu_motion() {
            let motion = self.motion();
            points::animate(&mut self.points, now_ms, &motion);
        }
        true
    }

    pub fn motion(&self) -> PointMotion {
        PointMotion {
            variation_x: self.settings.point_variation_x,
            variation_y: self.settings.point_variation_y,
            speed: self.settings.point_animation_speed,
            offset: self.settings.animation_offset,
        }
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stats(&self) -> RebuildStats {
        self.stats
    }

    pub fn timings(&self) -> FrameTimings {
        self.timings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

fn draw<R: Renderer>(
    renderer: &mut R,
    timings: &mut FrameTimings,
    scene: &Scene<'_>,
) -> Result<(), RenderError> {
    renderer.begin_frame(scene)?;

    let start = Instant::now();
    renderer.draw_mesh(scene)?;
    timings.triangles.record(start.elapsed().as_secs_f64() * 1000.0);

    let start = Instant::now();
    renderer.draw_particles(scene)?;
    timings.particles.record(start.elapsed().as_secs_f64() * 1000.0);

    timings.frames += 1;
    renderer.end_frame(scene)
}
