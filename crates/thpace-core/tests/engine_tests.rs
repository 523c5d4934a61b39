// Engine behaviour against a renderer that records every call.

use glam::DVec2;
use thpace_core::color::Rgba;
use thpace_core::engine::{Engine, RenderError, Renderer, Scene};
use thpace_core::points::animate;
use thpace_core::reconcile::Uniform;
use thpace_core::settings::{ParticlePatch, Settings, SettingsPatch, Spread};
use thpace_core::{SeedableRng, StdRng};

#[derive(Default)]
struct RecordingRenderer {
    resizes: Vec<(u32, u32)>,
    mesh_uploads: usize,
    color_uploads: usize,
    particle_uploads: usize,
    uniforms: Vec<(Uniform, f64)>,
    mesh_draws: usize,
    particle_draws: usize,
    /// First point position seen by each mesh draw.
    drawn_first_point: Vec<DVec2>,
    gpu_motion: bool,
    fail: bool,
}

impl Renderer for RecordingRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn upload_mesh(&mut self, _scene: &Scene<'_>) {
        self.mesh_uploads += 1;
    }

    fn upload_colors(&mut self, _scene: &Scene<'_>) {
        self.color_uploads += 1;
    }

    fn upload_particles(&mut self, _scene: &Scene<'_>) {
        self.particle_uploads += 1;
    }

    fn set_uniform(&mut self, uniform: Uniform, value: f64) {
        self.uniforms.push((uniform, value));
    }

    fn cpu_motion(&self) -> bool {
        !self.gpu_motion
    }

    fn draw_mesh(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::Backend("lost".into()));
        }
        self.mesh_draws += 1;
        self.drawn_first_point.push(scene.points[0].pos);
        Ok(())
    }

    fn draw_particles(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        self.particle_draws += 1;
        Ok(())
    }
}

fn unthrottled() -> Settings {
    Settings {
        max_fps: 0.0,
        ..Settings::default()
    }
}

fn engine_with(renderer: RecordingRenderer, settings: Settings) -> Engine<RecordingRenderer> {
    Engine::new(renderer, settings, 400, 400, StdRng::seed_from_u64(42))
}

#[test]
fn construction_builds_everything_and_runs() {
    let engine = engine_with(RecordingRenderer::default(), Settings::default());
    assert!(engine.is_running());
    assert_eq!(engine.size(), (400, 400));
    assert_eq!(engine.points().len(), 36);
    assert!(!engine.mesh().is_empty());
    assert!(!engine.particles().is_empty());

    let stats = engine.stats();
    assert_eq!((stats.grid, stats.mesh, stats.particles), (1, 1, 1));

    let r = engine.renderer();
    assert_eq!(r.resizes, vec![(400, 400)]);
    assert_eq!(r.uniforms.len(), Uniform::ALL.len());
    assert_eq!((r.mesh_uploads, r.particle_uploads), (1, 1));
}

#[test]
fn top_left_triangle_takes_the_first_color() {
    let settings = Settings {
        colors: vec!["#000000".into(), "#ffffff".into()],
        ..Settings::default()
    };
    let engine = engine_with(RecordingRenderer::default(), settings);
    let noise = engine.settings().noise;
    let nearest = engine
        .mesh()
        .triangles()
        .iter()
        .min_by(|a, b| {
            let c = |t: &thpace_core::Triangle| {
                let [p, q, r] = t.vertices(engine.points(), noise);
                ((p + q + r) / 3.0).length_squared()
            };
            c(a).total_cmp(&c(b))
        })
        .unwrap();
    let black = Rgba::opaque(0.0, 0.0, 0.0);
    let white = Rgba::opaque(255.0, 255.0, 255.0);
    assert!(nearest.color.distance_sq(&black) < nearest.color.distance_sq(&white));
}

#[test]
fn settings_updates_rebuild_only_what_changed() {
    let mut engine = engine_with(RecordingRenderer::default(), Settings::default());

    let plan = engine.update_settings(&SettingsPatch {
        triangle_size: Some(200.0),
        ..Default::default()
    });
    assert!(plan.rebuilds_grid());
    assert_eq!(engine.stats().grid, 2);
    assert_eq!(engine.stats().mesh, 2);

    engine.update_settings(&SettingsPatch {
        colors: Some(vec!["#ff0000".into()]),
        ..Default::default()
    });
    assert_eq!(engine.stats().grid, 2);
    assert_eq!(engine.stats().mesh, 2);
    assert_eq!(engine.stats().recolor, 1);
    assert_eq!(engine.renderer().color_uploads, 1);
    assert!(engine
        .mesh()
        .triangles()
        .iter()
        .all(|t| t.color == Rgba::opaque(255.0, 0.0, 0.0)));
}

#[test]
fn uniform_changes_are_forwarded() {
    let mut engine = engine_with(RecordingRenderer::default(), Settings::default());
    let points = engine.points().to_vec();
    engine.update_settings(&SettingsPatch {
        point_variation_x: Some(42.0),
        ..Default::default()
    });
    assert_eq!(
        engine.renderer().uniforms.last(),
        Some(&(Uniform::PointVariationX, 42.0))
    );
    assert_eq!(engine.points(), &points[..]);
    assert_eq!(engine.stats().grid, 1);
}

#[test]
fn resize_regenerates_only_on_change() {
    let mut engine = engine_with(RecordingRenderer::default(), Settings::default());
    assert!(!engine.resize(400, 400));
    assert_eq!(engine.stats().grid, 1);

    assert!(engine.resize(800, 400));
    assert_eq!(engine.size(), (800, 400));
    assert_eq!(engine.stats().grid, 2);
    assert_eq!(engine.stats().particles, 2);
    assert!(engine.is_running());
    assert_eq!(engine.renderer().resizes.last(), Some(&(800, 400)));
}

#[test]
fn resize_keeps_a_stopped_engine_stopped() {
    let mut engine = engine_with(RecordingRenderer::default(), unthrottled());
    engine.stop();
    assert!(engine.resize(640, 480));
    assert!(!engine.is_running());
    assert_eq!(engine.stats().grid, 2);
    assert!(!engine.frame(1000.0));

    engine.resume();
    assert!(engine.frame(1016.0));
}

#[test]
fn frames_are_throttled_by_max_fps() {
    let settings = Settings {
        max_fps: 10.0,
        ..Settings::default()
    };
    let mut engine = engine_with(RecordingRenderer::default(), settings);
    assert!(!engine.frame(50.0));
    assert!(engine.frame(100.0));
    assert!(!engine.frame(150.0));
    assert!(engine.frame(205.0));
    assert_eq!(engine.renderer().mesh_draws, 2);
    assert_eq!(engine.timings().frames, 2);
}

#[test]
fn draws_then_advances_points() {
    let mut engine = engine_with(RecordingRenderer::default(), unthrottled());
    let initial = engine.points().to_vec();

    assert!(engine.frame(2000.0));
    assert_eq!(engine.renderer().drawn_first_point, vec![initial[0].init]);
    assert_eq!(engine.renderer().particle_draws, 1);

    let mut expected = initial.clone();
    animate(&mut expected, 2000.0, &engine.motion());
    assert_eq!(engine.points(), &expected[..]);
    assert_ne!(engine.points()[0].pos, initial[0].pos);
}

#[test]
fn shader_motion_leaves_points_alone() {
    let renderer = RecordingRenderer {
        gpu_motion: true,
        ..Default::default()
    };
    let mut engine = engine_with(renderer, unthrottled());
    let initial = engine.points().to_vec();
    assert!(engine.frame(2000.0));
    assert!(engine.frame(3000.0));
    assert_eq!(engine.points(), &initial[..]);
}

#[test]
fn stopped_engine_draws_nothing() {
    let mut engine = engine_with(RecordingRenderer::default(), unthrottled());
    engine.stop();
    engine.stop();
    assert!(!engine.frame(1000.0));
    assert_eq!(engine.renderer().mesh_draws, 0);
    engine.resume();
    assert!(engine.frame(1001.0));
    assert_eq!(engine.renderer().mesh_draws, 1);
}

#[test]
fn particle_appearance_patch_keeps_anchors() {
    let mut engine = engine_with(RecordingRenderer::default(), Settings::default());
    let anchors: Vec<DVec2> = engine.particles().iter().map(|p| p.anchor).collect();
    engine.update_settings(&SettingsPatch {
        particle_settings: Some(ParticlePatch {
            radius: Some(Spread::Value(4.0)),
            ..Default::default()
        }),
        ..Default::default()
    });
    let after: Vec<DVec2> = engine.particles().iter().map(|p| p.anchor).collect();
    assert_eq!(anchors, after);
    assert!(engine.particles().iter().all(|p| p.radius == 4.0));
    assert_eq!(engine.stats().particle_patches, 1);
    assert_eq!(engine.stats().particles, 1);
    assert_eq!(engine.renderer().particle_uploads, 2);
}

#[test]
fn particle_count_regenerates_population() {
    let mut engine = engine_with(RecordingRenderer::default(), Settings::default());
    engine.update_settings(&SettingsPatch {
        particle_settings: Some(ParticlePatch {
            count: Some(Spread::Value(1.0)),
            ..Default::default()
        }),
        ..Default::default()
    });
    assert_eq!(engine.particles().len(), 16);
    assert_eq!(engine.stats().particles, 2);
}

#[test]
fn render_errors_do_not_stop_the_loop() {
    let renderer = RecordingRenderer {
        fail: true,
        ..Default::default()
    };
    let mut engine = engine_with(renderer, unthrottled());
    assert!(engine.frame(16.0));
    assert!(engine.is_running());
    assert_eq!(engine.renderer().particle_draws, 0);
    assert_eq!(engine.timings().frames, 0);

    engine.renderer_mut().fail = false;
    assert!(engine.frame(32.0));
    assert_eq!(engine.timings().frames, 1);
}
