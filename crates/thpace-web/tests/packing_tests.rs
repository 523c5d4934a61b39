// Host-side tests for GPU packing.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod packing {
    include!("../src/render/packing.rs");
}

use packing::*;
use thpace_core::color::Gradient;
use thpace_core::particles::populate;
use thpace_core::points::build_grid;
use thpace_core::{Mesh, ParticleSettings, SeedableRng, StdRng, Uniform};

#[test]
fn layouts_match_the_shader_structs() {
    // Frame: vec2, f32, f32, vec2, f32, f32 with WGSL uniform alignment
    assert_eq!(std::mem::size_of::<FrameUniforms>(), 32);
    assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    assert_eq!(std::mem::size_of::<ParticleInstance>(), 48);
}

#[test]
fn every_triangle_becomes_three_vertices() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = build_grid(300.0, 200.0, 60.0, 30.0, &mut rng);
    let gradient = Gradient::parse(&["#000000", "#ffffff"]);
    let mesh = Mesh::build(&points, 20.0, &gradient, 300.0, 200.0);
    let vertices = mesh_vertices(&points, &mesh);
    assert_eq!(vertices.len(), mesh.len() * 3);

    for (t, corners) in mesh.triangles().iter().zip(vertices.chunks_exact(3)) {
        for (&i, v) in t.indices.iter().zip(corners) {
            assert_eq!(v.init, points[i].init.as_vec2().to_array());
            assert_eq!(v.noise, points[i].noise.as_vec2().to_array());
            assert_eq!(v.color, t.color.to_unit());
        }
    }
}

#[test]
fn particle_color_carries_opacity() {
    let mut rng = StdRng::seed_from_u64(9);
    let particles = populate(200.0, 200.0, &ParticleSettings::default(), &mut rng);
    let instances = particle_instances(&particles);
    assert_eq!(instances.len(), particles.len());
    for (p, inst) in particles.iter().zip(&instances) {
        assert_eq!(inst.color[3], p.opacity as f32);
        assert_eq!(inst.params[0], p.radius as f32);
        assert_eq!(inst.params[1], p.interval as f32);
        assert_eq!(inst.anchor, [p.anchor.x as f32, p.anchor.y as f32]);
    }
}

#[test]
fn uniforms_route_to_their_fields() {
    let mut u = FrameUniforms::default();
    u.set(Uniform::Noise, 60.0);
    u.set(Uniform::PointVariationX, 20.0);
    u.set(Uniform::PointVariationY, 35.0);
    u.set(Uniform::PointAnimationSpeed, 7500.0);
    u.set(Uniform::AnimationOffset, 250.0);
    assert_eq!(u.noise, 60.0);
    assert_eq!(u.variation, [20.0, 35.0]);
    assert_eq!(u.speed, 7500.0);
    assert_eq!(u.offset, 250.0);
    assert_eq!(u.time, 0.0);
}

#[test]
fn shader_time_keeps_frame_resolution_after_long_uptime() {
    let week_ms = 7.0 * 24.0 * 3_600_000.0;
    let mut clock = FrameClock::default();
    assert_eq!(clock.elapsed(week_ms), 0.0);
    let dt = clock.elapsed(week_ms + 16.6);
    assert!((dt - 16.6).abs() < 1e-3, "dt = {dt}");
    let dt = clock.elapsed(week_ms + 33.2);
    assert!((dt - 33.2).abs() < 1e-3, "dt = {dt}");
}
