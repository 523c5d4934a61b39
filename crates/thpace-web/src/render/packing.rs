// GPU-side layouts of the engine state. Motion is evaluated in the vertex
// shader, so only the fixed per-point and per-particle inputs are packed.

use glam::DVec2;
use thpace_core::{Mesh, Particle, Point, Uniform};

#[inline]
fn to_f32(v: DVec2) -> [f32; 2] {
    v.as_vec2().to_array()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub init: [f32; 2],
    pub noise: [f32; 2],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub anchor: [f32; 2],
    pub variation: [f32; 2],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

/// Mirrors `Frame` in background.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub noise: f32,
    pub variation: [f32; 2],
    pub speed: f32,
    pub offset: f32,
}

impl FrameUniforms {
    pub fn set(&mut self, uniform: Uniform, value: f64) {
        let v = value as f32;
        match uniform {
            Uniform::Noise => self.noise = v,
            Uniform::PointVariationX => self.variation[0] = v,
            Uniform::PointVariationY => self.variation[1] = v,
            Uniform::PointAnimationSpeed => self.speed = v,
            Uniform::AnimationOffset => self.offset = v,
        }
    }
}

/// Shader time base. rAF timestamps grow with page uptime, so the f32 handed
/// to the shader counts from the first frame instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    epoch: Option<f64>,
}

impl FrameClock {
    pub fn elapsed(&mut self, now_ms: f64) -> f32 {
        let epoch = *self.epoch.get_or_insert(now_ms);
        (now_ms - epoch) as f32
    }
}

pub fn mesh_vertices(points: &[Point], mesh: &Mesh) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(mesh.len() * 3);
    for t in mesh.triangles() {
        let color = t.color.to_unit();
        for &i in &t.indices {
            let p = &points[i];
            out.push(MeshVertex {
                init: to_f32(p.init),
                noise: to_f32(p.noise),
                color,
            });
        }
    }
    out
}

pub fn particle_instances(particles: &[Particle]) -> Vec<ParticleInstance> {
    particles
        .iter()
        .map(|p| ParticleInstance {
            anchor: to_f32(p.anchor),
            variation: to_f32(p.variation),
            color: p.fill().to_unit(),
            params: [p.radius as f32, p.interval as f32, 0.0, 0.0],
        })
        .collect()
}
