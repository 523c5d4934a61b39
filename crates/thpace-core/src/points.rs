use crate::constants::TAU;
use glam::DVec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub init: DVec2,
    pub pos: DVec2,
    pub noise: DVec2,
}

impl Point {
    pub fn new(init: DVec2, noise: DVec2) -> Self {
        Self {
            init,
            pos: init,
            noise,
        }
    }

    /// Current position displaced by `noise * magnitude`. This is where the
    /// point is triangulated and drawn; the offset is never stored.
    #[inline]
    pub fn noised(&self, magnitude: f64) -> DVec2 {
        self.pos + self.noise * magnitude
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMotion {
    pub variation_x: f64,
    pub variation_y: f64,
    pub speed: f64,
    pub offset: f64,
}

/// Number of lattice coordinates along one axis.
///
/// Covers at least `-bleed .. extent + 2 * bleed` the way the lattice always
/// has, and never stops short of `extent + bleed` so jitter cannot open a gap
/// along the far edge.
pub fn axis_steps(extent: f64, size: f64, bleed: f64) -> usize {
    if !(size.is_finite() && size > 0.0) {
        return 0;
    }
    let legacy = ((extent + 3.0 * bleed) / size).ceil();
    let covering = ((extent + 2.0 * bleed) / size).ceil() + 1.0;
    legacy.max(covering).max(0.0) as usize
}

pub fn build_grid<R: Rng + ?Sized>(
    width: f64,
    height: f64,
    triangle_size: f64,
    bleed: f64,
    rng: &mut R,
) -> Vec<Point> {
    let nx = axis_steps(width, triangle_size, bleed);
    let ny = axis_steps(height, triangle_size, bleed);
    if nx == 0 || ny == 0 {
        log::warn!(
            "empty point grid (size {}x{}, triangleSize {}, bleed {})",
            width,
            height,
            triangle_size,
            bleed
        );
        return Vec::new();
    }

    let mut points = Vec::with_capacity(nx * ny);
    for i in 0..nx {
        let x = -bleed + i as f64 * triangle_size;
        for j in 0..ny {
            let y = -bleed + j as f64 * triangle_size;
            let noise = DVec2::new(rng.gen_range(-0.5..=0.5), rng.gen_range(-0.5..=0.5));
            points.push(Point::new(DVec2::new(x, y), noise));
        }
    }
    points
}

/// Move every point along its loop for time `elapsed_ms`.
///
/// `x = init.x + sin(init.x / offset + 2π t / speed) * variation_x`, and the
/// same with `cos` for y. Runs once per drawn frame, so it works in place.
pub fn animate(points: &mut [Point], elapsed_ms: f64, motion: &PointMotion) {
    let angular = if motion.speed != 0.0 {
        TAU * elapsed_ms / motion.speed
    } else {
        0.0
    };
    for p in points.iter_mut() {
        let phase = if motion.offset != 0.0 {
            p.init.x / motion.offset
        } else {
            0.0
        };
        let (s, c) = (phase + angular).sin_cos();
        p.pos.x = p.init.x + s * motion.variation_x;
        p.pos.y = p.init.y + c * motion.variation_y;
    }
}
