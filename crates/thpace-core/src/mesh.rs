use crate::color::{Gradient, Rgba};
use crate::constants::TRIANGULATION_DECIMALS;
use crate::points::Point;
use glam::DVec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub color: Rgba,
}

impl Triangle {
    #[inline]
    pub fn vertices(&self, points: &[Point], noise: f64) -> [DVec2; 3] {
        self.indices.map(|i| points[i].noised(noise))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Triangulate `points` after displacing each by its noise.
    ///
    /// The displaced coordinates are rounded to 14 decimals before being fed
    /// to the triangulator so tiny float differences cannot flip near-degenerate
    /// cases. Triangles keep indices into the undisplaced `points`. Colors are
    /// left transparent; see [`Mesh::recolor`].
    pub fn triangulate(points: &[Point], noise: f64) -> Mesh {
        let input: Vec<delaunator::Point> = points
            .iter()
            .map(|p| {
                let n = p.noised(noise);
                delaunator::Point {
                    x: round_to(n.x, TRIANGULATION_DECIMALS),
                    y: round_to(n.y, TRIANGULATION_DECIMALS),
                }
            })
            .collect();
        let triangulation = delaunator::triangulate(&input);
        let triangles = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| Triangle {
                indices: [t[0], t[1], t[2]],
                color: Rgba::TRANSPARENT,
            })
            .collect::<Vec<_>>();
        if triangles.is_empty() && !points.is_empty() {
            log::debug!("triangulation of {} points produced no triangles", points.len());
        }
        Mesh { triangles }
    }

    pub fn build(
        points: &[Point],
        noise: f64,
        gradient: &Gradient,
        width: f64,
        height: f64,
    ) -> Mesh {
        let mut mesh = Mesh::triangulate(points, noise);
        mesh.recolor(points, gradient, noise, width, height);
        mesh
    }

    pub fn recolor(
        &mut self,
        points: &[Point],
        gradient: &Gradient,
        noise: f64,
        width: f64,
        height: f64,
    ) {
        for t in &mut self.triangles {
            t.color = color_of(t, points, gradient, noise, width, height);
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Gradient color at the triangle's noised centroid.
///
/// The centroid is normalized by the canvas size and the two axes averaged:
/// `t = clamp((cx / width + cy / height) / 2, 0, 1)`, so the gradient runs
/// from the top-left corner to the bottom-right one.
pub fn color_of(
    triangle: &Triangle,
    points: &[Point],
    gradient: &Gradient,
    noise: f64,
    width: f64,
    height: f64,
) -> Rgba {
    let [a, b, c] = triangle.vertices(points, noise);
    let center = (a + b + c) / 3.0;
    gradient.at(gradient_position(center, width, height))
}

pub fn gradient_position(p: DVec2, width: f64, height: f64) -> f64 {
    let fx = if width > 0.0 { p.x / width } else { 0.0 };
    let fy = if height > 0.0 { p.y / height } else { 0.0 };
    ((fx + fy) / 2.0).clamp(0.0, 1.0)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    scaled.round() / factor
}
