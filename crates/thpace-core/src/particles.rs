use crate::color::{parse_color, Rgba};
use crate::constants::{PARTICLE_CELL_AREA, TAU};
use crate::settings::ParticleSettings;
use bitflags::bitflags;
use glam::DVec2;
use rand::Rng;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParticleFields: u8 {
        const COUNT = 1 << 0;
        const INTERVAL = 1 << 1;
        const RADIUS = 1 << 2;
        const OPACITY = 1 << 3;
        const COLOR = 1 << 4;
        const VARIATION_X = 1 << 5;
        const VARIATION_Y = 1 << 6;
        const APPEARANCE = Self::INTERVAL.bits()
            | Self::RADIUS.bits()
            | Self::OPACITY.bits()
            | Self::COLOR.bits()
            | Self::VARIATION_X.bits()
            | Self::VARIATION_Y.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub anchor: DVec2,
    pub color: Rgba,
    pub opacity: f64,
    pub radius: f64,
    pub interval: f64,
    pub variation: DVec2,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(
        width: f64,
        height: f64,
        settings: &ParticleSettings,
        color: Rgba,
        rng: &mut R,
    ) -> Self {
        let anchor = DVec2::new(uniform(rng, width), uniform(rng, height));
        let mut p = Particle {
            anchor,
            color,
            opacity: 0.0,
            radius: 0.0,
            interval: 0.0,
            variation: DVec2::ZERO,
        };
        p.resolve(ParticleFields::APPEARANCE, settings, color, rng);
        p
    }

    fn resolve<R: Rng + ?Sized>(
        &mut self,
        fields: ParticleFields,
        settings: &ParticleSettings,
        color: Rgba,
        rng: &mut R,
    ) {
        if fields.contains(ParticleFields::COLOR) {
            self.color = color;
        }
        if fields.contains(ParticleFields::OPACITY) {
            self.opacity = settings.opacity.resolve(rng);
        }
        if fields.contains(ParticleFields::RADIUS) {
            self.radius = settings.radius.resolve(rng);
        }
        if fields.contains(ParticleFields::INTERVAL) {
            self.interval = settings.interval.resolve(rng);
        }
        if fields.contains(ParticleFields::VARIATION_X) {
            self.variation.x = settings.variation_x.resolve(rng);
        }
        if fields.contains(ParticleFields::VARIATION_Y) {
            self.variation.y = settings.variation_y.resolve(rng);
        }
    }

    #[inline]
    pub fn offset(&self, elapsed_ms: f64) -> DVec2 {
        if self.interval == 0.0 {
            return DVec2::ZERO;
        }
        let (s, c) = (TAU * elapsed_ms / self.interval).sin_cos();
        DVec2::new(s * self.variation.x, c * self.variation.y)
    }

    #[inline]
    pub fn position(&self, elapsed_ms: f64) -> DVec2 {
        self.anchor + self.offset(elapsed_ms)
    }

    pub fn fill(&self) -> Rgba {
        self.color.with_alpha(self.opacity as f32)
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 {
        rng.gen::<f64>() * extent
    } else {
        0.0
    }
}

pub fn cell_count(width: f64, height: f64) -> usize {
    let area = width.max(0.0) * height.max(0.0);
    (area / PARTICLE_CELL_AREA).ceil() as usize
}

pub fn populate<R: Rng + ?Sized>(
    width: f64,
    height: f64,
    settings: &ParticleSettings,
    rng: &mut R,
) -> Vec<Particle> {
    let color = parse_color(&settings.color);
    let mut particles = Vec::new();
    for _ in 0..cell_count(width, height) {
        let n = settings.count.resolve_count(rng);
        for _ in 0..n {
            particles.push(Particle::spawn(width, height, settings, color, rng));
        }
    }
    particles
}

/// Re-resolve only the `changed` fields of every particle. Anchors and the
/// population size are untouched; `COUNT` is ignored here.
pub fn patch<R: Rng + ?Sized>(
    particles: &mut [Particle],
    changed: ParticleFields,
    settings: &ParticleSettings,
    rng: &mut R,
) {
    let changed = changed & ParticleFields::APPEARANCE;
    if changed.is_empty() {
        return;
    }
    let color = if changed.contains(ParticleFields::COLOR) {
        parse_color(&settings.color)
    } else {
        Rgba::TRANSPARENT
    };
    for p in particles.iter_mut() {
        p.resolve(changed, settings, color, rng);
    }
}
