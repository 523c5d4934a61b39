use crate::constants::*;
use crate::particles::ParticleFields;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spread {
    Value(f64),
    Range([f64; 2]),
}

impl Spread {
    pub const fn range(min: f64, max: f64) -> Self {
        Spread::Range([min, max])
    }

    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Spread::Value(v) => v,
            Spread::Range([min, max]) => {
                if min == max {
                    min
                } else {
                    rng.gen::<f64>() * (max - min) + min
                }
            }
        }
    }

    /// Whole-number count: a literal is rounded up, a range is sampled as an
    /// integer in `[min, max]` inclusive.
    pub fn resolve_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let v = match *self {
            Spread::Value(v) => v,
            Spread::Range([min, max]) => {
                let (lo, hi) = (min.min(max).ceil(), min.max(max).floor());
                if hi <= lo {
                    lo
                } else {
                    (rng.gen::<f64>() * (hi - lo + 1.0)).floor() + lo
                }
            }
        };
        if v.is_finite() && v > 0.0 {
            v.ceil() as usize
        } else {
            0
        }
    }
}

impl From<f64> for Spread {
    fn from(v: f64) -> Self {
        Spread::Value(v)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSettings {
    pub count: Spread,
    pub interval: Spread,
    pub radius: Spread,
    pub opacity: Spread,
    pub color: String,
    pub variation_x: Spread,
    pub variation_y: Spread,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        let r = |[a, b]: [f64; 2]| Spread::range(a, b);
        Self {
            count: r(DEFAULT_PARTICLE_COUNT),
            interval: r(DEFAULT_PARTICLE_INTERVAL),
            radius: r(DEFAULT_PARTICLE_RADIUS),
            opacity: r(DEFAULT_PARTICLE_OPACITY),
            color: DEFAULT_PARTICLE_COLOR.to_string(),
            variation_x: r(DEFAULT_PARTICLE_VARIATION_X),
            variation_y: r(DEFAULT_PARTICLE_VARIATION_Y),
        }
    }
}

impl ParticleSettings {
    pub fn merge(&mut self, patch: &ParticlePatch) {
        if let Some(v) = patch.count {
            self.count = v;
        }
        if let Some(v) = patch.interval {
            self.interval = v;
        }
        if let Some(v) = patch.radius {
            self.radius = v;
        }
        if let Some(v) = patch.opacity {
            self.opacity = v;
        }
        if let Some(v) = &patch.color {
            self.color = v.clone();
        }
        if let Some(v) = patch.variation_x {
            self.variation_x = v;
        }
        if let Some(v) = patch.variation_y {
            self.variation_y = v;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub triangle_size: f64,
    pub bleed: f64,
    pub noise: f64,
    pub colors: Vec<String>,
    pub point_variation_x: f64,
    pub point_variation_y: f64,
    pub point_animation_speed: f64,
    pub max_fps: f64,
    pub animation_offset: f64,
    pub image: Option<String>,
    pub image_opacity: f64,
    pub automatic_resize: bool,
    pub particle_settings: ParticleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            triangle_size: DEFAULT_TRIANGLE_SIZE,
            bleed: DEFAULT_BLEED,
            noise: DEFAULT_NOISE,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            point_variation_x: DEFAULT_POINT_VARIATION_X,
            point_variation_y: DEFAULT_POINT_VARIATION_Y,
            point_animation_speed: DEFAULT_POINT_ANIMATION_SPEED,
            max_fps: DEFAULT_MAX_FPS,
            animation_offset: DEFAULT_ANIMATION_OFFSET,
            image: None,
            image_opacity: DEFAULT_IMAGE_OPACITY,
            automatic_resize: true,
            particle_settings: ParticleSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_patch(patch: &SettingsPatch) -> Self {
        let mut s = Settings::default();
        s.merge(patch);
        if let (Some(c1), Some(c2)) = (&patch.color1, &patch.color2) {
            s.colors = vec![c1.clone(), c2.clone()];
        }
        s
    }

    pub(crate) fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.triangle_size {
            self.triangle_size = v;
        }
        if let Some(v) = patch.bleed {
            self.bleed = v;
        }
        if let Some(v) = patch.noise {
            self.noise = v;
        }
        if let Some(v) = &patch.colors {
            self.colors = v.clone();
        }
        if let Some(v) = patch.point_variation_x {
            self.point_variation_x = v;
        }
        if let Some(v) = patch.point_variation_y {
            self.point_variation_y = v;
        }
        if let Some(v) = patch.point_animation_speed {
            self.point_animation_speed = v;
        }
        if let Some(v) = patch.max_fps {
            self.max_fps = v;
        }
        if let Some(v) = patch.animation_offset {
            self.animation_offset = v;
        }
        if let Some(v) = &patch.image {
            self.image = normalize_image(v);
        }
        if let Some(v) = patch.image_opacity {
            self.image_opacity = v;
        }
        if let Some(v) = patch.automatic_resize {
            self.automatic_resize = v;
        }
        if let Some(p) = &patch.particle_settings {
            self.particle_settings.merge(p);
        }
    }

    pub fn to_patch(&self) -> SettingsPatch {
        let p = &self.particle_settings;
        SettingsPatch {
            triangle_size: Some(self.triangle_size),
            bleed: Some(self.bleed),
            noise: Some(self.noise),
            colors: Some(self.colors.clone()),
            point_variation_x: Some(self.point_variation_x),
            point_variation_y: Some(self.point_variation_y),
            point_animation_speed: Some(self.point_animation_speed),
            max_fps: Some(self.max_fps),
            animation_offset: Some(self.animation_offset),
            image: Some(self.image.clone().unwrap_or_default()),
            image_opacity: Some(self.image_opacity),
            automatic_resize: Some(self.automatic_resize),
            particle_settings: Some(ParticlePatch {
                count: Some(p.count),
                interval: Some(p.interval),
                radius: Some(p.radius),
                opacity: Some(p.opacity),
                color: Some(p.color.clone()),
                variation_x: Some(p.variation_x),
                variation_y: Some(p.variation_y),
            }),
            ..SettingsPatch::default()
        }
    }
}

pub(crate) fn normalize_image(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticlePatch {
    pub count: Option<Spread>,
    pub interval: Option<Spread>,
    pub radius: Option<Spread>,
    pub opacity: Option<Spread>,
    pub color: Option<String>,
    pub variation_x: Option<Spread>,
    pub variation_y: Option<Spread>,
}

impl ParticlePatch {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn fields(&self) -> ParticleFields {
        let mut f = ParticleFields::empty();
        f.set(ParticleFields::COUNT, self.count.is_some());
        f.set(ParticleFields::INTERVAL, self.interval.is_some());
        f.set(ParticleFields::RADIUS, self.radius.is_some());
        f.set(ParticleFields::OPACITY, self.opacity.is_some());
        f.set(ParticleFields::COLOR, self.color.is_some());
        f.set(ParticleFields::VARIATION_X, self.variation_x.is_some());
        f.set(ParticleFields::VARIATION_Y, self.variation_y.is_some());
        f
    }
}

/// Partial settings: present keys are applied, absent keys are left alone.
///
/// `force` makes the reconciler treat every present key as changed even when
/// its value equals the current one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub triangle_size: Option<f64>,
    pub bleed: Option<f64>,
    pub noise: Option<f64>,
    pub colors: Option<Vec<String>>,
    pub color1: Option<String>,
    pub color2: Option<String>,
    pub point_variation_x: Option<f64>,
    pub point_variation_y: Option<f64>,
    pub point_animation_speed: Option<f64>,
    pub max_fps: Option<f64>,
    pub animation_offset: Option<f64>,
    pub image: Option<String>,
    pub image_opacity: Option<f64>,
    pub automatic_resize: Option<bool>,
    pub particle_settings: Option<ParticlePatch>,
    pub force: bool,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.triangle_size.is_none()
            && self.bleed.is_none()
            && self.noise.is_none()
            && self.colors.is_none()
            && self.point_variation_x.is_none()
            && self.point_variation_y.is_none()
            && self.point_animation_speed.is_none()
            && self.max_fps.is_none()
            && self.animation_offset.is_none()
            && self.image.is_none()
            && self.image_opacity.is_none()
            && self.automatic_resize.is_none()
            && self.particle_settings.as_ref().map_or(true, ParticlePatch::is_empty)
    }
}
