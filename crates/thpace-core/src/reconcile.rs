use crate::particles::ParticleFields;
use crate::settings::{normalize_image, ParticlePatch, Settings, SettingsPatch};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    Noise,
    PointVariationX,
    PointVariationY,
    PointAnimationSpeed,
    AnimationOffset,
}

impl Uniform {
    pub fn value(self, settings: &Settings) -> f64 {
        match self {
            Uniform::Noise => settings.noise,
            Uniform::PointVariationX => settings.point_variation_x,
            Uniform::PointVariationY => settings.point_variation_y,
            Uniform::PointAnimationSpeed => settings.point_animation_speed,
            Uniform::AnimationOffset => settings.animation_offset,
        }
    }

    pub const ALL: [Uniform; 5] = [
        Uniform::Noise,
        Uniform::PointVariationX,
        Uniform::PointVariationY,
        Uniform::PointAnimationSpeed,
        Uniform::AnimationOffset,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    RebuildGrid,
    RebuildMesh,
    RecolorMesh,
    SetUniform(Uniform),
    RebuildParticles,
    PatchParticles(ParticleFields),
    SubscribeResize(bool),
}

impl Action {
    fn rank(&self) -> u8 {
        match self {
            Action::RebuildGrid => 0,
            Action::RebuildMesh => 1,
            Action::RecolorMesh => 2,
            Action::SetUniform(_) => 3,
            Action::RebuildParticles => 4,
            Action::PatchParticles(_) => 5,
            Action::SubscribeResize(_) => 6,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    actions: SmallVec<[Action; 8]>,
}

impl Plan {
    fn push(&mut self, action: Action) {
        if let Action::PatchParticles(fields) = action {
            for a in self.actions.iter_mut() {
                if let Action::PatchParticles(existing) = a {
                    *existing |= fields;
                    return;
                }
            }
        }
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Drop work made redundant by a bigger rebuild, then order the rest the
    /// way it has to run: lattice, mesh, colors, uniforms, particles, resize.
    fn finish(mut self) -> Self {
        let mesh = self.contains(&Action::RebuildMesh);
        let particles = self.contains(&Action::RebuildParticles);
        self.actions.retain(|a| match a {
            Action::RecolorMesh => !mesh,
            Action::PatchParticles(_) => !particles,
            _ => true,
        });
        self.actions.sort_by_key(Action::rank);
        self
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn rebuilds_grid(&self) -> bool {
        self.contains(&Action::RebuildGrid)
    }

    pub fn rebuilds_mesh(&self) -> bool {
        self.contains(&Action::RebuildMesh)
    }
}

fn changed<T: PartialEq + Clone>(incoming: &Option<T>, current: &T) -> Option<T> {
    incoming.as_ref().filter(|v| *v != current).cloned()
}

fn diff_particles(current: &Settings, incoming: &ParticlePatch) -> ParticlePatch {
    let cur = &current.particle_settings;
    ParticlePatch {
        count: changed(&incoming.count, &cur.count),
        interval: changed(&incoming.interval, &cur.interval),
        radius: changed(&incoming.radius, &cur.radius),
        opacity: changed(&incoming.opacity, &cur.opacity),
        color: changed(&incoming.color, &cur.color),
        variation_x: changed(&incoming.variation_x, &cur.variation_x),
        variation_y: changed(&incoming.variation_y, &cur.variation_y),
    }
}

pub fn diff(current: &Settings, incoming: &SettingsPatch) -> SettingsPatch {
    if incoming.force {
        return SettingsPatch {
            color1: None,
            color2: None,
            force: false,
            ..incoming.clone()
        };
    }
    let particle_settings = incoming
        .particle_settings
        .as_ref()
        .map(|p| diff_particles(current, p))
        .filter(|p| !p.is_empty());
    SettingsPatch {
        triangle_size: changed(&incoming.triangle_size, &current.triangle_size),
        bleed: changed(&incoming.bleed, &current.bleed),
        noise: changed(&incoming.noise, &current.noise),
        colors: changed(&incoming.colors, &current.colors),
        color1: None,
        color2: None,
        point_variation_x: changed(&incoming.point_variation_x, &current.point_variation_x),
        point_variation_y: changed(&incoming.point_variation_y, &current.point_variation_y),
        point_animation_speed: changed(
            &incoming.point_animation_speed,
            &current.point_animation_speed,
        ),
        max_fps: changed(&incoming.max_fps, &current.max_fps),
        animation_offset: changed(&incoming.animation_offset, &current.animation_offset),
        image: incoming
            .image
            .as_ref()
            .filter(|v| normalize_image(v) != current.image)
            .cloned(),
        image_opacity: changed(&incoming.image_opacity, &current.image_opacity),
        automatic_resize: changed(&incoming.automatic_resize, &current.automatic_resize),
        particle_settings,
        force: false,
    }
}

/// Store the changed values of `incoming` into `current` and return the work
/// needed to bring the generated state back in line with them.
///
/// | key | work |
/// |---|---|
/// | triangleSize, bleed | rebuild lattice, then mesh |
/// | noise | uniform; rebuild mesh if `noise > triangleSize`, else recolor |
/// | colors | recolor |
/// | pointVariationX/Y, pointAnimationSpeed, animationOffset | uniform |
/// | maxFps, image, imageOpacity | none, read when needed |
/// | automaticResize | (un)subscribe resize |
/// | particleSettings.count | rebuild particles |
/// | other particleSettings | patch particles in place |
pub fn reconcile(current: &mut Settings, incoming: &SettingsPatch) -> Plan {
    let changes = diff(current, incoming);
    current.merge(&changes);

    let mut plan = Plan::default();
    if changes.triangle_size.is_some() || changes.bleed.is_some() {
        plan.push(Action::RebuildGrid);
        plan.push(Action::RebuildMesh);
    }
    if let Some(noise) = changes.noise {
        plan.push(Action::SetUniform(Uniform::Noise));
        // Approximation: jitter is bounded per axis by noise/2, so topology can
        // go stale below this threshold too; kept as the rebuild trigger.
        if noise > current.triangle_size {
            plan.push(Action::RebuildMesh);
        } else {
            plan.push(Action::RecolorMesh);
        }
    }
    if changes.colors.is_some() {
        plan.push(Action::RecolorMesh);
    }
    if changes.point_variation_x.is_some() {
        plan.push(Action::SetUniform(Uniform::PointVariationX));
    }
    if changes.point_variation_y.is_some() {
        plan.push(Action::SetUniform(Uniform::PointVariationY));
    }
    if changes.point_animation_speed.is_some() {
        plan.push(Action::SetUniform(Uniform::PointAnimationSpeed));
    }
    if changes.animation_offset.is_some() {
        plan.push(Action::SetUniform(Uniform::AnimationOffset));
    }
    if let Some(enabled) = changes.automatic_resize {
        plan.push(Action::SubscribeResize(enabled));
    }
    if let Some(p) = &changes.particle_settings {
        let fields = p.fields();
        if fields.contains(ParticleFields::COUNT) {
            plan.push(Action::RebuildParticles);
        }
        let appearance = fields & ParticleFields::APPEARANCE;
        if !appearance.is_empty() {
            plan.push(Action::PatchParticles(appearance));
        }
    }
    plan.finish()
}
