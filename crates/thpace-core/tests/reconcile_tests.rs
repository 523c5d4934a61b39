// Host-side tests for settings diffing and the regeneration plan.

use thpace_core::particles::ParticleFields;
use thpace_core::reconcile::{diff, reconcile, Action, Uniform};
use thpace_core::settings::{ParticlePatch, Settings, SettingsPatch, Spread};

fn actions(plan: &thpace_core::Plan) -> Vec<Action> {
    plan.iter().copied().collect()
}

#[test]
fn unchanged_values_do_nothing() {
    let mut s = Settings::default();
    let plan = reconcile(&mut s, &Settings::default().to_patch());
    assert!(plan.is_empty());
    assert_eq!(s, Settings::default());

    let plan = reconcile(&mut s, &SettingsPatch::default());
    assert!(plan.is_empty());
}

#[test]
fn small_noise_change_recolors() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            noise: Some(61.0),
            ..Default::default()
        },
    );
    assert_eq!(
        actions(&plan),
        vec![Action::RecolorMesh, Action::SetUniform(Uniform::Noise)]
    );
    assert_eq!(s.noise, 61.0);

    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            noise: Some(60.0),
            ..Default::default()
        },
    );
    assert!(plan.contains(&Action::SetUniform(Uniform::Noise)));
    assert!(!plan.rebuilds_mesh());
}

#[test]
fn noise_above_triangle_size_retriangulates() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            noise: Some(150.0),
            ..Default::default()
        },
    );
    assert_eq!(
        actions(&plan),
        vec![Action::RebuildMesh, Action::SetUniform(Uniform::Noise)]
    );
    assert!(!plan.rebuilds_grid());
}

#[test]
fn noise_is_compared_against_the_new_triangle_size() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            noise: Some(150.0),
            triangle_size: Some(200.0),
            ..Default::default()
        },
    );
    assert_eq!(
        actions(&plan),
        vec![
            Action::RebuildGrid,
            Action::RebuildMesh,
            Action::SetUniform(Uniform::Noise)
        ]
    );
}

#[test]
fn lattice_keys_rebuild_grid_once() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            triangle_size: Some(200.0),
            bleed: Some(10.0),
            ..Default::default()
        },
    );
    assert_eq!(actions(&plan), vec![Action::RebuildGrid, Action::RebuildMesh]);
    assert_eq!(s.triangle_size, 200.0);
    assert_eq!(s.bleed, 10.0);
}

#[test]
fn colors_only_recolor() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            colors: Some(vec!["#ff0000".into(), "blue".into()]),
            ..Default::default()
        },
    );
    assert_eq!(actions(&plan), vec![Action::RecolorMesh]);
}

#[test]
fn motion_keys_map_to_uniforms() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            point_variation_x: Some(1.0),
            point_variation_y: Some(2.0),
            point_animation_speed: Some(3.0),
            animation_offset: Some(4.0),
            ..Default::default()
        },
    );
    assert_eq!(plan.len(), 4);
    for u in [
        Uniform::PointVariationX,
        Uniform::PointVariationY,
        Uniform::PointAnimationSpeed,
        Uniform::AnimationOffset,
    ] {
        assert!(plan.contains(&Action::SetUniform(u)));
    }
    assert_eq!(Uniform::AnimationOffset.value(&s), 4.0);
}

#[test]
fn store_only_keys_schedule_nothing() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            max_fps: Some(30.0),
            image: Some("overlay.png".into()),
            image_opacity: Some(0.8),
            ..Default::default()
        },
    );
    assert!(plan.is_empty());
    assert_eq!(s.max_fps, 30.0);
    assert_eq!(s.image.as_deref(), Some("overlay.png"));
    assert_eq!(s.image_opacity, 0.8);

    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            image: Some(String::new()),
            ..Default::default()
        },
    );
    assert!(plan.is_empty());
    assert_eq!(s.image, None);
}

#[test]
fn zero_values_are_applied() {
    let mut s = Settings::default();
    reconcile(
        &mut s,
        &SettingsPatch {
            max_fps: Some(0.0),
            noise: Some(0.0),
            ..Default::default()
        },
    );
    assert_eq!(s.max_fps, 0.0);
    assert_eq!(s.noise, 0.0);
}

#[test]
fn automatic_resize_toggles_subscription() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            automatic_resize: Some(false),
            ..Default::default()
        },
    );
    assert_eq!(actions(&plan), vec![Action::SubscribeResize(false)]);
    assert!(!s.automatic_resize);
}

#[test]
fn particle_count_rebuilds_and_wins_over_patches() {
    let mut s = Settings::default();
    let count = SettingsPatch {
        particle_settings: Some(ParticlePatch {
            count: Some(Spread::Value(1.0)),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(
        actions(&reconcile(&mut s, &count)),
        vec![Action::RebuildParticles]
    );

    let both = SettingsPatch {
        particle_settings: Some(ParticlePatch {
            count: Some(Spread::Value(2.0)),
            radius: Some(Spread::Value(3.0)),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(
        actions(&reconcile(&mut s, &both)),
        vec![Action::RebuildParticles]
    );
    assert_eq!(s.particle_settings.radius, Spread::Value(3.0));
}

#[test]
fn particle_appearance_is_patched() {
    let mut s = Settings::default();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            particle_settings: Some(ParticlePatch {
                radius: Some(Spread::range(2.0, 4.0)),
                color: Some("#00ff00".into()),
                // unchanged, must not show up
                opacity: Some(Spread::range(0.1, 0.7)),
                ..Default::default()
            }),
            ..Default::default()
        },
    );
    assert_eq!(
        actions(&plan),
        vec![Action::PatchParticles(
            ParticleFields::RADIUS | ParticleFields::COLOR
        )]
    );
}

#[test]
fn force_treats_present_keys_as_changed() {
    let mut s = Settings::default();
    let colors = s.colors.clone();
    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            noise: Some(60.0),
            colors: Some(colors),
            force: true,
            ..Default::default()
        },
    );
    assert_eq!(
        actions(&plan),
        vec![Action::RecolorMesh, Action::SetUniform(Uniform::Noise)]
    );

    let plan = reconcile(
        &mut s,
        &SettingsPatch {
            force: true,
            ..Settings::default().to_patch()
        },
    );
    assert!(plan.rebuilds_grid());
    assert!(plan.contains(&Action::RebuildParticles));
    assert!(!plan.contains(&Action::PatchParticles(ParticleFields::APPEARANCE)));
}

#[test]
fn diff_keeps_only_changed_keys() {
    let s = Settings::default();
    let d = diff(
        &s,
        &SettingsPatch {
            noise: Some(60.0),
            bleed: Some(10.0),
            particle_settings: Some(ParticlePatch {
                color: Some("#ffffff".into()),
                ..Default::default()
            }),
            ..Default::default()
        },
    );
    assert_eq!(
        d,
        SettingsPatch {
            bleed: Some(10.0),
            ..Default::default()
        }
    );
}

#[test]
fn legacy_colors_only_apply_at_construction() {
    let legacy = SettingsPatch {
        color1: Some("#111111".into()),
        color2: Some("#222222".into()),
        ..Default::default()
    };
    let built = Settings::from_patch(&legacy);
    assert_eq!(built.colors, vec!["#111111", "#222222"]);

    let mut s = Settings::default();
    assert!(reconcile(&mut s, &legacy).is_empty());
    assert_eq!(s.colors, Settings::default().colors);

    let half = Settings::from_patch(&SettingsPatch {
        color1: Some("#111111".into()),
        ..Default::default()
    });
    assert_eq!(half.colors, Settings::default().colors);
}
