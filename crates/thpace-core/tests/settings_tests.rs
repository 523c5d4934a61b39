// Host-side tests for settings defaults, merging and value spreads.

use thpace_core::constants::*;
use thpace_core::settings::{ParticlePatch, Settings, SettingsPatch, Spread};
use thpace_core::{SeedableRng, StdRng};

#[test]
fn defaults_match_the_documented_table() {
    let s = Settings::default();
    assert_eq!(s.triangle_size, 130.0);
    assert_eq!(s.bleed, 120.0);
    assert_eq!(s.noise, 60.0);
    assert_eq!(s.colors, vec!["rgba(11,135,147,1)", "rgba(54,0,51,1)"]);
    assert_eq!(s.point_variation_x, 20.0);
    assert_eq!(s.point_variation_y, 35.0);
    assert_eq!(s.point_animation_speed, 7500.0);
    assert_eq!(s.max_fps, 144.0);
    assert_eq!(s.animation_offset, 250.0);
    assert_eq!(s.image, None);
    assert_eq!(s.image_opacity, 0.4);
    assert!(s.automatic_resize);

    let p = &s.particle_settings;
    assert_eq!(p.count, Spread::range(2.0, 5.0));
    assert_eq!(p.interval, Spread::range(5000.0, 10000.0));
    assert_eq!(p.color, DEFAULT_PARTICLE_COLOR);
    assert_eq!(p.variation_y, Spread::range(2.5, 7.5));
}

#[test]
fn particle_settings_merge_independently() {
    let s = Settings::from_patch(&SettingsPatch {
        noise: Some(10.0),
        particle_settings: Some(ParticlePatch {
            radius: Some(Spread::Value(3.0)),
            ..Default::default()
        }),
        ..Default::default()
    });
    assert_eq!(s.noise, 10.0);
    assert_eq!(s.particle_settings.radius, Spread::Value(3.0));
    assert_eq!(
        s.particle_settings.opacity,
        Spread::range(DEFAULT_PARTICLE_OPACITY[0], DEFAULT_PARTICLE_OPACITY[1])
    );
    assert_eq!(s.triangle_size, DEFAULT_TRIANGLE_SIZE);
}

#[test]
fn empty_patches() {
    assert!(SettingsPatch::default().is_empty());
    assert!(SettingsPatch {
        force: true,
        particle_settings: Some(ParticlePatch::default()),
        ..Default::default()
    }
    .is_empty());
    assert!(!Settings::default().to_patch().is_empty());
}

#[test]
fn spreads_resolve_within_range() {
    let mut rng = StdRng::seed_from_u64(1);
    let s = Spread::range(2.0, 4.0);
    for _ in 0..500 {
        let v = s.resolve(&mut rng);
        assert!((2.0..4.0).contains(&v));
    }
    assert_eq!(Spread::Value(7.5).resolve(&mut rng), 7.5);
    assert_eq!(Spread::range(3.0, 3.0).resolve(&mut rng), 3.0);
    assert_eq!(Spread::from(1.25), Spread::Value(1.25));
}

#[test]
fn counts_are_whole_and_inclusive() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut seen = [false; 6];
    for _ in 0..1000 {
        let n = Spread::range(2.0, 5.0).resolve_count(&mut rng);
        assert!((2..=5).contains(&n));
        seen[n] = true;
    }
    assert!(seen[2] && seen[3] && seen[4] && seen[5]);

    assert_eq!(Spread::Value(2.2).resolve_count(&mut rng), 3);
    assert_eq!(Spread::Value(-1.0).resolve_count(&mut rng), 0);
    assert_eq!(Spread::Value(f64::NAN).resolve_count(&mut rng), 0);
    assert_eq!(Spread::range(3.0, 3.0).resolve_count(&mut rng), 3);
    let reversed = Spread::range(5.0, 2.0).resolve_count(&mut rng);
    assert!((2..=5).contains(&reversed));
}
