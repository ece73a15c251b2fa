use livedash::{RotationEngine, RotationState, rotation};

#[test]
fn new_engine_is_idle_and_ignores_ticks() {
    let mut engine = RotationEngine::new();
    assert_eq!(engine.state(), RotationState::Idle);
    assert_eq!(engine.tick(), None);
    assert_eq!(engine.hero_index(), None);
    assert!(engine.secondary_indices().is_empty());
}

#[test]
fn empty_feed_never_rotates() {
    let mut engine = RotationEngine::new();
    assert!(!engine.start(0));
    assert!(!engine.is_rotating());
    assert_eq!(engine.tick(), None);
}

#[test]
fn hero_after_k_ticks_is_k_mod_n() {
    for n in 1..=7 {
        let mut engine = RotationEngine::new();
        assert!(engine.start(n));
        assert_eq!(engine.hero_index(), Some(0));

        for k in 1..=20 {
            assert_eq!(engine.tick(), Some(k % n), "n={n} k={k}");
            assert_eq!(engine.hero_index(), Some(k % n));
        }
    }
}

#[test]
fn hero_is_never_among_secondary() {
    let mut engine = RotationEngine::new();
    engine.start(5);

    for _ in 0..12 {
        let hero = engine.hero_index().unwrap();
        let rest = engine.secondary_indices();
        assert_eq!(rest.len(), 4);
        assert!(!rest.contains(&hero));
        assert!(rest.windows(2).all(|w| w[0] < w[1]));
        engine.tick();
    }
}

#[test]
fn single_item_stays_hero() {
    let mut engine = RotationEngine::new();
    engine.start(1);
    assert_eq!(engine.tick(), Some(0));
    assert!(engine.secondary_indices().is_empty());
}

#[test]
fn restart_resets_and_bumps_generation() {
    let mut engine = RotationEngine::new();
    engine.start(4);
    engine.tick();
    engine.tick();
    let generation = engine.generation();

    engine.start(3);
    assert_eq!(engine.state(), RotationState::Rotating { index: 0, len: 3 });
    assert!(engine.generation() > generation);

    let generation = engine.generation();
    engine.stop();
    assert_eq!(engine.state(), RotationState::Idle);
    assert!(engine.generation() > generation);
}

#[test]
fn secondary_positions_skip_only_the_hero() {
    assert_eq!(rotation::secondary_indices(0, 3), [1, 2]);
    assert_eq!(rotation::secondary_indices(2, 3), [0, 1]);
    assert!(rotation::secondary_indices(0, 1).is_empty());
    assert!(rotation::secondary_indices(0, 0).is_empty());
}
