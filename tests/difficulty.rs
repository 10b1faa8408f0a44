use rizumu_pp::{Beatmap, Difficulty, HitObject, HitObjectKind, Pos};

mod common;

#[test]
fn jump_map_has_positive_ratings() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    assert!(attrs.stars > 0.0, "{}", attrs.stars);
    assert!(attrs.aim > 0.0);
    assert!(attrs.speed > 0.0);
    assert!(attrs.accuracy > 0.0);
    assert!(attrs.speed_note_count > 0.0);

    assert_eq!(attrs.n_circles, 198);
    assert_eq!(attrs.n_sliders, 1);
    assert_eq!(attrs.n_spinners, 1);
    // 200 objects plus 2 nested slider hits
    assert_eq!(attrs.max_combo, 202);
}

#[test]
fn calculation_is_deterministic() {
    let map = common::jump_map();

    let first = Difficulty::new().mods(8).calculate(&map);
    let second = Difficulty::new().mods(8).calculate(&map);

    assert_eq!(first, second);
}

#[test]
fn double_time_raises_difficulty() {
    let map = common::jump_map();

    let nomod = Difficulty::new().calculate(&map);
    let dt = Difficulty::new().mods(64).calculate(&map);

    assert!(dt.stars > nomod.stars, "{} vs {}", dt.stars, nomod.stars);
    assert!(dt.speed > nomod.speed);
    assert!(dt.accuracy > nomod.accuracy);
}

#[test]
fn hard_rock_tightens_hit_windows() {
    let map = common::jump_map();

    let nomod = Difficulty::new().calculate(&map);
    let hr = Difficulty::new().mods(16).calculate(&map);

    assert!(hr.great_hit_window < nomod.great_hit_window);
    assert!(hr.accuracy > nomod.accuracy);
    assert!(hr.od > nomod.od);
}

#[test]
fn relax_drops_speed_and_accuracy() {
    let map = common::jump_map();
    let rx = Difficulty::new().mods(128).calculate(&map);

    assert_eq!(rx.speed, 0.0);
    assert_eq!(rx.accuracy, 0.0);
    assert!(rx.aim > 0.0);
}

#[test]
fn empty_map_produces_no_nan() {
    let attrs = Difficulty::new().calculate(&Beatmap::default());

    assert_eq!(attrs.aim, 0.0);
    assert_eq!(attrs.speed, 0.0);
    assert_eq!(attrs.accuracy, 0.0);
    assert_eq!(attrs.flashlight, 0.0);
    assert_eq!(attrs.max_combo, 0);
    assert!(!attrs.stars.is_nan());
}

#[test]
fn spinner_only_map_is_unconstrained() {
    let hit_objects = (0..10)
        .map(|i| HitObject {
            pos: Pos::new(256.0, 192.0),
            start_time: f64::from(i) * 1000.0,
            kind: HitObjectKind::Spinner {
                end_time: f64::from(i) * 1000.0 + 800.0,
            },
        })
        .collect();

    let map = Beatmap {
        hit_objects,
        ar: 9.0,
        od: 9.0,
        cs: 4.0,
        hp: 5.0,
    };

    let attrs = Difficulty::new().calculate(&map);

    assert_eq!(attrs.aim, 0.0);
    assert_eq!(attrs.speed, 0.0);
    assert_eq!(attrs.accuracy, 0.0);
    assert!(!attrs.stars.is_nan());
}

#[test]
fn denser_streams_are_faster() {
    let relaxed = Difficulty::new().calculate(&common::stream_map(300, 40.0, 280.0));
    let dense = Difficulty::new().calculate(&common::stream_map(300, 40.0, 130.0));

    assert!(
        dense.speed > relaxed.speed,
        "{} vs {}",
        dense.speed,
        relaxed.speed
    );
}
