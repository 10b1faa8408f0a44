use rizumu_pp::{Difficulty, Performance};

mod common;

#[test]
fn flawless_score_is_well_defined() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    let perf = attrs.performance().calculate();

    assert!(perf.pp > 0.0, "{}", perf.pp);
    assert!(perf.pp.is_finite());
    assert!(perf.deviation.is_finite());
    assert!(perf.deviation > 0.0);
    assert!(perf.pp_acc > 0.0);
    assert!(!perf.pp_acc.is_nan());
    assert_eq!(perf.effective_miss_count, 0.0);
}

#[test]
fn misses_reduce_pp() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    let clean = attrs.clone().performance().calculate();
    let sloppy = attrs.performance().combo(150).misses(5).calculate();

    assert!(
        sloppy.pp < clean.pp,
        "{} vs {}",
        sloppy.pp,
        clean.pp
    );
    assert!(sloppy.effective_miss_count >= 5.0);
}

#[test]
fn combo_shortfall_counts_as_slider_breaks() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);
    let max_combo = attrs.max_combo;

    // No misses judged, but far from a full combo.
    let perf = attrs
        .performance()
        .combo(max_combo / 3)
        .n100(10)
        .calculate();

    assert!(perf.effective_miss_count > 0.0);
    assert!(perf.effective_miss_count <= f64::from(perf.difficulty.n_objects()));
}

#[test]
fn no_successful_hits_gives_zero_deviation_terms() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);
    let n_objects = attrs.n_objects();

    let perf = attrs
        .performance()
        .combo(0)
        .n300(0)
        .misses(n_objects)
        .calculate();

    assert_eq!(perf.deviation, f64::INFINITY);
    assert_eq!(perf.pp_aim, 0.0);
    assert_eq!(perf.pp_speed, 0.0);
    assert_eq!(perf.pp_acc, 0.0);
}

#[test]
fn hundreds_worsen_deviation() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    let clean = attrs.clone().performance().calculate();
    let sloppy = attrs.performance().n100(30).calculate();

    assert!(
        sloppy.deviation > clean.deviation,
        "{} vs {}",
        sloppy.deviation,
        clean.deviation
    );
    assert!(sloppy.pp_acc < clean.pp_acc);
}

#[test]
fn total_is_monotone_in_skill_values() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    let mut boosted = attrs.clone();
    boosted.aim *= 1.2;

    let base = attrs.performance().calculate();
    let better = boosted.performance().calculate();

    assert!(better.pp > base.pp);
}

#[test]
fn no_fail_penalizes_misses_only() {
    let map = common::jump_map();
    let attrs = Difficulty::new().calculate(&map);

    let without_nf = attrs.clone().performance().combo(150).misses(10).calculate();
    let with_nf = attrs
        .performance()
        .mods(1) // NF
        .combo(150)
        .misses(10)
        .calculate();

    assert!(with_nf.pp < without_nf.pp);
}

#[test]
fn streams_get_a_speed_deviation() {
    let map = common::stream_map(400, 40.0, 140.0);
    let attrs = Difficulty::new().calculate(&map);

    assert!(attrs.speed_note_count > 0.0);

    let perf = attrs.performance().n100(8).calculate();

    assert!(perf.speed_deviation.is_finite());
    assert!(perf.speed_deviation > 0.0);
    assert!(perf.pp_speed > 0.0);
}

#[test]
fn hidden_rewards_low_approach_rate() {
    let mut map = common::jump_map();
    map.ar = 8.0;

    let attrs = Difficulty::new().mods(8).calculate(&map);
    let low_ar = attrs.performance().mods(8).calculate();

    map.ar = 10.0;
    let attrs = Difficulty::new().mods(8).calculate(&map);
    let high_ar = attrs.performance().mods(8).calculate();

    // The approach rate feeds no aim skill, so the aim ratings agree and
    // the difference is purely the visibility bonus.
    assert!((low_ar.difficulty.aim - high_ar.difficulty.aim).abs() < 1e-12);
    assert!(
        low_ar.pp_aim > high_ar.pp_aim,
        "{} vs {}",
        low_ar.pp_aim,
        high_ar.pp_aim
    );
}
