use rizumu_pp::{Beatmap, HitObject, HitObjectKind, Pos};

/// A map of alternating jumps: circles bouncing between two columns with a
/// slider and a spinner thrown in.
pub fn jump_map() -> Beatmap {
    let mut hit_objects: Vec<_> = (0..200)
        .map(|i| {
            let x = if i % 2 == 0 { 96.0 } else { 416.0 };
            let y = 192.0 + ((i / 2) % 3) as f32 * 48.0;

            HitObject {
                pos: Pos::new(x, y),
                start_time: f64::from(i) * 180.0,
                kind: HitObjectKind::Circle,
            }
        })
        .collect();

    hit_objects[50].kind = HitObjectKind::Slider {
        end_time: hit_objects[50].start_time + 120.0,
        nested: 2,
    };

    hit_objects[120].kind = HitObjectKind::Spinner {
        end_time: hit_objects[120].start_time + 150.0,
    };

    Beatmap {
        hit_objects,
        ar: 9.0,
        od: 8.5,
        cs: 4.0,
        hp: 5.0,
    }
}

/// Uniformly spaced circles in a straight line.
pub fn stream_map(n: usize, spacing: f32, delta: f64) -> Beatmap {
    let hit_objects = (0..n)
        .map(|i| HitObject {
            pos: Pos::new(64.0 + (i % 6) as f32 * spacing, 192.0),
            start_time: i as f64 * delta,
            kind: HitObjectKind::Circle,
        })
        .collect();

    Beatmap {
        hit_objects,
        ar: 9.3,
        od: 9.0,
        cs: 4.2,
        hp: 5.5,
    }
}
