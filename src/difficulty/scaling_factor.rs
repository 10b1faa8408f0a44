const BROKEN_GAMEFIELD_ROUNDING_ALLOWANCE: f64 = 1.00041;

const OBJECT_RADIUS: f64 = 64.0;

/// Fields around the scaling of hit objects.
///
/// All objects of a beatmap share the same scaling so it is stored only
/// once. Multiplying a playfield coordinate by `factor` expresses it in
/// units of the hit radius, which keeps the difficulty geometry
/// scale-invariant.
pub struct ScalingFactor {
    /// `1 / radius`, slightly increased for very small circles.
    pub factor: f64,
    pub radius: f64,
}

impl ScalingFactor {
    pub fn new(cs: f64) -> Self {
        let scale = (1.0 - 0.7 * (cs - 5.0) / 5.0) / 2.0 * BROKEN_GAMEFIELD_ROUNDING_ALLOWANCE;
        let radius = OBJECT_RADIUS * scale;

        let factor = radius.recip();

        let factor_with_small_circle_bonus = if radius < 30.0 {
            factor * (1.0 + (30.0 - radius).min(5.0) / 50.0)
        } else {
            factor
        };

        Self {
            factor: factor_with_small_circle_bonus,
            radius,
        }
    }
}
