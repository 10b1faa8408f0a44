//! Adaptive numerical integration of smooth scalar functions.

use crate::util::float_ext::FloatExt;

/// Recursion cap for the adaptive subdivision; at the cap the current
/// estimate is accepted as-is.
const MAX_DEPTH: usize = 16;

/// Stand-in upper limit for improper integrals after the change of
/// variables; `t = 1` itself maps to infinity.
const ONE_MINUS: f64 = 1.0 - 1e-9;

/// Integrates `f` over `[lo, hi]` to roughly the requested accuracy using
/// adaptive Simpson quadrature.
///
/// `hi` may be [`f64::INFINITY`], in which case the tail is folded into the
/// unit interval via `x = lo + t / (1 - t)`; the integrand is expected to
/// decay towards infinity (probability-style integrands do).
pub fn integrate(f: impl Fn(f64) -> f64, lo: f64, hi: f64, accuracy: f64) -> f64 {
    if hi.is_infinite() {
        let g = |t: f64| {
            let denom = 1.0 - t;

            f(lo + t / denom) / (denom * denom)
        };

        return integrate_finite(&g, 0.0, ONE_MINUS, accuracy);
    }

    integrate_finite(&f, lo, hi, accuracy)
}

fn integrate_finite(f: &impl Fn(f64) -> f64, lo: f64, hi: f64, accuracy: f64) -> f64 {
    if FloatExt::eq(lo, hi) {
        return 0.0;
    }

    let mid = 0.5 * (lo + hi);
    let flo = f(lo);
    let fmid = f(mid);
    let fhi = f(hi);
    let whole = simpson(lo, hi, flo, fmid, fhi);

    step(f, lo, hi, flo, fmid, fhi, whole, accuracy, MAX_DEPTH)
}

fn simpson(lo: f64, hi: f64, flo: f64, fmid: f64, fhi: f64) -> f64 {
    (hi - lo) / 6.0 * (flo + 4.0 * fmid + fhi)
}

#[allow(clippy::too_many_arguments)]
fn step(
    f: &impl Fn(f64) -> f64,
    lo: f64,
    hi: f64,
    flo: f64,
    fmid: f64,
    fhi: f64,
    whole: f64,
    accuracy: f64,
    depth: usize,
) -> f64 {
    let mid = 0.5 * (lo + hi);
    let lmid = 0.5 * (lo + mid);
    let rmid = 0.5 * (mid + hi);
    let flmid = f(lmid);
    let frmid = f(rmid);

    let left = simpson(lo, mid, flo, flmid, fmid);
    let right = simpson(mid, hi, fmid, frmid, fhi);
    let delta = left + right - whole;

    // Richardson error estimate for Simpson's rule.
    if depth == 0 || delta.abs() <= 15.0 * accuracy {
        return left + right + delta / 15.0;
    }

    step(f, lo, mid, flo, flmid, fmid, left, accuracy / 2.0, depth - 1)
        + step(f, mid, hi, fmid, frmid, fhi, right, accuracy / 2.0, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_is_exact() {
        let area = integrate(|_| 2.5, -3.0, 5.0, 1e-8);

        assert!((area - 20.0).abs() < 1e-8, "{area}");
    }

    #[test]
    fn odd_function_over_symmetric_interval_vanishes() {
        let area = integrate(|x| x.powi(3) + x.sin(), -4.0, 4.0, 1e-9);

        assert!(area.abs() < 1e-7, "{area}");
    }

    #[test]
    fn smooth_integrand() {
        // ∫₀^π sin = 2
        let area = integrate(f64::sin, 0.0, std::f64::consts::PI, 1e-10);

        assert!((area - 2.0).abs() < 1e-8, "{area}");
    }

    #[test]
    fn improper_upper_bound() {
        // ∫₀^∞ e⁻ˣ dx = 1
        let area = integrate(|x| (-x).exp(), 0.0, f64::INFINITY, 1e-9);

        assert!((area - 1.0).abs() < 1e-6, "{area}");
    }
}
