//! Scalar root-finding for the difficulty and performance calculation.
//!
//! Every solver runs a fixed maximum number of iterations and returns its
//! best iterate instead of erroring when that cap is hit; callers are
//! expected to treat the worst case as "did not converge to the requested
//! tolerance" and carry on with the returned value.

/// Iteration cap shared by all solvers.
const MAX_ITERS: usize = 64;

/// How often a one-sided bracket may be doubled before giving up on finding
/// a sign change.
const MAX_EXPANSIONS: usize = 32;

const EXPANSION_FACTOR: f64 = 2.0;

/// Finds `x` with `f(x) ≈ 0` given a one-sided guess `[a, b]`.
///
/// If `f(a)` and `f(b)` do not differ in sign, `b` is repeatedly moved away
/// from `a` by [`EXPANSION_FACTOR`] until they do. The bracketed root is
/// then polished with [`find_root_brent`].
pub fn find_root_expand(f: impl Fn(f64) -> f64, a: f64, b: f64, accuracy: f64) -> f64 {
    let fa = f(a);
    let mut b = b;
    let mut fb = f(b);

    let mut expansions = 0;

    while fa * fb > 0.0 {
        if expansions == MAX_EXPANSIONS {
            #[cfg(feature = "tracing")]
            tracing::debug!(a, b, "failed to bracket a root, returning best effort");

            return if fa.abs() < fb.abs() { a } else { b };
        }

        b = a + (b - a) * EXPANSION_FACTOR;
        fb = f(b);
        expansions += 1;
    }

    find_root_brent(f, a, b, accuracy)
}

/// Brent's method: inverse quadratic interpolation and secant steps with a
/// bisection fallback, converging at least as fast as plain bisection.
///
/// `f(a)` and `f(b)` must differ in sign; otherwise the endpoint with the
/// smaller residual is returned right away.
pub fn find_root_brent(f: impl Fn(f64) -> f64, a: f64, b: f64, accuracy: f64) -> f64 {
    let (mut a, mut b) = (a, b);
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 {
        return if fa.abs() < fb.abs() { a } else { b };
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    // Invariant: `b` is the best iterate, `[a, b]` or `[b, a]` brackets the
    // root, `c` is the previous iterate.
    let mut c = a;
    let mut fc = fa;
    let mut d = c;
    let mut bisected = true;

    for _ in 0..MAX_ITERS {
        if fb == 0.0 || (b - a).abs() < accuracy {
            return b;
        }

        let mut s = if fa != fc && fb != fc {
            // Inverse quadratic interpolation.
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // Secant step.
            b - fb * (b - a) / (fb - fa)
        };

        let low = (3.0 * a + b) / 4.0;
        let out_of_bounds = !((low.min(b) < s) & (s < low.max(b)));

        let poor_progress = if bisected {
            (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < accuracy
        } else {
            (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < accuracy
        };

        if out_of_bounds || poor_progress {
            s = (a + b) / 2.0;
            bisected = true;
        } else {
            bisected = false;
        }

        let fs = f(s);
        d = c;
        c = b;
        fc = fb;

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(b, "root-finding hit the iteration cap");

    b
}

/// Plain bisection on a bracketing interval.
#[allow(unused)]
pub fn find_root_bisect(f: impl Fn(f64) -> f64, lo: f64, hi: f64, accuracy: f64) -> f64 {
    let (mut lo, mut hi) = (lo, hi);
    let flo = f(lo);

    for _ in 0..MAX_ITERS {
        let mid = (lo + hi) / 2.0;

        if (hi - lo).abs() < accuracy {
            return mid;
        }

        if f(mid) * flo <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    (lo + hi) / 2.0
}

/// Chandrupatla's method.
///
/// Keeps three points (the bracket plus the best estimate) and only takes an
/// inverse-quadratic step when the geometry test `Φ² < ξ` and
/// `(1 − Φ)² < 1 − ξ` promises it is safe, bisecting otherwise. Converges
/// robustly on nearly-flat or strongly asymmetric functions.
pub fn find_root_chandrupatla(f: impl Fn(f64) -> f64, lo: f64, hi: f64, accuracy: f64) -> f64 {
    let mut x0 = lo;
    let mut x1 = hi;
    let mut f0 = f(x0);
    let mut f1 = f(x1);

    if f0 * f1 > 0.0 {
        return if f0.abs() < f1.abs() { x0 } else { x1 };
    }

    let mut x2 = x1;
    let mut f2 = f1;
    let mut t = 0.5;

    let mut best = if f0.abs() < f1.abs() { x0 } else { x1 };

    for _ in 0..MAX_ITERS {
        let xt = x0 + t * (x1 - x0);
        let ft = f(xt);

        if ft == 0.0 {
            return xt;
        }

        if (ft > 0.0) == (f0 > 0.0) {
            // Same side as `x0`: the root stays in `[xt, x1]`.
            x2 = x0;
            f2 = f0;
        } else {
            // `xt` and `x0` bracket the root.
            x2 = x1;
            f2 = f1;
            x1 = x0;
            f1 = f0;
        }

        x0 = xt;
        f0 = ft;

        best = if f0.abs() < f1.abs() { x0 } else { x1 };

        // The achieved tolerance window, relative to the remaining bracket.
        let tol = 2.0 * f64::EPSILON * best.abs() + 0.5 * accuracy;
        let t_lim = tol / (x1 - x0).abs();

        if t_lim > 0.5 {
            return best;
        }

        let xi = (x0 - x1) / (x2 - x1);
        let phi = (f0 - f1) / (f2 - f1);

        t = if phi.powi(2) < xi && (1.0 - phi).powi(2) < 1.0 - xi {
            // Inverse quadratic interpolation, expressed as a fraction of
            // the current bracket.
            (f0 / (f1 - f0)) * (f2 / (f1 - f2))
                + ((x2 - x0) / (x1 - x0)) * (f0 / (f2 - f0)) * (f1 / (f2 - f1))
        } else {
            0.5
        };

        t = t.clamp(t_lim, 1.0 - t_lim);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(best, "root-finding hit the iteration cap");

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_finds_polynomial_root() {
        // x³ - x - 2 has its single real root at x ≈ 1.5213797068
        let f = |x: f64| x.powi(3) - x - 2.0;
        let root = find_root_brent(f, 1.0, 2.0, 1e-10);

        assert!((root - 1.521_379_706_804_568).abs() < 1e-9, "{root}");
    }

    #[test]
    fn chandrupatla_finds_polynomial_root() {
        let f = |x: f64| x.powi(3) - x - 2.0;
        let root = find_root_chandrupatla(f, 1.0, 2.0, 1e-10);

        assert!((root - 1.521_379_706_804_568).abs() < 1e-9, "{root}");
    }

    #[test]
    fn chandrupatla_handles_flat_function() {
        // Nearly flat around the root at x = 1
        let f = |x: f64| (x - 1.0).powi(3) * 1e-4;
        let root = find_root_chandrupatla(f, -10.0, 20.0, 1e-8);

        assert!((root - 1.0).abs() < 1e-3, "{root}");
    }

    #[test]
    fn expansion_brackets_one_sided_guess() {
        // Root at x = 100, initial guess nowhere near it
        let f = |x: f64| x - 100.0;
        let root = find_root_expand(f, 0.0, 1.0, 1e-10);

        assert!((root - 100.0).abs() < 1e-8, "{root}");
    }

    #[test]
    fn unbracketable_function_returns_best_effort() {
        let f = |x: f64| x * x + 1.0;
        let root = find_root_expand(f, 0.0, 1.0, 1e-10);

        assert!(root.is_finite());
    }

    #[test]
    fn bisection_converges() {
        let f = |x: f64| x.cos() - x;
        let root = find_root_bisect(f, 0.0, 1.0, 1e-12);

        assert!((root - 0.739_085_133_215_160_6).abs() < 1e-10, "{root}");
    }
}
