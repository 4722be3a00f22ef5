use crate::CoreError;

/// Floating point type used throughout the simulator.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    pub const fn loose() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-6,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Sign of `v` with an exact zero mapped to zero (unlike `f64::signum`).
#[inline]
pub fn sign_or_zero(v: Real) -> Real {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Linear interpolation of the abscissa where a sampled series crosses `target`.
///
/// Returns `None` if the series never reaches `target`.
pub fn crossing_time(samples: &[(Real, Real)], target: Real) -> Option<Real> {
    let first = samples.first()?;
    if first.1 >= target {
        return Some(first.0);
    }
    samples.windows(2).find_map(|w| {
        let (t0, y0) = w[0];
        let (t1, y1) = w[1];
        if y0 < target && y1 >= target {
            let span = y1 - y0;
            if span.abs() < Real::EPSILON {
                Some(t1)
            } else {
                Some(t0 + (target - y0) / span * (t1 - t0))
            }
        } else {
            None
        }
    })
}

/// Piecewise-linear value of a sampled series at `x`, held constant beyond
/// either end. `xs` must be ascending and the same length as `ys`.
///
/// Returns `None` for an empty series.
pub fn interp(xs: &[Real], ys: &[Real], x: Real) -> Option<Real> {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return None;
    }
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[n - 1] {
        return Some(ys[n - 1]);
    }
    // first index with xs[i] > x; 1 <= i <= n - 1 here
    let i = xs[..n].partition_point(|&xi| xi <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    let span = x1 - x0;
    if span.abs() < Real::EPSILON {
        Some(y1)
    } else {
        Some(y0 + (x - x0) / span * (y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn sign_or_zero_keeps_zero() {
        assert_eq!(sign_or_zero(0.0), 0.0);
        assert_eq!(sign_or_zero(-3.0), -1.0);
        assert_eq!(sign_or_zero(2.5), 1.0);
    }

    #[test]
    fn interp_is_linear_inside_and_flat_outside() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(interp(&xs, &ys, -1.0), Some(0.0));
        assert_eq!(interp(&xs, &ys, 5.0), Some(30.0));
        assert_eq!(interp(&xs, &ys, 1.0), Some(10.0));
        assert!(nearly_equal(interp(&xs, &ys, 2.0).unwrap(), 20.0, Tolerances::default()));
        assert_eq!(interp(&[], &[], 1.0), None);
    }

    #[test]
    fn crossing_time_interpolates() {
        let samples = [(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)];
        let t = crossing_time(&samples, 20.0).unwrap();
        assert!(nearly_equal(t, 1.5, Tolerances::default()));
        assert!(crossing_time(&samples, 31.0).is_none());
    }
}
