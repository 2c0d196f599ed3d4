use crate::PsError;

/// Floating point type used throughout the engine
pub type Real = f64;

/// One tolerance for everything
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

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PsError::NonFinite { what, value: v })
    }
}

/// Clamp a percent-valued signal to its instrument range [0, 100].
#[inline]
pub fn clamp_percent(v: Real) -> Real {
    v.clamp(0.0, 100.0)
}

/// Fractional phase of `t` within a repeating period, in [0, 1).
///
/// `period` must be positive; callers hold periods as validated constants.
#[inline]
pub fn wrap_phase(t: Real, period: Real) -> Real {
    (t.rem_euclid(period)) / period
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
    fn clamp_percent_range() {
        assert_eq!(clamp_percent(-5.0), 0.0);
        assert_eq!(clamp_percent(42.0), 42.0);
        assert_eq!(clamp_percent(150.0), 100.0);
    }

    #[test]
    fn wrap_phase_wraps() {
        assert_eq!(wrap_phase(0.0, 10.0), 0.0);
        assert_eq!(wrap_phase(5.0, 10.0), 0.5);
        assert_eq!(wrap_phase(10.0, 10.0), 0.0);
        assert_eq!(wrap_phase(25.0, 10.0), 0.5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wrap_phase_stays_in_unit_interval(t in -1e6_f64..1e6) {
            let phase = wrap_phase(t, 10.0);
            prop_assert!((0.0..1.0).contains(&phase));
        }

        #[test]
        fn clamp_percent_idempotent(v in -1e9_f64..1e9) {
            let clamped = clamp_percent(v);
            prop_assert!((0.0..=100.0).contains(&clamped));
            prop_assert_eq!(clamp_percent(clamped), clamped);
        }
    }
}
