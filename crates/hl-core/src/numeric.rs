use crate::HlError;

/// Floating point type used throughout system
pub type Real = f64;

/// Comparison tolerances for float checks
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HlError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`, or an error naming the offending field.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, HlError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(HlError::Negative { what, value: v });
    }
    Ok(v)
}

/// Field-calculator input policy: NaN, infinities and negatives contribute 0.
#[inline]
pub fn sanitize(v: Real) -> Real {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Division that degrades to 0 instead of producing inf/NaN.
#[inline]
pub fn safe_div(num: Real, den: Real) -> Real {
    let (num, den) = (sanitize(num), sanitize(den));
    if den == 0.0 { 0.0 } else { num / den }
}

/// Round to the nearest multiple of `step` (`step <= 0` rounds to whole units).
pub fn round_to(v: Real, step: Real) -> Real {
    if !v.is_finite() {
        return 0.0;
    }
    if step <= 0.0 || !step.is_finite() {
        return v.round();
    }
    (v / step).round() * step
}

/// Presentation rounding for pressures: nearest whole psi.
#[inline]
pub fn round_psi(v: Real) -> Real {
    round_to(v, 1.0)
}

/// Short human form: at most one decimal, trailing `.0` dropped.
pub fn fmt_value(v: Real) -> String {
    let rounded = round_to(v, 0.1);
    if nearly_equal(rounded, rounded.round(), Tolerances::default()) {
        format!("{}", rounded.round() as i64)
    } else {
        format!("{rounded:.1}")
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
    fn ensure_non_negative_rejects_negative() {
        assert!(ensure_non_negative(0.0, "gpm").is_ok());
        let err = ensure_non_negative(-1.0, "gpm").unwrap_err();
        assert!(matches!(err, HlError::Negative { what: "gpm", .. }));
    }

    #[test]
    fn sanitize_degrades_to_zero() {
        assert_eq!(sanitize(12.5), 12.5);
        assert_eq!(sanitize(-3.0), 0.0);
        assert_eq!(sanitize(Real::NAN), 0.0);
        assert_eq!(sanitize(Real::INFINITY), 0.0);
    }

    #[test]
    fn safe_div_never_blows_up() {
        assert_eq!(safe_div(3000.0, 15.0), 200.0);
        assert_eq!(safe_div(3000.0, 0.0), 0.0);
        assert_eq!(safe_div(Real::NAN, 2.0), 0.0);
    }

    #[test]
    fn rounding_steps() {
        assert_eq!(round_psi(156.1), 156.0);
        assert_eq!(round_psi(184.46), 184.0);
        assert_eq!(round_psi(161.25), 161.0);
        assert!((round_to(13.333, 0.1) - 13.3).abs() < 1e-9);
        assert_eq!(round_to(Real::NAN, 1.0), 0.0);
    }

    #[test]
    fn fmt_value_trims() {
        assert_eq!(fmt_value(106.0), "106");
        assert_eq!(fmt_value(106.0975), "106.1");
        assert_eq!(fmt_value(56.26), "56.3");
        assert_eq!(fmt_value(0.5), "0.5");
    }
}
