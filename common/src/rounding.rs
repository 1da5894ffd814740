//! Decimal rounding of [`f64`] amounts.
//!
//! `digits` counts decimal places to keep: `2` rounds to cents, while negative
//! values round to the left of the decimal point (`-6` rounds to millions).

/// Rounds the `value` half away from zero, keeping `digits` decimal places.
#[must_use]
pub fn round(value: f64, digits: i32) -> f64 {
    apply(value, digits, f64::round)
}

/// Rounds the `value` down (toward negative infinity), keeping `digits`
/// decimal places.
#[must_use]
pub fn round_down(value: f64, digits: i32) -> f64 {
    apply(value, digits, f64::floor)
}

/// Scales the `value` so that the `digits` position becomes the unit, applies
/// the `op` and scales it back.
fn apply(value: f64, digits: i32, op: fn(f64) -> f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Only exact powers of ten are used as factors, never their reciprocals.
    if digits >= 0 {
        let factor = 10_f64.powi(digits);
        op(value * factor) / factor
    } else {
        let factor = 10_f64.powi(-digits);
        op(value / factor) * factor
    }
}

#[cfg(test)]
mod spec {
    use super::{round, round_down};

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round(16_800.000_000_000_002, 2), 16_800.0);
        assert_eq!(round(1.005_1, 2), 1.01);
        assert_eq!(round(-2.345_6, 2), -2.35);
        assert_eq!(round(12.5, 0), 13.0);
    }

    #[test]
    fn rounds_down_to_millions() {
        assert_eq!(round_down(128_800.0, -6), 0.0);
        assert_eq!(round_down(2_999_999.99, -6), 2_000_000.0);
        assert_eq!(round_down(3_000_000.0, -6), 3_000_000.0);
        assert_eq!(round_down(-1.0, -6), -1_000_000.0);
    }

    #[test]
    fn round_down_is_idempotent() {
        for v in [0.0, 999_999.0, 1_234_567.89, 98_765_432.1, -7.0] {
            let once = round_down(v, -6);
            assert_eq!(round_down(once, -6), once, "value: {v}");
        }
        for v in [0.0, 1.5, 0.25, -7.75, 2_500_000.0] {
            let once = round_down(v, 2);
            assert_eq!(round_down(once, 2), once, "value: {v}");
        }
    }

    #[test]
    fn round_down_is_monotonic() {
        let values = (0..200)
            .map(|i| f64::from(i) * 73_519.37 - 1_000_000.0)
            .collect::<Vec<_>>();
        for pair in values.windows(2) {
            assert!(
                round_down(pair[0], -6) <= round_down(pair[1], -6),
                "{} > {}",
                pair[0],
                pair[1],
            );
        }
    }

    #[test]
    fn keeps_non_finite_values() {
        assert!(round_down(f64::NAN, -6).is_nan());
        assert_eq!(round(f64::INFINITY, 2), f64::INFINITY);
    }
}
