//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Floating-point percentage in the `0..=100` range.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided value is not less
    /// than `0` and not greater than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Creates a new [`Percent`] from the provided [`f64`], if it's finite and
    /// in range.
    #[must_use]
    pub fn from_f64(val: f64) -> Option<Self> {
        Decimal::from_f64_retain(val).and_then(Self::new)
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub fn get(self) -> Decimal {
        self.0
    }

    /// Returns this [`Percent`] as an [`f64`] in the `0..=100` range.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0.to_f64().expect("`Percent` always fits `f64`")
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Floating-point percentage.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Percent;

    #[test]
    fn from_str() {
        assert_eq!(Percent::from_str("15").unwrap().as_f64(), 15.0);
        assert_eq!(Percent::from_str(" 12.5 ").unwrap().as_f64(), 12.5);
        assert_eq!(Percent::from_str("0").unwrap(), Percent::ZERO);
        assert_eq!(Percent::from_str("100").unwrap().as_f64(), 100.0);

        assert!(Percent::from_str("-1").is_err());
        assert!(Percent::from_str("100.01").is_err());
        assert!(Percent::from_str("fifteen").is_err());
    }

    #[test]
    fn from_f64() {
        assert_eq!(Percent::from_f64(7.5).unwrap().as_f64(), 7.5);
        assert!(Percent::from_f64(f64::NAN).is_none());
        assert!(Percent::from_f64(101.0).is_none());
    }
}
