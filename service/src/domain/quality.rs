//! [`QualityOfFinish`] and its scalar [`Multiplier`] resolution.

use common::define_kind;
use derive_more::{Display, Into};

use super::{ConfigurationError, ValidationError};

define_kind! {
    #[doc = "Ordinal grade of a finish quality."]
    enum QualityOfFinish {
        #[doc = "Poor finish."]
        Poor => "Poor",

        #[doc = "Fair finish."]
        Fair => "Fair",

        #[doc = "Average finish."]
        Average => "Average",

        #[doc = "Good finish."]
        Good => "Good",

        #[doc = "Excellent finish."]
        Excellent => "Excellent",
    }
}

impl QualityOfFinish {
    /// Parses a [`QualityOfFinish`] from its textual grade.
    ///
    /// # Errors
    ///
    /// If the grade is not recognised.
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        s.trim().parse().map_err(|_| {
            ConfigurationError::UnknownQualityOfFinish(s.to_owned())
        })
    }

    /// Returns the scalar of this grade on the fixed ladder, where
    /// [`QualityOfFinish::Excellent`] is `1.0`.
    #[must_use]
    pub fn scalar(self) -> f64 {
        match self {
            Self::Excellent => 1.0,
            Self::Good => 0.9,
            Self::Average => 0.8,
            Self::Fair => 0.7,
            Self::Poor => 0.6,
        }
    }
}

/// Explicit scalar overriding the one derived from a [`QualityOfFinish`].
#[derive(Clone, Copy, Debug, Display, Into, PartialEq)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new [`Multiplier`] if the provided value is finite and not
    /// negative.
    #[must_use]
    pub fn new(val: f64) -> Option<Self> {
        (val.is_finite() && val >= 0.0).then_some(Self(val))
    }

    /// Parses a raw user input into an optional [`Multiplier`].
    ///
    /// Missing or blank input means no override.
    ///
    /// # Errors
    ///
    /// If non-blank input is not a valid [`Multiplier`].
    pub fn parse_input(
        input: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        raw.parse::<f64>()
            .ok()
            .and_then(Self::new)
            .map(Some)
            .ok_or_else(|| {
                ValidationError::new(
                    "multiplier",
                    format!("`{raw}` is not a non-negative number"),
                )
            })
    }

    /// Returns the underlying value of this [`Multiplier`].
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Resolves the scalar applied to a base rate.
///
/// A present explicit [`Multiplier`] always wins over the grade, which is then
/// kept for display only.
#[must_use]
pub fn resolve(
    quality: QualityOfFinish,
    multiplier: Option<Multiplier>,
) -> f64 {
    multiplier.map_or_else(|| quality.scalar(), Multiplier::get)
}

#[cfg(test)]
mod spec {
    use super::{resolve, Multiplier, QualityOfFinish};
    use crate::domain::ConfigurationError;

    #[test]
    fn ladder_decreases_from_excellent() {
        assert_eq!(QualityOfFinish::Excellent.scalar(), 1.0);

        let scalars = QualityOfFinish::ALL
            .iter()
            .map(|q| q.scalar())
            .collect::<Vec<_>>();
        assert!(scalars.windows(2).all(|w| w[0] < w[1]), "{scalars:?}");
    }

    #[test]
    fn explicit_multiplier_always_wins() {
        for &q in QualityOfFinish::ALL {
            assert_eq!(resolve(q, Multiplier::new(1.35)), 1.35);
            assert_eq!(resolve(q, Multiplier::new(0.0)), 0.0);
            assert_eq!(resolve(q, None), q.scalar());
        }
    }

    #[test]
    fn blank_input_means_no_override() {
        assert_eq!(Multiplier::parse_input(None), Ok(None));
        assert_eq!(Multiplier::parse_input(Some("")), Ok(None));
        assert_eq!(Multiplier::parse_input(Some("   ")), Ok(None));
        assert_eq!(
            Multiplier::parse_input(Some(" 1.2 ")),
            Ok(Multiplier::new(1.2)),
        );
    }

    #[test]
    fn malformed_input_is_rejected() {
        let err = Multiplier::parse_input(Some("abc")).unwrap_err();
        assert_eq!(err.field, "multiplier");
        assert!(Multiplier::parse_input(Some("-1")).is_err());
        assert!(Multiplier::parse_input(Some("NaN")).is_err());
    }

    #[test]
    fn unknown_grade_is_configuration_error() {
        assert_eq!(QualityOfFinish::parse("Good"), Ok(QualityOfFinish::Good));
        assert_eq!(
            QualityOfFinish::parse("Superb"),
            Err(ConfigurationError::UnknownQualityOfFinish(
                "Superb".to_owned(),
            )),
        );
    }
}
