//! Domain definitions.

pub mod catalog;
pub mod construction;
pub mod element;
pub mod insurance;
pub mod plot;
pub mod quality;
pub mod rate;
pub mod year_range;

use std::fmt;

use derive_more::{Display, Error};

pub use self::{
    catalog::Reconciliation,
    construction::{
        Area, CalculatorKind, ConstructionItem, ConstructionProp, DevYear,
    },
    element::{Element, PropertyOption},
    quality::{Multiplier, QualityOfFinish},
    rate::Rate,
    year_range::YearRangeValue,
};

/// Hint appended to every [`ConfigurationError`] message.
const SUPPORT_HINT: &str = "Please contact support.";

/// Invalid or missing configuration of stored data.
///
/// Never defaulted silently: aborts the computation it's detected in.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum ConfigurationError {
    /// Unknown [`Element`].
    #[display("Unknown element `{_0}`. {}", SUPPORT_HINT)]
    UnknownElement(#[error(not(source))] String),

    /// Unknown [`PropertyOption`] of an [`Element`].
    #[display(
        "Unknown option `{identifier}` of element `{element}`. {}",
        SUPPORT_HINT,
    )]
    UnknownPropertyOption {
        /// [`Element`] the option was looked for in.
        element: Element,

        /// Unrecognised option identifier.
        identifier: String,
    },

    /// Unknown [`QualityOfFinish`].
    #[display("Unknown quality of finish `{_0}`. {}", SUPPORT_HINT)]
    UnknownQualityOfFinish(#[error(not(source))] String),

    /// Unknown [`CalculatorKind`].
    #[display("Unknown calculator kind `{_0}`. {}", SUPPORT_HINT)]
    UnknownCalculatorKind(#[error(not(source))] String),

    /// Unknown [`DevYear`].
    #[display("Unknown development year `{_0}`. {}", SUPPORT_HINT)]
    UnknownDevYear(#[error(not(source))] String),

    /// [`ConstructionProp`] has no [`DevYear`] chosen.
    #[display(
        "`ConstructionProp(id: {_0})` has no development year. {}",
        SUPPORT_HINT,
    )]
    MissingDevYear(#[error(not(source))] construction::Id),

    /// Stored area is negative.
    #[display("Negative `{column}` area: {value}. {}", SUPPORT_HINT)]
    NegativeArea {
        /// Column the area is stored in.
        column: &'static str,

        /// Stored value.
        value: f64,
    },

    /// Stored [`Multiplier`] is negative or not finite.
    #[display("Invalid multiplier: {_0}. {}", SUPPORT_HINT)]
    InvalidMultiplier(#[error(not(source))] f64),
}

/// Malformed input of a single field.
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("`{field}`: {reason}")]
pub struct ValidationError {
    /// Name of the invalid field.
    pub field: &'static str,

    /// Reason the field is invalid.
    pub reason: String,
}

impl ValidationError {
    /// Creates a new [`ValidationError`] of the provided `field`.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Field-level [`ValidationError`]s of a whole input.
#[derive(Clone, Debug, Default, Error, PartialEq)]
pub struct ValidationErrors(#[error(not(source))] Vec<ValidationError>);

impl ValidationErrors {
    /// Records the error of the provided `result`, if any, returning its
    /// success value.
    pub fn check<T>(
        &mut self,
        result: Result<T, ValidationError>,
    ) -> Option<T> {
        result.map_err(|e| self.0.push(e)).ok()
    }

    /// Records the provided [`ValidationError`].
    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    /// Returns `Ok(())` if no errors have been recorded.
    ///
    /// # Errors
    ///
    /// With these [`ValidationErrors`] if any have been recorded.
    pub fn finish(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Returns the recorded [`ValidationError`]s.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, e) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use super::{ConfigurationError, ValidationError, ValidationErrors};

    #[test]
    fn configuration_error_asks_to_contact_support() {
        let e = ConfigurationError::UnknownDevYear("Fourth".into());
        assert!(e.to_string().ends_with("Please contact support."), "{e}");
    }

    #[test]
    fn collects_field_errors() {
        let mut errs = ValidationErrors::default();
        assert_eq!(errs.check(Ok::<_, ValidationError>(1)), Some(1));
        assert_eq!(errs.clone().finish(), Ok(()));

        assert_eq!(
            errs.check::<()>(Err(ValidationError::new("floor_area", "< 0"))),
            None,
        );
        _ = errs.check::<()>(Err(ValidationError::new("veranda", "NaN")));

        let errs = errs.finish().unwrap_err();
        assert_eq!(errs.errors().len(), 2);
        assert_eq!(errs.to_string(), "`floor_area`: < 0; `veranda`: NaN");
    }
}
