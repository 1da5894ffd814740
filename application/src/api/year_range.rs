//! [`YearRangeValue`]-related definitions.

use juniper::{GraphQLInputObject, GraphQLObject};
use service::domain::{
    self,
    year_range::{Bands, Identifier},
    ValidationError,
};

use crate::api::construction::Kind;

/// Reference row holding a unit rate per vintage band.
#[derive(Clone, Debug, GraphQLObject)]
pub struct YearRangeValue {
    /// `CalculatorKind` this row applies to, or `null` for a global row.
    pub kind: Option<Kind>,

    /// Identifier of the option this row rates.
    pub identifier: String,

    /// Unit rate of the first band.
    pub first: f64,

    /// Unit rate of the second band.
    pub second: f64,

    /// Unit rate of the third band.
    pub third: f64,
}

impl From<domain::YearRangeValue> for YearRangeValue {
    fn from(row: domain::YearRangeValue) -> Self {
        Self {
            kind: row.kind.map(Into::into),
            identifier: row.identifier.into(),
            first: row.bands.first,
            second: row.bands.second,
            third: row.bands.third,
        }
    }
}

/// Reference row to be stored.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct YearRangeValueInput {
    /// Identifier of the option this row rates.
    pub identifier: String,

    /// Unit rate of the first band.
    pub first: f64,

    /// Unit rate of the second band.
    pub second: f64,

    /// Unit rate of the third band.
    pub third: f64,
}

impl YearRangeValueInput {
    /// Converts this [`YearRangeValueInput`] into a row of the provided
    /// [`domain::CalculatorKind`].
    ///
    /// # Errors
    ///
    /// If the identifier is blank, or a rate is not finite.
    pub fn into_row(
        self,
        kind: Option<domain::CalculatorKind>,
    ) -> Result<domain::YearRangeValue, ValidationError> {
        let Self {
            identifier,
            first,
            second,
            third,
        } = self;

        let identifier = Identifier::new(&identifier).ok_or_else(|| {
            ValidationError::new("identifier", "must not be blank")
        })?;
        if ![first, second, third].iter().all(|r| r.is_finite()) {
            return Err(ValidationError::new(
                "rows",
                format!("rates of `{identifier}` must be finite"),
            ));
        }

        Ok(domain::YearRangeValue {
            kind,
            identifier,
            bands: Bands {
                first,
                second,
                third,
            },
        })
    }
}
