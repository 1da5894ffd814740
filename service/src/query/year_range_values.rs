//! [`Query`] collection related to multiple [`YearRangeValue`]s.

use common::operations::By;

use crate::domain::{CalculatorKind, YearRangeValue};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`YearRangeValue`]s of a [`CalculatorKind`], or the global
/// ones for [`None`].
pub type ByKind =
    DatabaseQuery<By<Vec<YearRangeValue>, Option<CalculatorKind>>>;
