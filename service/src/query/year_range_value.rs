//! [`Query`] collection related to a single [`YearRangeValue`].

use common::operations::By;

use crate::domain::{year_range, YearRangeValue};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Finds a [`YearRangeValue`] by its [`year_range::Key`].
pub type Find = DatabaseQuery<By<Option<YearRangeValue>, year_range::Key>>;
