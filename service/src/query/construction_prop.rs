//! [`Query`] collection related to a single [`ConstructionProp`].

use common::operations::By;

use crate::domain::{construction, ConstructionProp};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`ConstructionProp`] with its items by its [`construction::Id`].
pub type ById = DatabaseQuery<By<Option<ConstructionProp>, construction::Id>>;
