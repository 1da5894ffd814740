//! [`ConstructionItem`] definitions.

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use crate::domain::{
    quality::{self, Multiplier, QualityOfFinish},
    Element, PropertyOption,
};

use super::{Area, Id as PropId};

/// [`Element`] of a [`ConstructionProp`] with its chosen [`PropertyOption`]
/// and finish quality.
///
/// [`ConstructionProp`]: super::ConstructionProp
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructionItem {
    /// ID of this [`ConstructionItem`].
    pub id: Id,

    /// ID of the [`ConstructionProp`] this [`ConstructionItem`] belongs to.
    ///
    /// [`ConstructionProp`]: super::ConstructionProp
    pub prop_id: PropId,

    /// Chosen [`PropertyOption`], defining the [`Element`] as well.
    pub option: PropertyOption,

    /// [`QualityOfFinish`] of this [`ConstructionItem`].
    pub quality: QualityOfFinish,

    /// Explicit [`Multiplier`] overriding the [`QualityOfFinish`] one.
    pub multiplier: Option<Multiplier>,

    /// Explicit [`Area`] of a separately charged [`Element`], overriding the
    /// veranda floor area.
    pub area: Option<Area>,
}

impl ConstructionItem {
    /// Creates a new [`ConstructionItem`] with [`QualityOfFinish::Excellent`]
    /// and no overrides.
    #[must_use]
    pub fn new(prop_id: PropId, option: PropertyOption) -> Self {
        Self {
            id: Id::new(),
            prop_id,
            option,
            quality: QualityOfFinish::Excellent,
            multiplier: None,
            area: None,
        }
    }

    /// Returns the [`Element`] of this [`ConstructionItem`].
    #[must_use]
    pub fn element(&self) -> Element {
        self.option.element()
    }

    /// Returns the scalar applied to the base rate of this
    /// [`ConstructionItem`].
    #[must_use]
    pub fn scalar(&self) -> f64 {
        quality::resolve(self.quality, self.multiplier)
    }
}

/// ID of a [`ConstructionItem`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
