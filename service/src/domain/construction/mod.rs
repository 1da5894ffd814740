//! [`ConstructionProp`] definitions.

pub mod item;

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use super::{ConfigurationError, Element, ValidationError};

pub use self::item::ConstructionItem;

/// Built structure whose replacement rate is being estimated.
///
/// Owned 1:1 by a GRC or an insurance line-item.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructionProp {
    /// ID of this [`ConstructionProp`].
    pub id: Id,

    /// [`CalculatorKind`] of this [`ConstructionProp`].
    pub kind: CalculatorKind,

    /// Floor [`Area`] of this [`ConstructionProp`].
    pub floor_area: Area,

    /// Veranda floor [`Area`] of this [`ConstructionProp`].
    pub veranda_floor_area: Area,

    /// [`DevYear`] of this [`ConstructionProp`], if chosen already.
    pub dev_year: Option<DevYear>,

    /// [`ConstructionItem`]s of this [`ConstructionProp`].
    pub items: Vec<ConstructionItem>,
}

impl ConstructionProp {
    /// Returns the [`ConstructionItem`] of the provided [`Element`], if any.
    #[must_use]
    pub fn item(&self, element: Element) -> Option<&ConstructionItem> {
        self.items.iter().find(|i| i.element() == element)
    }

    /// Returns the [`DevYear`] of this [`ConstructionProp`].
    ///
    /// # Errors
    ///
    /// If the [`DevYear`] hasn't been chosen.
    pub fn require_dev_year(&self) -> Result<DevYear, ConfigurationError> {
        self.dev_year.ok_or(ConfigurationError::MissingDevYear(self.id))
    }
}

/// ID of a [`ConstructionProp`].
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

/// Area in square metres.
#[derive(Clone, Copy, Debug, Default, Display, Into, PartialEq, PartialOrd)]
pub struct Area(f64);

impl Area {
    /// Zero [`Area`].
    pub const ZERO: Self = Self(0.0);

    /// Creates a new [`Area`] if the provided value is finite and not
    /// negative.
    #[must_use]
    pub fn new(sqm: f64) -> Option<Self> {
        (sqm.is_finite() && sqm >= 0.0).then_some(Self(sqm))
    }

    /// Parses the raw `sqm` input of the provided `field` into an [`Area`].
    ///
    /// # Errors
    ///
    /// If the value is negative or not finite.
    pub fn parse(
        field: &'static str,
        sqm: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(sqm).ok_or_else(|| {
            ValidationError::new(
                field,
                format!("`{sqm}` is not a non-negative finite area"),
            )
        })
    }

    /// Parses a raw user input of the provided `field` into an optional
    /// [`Area`].
    ///
    /// Missing or blank input means no [`Area`].
    ///
    /// # Errors
    ///
    /// If non-blank input is not a valid [`Area`].
    pub fn parse_input(
        field: &'static str,
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
                    field,
                    format!("`{raw}` is not a non-negative area"),
                )
            })
    }

    /// Returns the number of square metres in this [`Area`].
    #[must_use]
    pub fn sqm(self) -> f64 {
        self.0
    }
}

define_kind! {
    #[doc = "Archetype of a structure selecting its reference rates and \
             required elements."]
    enum CalculatorKind {
        #[doc = "Single storey residential up to 100m²."]
        ResidentialSsUpTo100m2 => "Residential_SS_up_to_100m2",

        #[doc = "Single storey residential above 100m²."]
        ResidentialSsAbove100m2 => "Residential_SS_above_100m2",

        #[doc = "Double storey residential."]
        ResidentialDs => "Residential_DS",

        #[doc = "Block of flats."]
        Flats => "Flats",

        #[doc = "Commercial building."]
        Commercial => "Commercial",

        #[doc = "Industrial building."]
        Industrial => "Industrial",

        #[doc = "Boundary wall with its fence and gate."]
        BoundaryWall => "Boundary_Wall",

        #[doc = "External works of a residential plot."]
        ExternalWorksResidential => "External_Works_Residential",
    }
}

impl CalculatorKind {
    /// Parses a [`CalculatorKind`] from its textual identifier.
    ///
    /// # Errors
    ///
    /// If the identifier doesn't name any [`CalculatorKind`].
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        s.trim().parse().map_err(|_| {
            ConfigurationError::UnknownCalculatorKind(s.to_owned())
        })
    }
}

define_kind! {
    #[doc = "Vintage band selecting one of the three reference rates."]
    enum DevYear {
        #[doc = "First (oldest) band."]
        First => "First",

        #[doc = "Second band."]
        Second => "Second",

        #[doc = "Third (newest) band."]
        Third => "Third",
    }
}

impl DevYear {
    /// Parses a [`DevYear`] from its textual identifier.
    ///
    /// # Errors
    ///
    /// If the identifier doesn't name exactly one band.
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        s.trim()
            .parse()
            .map_err(|_| ConfigurationError::UnknownDevYear(s.to_owned()))
    }
}

#[cfg(test)]
mod spec {
    use super::{Area, CalculatorKind, DevYear};
    use crate::domain::ConfigurationError;

    #[test]
    fn area_rejects_negative_and_non_finite() {
        assert_eq!(Area::new(120.5).map(Area::sqm), Some(120.5));
        assert_eq!(Area::new(0.0), Some(Area::ZERO));
        assert!(Area::new(-0.1).is_none());
        assert!(Area::new(f64::INFINITY).is_none());
        assert!(Area::new(f64::NAN).is_none());

        assert_eq!(Area::parse("floor_area", 12.0), Ok(Area(12.0)));
        assert_eq!(
            Area::parse("floor_area", -1.0).map_err(|e| e.field),
            Err("floor_area"),
        );
    }

    #[test]
    fn kinds_use_their_catalog_identifiers() {
        assert_eq!(
            CalculatorKind::parse("Boundary_Wall"),
            Ok(CalculatorKind::BoundaryWall),
        );
        assert_eq!(
            CalculatorKind::parse("Residential_SS_up_to_100m2"),
            Ok(CalculatorKind::ResidentialSsUpTo100m2),
        );
        assert_eq!(
            CalculatorKind::ExternalWorksResidential.to_string(),
            "External_Works_Residential",
        );
        assert!(CalculatorKind::parse("Castle").is_err());
    }

    #[test]
    fn dev_year_is_exactly_one_band() {
        assert_eq!(DevYear::parse("Second"), Ok(DevYear::Second));
        assert_eq!(
            DevYear::parse("Fourth"),
            Err(ConfigurationError::UnknownDevYear("Fourth".to_owned())),
        );
        assert!(DevYear::parse("").is_err());
    }
}
