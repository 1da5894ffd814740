//! [`Prop`]-related definitions.

use common::Percent;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api::scalar, AsError, Context, Error};

/// Construction property: a rated structure with its items.
#[derive(Clone, Debug, From, Into)]
pub struct Prop(domain::ConstructionProp);

/// Construction property: a rated structure with its items.
#[graphql_object(name = "ConstructionProp", context = Context)]
impl Prop {
    /// Unique identifier of this `ConstructionProp`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `CalculatorKind` this `ConstructionProp` is rated as.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Floor area, in square metres.
    #[must_use]
    pub fn floor_area(&self) -> f64 {
        self.0.floor_area.sqm()
    }

    /// Veranda floor area, in square metres.
    #[must_use]
    pub fn veranda_floor_area(&self) -> f64 {
        self.0.veranda_floor_area.sqm()
    }

    /// Vintage band selecting the reference rates, if chosen.
    #[must_use]
    pub fn dev_year(&self) -> Option<DevYear> {
        self.0.dev_year.map(Into::into)
    }

    /// Items of this `ConstructionProp`, in their stored order.
    ///
    /// Items of elements not required by the `CalculatorKind` are kept, but
    /// don't take part in its `Rate`.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.0.items.iter().cloned().map(Item).collect()
    }

    /// Replacement `Rate` of this `ConstructionProp`.
    ///
    /// Only global reference rates are used if `bulk` is set. `vat` defaults
    /// to the configured one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONFIGURATION_ERROR` - the `ConstructionProp` has no `DevYear`.
    #[tracing::instrument(
        skip_all,
        fields(
            bulk = %bulk,
            gql.name = "ConstructionProp.rate",
            id = %self.0.id,
            otel.name = super::Query::SPAN_NAME,
        ),
    )]
    pub async fn rate(
        &self,
        #[graphql(default = false)] bulk: bool,
        vat: Option<Percent>,
        ctx: &Context,
    ) -> Result<Rate, Error> {
        ctx.service()
            .execute(query::ConstructionRate {
                prop_id: self.0.id,
                bulk,
                vat,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Element of a `ConstructionProp` with its chosen option and quality.
#[derive(Clone, Debug, From, Into)]
pub struct Item(domain::ConstructionItem);

/// Element of a `ConstructionProp` with its chosen option and quality.
#[graphql_object(name = "ConstructionItem", context = Context)]
impl Item {
    /// Unique identifier of this `ConstructionItem`.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.0.id.into()
    }

    /// `ConstructionElement` of this `ConstructionItem`.
    #[must_use]
    pub fn element(&self) -> Element {
        self.0.element().into()
    }

    /// Identifier of the chosen option.
    #[must_use]
    pub fn option(&self) -> String {
        self.0.option.identifier().to_owned()
    }

    /// Identifiers of all the options of this `ConstructionItem`'s element.
    #[must_use]
    pub fn available_options(&self) -> Vec<String> {
        domain::PropertyOption::all_of(self.0.element())
            .into_iter()
            .map(|o| o.identifier().to_owned())
            .collect()
    }

    /// Grade of the finish quality.
    #[must_use]
    pub fn quality(&self) -> Quality {
        self.0.quality.into()
    }

    /// Explicit multiplier overriding the `quality` one.
    #[must_use]
    pub fn multiplier(&self) -> Option<f64> {
        self.0.multiplier.map(domain::Multiplier::get)
    }

    /// Explicit area of a separately charged element, in square metres.
    #[must_use]
    pub fn area(&self) -> Option<f64> {
        self.0.area.map(domain::Area::sqm)
    }

    /// Scalar applied to the reference rate of this `ConstructionItem`.
    #[must_use]
    pub fn scalar(&self) -> f64 {
        self.0.scalar()
    }
}

/// Unique identifier of a `ConstructionProp`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::construction::Id)]
#[into(domain::construction::Id)]
#[graphql(name = "ConstructionPropId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a `ConstructionItem`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::construction::item::Id)]
#[into(domain::construction::item::Id)]
#[graphql(name = "ConstructionItemId", transparent)]
pub struct ItemId(Uuid);

/// Calculator kind of a `ConstructionProp`, as its textual identifier (e.g.
/// `Residential_DS` or `Boundary_Wall`).
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CalculatorKind",
    with = scalar::Via::<domain::CalculatorKind>,
)]
pub struct Kind(domain::CalculatorKind);

/// Constructive element, as its textual identifier (e.g. `Foundations`).
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ConstructionElement",
    with = scalar::Via::<domain::Element>,
)]
pub struct Element(domain::Element);

/// Grade of a finish quality.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "QualityOfFinish")]
pub enum Quality {
    /// Scales the reference rate by `0.6`.
    Poor,

    /// Scales the reference rate by `0.7`.
    Fair,

    /// Scales the reference rate by `0.8`.
    Average,

    /// Scales the reference rate by `0.9`.
    Good,

    /// Keeps the reference rate.
    Excellent,
}

impl From<domain::QualityOfFinish> for Quality {
    fn from(quality: domain::QualityOfFinish) -> Self {
        use domain::QualityOfFinish as Q;
        match quality {
            Q::Poor => Self::Poor,
            Q::Fair => Self::Fair,
            Q::Average => Self::Average,
            Q::Good => Self::Good,
            Q::Excellent => Self::Excellent,
        }
    }
}

impl From<Quality> for domain::QualityOfFinish {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Poor => Self::Poor,
            Quality::Fair => Self::Fair,
            Quality::Average => Self::Average,
            Quality::Good => Self::Good,
            Quality::Excellent => Self::Excellent,
        }
    }
}

/// Vintage band selecting a reference rate.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum DevYear {
    /// First band.
    First,

    /// Second band.
    Second,

    /// Third band.
    Third,
}

impl From<domain::DevYear> for DevYear {
    fn from(year: domain::DevYear) -> Self {
        use domain::DevYear as Y;
        match year {
            Y::First => Self::First,
            Y::Second => Self::Second,
            Y::Third => Self::Third,
        }
    }
}

impl From<DevYear> for domain::DevYear {
    fn from(year: DevYear) -> Self {
        match year {
            DevYear::First => Self::First,
            DevYear::Second => Self::Second,
            DevYear::Third => Self::Third,
        }
    }
}

/// Replacement rate of a `ConstructionProp`.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Rate {
    /// Reported figures, VAT inclusive.
    pub figures: Figures,

    /// Figures without VAT.
    pub without_vat: Figures,

    /// Items contributing nothing due to missing reference rates.
    pub warnings: Vec<MissingRate>,
}

impl From<domain::Rate> for Rate {
    fn from(rate: domain::Rate) -> Self {
        Self {
            figures: rate.figures.into(),
            without_vat: rate.without_vat.into(),
            warnings: rate.warnings.into_iter().map(Into::into).collect(),
        }
    }
}

/// Cost figures of a `ConstructionProp`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "RateFigures")]
pub struct Figures {
    /// Unscaled cost per square metre of floor area.
    #[graphql(name = "costPerSqMTypical")]
    pub cost_per_sqm_typical: f64,

    /// Quality scaled cost per square metre of floor area.
    #[graphql(name = "costPerSqMQuality")]
    pub cost_per_sqm_quality: f64,

    /// Unscaled total cost, separately charged elements included.
    pub total_typical_estimate: f64,

    /// Quality scaled total cost, separately charged elements included.
    pub total_quality_estimate: f64,
}

impl From<domain::rate::Figures> for Figures {
    fn from(figures: domain::rate::Figures) -> Self {
        let domain::rate::Figures {
            cost_per_sqm_typical,
            cost_per_sqm_quality,
            total_typical_estimate,
            total_quality_estimate,
        } = figures;
        Self {
            cost_per_sqm_typical,
            cost_per_sqm_quality,
            total_typical_estimate,
            total_quality_estimate,
        }
    }
}

/// Reference rate missing for a `ConstructionItem`.
#[derive(Clone, Debug, GraphQLObject)]
pub struct MissingRate {
    /// Element of the unrated `ConstructionItem`.
    pub element: Element,

    /// Identifier of the unrated option.
    pub identifier: String,
}

impl From<domain::rate::MissingRate> for MissingRate {
    fn from(gap: domain::rate::MissingRate) -> Self {
        Self {
            element: gap.element.into(),
            identifier: gap.identifier.to_owned(),
        }
    }
}
