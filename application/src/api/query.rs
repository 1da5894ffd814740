//! GraphQL [`Query`]s definitions.

use common::Percent;
use juniper::graphql_object;
use service::{
    domain::year_range::{self, Identifier},
    query, Query as _,
};

use crate::{
    api::{self, construction, insurance, year_range::YearRangeValue},
    AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `ConstructionProp` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "constructionProp",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn construction_prop(
        id: construction::Id,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(query::construction_prop::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| Error::from(api::ConstructionPropError::NotExists))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Computes the replacement `Rate` of the `ConstructionProp` with the
    /// specified ID.
    ///
    /// Only global reference rates are used if `bulk` is set. `vat` defaults
    /// to the configured one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `CONFIGURATION_ERROR` - the `ConstructionProp` has no `DevYear`.
    #[tracing::instrument(
        skip_all,
        fields(
            bulk = %bulk,
            gql.name = "constructionRate",
            otel.name = Self::SPAN_NAME,
            prop_id = %prop_id,
            vat = ?vat.map(|v| v.to_string()),
        ),
    )]
    pub async fn construction_rate(
        prop_id: construction::Id,
        #[graphql(default = false)] bulk: bool,
        vat: Option<Percent>,
        ctx: &Context,
    ) -> Result<construction::Rate, Error> {
        ctx.service()
            .execute(query::ConstructionRate {
                prop_id: prop_id.into(),
                bulk,
                vat,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `YearRangeValue`s of the specified `CalculatorKind`, or
    /// the global ones if no `kind` is specified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "yearRangeValues",
            kind = ?kind.map(|k| k.to_string()),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn year_range_values(
        kind: Option<construction::Kind>,
        ctx: &Context,
    ) -> Result<Vec<YearRangeValue>, Error> {
        ctx.service()
            .execute(query::year_range_values::ByKind::by(kind.map(Into::into)))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rows| rows.into_iter().map(Into::into).collect())
    }

    /// Finds the `YearRangeValue` of the specified `CalculatorKind` (or the
    /// global one) rating the option with the specified identifier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "yearRangeValue",
            identifier = %identifier,
            kind = ?kind.map(|k| k.to_string()),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn year_range_value(
        kind: Option<construction::Kind>,
        identifier: String,
        ctx: &Context,
    ) -> Result<Option<YearRangeValue>, Error> {
        let Some(identifier) = Identifier::new(identifier) else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::year_range_value::Find::by(year_range::Key {
                kind: kind.map(Into::into),
                identifier,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|row| row.map(Into::into))
    }

    /// Computes the insurance reinstatement total of the specified plot out
    /// of the currently stored item rates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "insuranceTotal",
            otel.name = Self::SPAN_NAME,
            plot_id = %plot_id,
        ),
    )]
    pub async fn insurance_total(
        plot_id: insurance::PlotId,
        ctx: &Context,
    ) -> Result<insurance::Total, Error> {
        ctx.service()
            .execute(query::InsuranceTotal {
                plot_id: plot_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::construction_rate::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Configuration(e) => e.try_as_error(),
            Self::ConstructionPropNotExists(_) => {
                Some(api::ConstructionPropError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}
