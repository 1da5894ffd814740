//! GraphQL [`Mutation`]s definitions.

use juniper::{graphql_object, GraphQLObject};
use service::{command, domain::ValidationErrors, Command as _};

use crate::{
    api::{
        self, construction, insurance,
        year_range::{YearRangeValue, YearRangeValueInput},
    },
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `ConstructionProp` with the default items of its
    /// `CalculatorKind`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_ERROR` - provided areas are negative or not finite.
    #[tracing::instrument(
        skip_all,
        fields(
            floor_area = %floor_area,
            gql.name = "createConstructionProp",
            kind = %kind,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_construction_prop(
        kind: construction::Kind,
        floor_area: f64,
        #[graphql(default = 0.0)] veranda_floor_area: f64,
        dev_year: Option<construction::DevYear>,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::CreateConstructionProp {
                kind: kind.into(),
                floor_area,
                veranda_floor_area,
                dev_year: dev_year.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the areas and the `DevYear` of a `ConstructionProp`.
    ///
    /// Omitted arguments are left untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `VALIDATION_ERROR` - provided areas are negative or not finite.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateConstructionProp",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_construction_prop(
        id: construction::Id,
        floor_area: Option<f64>,
        veranda_floor_area: Option<f64>,
        dev_year: Option<construction::DevYear>,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::UpdateConstructionProp {
                prop_id: id.into(),
                floor_area,
                veranda_floor_area,
                dev_year: dev_year.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes a `ConstructionProp` along with its items.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteConstructionProp",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_construction_prop(
        id: construction::Id,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::DeleteConstructionProp {
                prop_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the chosen option, quality, multiplier or area of a
    /// `ConstructionItem`.
    ///
    /// Omitted arguments are left untouched. A blank `multiplier` removes the
    /// override, and a blank `area` removes the explicit area. `area` is
    /// accepted for separately charged elements only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_ITEM_NOT_EXISTS` - the `ConstructionItem` with the
    ///                                    specified ID does not exist;
    /// - `CONFIGURATION_ERROR` - `option` is not one of the
    ///                           `availableOptions`;
    /// - `VALIDATION_ERROR` - `multiplier` or `area` is malformed, or `area`
    ///                        is provided for an element charged per floor
    ///                        area.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateConstructionItem",
            id = %id,
            option = ?option,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_construction_item(
        id: construction::ItemId,
        option: Option<String>,
        quality: Option<construction::Quality>,
        multiplier: Option<String>,
        area: Option<String>,
        ctx: &Context,
    ) -> Result<construction::Item, Error> {
        ctx.service()
            .execute(command::UpdateConstructionItem {
                item_id: id.into(),
                option,
                quality: quality.map(Into::into),
                multiplier,
                area,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Brings the items of a `ConstructionProp` in line with its
    /// `CalculatorKind`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `KIND_MISMATCH` - the `ConstructionProp` is not of the specified
    ///                     `kind`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ensureConstructionPropItems",
            id = %id,
            kind = ?kind.map(|k| k.to_string()),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn ensure_construction_prop_items(
        id: construction::Id,
        kind: Option<construction::Kind>,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::EnsureConstructionPropItems {
                prop_id: id.into(),
                kind: kind.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Brings the items of a `Boundary_Wall` `ConstructionProp` in line.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `KIND_MISMATCH` - the `ConstructionProp` is not a boundary wall.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ensureBoundaryWallPropItems",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn ensure_boundary_wall_prop_items(
        id: construction::Id,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::EnsureBoundaryWallPropItems {
                prop_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Brings the items of an `External_Works` `ConstructionProp` in line.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `KIND_MISMATCH` - the `ConstructionProp` is not an external work.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ensureExternalWorkPropItems",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn ensure_external_work_prop_items(
        id: construction::Id,
        ctx: &Context,
    ) -> Result<construction::Prop, Error> {
        ctx.service()
            .execute(command::EnsureExternalWorkPropItems {
                prop_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the `CalculatorKind` of a `ConstructionProp`, reconciling its
    /// items and returning the reference rows applicable to the new one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONSTRUCTION_PROP_NOT_EXISTS` - the `ConstructionProp` with the
    ///                                    specified ID does not exist;
    /// - `KIND_CHANGED` - the `ConstructionProp` is not of the
    ///                    `currentKind` anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            bulk = %bulk,
            current_kind = %current_kind,
            gql.name = "updateConstructionPropKind",
            id = %id,
            new_kind = %new_kind,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_construction_prop_kind(
        id: construction::Id,
        current_kind: construction::Kind,
        new_kind: construction::Kind,
        #[graphql(default = false)] bulk: bool,
        ctx: &Context,
    ) -> Result<KindUpdate, Error> {
        ctx.service()
            .execute(command::UpdateConstructionPropKind {
                prop_id: id.into(),
                bulk,
                current_kind: current_kind.into(),
                new_kind: new_kind.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces all the `YearRangeValue`s of the specified `CalculatorKind`,
    /// or the global ones if no `kind` is specified.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_ERROR` - some rows are blank, duplicated or have
    ///                        non-finite rates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "replaceYearRangeValues",
            kind = ?kind.map(|k| k.to_string()),
            otel.name = Self::SPAN_NAME,
            rows = rows.len(),
        ),
    )]
    pub async fn replace_year_range_values(
        kind: Option<construction::Kind>,
        rows: Vec<YearRangeValueInput>,
        ctx: &Context,
    ) -> Result<Vec<YearRangeValue>, Error> {
        let kind = kind.map(Into::into);

        let mut errs = ValidationErrors::default();
        let rows = rows
            .into_iter()
            .filter_map(|row| errs.check(row.into_row(kind)))
            .collect::<Vec<_>>();
        errs.finish()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::ReplaceYearRangeValues { kind, rows })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rows| rows.into_iter().map(Into::into).collect())
    }

    /// Refreshes the linked item rates of the specified plot and writes its
    /// insurance total into the outgoings tracking it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONFIGURATION_ERROR` - a linked `ConstructionProp` cannot be rated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "recalculateInsurance",
            otel.name = Self::SPAN_NAME,
            plot_id = %plot_id,
        ),
    )]
    pub async fn recalculate_insurance(
        plot_id: insurance::PlotId,
        ctx: &Context,
    ) -> Result<insurance::Total, Error> {
        ctx.service()
            .execute(command::RecalculateInsurance {
                plot_id: plot_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Result of a `ConstructionProp`'s `CalculatorKind` change.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ConstructionPropKindUpdate", context = Context)]
pub struct KindUpdate {
    /// `ConstructionProp` with its reconciled items.
    pub prop: construction::Prop,

    /// `YearRangeValue`s applicable to the new `CalculatorKind`.
    pub rates: Vec<YearRangeValue>,
}

impl From<command::update_construction_prop_kind::Output> for KindUpdate {
    fn from(out: command::update_construction_prop_kind::Output) -> Self {
        Self {
            prop: out.prop.into(),
            rates: out.rates.into_iter().map(Into::into).collect(),
        }
    }
}

impl AsError for command::create_construction_prop::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Validation(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_construction_prop::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ConstructionPropNotExists(_) => {
                Some(api::ConstructionPropError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::Validation(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_construction_prop::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ConstructionPropNotExists(_) => {
                Some(api::ConstructionPropError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_construction_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Configuration(e) => e.try_as_error(),
            Self::ConstructionItemNotExists(_) => {
                Some(api::ConstructionPropError::ItemNotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::Validation(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::ensure_construction_prop_items::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "KIND_MISMATCH"]
                #[status = CONFLICT]
                #[message = "`ConstructionProp` is of another \
                             `CalculatorKind`"]
                KindMismatch,
            }
        }

        match self {
            Self::ConstructionPropNotExists(_) => {
                Some(api::ConstructionPropError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::KindMismatch { .. } => Some(Error::KindMismatch.into()),
        }
    }
}

impl AsError for command::update_construction_prop_kind::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "KIND_CHANGED"]
                #[status = CONFLICT]
                #[message = "`ConstructionProp`'s `CalculatorKind` has been \
                             changed meanwhile"]
                KindChanged,
            }
        }

        match self {
            Self::ConstructionPropNotExists(_) => {
                Some(api::ConstructionPropError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::KindChanged { .. } => Some(Error::KindChanged.into()),
        }
    }
}

impl AsError for command::replace_year_range_values::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Validation(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::recalculate_insurance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Configuration(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
        }
    }
}
