//! [`Query`] computing the [`Rate`] of a [`ConstructionProp`].

use common::{
    operations::{By, Select},
    Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        construction, rate, year_range, ConfigurationError, ConstructionProp,
        Rate, YearRangeValue,
    },
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] computing the [`Rate`] of a [`ConstructionProp`] out of the
/// [`YearRangeValue`]s of its [`CalculatorKind`].
///
/// [`CalculatorKind`]: crate::domain::CalculatorKind
#[derive(Clone, Copy, Debug)]
pub struct ConstructionRate {
    /// ID of the [`ConstructionProp`] to rate.
    pub prop_id: construction::Id,

    /// Whether only global [`YearRangeValue`]s are used.
    pub bulk: bool,

    /// VAT to report the [`Rate`] with.
    ///
    /// [`Config::default_vat`] is used if [`None`].
    ///
    /// [`Config::default_vat`]: crate::Config::default_vat
    pub vat: Option<Percent>,
}

impl<Db> Query<ConstructionRate> for Service<Db>
where
    Db: Database<
            Select<By<Option<ConstructionProp>, construction::Id>>,
            Ok = Option<ConstructionProp>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<YearRangeValue>, year_range::Applicable>>,
            Ok = Vec<YearRangeValue>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Rate;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: ConstructionRate,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConstructionRate { prop_id, bulk, vat } = query;

        let prop = self
            .database()
            .execute(Select(By::<Option<ConstructionProp>, _>::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConstructionPropNotExists(prop_id))
            .map_err(tracerr::wrap!())?;

        let rows = self
            .database()
            .execute(Select(By::new(year_range::Applicable {
                kind: prop.kind,
                bulk,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rate = rate::of_prop(&prop, &rows)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        for gap in &rate.warnings {
            log::warn!(
                "`ConstructionProp(id: {prop_id})` of `{}` has no rate for \
                 {gap}",
                prop.kind,
            );
        }

        Ok(rate.with_vat(vat.unwrap_or(self.config().default_vat)))
    }
}

/// Error of [`ConstructionRate`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`ConstructionProp`] is misconfigured.
    Configuration(ConfigurationError),

    /// [`ConstructionProp`] with the provided ID does not exist.
    #[display("`ConstructionProp(id: {_0})` does not exist")]
    #[from(ignore)]
    ConstructionPropNotExists(#[error(not(source))] construction::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
