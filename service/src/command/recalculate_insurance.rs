//! [`Command`] for recalculating the insurance [`Total`] of a plot.

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        construction,
        insurance::{self, NamedValues, Total},
        plot::{self, Outgoing, Tenant},
        rate, year_range, ConfigurationError, ConstructionProp,
        YearRangeValue,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recalculating the insurance [`Total`] of a plot.
///
/// Rates of the insurance [`insurance::Item`]s linked to a
/// [`ConstructionProp`] are refreshed first, and the [`Total`] is written
/// into every [`Outgoing`] tracking it.
#[derive(Clone, Copy, Debug)]
pub struct RecalculateInsurance {
    /// ID of the plot to recalculate the insurance [`Total`] of.
    pub plot_id: plot::Id,
}

impl<Db> Command<RecalculateInsurance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<insurance::Item>, plot::Id>>,
            Ok = Vec<insurance::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ConstructionProp>, construction::Id>>,
            Ok = Option<ConstructionProp>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<YearRangeValue>, year_range::Applicable>>,
            Ok = Vec<YearRangeValue>,
            Err = Traced<database::Error>,
        > + Database<Update<insurance::Item>, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Tenant>, plot::Id>>,
            Ok = Vec<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<NamedValues, ()>>,
            Ok = NamedValues,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Outgoing>, plot::Id>>,
            Ok = Vec<Outgoing>,
            Err = Traced<database::Error>,
        > + Database<Update<Outgoing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Total;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecalculateInsurance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecalculateInsurance { plot_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut items = tx
            .execute(Select(By::<Vec<insurance::Item>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for item in &mut items {
            let Some(prop_id) = item.construction_prop_id else {
                continue;
            };
            let Some(prop) = tx
                .execute(Select(By::<Option<ConstructionProp>, _>::new(
                    prop_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            else {
                continue;
            };

            let rows = tx
                .execute(Select(By::new(year_range::Applicable {
                    kind: prop.kind,
                    bulk: false,
                })))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let rate = rate::of_prop(&prop, &rows)
                .map_err(tracerr::from_and_wrap!(=> E))?;
            for gap in &rate.warnings {
                log::warn!(
                    "`ConstructionProp(id: {prop_id})` has no rate for {gap}",
                );
            }

            item.refresh(&rate);
            tx.execute(Update(item.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let tenants = tx
            .execute(Select(By::<Vec<Tenant>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let values = tx
            .execute(Select(By::<NamedValues, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let total = insurance::compute_total(&items, &tenants, &values);

        let outgoings = tx
            .execute(Select(By::<Vec<Outgoing>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for mut outgoing in outgoings {
            if !outgoing.kind.tracks_insurance() {
                continue;
            }
            outgoing.amount = total.total;
            tx.execute(Update(outgoing))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "Insurance total of plot `{plot_id}` recalculated: {}",
            total.total,
        );

        Ok(total)
    }
}

/// Error of [`RecalculateInsurance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Linked [`ConstructionProp`] is misconfigured.
    Configuration(ConfigurationError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select, Update};
    use uuid::Uuid;

    use crate::{
        command::fixture,
        domain::{
            construction,
            insurance::{self, NamedValue, NamedValues},
            plot::{self, Outgoing, OutgoingKind, Tenant},
            Area, CalculatorKind, ConfigurationError, ConstructionProp,
        },
        infra::{Database as _, Memory},
        Command as _, Service,
    };

    use super::{ExecutionError, RecalculateInsurance};

    async fn seed_plot(
        svc: &Service<Memory>,
        prop_id: Option<construction::Id>,
    ) -> plot::Id {
        let plot_id = plot::Id::new();
        let db = svc.database();
        db.execute(Insert(insurance::Item {
            id: insurance::Id::new(),
            plot_id,
            description: "Main house".into(),
            rate: 0.0,
            construction_prop_id: prop_id,
        }))
        .await
        .unwrap();
        db.execute(Insert(insurance::Item {
            id: insurance::Id::new(),
            plot_id,
            description: "Fixed".into(),
            rate: 1000.0,
            construction_prop_id: None,
        }))
        .await
        .unwrap();
        for sqm in [600.0, 400.0] {
            db.execute(Insert(Tenant {
                id: Uuid::new_v4(),
                plot_id,
                area_per_client: Area::new(sqm).unwrap(),
            }))
            .await
            .unwrap();
        }
        for kind in OutgoingKind::ALL {
            db.execute(Insert(Outgoing {
                id: Uuid::new_v4(),
                plot_id,
                kind: *kind,
                amount: 7.0,
            }))
            .await
            .unwrap();
        }
        plot_id
    }

    async fn outgoings(svc: &Service<Memory>, plot_id: plot::Id) -> Vec<f64> {
        svc.database()
            .execute(Select(By::<Vec<Outgoing>, _>::new(plot_id)))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.amount)
            .collect()
    }

    #[tokio::test]
    async fn refreshes_rates_and_writes_outgoings() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        fixture::rows(
            &svc,
            vec![
                fixture::row(None, "PRE_CAST_SLABS", 500.0),
                fixture::row(None, "SLIDING_GATE", 500.0),
            ],
        )
        .await;
        let plot_id = seed_plot(&svc, Some(prop.id)).await;
        let values = [
            (NamedValue::InsuranceVat, 15.0),
            (NamedValue::ProfFee, 10.0),
        ]
        .into_iter()
        .collect::<NamedValues>();
        svc.database().execute(Update(values)).await.unwrap();

        let total = svc
            .execute(RecalculateInsurance { plot_id })
            .await
            .unwrap();

        // (1000 + 1000) × 1000m² = 2_000_000, +15% VAT, +10% fees.
        assert_eq!(total.sub_total, 2_000_000.0);
        assert_eq!(total.vat, 300_000.0);
        assert_eq!(total.prof_fees, 230_000.0);
        assert_eq!(total.replacement_cost, 2_530_000.0);
        assert_eq!(total.total, 2_000_000.0);
        assert_eq!(outgoings(&svc, plot_id).await, [2e6, 2e6, 7.0]);

        let items = svc
            .database()
            .execute(Select(By::<Vec<insurance::Item>, _>::new(plot_id)))
            .await
            .unwrap();
        assert_eq!(items[0].rate, 1000.0);
        assert_eq!(items[1].rate, 1000.0);
    }

    #[tokio::test]
    async fn fails_on_prop_without_dev_year() {
        let svc = fixture::service();
        let prop = ConstructionProp {
            dev_year: None,
            ..fixture::prop(&svc, CalculatorKind::Flats).await
        };
        svc.database().execute(Update(prop.clone())).await.unwrap();
        let plot_id = seed_plot(&svc, Some(prop.id)).await;

        let err = svc
            .execute(RecalculateInsurance { plot_id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Configuration(
                ConfigurationError::MissingDevYear(_),
            ),
        ));
        assert_eq!(outgoings(&svc, plot_id).await, [7.0, 7.0, 7.0]);
    }

    #[tokio::test]
    async fn empty_plot_zeroes_outgoings() {
        let svc = fixture::service();
        let plot_id = plot::Id::new();
        svc.database()
            .execute(Insert(Outgoing {
                id: Uuid::new_v4(),
                plot_id,
                kind: OutgoingKind::Insurance,
                amount: 99.0,
            }))
            .await
            .unwrap();

        let total = svc
            .execute(RecalculateInsurance { plot_id })
            .await
            .unwrap();

        assert_eq!(total, insurance::Total::default());
        assert_eq!(outgoings(&svc, plot_id).await, [0.0]);
    }
}
