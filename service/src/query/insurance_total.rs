//! [`Query`] computing the insurance [`Total`] of a plot.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{
        insurance::{self, NamedValues, Total},
        plot::{self, Tenant},
    },
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] computing the insurance [`Total`] of a plot out of the stored
/// rates of its [`insurance::Item`]s.
///
/// Nothing is written, see [`RecalculateInsurance`] for refreshing the rates
/// and the dependent outgoings.
///
/// [`RecalculateInsurance`]: crate::command::RecalculateInsurance
#[derive(Clone, Copy, Debug)]
pub struct InsuranceTotal {
    /// ID of the plot.
    pub plot_id: plot::Id,
}

impl<Db> Query<InsuranceTotal> for Service<Db>
where
    Db: Database<
            Select<By<Vec<insurance::Item>, plot::Id>>,
            Ok = Vec<insurance::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Tenant>, plot::Id>>,
            Ok = Vec<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<NamedValues, ()>>,
            Ok = NamedValues,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Total;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        InsuranceTotal { plot_id }: InsuranceTotal,
    ) -> Result<Self::Ok, Self::Err> {
        let items = self
            .database()
            .execute(Select(By::<Vec<insurance::Item>, _>::new(plot_id)))
            .await
            .map_err(tracerr::wrap!())?;
        let tenants = self
            .database()
            .execute(Select(By::<Vec<Tenant>, _>::new(plot_id)))
            .await
            .map_err(tracerr::wrap!())?;
        let values = self
            .database()
            .execute(Select(By::<NamedValues, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(insurance::compute_total(&items, &tenants, &values))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{Insert, Update};
    use uuid::Uuid;

    use crate::{
        command::fixture,
        domain::{
            insurance::{self, NamedValue, NamedValues},
            plot::{self, Tenant},
            Area,
        },
        infra::Database as _,
        Query as _,
    };

    use super::InsuranceTotal;

    #[tokio::test]
    async fn escalates_stored_rates() {
        let svc = fixture::service();
        let plot_id = plot::Id::new();
        let db = svc.database();
        db.execute(Insert(insurance::Item {
            id: insurance::Id::new(),
            plot_id,
            description: "Warehouse".into(),
            rate: 10_000.0,
            construction_prop_id: None,
        }))
        .await
        .unwrap();
        db.execute(Insert(Tenant {
            id: Uuid::new_v4(),
            plot_id,
            area_per_client: Area::new(1000.0).unwrap(),
        }))
        .await
        .unwrap();
        db.execute(Update(
            [
                (NamedValue::PreTenderEscalation, 12.0),
                (NamedValue::PreTenderMonths, 12.0),
                (NamedValue::PostTenderEscalation, 6.0),
                (NamedValue::PostTenderMonths, 6.0),
            ]
            .into_iter()
            .collect::<NamedValues>(),
        ))
        .await
        .unwrap();

        let total = svc.execute(InsuranceTotal { plot_id }).await.unwrap();

        assert_eq!(total.sub_total, 10_000_000.0);
        assert_eq!(total.pre_tender_escalation, 1_200_000.0);
        assert_eq!(total.post_tender_escalation, 300_000.0);
        assert_eq!(total.total, 11_000_000.0);

        let other = svc
            .execute(InsuranceTotal {
                plot_id: plot::Id::new(),
            })
            .await
            .unwrap();
        assert_eq!(other, insurance::Total::default());
    }
}
