//! [`Command`] for ensuring the items of a external works [`ConstructionProp`].

use tracerr::Traced;

use crate::{
    domain::{construction, CalculatorKind, ConstructionProp},
    Service,
};

use super::{ensure_construction_prop_items, Command};

/// [`Command`] for ensuring a [`CalculatorKind::ExternalWorksResidential`]
/// [`ConstructionProp`] has exactly its pool, paving and car-port items.
#[derive(Clone, Copy, Debug)]
pub struct EnsureExternalWorkPropItems {
    /// ID of the [`ConstructionProp`] to reconcile the items of.
    pub prop_id: construction::Id,
}

impl<Db> Command<EnsureExternalWorkPropItems> for Service<Db>
where
    Self: Command<
        super::EnsureConstructionPropItems,
        Ok = ConstructionProp,
        Err = Traced<ExecutionError>,
    >,
{
    type Ok = ConstructionProp;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: EnsureExternalWorkPropItems,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(super::EnsureConstructionPropItems {
            prop_id: cmd.prop_id,
            kind: Some(CalculatorKind::ExternalWorksResidential),
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Error of [`EnsureExternalWorkPropItems`] [`Command`] execution.
pub type ExecutionError = ensure_construction_prop_items::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{CalculatorKind, Element},
        Command as _,
    };

    use super::{EnsureExternalWorkPropItems, ExecutionError};

    #[tokio::test]
    async fn keeps_complete_works_untouched() {
        let svc = fixture::service();
        let prop =
            fixture::prop(&svc, CalculatorKind::ExternalWorksResidential)
                .await;

        let ensured = svc
            .execute(EnsureExternalWorkPropItems { prop_id: prop.id })
            .await
            .unwrap();

        assert_eq!(ensured, prop);
        assert_eq!(
            ensured.items.iter().map(|i| i.element()).collect::<Vec<_>>(),
            [Element::SwimmingPool, Element::Paving, Element::CarPort],
        );
    }

    #[tokio::test]
    async fn rejects_general_prop() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::ResidentialDs).await;

        let err = svc
            .execute(EnsureExternalWorkPropItems { prop_id: prop.id })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::KindMismatch { .. }));
    }
}
