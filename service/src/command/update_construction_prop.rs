//! [`Command`] for updating floor metrics of a [`ConstructionProp`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{construction, Area, ConstructionProp, DevYear, ValidationErrors},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating floor metrics of a [`ConstructionProp`].
///
/// [`None`] fields are left unchanged.
#[derive(Clone, Copy, Debug)]
pub struct UpdateConstructionProp {
    /// ID of the [`ConstructionProp`] to be updated.
    pub prop_id: construction::Id,

    /// New floor area, in square metres.
    pub floor_area: Option<f64>,

    /// New veranda floor area, in square metres.
    pub veranda_floor_area: Option<f64>,

    /// New [`DevYear`].
    pub dev_year: Option<DevYear>,
}

impl<Db> Command<UpdateConstructionProp> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<ConstructionProp, construction::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ConstructionProp>, construction::Id>>,
            Ok = Option<ConstructionProp>,
            Err = Traced<database::Error>,
        > + Database<Update<ConstructionProp>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ConstructionProp;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateConstructionProp,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateConstructionProp {
            prop_id,
            floor_area,
            veranda_floor_area,
            dev_year,
        } = cmd;

        let mut errs = ValidationErrors::default();
        let floor_area = floor_area
            .and_then(|sqm| errs.check(Area::parse("floor_area", sqm)));
        let veranda_floor_area = veranda_floor_area.and_then(|sqm| {
            errs.check(Area::parse("veranda_floor_area", sqm))
        });
        errs.finish().map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut prop = tx
            .execute(Select(By::<Option<ConstructionProp>, _>::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConstructionPropNotExists(prop_id))
            .map_err(tracerr::wrap!())?;

        if let Some(area) = floor_area {
            prop.floor_area = area;
        }
        if let Some(area) = veranda_floor_area {
            prop.veranda_floor_area = area;
        }
        if let Some(year) = dev_year {
            prop.dev_year = Some(year);
        }

        tx.execute(Update(prop.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(prop)
    }
}

/// Error of [`UpdateConstructionProp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`ConstructionProp`] with the provided ID does not exist.
    #[display("`ConstructionProp(id: {_0})` does not exist")]
    #[from(ignore)]
    ConstructionPropNotExists(#[error(not(source))] construction::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Input is malformed.
    #[display("Invalid input: {_0}")]
    Validation(ValidationErrors),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{CalculatorKind, DevYear},
        Command as _,
    };

    use super::{ExecutionError, UpdateConstructionProp};

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::ResidentialDs).await;

        let updated = svc
            .execute(UpdateConstructionProp {
                prop_id: prop.id,
                floor_area: Some(250.0),
                veranda_floor_area: None,
                dev_year: Some(DevYear::First),
            })
            .await
            .unwrap();

        assert_eq!(updated.floor_area.sqm(), 250.0);
        assert_eq!(updated.veranda_floor_area, prop.veranda_floor_area);
        assert_eq!(updated.dev_year, Some(DevYear::First));
        assert_eq!(updated.items, prop.items);
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(updated));
    }

    #[tokio::test]
    async fn rejects_negative_area() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::ResidentialDs).await;

        let err = svc
            .execute(UpdateConstructionProp {
                prop_id: prop.id,
                floor_area: None,
                veranda_floor_area: Some(-3.0),
                dev_year: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(prop));
    }
}
