//! [`Command`] for creating a new [`ConstructionProp`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        catalog, construction, Area, CalculatorKind, ConstructionProp,
        DevYear, ValidationErrors,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`ConstructionProp`] with the default items
/// of its [`CalculatorKind`].
#[derive(Clone, Copy, Debug)]
pub struct CreateConstructionProp {
    /// [`CalculatorKind`] of a new [`ConstructionProp`].
    pub kind: CalculatorKind,

    /// Floor area of a new [`ConstructionProp`], in square metres.
    pub floor_area: f64,

    /// Veranda floor area of a new [`ConstructionProp`], in square metres.
    pub veranda_floor_area: f64,

    /// [`DevYear`] of a new [`ConstructionProp`], if known already.
    pub dev_year: Option<DevYear>,
}

impl<Db> Command<CreateConstructionProp> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<ConstructionProp>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ConstructionProp;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateConstructionProp,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateConstructionProp {
            kind,
            floor_area,
            veranda_floor_area,
            dev_year,
        } = cmd;

        let mut errs = ValidationErrors::default();
        let floor_area = errs.check(Area::parse("floor_area", floor_area));
        let veranda_floor_area = errs
            .check(Area::parse("veranda_floor_area", veranda_floor_area));
        errs.finish().map_err(tracerr::from_and_wrap!(=> E))?;

        let mut prop = ConstructionProp {
            id: construction::Id::new(),
            kind,
            floor_area: floor_area.unwrap_or_default(),
            veranda_floor_area: veranda_floor_area.unwrap_or_default(),
            dev_year,
            items: vec![],
        };
        catalog::ensure_for_kind(&prop, kind).apply_to(&mut prop);

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(prop.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`ConstructionProp(id: {})` of `{kind}` created with {} item(s)",
            prop.id,
            prop.items.len(),
        );

        Ok(prop)
    }
}

/// Error of [`CreateConstructionProp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Input is malformed.
    #[display("Invalid input: {_0}")]
    Validation(ValidationErrors),
}
