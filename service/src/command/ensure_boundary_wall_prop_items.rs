//! [`Command`] for ensuring the items of a boundary wall [`ConstructionProp`].

use tracerr::Traced;

use crate::{
    domain::{construction, CalculatorKind, ConstructionProp},
    Service,
};

use super::{ensure_construction_prop_items, Command};

/// [`Command`] for ensuring a [`CalculatorKind::BoundaryWall`]
/// [`ConstructionProp`] has exactly its wall, fence and gate items.
#[derive(Clone, Copy, Debug)]
pub struct EnsureBoundaryWallPropItems {
    /// ID of the [`ConstructionProp`] to reconcile the items of.
    pub prop_id: construction::Id,
}

impl<Db> Command<EnsureBoundaryWallPropItems> for Service<Db>
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
        cmd: EnsureBoundaryWallPropItems,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(super::EnsureConstructionPropItems {
            prop_id: cmd.prop_id,
            kind: Some(CalculatorKind::BoundaryWall),
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Error of [`EnsureBoundaryWallPropItems`] [`Command`] execution.
pub type ExecutionError = ensure_construction_prop_items::ExecutionError;
