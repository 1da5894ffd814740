//! [`Command`] definition.

pub mod create_construction_prop;
pub mod delete_construction_prop;
pub mod ensure_boundary_wall_prop_items;
pub mod ensure_construction_prop_items;
pub mod ensure_external_work_prop_items;
pub mod recalculate_insurance;
pub mod replace_year_range_values;
pub mod update_construction_item;
pub mod update_construction_prop;
pub mod update_construction_prop_kind;

use common::operations::{By, Delete, Insert};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        construction::item, ConstructionItem, ConstructionProp, Reconciliation,
    },
    infra::{database, Database},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_construction_prop::CreateConstructionProp,
    delete_construction_prop::DeleteConstructionProp,
    ensure_boundary_wall_prop_items::EnsureBoundaryWallPropItems,
    ensure_construction_prop_items::EnsureConstructionPropItems,
    ensure_external_work_prop_items::EnsureExternalWorkPropItems,
    recalculate_insurance::RecalculateInsurance,
    replace_year_range_values::ReplaceYearRangeValues,
    update_construction_item::UpdateConstructionItem,
    update_construction_prop::UpdateConstructionProp,
    update_construction_prop_kind::UpdateConstructionPropKind,
};

/// Persists the provided [`Reconciliation`] of the [`ConstructionProp`] and
/// applies it to the [`ConstructionProp`] itself.
///
/// Must be executed inside the transaction holding the
/// [`ConstructionProp`]'s lock.
async fn reconcile<Tx>(
    tx: &Tx,
    prop: &mut ConstructionProp,
    reconciliation: Reconciliation,
) -> Result<(), Traced<database::Error>>
where
    Tx: Database<
            Delete<By<ConstructionItem, item::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<ConstructionItem>, Err = Traced<database::Error>>,
{
    if reconciliation.is_noop() {
        return Ok(());
    }

    for id in &reconciliation.delete {
        tx.execute(Delete(By::<ConstructionItem, _>::new(*id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
    }
    for item in &reconciliation.create {
        tx.execute(Insert(item.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
    }

    log::debug!(
        "`ConstructionProp(id: {})` reconciled for `{}`: \
         {} item(s) created, {} item(s) deleted",
        prop.id,
        prop.kind,
        reconciliation.create.len(),
        reconciliation.delete.len(),
    );

    reconciliation.apply_to(prop);
    Ok(())
}
