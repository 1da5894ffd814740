//! [`Command`] for deleting a [`ConstructionProp`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{construction, ConstructionProp},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`ConstructionProp`] along with its items.
#[derive(Clone, Copy, Debug)]
pub struct DeleteConstructionProp {
    /// ID of the [`ConstructionProp`] to be deleted.
    pub prop_id: construction::Id,
}

impl<Db> Command<DeleteConstructionProp> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<ConstructionProp, construction::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ConstructionProp>, construction::Id>>,
            Ok = Option<ConstructionProp>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<ConstructionProp, construction::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ConstructionProp;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteConstructionProp,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteConstructionProp { prop_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let prop = tx
            .execute(Select(By::<Option<ConstructionProp>, _>::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConstructionPropNotExists(prop_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<ConstructionProp, _>::new(prop_id)))
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

/// Error of [`DeleteConstructionProp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`ConstructionProp`] with the provided ID does not exist.
    #[display("`ConstructionProp(id: {_0})` does not exist")]
    #[from(ignore)]
    ConstructionPropNotExists(#[error(not(source))] construction::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::fixture,
        domain::{CalculatorKind, ConstructionItem},
        infra::Database as _,
        Command as _,
    };

    use super::{DeleteConstructionProp, ExecutionError};

    #[tokio::test]
    async fn deletes_prop_with_items() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        let other = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;

        let deleted = svc
            .execute(DeleteConstructionProp { prop_id: prop.id })
            .await
            .unwrap();
        assert_eq!(deleted, prop);

        assert_eq!(fixture::stored(&svc, prop.id).await, None);
        for item in &prop.items {
            let stored = svc
                .database()
                .execute(Select(By::<Option<ConstructionItem>, _>::new(
                    item.id,
                )))
                .await
                .unwrap();
            assert_eq!(stored, None);
        }
        assert_eq!(fixture::stored(&svc, other.id).await, Some(other));

        let err = svc
            .execute(DeleteConstructionProp { prop_id: prop.id })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ConstructionPropNotExists(_),
        ));
    }
}
