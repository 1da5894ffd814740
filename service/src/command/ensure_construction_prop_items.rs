//! [`Command`] for bringing the items of a [`ConstructionProp`] in line with
//! its [`CalculatorKind`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        catalog,
        construction::{self, item},
        CalculatorKind, ConstructionItem, ConstructionProp,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for bringing the items of a [`ConstructionProp`] in line with
/// its [`CalculatorKind`].
///
/// Items are re-read under the [`ConstructionProp`]'s lock, so concurrent
/// executions never duplicate them.
#[derive(Clone, Copy, Debug)]
pub struct EnsureConstructionPropItems {
    /// ID of the [`ConstructionProp`] to reconcile the items of.
    pub prop_id: construction::Id,

    /// [`CalculatorKind`] the [`ConstructionProp`] is expected to be of.
    ///
    /// [`None`] accepts any.
    pub kind: Option<CalculatorKind>,
}

impl<Db> Command<EnsureConstructionPropItems> for Service<Db>
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
            Delete<By<ConstructionItem, item::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<ConstructionItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ConstructionProp;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: EnsureConstructionPropItems,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let EnsureConstructionPropItems { prop_id, kind } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent reconciliations of the same `ConstructionProp`.
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

        if let Some(expected) = kind.filter(|k| *k != prop.kind) {
            return Err(tracerr::new!(E::KindMismatch {
                prop_id,
                expected,
                actual: prop.kind,
            }));
        }

        let reconciliation = catalog::ensure_for_kind(&prop, prop.kind);
        super::reconcile(&tx, &mut prop, reconciliation)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(prop)
    }
}

/// Error of [`EnsureConstructionPropItems`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`ConstructionProp`] with the provided ID does not exist.
    #[display("`ConstructionProp(id: {_0})` does not exist")]
    ConstructionPropNotExists(#[error(not(source))] construction::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`ConstructionProp`] is of another [`CalculatorKind`].
    #[display(
        "`ConstructionProp(id: {prop_id})` is `{actual}`, not `{expected}`"
    )]
    KindMismatch {
        /// ID of the [`ConstructionProp`].
        prop_id: construction::Id,

        /// Expected [`CalculatorKind`].
        expected: CalculatorKind,

        /// Actual [`CalculatorKind`] of the [`ConstructionProp`].
        actual: CalculatorKind,
    },
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert};

    use crate::{
        command::fixture,
        domain::{
            catalog, construction, CalculatorKind, ConstructionItem, Element,
            PropertyOption,
        },
        infra::Database as _,
        Command as _,
    };

    use super::{EnsureConstructionPropItems, ExecutionError};

    #[tokio::test]
    async fn seeds_missing_specialised_items() {
        let svc = fixture::service();
        let mut prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        let gate = prop.item(Element::Gate).unwrap().id;
        svc.database()
            .execute(Delete(By::<ConstructionItem, _>::new(gate)))
            .await
            .unwrap();
        prop.items.retain(|i| i.id != gate);
        assert!(!catalog::ensure_for_kind(&prop, prop.kind).is_noop());

        let prop = svc
            .execute(EnsureConstructionPropItems {
                prop_id: prop.id,
                kind: Some(CalculatorKind::BoundaryWall),
            })
            .await
            .unwrap();

        assert!(catalog::ensure_for_kind(&prop, prop.kind).is_noop());
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(prop));
    }

    #[tokio::test]
    async fn collapses_duplicates_and_is_idempotent() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Flats).await;
        let dup = ConstructionItem::new(
            prop.id,
            PropertyOption::parse(Element::Foundations, "STRIP_FOOTING")
                .unwrap(),
        );
        svc.database().execute(Insert(dup.clone())).await.unwrap();

        let cmd = EnsureConstructionPropItems {
            prop_id: prop.id,
            kind: None,
        };
        let once = svc.execute(cmd).await.unwrap();
        let twice = svc.execute(cmd).await.unwrap();

        assert!(once.items.iter().all(|i| i.id != dup.id));
        assert_eq!(once.items, prop.items);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn rejects_unexpected_kind() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Commercial).await;

        let err = svc
            .execute(EnsureConstructionPropItems {
                prop_id: prop.id,
                kind: Some(CalculatorKind::BoundaryWall),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::KindMismatch {
                actual: CalculatorKind::Commercial,
                ..
            },
        ));
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(prop));
    }

    #[tokio::test]
    async fn fails_on_missing_prop() {
        let svc = fixture::service();

        let err = svc
            .execute(EnsureConstructionPropItems {
                prop_id: construction::Id::new(),
                kind: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ConstructionPropNotExists(_),
        ));
    }
}
