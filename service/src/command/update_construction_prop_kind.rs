//! [`Command`] for changing the [`CalculatorKind`] of a [`ConstructionProp`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        catalog,
        construction::{self, item},
        year_range, CalculatorKind, ConstructionItem, ConstructionProp,
        YearRangeValue,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for changing the [`CalculatorKind`] of a [`ConstructionProp`]
/// along with its items.
///
/// Items of [`Element`]s the new [`CalculatorKind`] doesn't allow are
/// deleted, and the missing required ones are created with defaults, all in
/// one transaction.
///
/// [`Element`]: crate::domain::Element
#[derive(Clone, Copy, Debug)]
pub struct UpdateConstructionPropKind {
    /// ID of the [`ConstructionProp`] to change the [`CalculatorKind`] of.
    pub prop_id: construction::Id,

    /// Whether only global [`YearRangeValue`]s rate the [`ConstructionProp`].
    pub bulk: bool,

    /// [`CalculatorKind`] the caller believes the [`ConstructionProp`] is of.
    pub current_kind: CalculatorKind,

    /// New [`CalculatorKind`] of the [`ConstructionProp`].
    pub new_kind: CalculatorKind,
}

/// Result of [`UpdateConstructionPropKind`] [`Command`] execution.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    /// Updated [`ConstructionProp`] with its reconciled items.
    pub prop: ConstructionProp,

    /// [`YearRangeValue`]s applicable to the new [`CalculatorKind`].
    pub rates: Vec<YearRangeValue>,
}

impl<Db> Command<UpdateConstructionPropKind> for Service<Db>
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
        + Database<
            Delete<By<ConstructionItem, item::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<ConstructionItem>, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<YearRangeValue>, year_range::Applicable>>,
            Ok = Vec<YearRangeValue>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateConstructionPropKind,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateConstructionPropKind {
            prop_id,
            bulk,
            current_kind,
            new_kind,
        } = cmd;

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

        if prop.kind != current_kind {
            return Err(tracerr::new!(E::KindChanged {
                prop_id,
                expected: current_kind,
                actual: prop.kind,
            }));
        }

        if prop.kind != new_kind {
            prop.kind = new_kind;
            tx.execute(Update(prop.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let reconciliation = catalog::ensure_for_kind(&prop, new_kind);
        super::reconcile(&tx, &mut prop, reconciliation)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rates = tx
            .execute(Select(By::new(year_range::Applicable {
                kind: new_kind,
                bulk,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { prop, rates })
    }
}

/// Error of [`UpdateConstructionPropKind`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`ConstructionProp`] with the provided ID does not exist.
    #[display("`ConstructionProp(id: {_0})` does not exist")]
    ConstructionPropNotExists(#[error(not(source))] construction::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`ConstructionProp`]'s [`CalculatorKind`] has been changed
    /// concurrently.
    #[display(
        "`ConstructionProp(id: {prop_id})` is `{actual}`, not `{expected}`"
    )]
    KindChanged {
        /// ID of the [`ConstructionProp`].
        prop_id: construction::Id,

        /// [`CalculatorKind`] the caller expected.
        expected: CalculatorKind,

        /// Actual [`CalculatorKind`] of the [`ConstructionProp`].
        actual: CalculatorKind,
    },
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{fixture, UpdateConstructionItem},
        domain::{
            catalog, CalculatorKind, ConstructionProp, Element,
            QualityOfFinish,
        },
        Command as _,
    };

    use super::{ExecutionError, UpdateConstructionPropKind};

    fn elements(prop: &ConstructionProp) -> Vec<Element> {
        prop.items.iter().map(|i| i.element()).collect()
    }

    #[tokio::test]
    async fn general_to_wall_and_back() {
        let svc = fixture::service();
        let general = CalculatorKind::ResidentialSsAbove100m2;
        let prop = fixture::prop(&svc, general).await;
        let bricks = svc
            .execute(UpdateConstructionItem {
                item_id: prop.item(Element::Brickwork).unwrap().id,
                option: Some("FACE_BRICKS".into()),
                quality: Some(QualityOfFinish::Poor),
                multiplier: Some("1.7".into()),
                area: None,
            })
            .await
            .unwrap();
        let general_items = fixture::stored(&svc, prop.id).await.unwrap().items;

        let wall = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: general,
                new_kind: CalculatorKind::BoundaryWall,
            })
            .await
            .unwrap()
            .prop;
        assert_eq!(wall.items[..general_items.len()], general_items[..]);
        assert_eq!(
            elements(&wall)[general_items.len()..],
            [Element::BoundaryWall, Element::ElectricFence, Element::Gate],
        );
        assert!(catalog::ensure_for_kind(&wall, wall.kind).is_noop());
        assert_eq!(fixture::stored(&svc, prop.id).await.as_ref(), Some(&wall));

        let back = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: CalculatorKind::BoundaryWall,
                new_kind: general,
            })
            .await
            .unwrap()
            .prop;
        assert_eq!(back.kind, general);
        assert_eq!(elements(&back), Element::BASELINE);
        assert_eq!(back.items, general_items);
        assert_eq!(back.item(Element::Brickwork), Some(&bricks));
        assert!(catalog::ensure_for_kind(&back, back.kind).is_noop());
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(back));
    }

    #[tokio::test]
    async fn general_kinds_keep_items() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Commercial).await;

        let updated = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: CalculatorKind::Commercial,
                new_kind: CalculatorKind::Industrial,
            })
            .await
            .unwrap()
            .prop;

        assert_eq!(updated.kind, CalculatorKind::Industrial);
        assert_eq!(updated.items, prop.items);
    }

    #[tokio::test]
    async fn returns_rates_of_new_kind() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Flats).await;
        fixture::rows(
            &svc,
            vec![
                fixture::row(None, "FACE_BRICK_WALL", 100.0),
                fixture::row(
                    Some(CalculatorKind::BoundaryWall),
                    "FACE_BRICK_WALL",
                    200.0,
                ),
                fixture::row(Some(CalculatorKind::Flats), "GATE", 300.0),
            ],
        )
        .await;

        let out = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: CalculatorKind::Flats,
                new_kind: CalculatorKind::BoundaryWall,
            })
            .await
            .unwrap();
        assert_eq!(out.rates.len(), 2);
        let flats = Some(CalculatorKind::Flats);
        assert!(out.rates.iter().all(|r| r.kind != flats));

        let bulk = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: true,
                current_kind: CalculatorKind::BoundaryWall,
                new_kind: CalculatorKind::BoundaryWall,
            })
            .await
            .unwrap();
        assert_eq!(bulk.rates, [fixture::row(None, "FACE_BRICK_WALL", 100.0)]);
        assert_eq!(bulk.prop, out.prop);
    }

    #[tokio::test]
    async fn rejects_stale_kind() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Flats).await;

        let err = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: CalculatorKind::Commercial,
                new_kind: CalculatorKind::BoundaryWall,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::KindChanged { .. }));
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(prop));
    }

    #[tokio::test]
    async fn rolls_back_on_failed_write() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Flats).await;

        // Kind update and a few item deletions succeed, then writes fail.
        svc.database().fail_writes_after(3);
        let err = svc
            .execute(UpdateConstructionPropKind {
                prop_id: prop.id,
                bulk: false,
                current_kind: CalculatorKind::Flats,
                new_kind: CalculatorKind::BoundaryWall,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Db(_)));

        svc.database().fail_writes_after(usize::MAX);
        assert_eq!(fixture::stored(&svc, prop.id).await, Some(prop));
    }
}
