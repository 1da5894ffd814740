//! [`Command`] for editing a single [`ConstructionItem`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        construction::{self, item},
        Area, ConfigurationError, ConstructionItem, ConstructionProp,
        Multiplier, PropertyOption, QualityOfFinish, ValidationError,
        ValidationErrors,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing a single [`ConstructionItem`].
///
/// [`None`] fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateConstructionItem {
    /// ID of the [`ConstructionItem`] to be edited.
    pub item_id: item::Id,

    /// Identifier of the new [`PropertyOption`].
    ///
    /// Must name an option of the [`ConstructionItem`]'s [`Element`].
    ///
    /// [`Element`]: crate::domain::Element
    pub option: Option<String>,

    /// New [`QualityOfFinish`].
    pub quality: Option<QualityOfFinish>,

    /// Raw input of the new [`Multiplier`].
    ///
    /// A blank input removes the override.
    pub multiplier: Option<String>,

    /// Raw input of the new explicit area, in square metres.
    ///
    /// Accepted for separately charged [`Element`]s only. A blank input
    /// removes the explicit area.
    ///
    /// [`Element`]: crate::domain::Element
    pub area: Option<String>,
}

impl<Db> Command<UpdateConstructionItem> for Service<Db>
where
    Db: Database<
            Select<By<Option<ConstructionItem>, item::Id>>,
            Ok = Option<ConstructionItem>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<ConstructionProp, construction::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ConstructionItem>, item::Id>>,
            Ok = Option<ConstructionItem>,
            Err = Traced<database::Error>,
        > + Database<Update<ConstructionItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ConstructionItem;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateConstructionItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateConstructionItem {
            item_id,
            option,
            quality,
            multiplier,
            area,
        } = cmd;

        let mut errs = ValidationErrors::default();
        let multiplier = multiplier.and_then(|raw| {
            errs.check(Multiplier::parse_input(Some(raw.as_str())))
        });
        let area = area.and_then(|raw| {
            errs.check(Area::parse_input("area", Some(raw.as_str())))
        });
        errs.finish().map_err(tracerr::from_and_wrap!(=> E))?;

        let prop_id = self
            .database()
            .execute(Select(By::<Option<ConstructionItem>, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConstructionItemNotExists(item_id))
            .map_err(tracerr::wrap!())?
            .prop_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid editing items being reconciled concurrently.
        tx.execute(Lock(By::new(prop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut item = tx
            .execute(Select(By::<Option<ConstructionItem>, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConstructionItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;

        if let Some(id) = option {
            item.option = PropertyOption::parse(item.element(), &id)
                .map_err(tracerr::from_and_wrap!(=> E))?;
        }
        if let Some(quality) = quality {
            item.quality = quality;
        }
        if let Some(multiplier) = multiplier {
            item.multiplier = multiplier;
        }
        if let Some(area) = area {
            let element = item.element();
            if area.is_some() && !element.is_separately_charged() {
                return Err(tracerr::new!(E::Validation(
                    ValidationError::new(
                        "area",
                        format!("`{element}` is charged per floor area"),
                    )
                    .into(),
                )));
            }
            item.area = area;
        }

        tx.execute(Update(item.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`UpdateConstructionItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided option doesn't belong to the [`ConstructionItem`]'s
    /// [`Element`].
    ///
    /// [`Element`]: crate::domain::Element
    Configuration(ConfigurationError),

    /// [`ConstructionItem`] with the provided ID does not exist.
    #[display("`ConstructionItem(id: {_0})` does not exist")]
    #[from(ignore)]
    ConstructionItemNotExists(#[error(not(source))] item::Id),

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
        domain::{
            construction::item, rate, Area, CalculatorKind,
            ConfigurationError, Element, Multiplier, QualityOfFinish,
        },
        Command as _,
    };

    use super::{ExecutionError, UpdateConstructionItem};

    fn edit(item_id: item::Id) -> UpdateConstructionItem {
        UpdateConstructionItem {
            item_id,
            option: None,
            quality: None,
            multiplier: None,
            area: None,
        }
    }

    #[tokio::test]
    async fn edits_item_and_drives_rate() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        let gate = prop.item(Element::Gate).unwrap().clone();

        let edited = svc
            .execute(UpdateConstructionItem {
                option: Some("SWING_GATE".into()),
                quality: Some(QualityOfFinish::Fair),
                multiplier: Some(" 1.5 ".into()),
                ..edit(gate.id)
            })
            .await
            .unwrap();
        assert_eq!(edited.option.identifier(), "SWING_GATE");
        assert_eq!(edited.quality, QualityOfFinish::Fair);
        assert_eq!(edited.multiplier, Multiplier::new(1.5));
        assert_eq!(edited.scalar(), 1.5);

        let stored = fixture::stored(&svc, prop.id).await.unwrap();
        assert_eq!(stored.item(Element::Gate), Some(&edited));

        let rows = [fixture::row(None, "SWING_GATE", 10.0)];
        let rate = rate::of_prop(&stored, &rows).unwrap();
        assert_eq!(rate.figures.cost_per_sqm_quality, 15.0);

        let cleared = svc
            .execute(UpdateConstructionItem {
                multiplier: Some("  ".into()),
                ..edit(gate.id)
            })
            .await
            .unwrap();
        assert_eq!(cleared.multiplier, None);
        assert_eq!(cleared.scalar(), QualityOfFinish::Fair.scalar());
    }

    #[tokio::test]
    async fn rejects_option_of_another_element() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        let gate = prop.item(Element::Gate).unwrap().clone();

        let err = svc
            .execute(UpdateConstructionItem {
                option: Some("STOCK_BRICKS".into()),
                ..edit(gate.id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Configuration(
                ConfigurationError::UnknownPropertyOption {
                    element: Element::Gate,
                    ..
                },
            ),
        ));
        let stored = fixture::stored(&svc, prop.id).await.unwrap();
        assert_eq!(stored.item(Element::Gate), Some(&gate));
    }

    #[tokio::test]
    async fn rejects_malformed_input() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::BoundaryWall).await;
        let gate = prop.item(Element::Gate).unwrap().id;

        let err = svc
            .execute(UpdateConstructionItem {
                multiplier: Some("twice".into()),
                area: Some("-2".into()),
                ..edit(gate)
            })
            .await
            .unwrap_err();

        let ExecutionError::Validation(errs) = err.as_ref() else {
            panic!("expected validation error, got: {err}");
        };
        assert_eq!(errs.errors().len(), 2);
    }

    #[tokio::test]
    async fn sets_and_clears_area_of_separately_charged_element() {
        let svc = fixture::service();
        let prop =
            fixture::prop(&svc, CalculatorKind::ExternalWorksResidential).await;
        let carport = prop.item(Element::CarPort).unwrap().id;

        let edited = svc
            .execute(UpdateConstructionItem {
                area: Some("18.5".into()),
                ..edit(carport)
            })
            .await
            .unwrap();
        assert_eq!(edited.area, Area::new(18.5));

        let cleared = svc
            .execute(UpdateConstructionItem {
                area: Some(" ".into()),
                ..edit(carport)
            })
            .await
            .unwrap();
        assert_eq!(cleared.area, None);
        let stored = fixture::stored(&svc, prop.id).await.unwrap();
        assert_eq!(stored.item(Element::CarPort), Some(&cleared));
    }

    #[tokio::test]
    async fn rejects_area_of_element_charged_per_floor_area() {
        let svc = fixture::service();
        let prop = fixture::prop(&svc, CalculatorKind::Flats).await;
        let bricks = prop.item(Element::Brickwork).unwrap().clone();

        let err = svc
            .execute(UpdateConstructionItem {
                area: Some("12".into()),
                ..edit(bricks.id)
            })
            .await
            .unwrap_err();

        let ExecutionError::Validation(errs) = err.as_ref() else {
            panic!("expected validation error, got: {err}");
        };
        assert_eq!(errs.errors()[0].field, "area");
        let stored = fixture::stored(&svc, prop.id).await.unwrap();
        assert_eq!(stored.item(Element::Brickwork), Some(&bricks));
    }
}
