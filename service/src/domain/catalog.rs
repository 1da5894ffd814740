//! Catalog of [`Element`]s required by each [`CalculatorKind`] and the
//! reconciliation of [`ConstructionProp`] items against it.

use std::collections::HashSet;

use super::{
    construction::item,
    element::option,
    CalculatorKind, ConstructionItem, ConstructionProp, Element,
    PropertyOption,
};

/// [`CalculatorKind`]s having a fixed set of required [`Element`]s.
///
/// Kinds not listed here share the [`Element::BASELINE`] universe.
const SPECIALISED: &[(CalculatorKind, &[Element])] = &[
    (
        CalculatorKind::BoundaryWall,
        &[Element::BoundaryWall, Element::ElectricFence, Element::Gate],
    ),
    (
        CalculatorKind::ExternalWorksResidential,
        &[Element::SwimmingPool, Element::Paving, Element::CarPort],
    ),
];

/// [`Element`]s a [`CalculatorKind`] requires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Requirement {
    /// Exactly these [`Element`]s, each once.
    Exact(&'static [Element]),

    /// Any subset of these [`Element`]s, all of them when seeding.
    Universe(&'static [Element]),
}

impl Requirement {
    /// Returns the [`Element`]s of this [`Requirement`].
    #[must_use]
    pub fn elements(self) -> &'static [Element] {
        match self {
            Self::Exact(e) | Self::Universe(e) => e,
        }
    }

    /// Indicates whether the provided [`Element`] is allowed by this
    /// [`Requirement`].
    #[must_use]
    pub fn allows(self, element: Element) -> bool {
        self.elements().contains(&element)
    }

    /// Indicates whether an item of the provided [`Element`] is kept under
    /// this [`Requirement`].
    ///
    /// [`Element::BASELINE`] items are kept under [`Requirement::Exact`]
    /// kinds too, unrated, so switching back to a general kind restores them
    /// as they were.
    #[must_use]
    pub fn keeps(self, element: Element) -> bool {
        self.allows(element) || Element::BASELINE.contains(&element)
    }
}

/// Returns the [`Requirement`] of the provided [`CalculatorKind`].
#[must_use]
pub fn requirement(kind: CalculatorKind) -> Requirement {
    SPECIALISED
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(Requirement::Universe(Element::BASELINE), |(_, e)| {
            Requirement::Exact(e)
        })
}

/// Returns the default [`PropertyOption`] of the provided [`Element`] for
/// the provided [`CalculatorKind`].
#[must_use]
pub fn default_option(
    element: Element,
    kind: CalculatorKind,
) -> PropertyOption {
    use CalculatorKind as K;
    use PropertyOption as O;

    let industrial = matches!(kind, K::Commercial | K::Industrial);
    let multi_storey = matches!(kind, K::Flats | K::ResidentialDs);

    match element {
        Element::Foundations => O::Foundations(if industrial {
            option::Foundations::PadFooting
        } else if multi_storey {
            option::Foundations::RaftFoundation
        } else {
            option::Foundations::StripFooting
        }),
        Element::Concrete => O::Concrete(if industrial || multi_storey {
            option::Concrete::ReinforcedConcrete
        } else {
            option::Concrete::MassConcrete
        }),
        Element::Brickwork => O::Brickwork(if industrial {
            option::Brickwork::ConcreteBlocks
        } else {
            option::Brickwork::StockBricks
        }),
        Element::RoofStructure => O::RoofStructure(if industrial {
            option::RoofStructure::SteelTrusses
        } else if kind == K::Flats {
            option::RoofStructure::ConcreteRoofSlab
        } else {
            option::RoofStructure::TimberTrusses
        }),
        Element::RoofingCover => O::RoofingCover(if industrial {
            option::RoofingCover::IbrSheeting
        } else {
            option::RoofingCover::ConcreteTiles
        }),
        Element::Ceilings => O::Ceilings(option::Ceilings::GypsumBoard),
        Element::Windows => O::Windows(if industrial {
            option::Windows::AluminiumWindows
        } else {
            option::Windows::SteelWindows
        }),
        Element::Doors => O::Doors(if industrial {
            option::Doors::SteelDoors
        } else {
            option::Doors::HollowCoreDoors
        }),
        Element::FloorFinishes => O::FloorFinishes(if industrial {
            option::FloorFinishes::PowerFloated
        } else {
            option::FloorFinishes::CeramicFloorTiles
        }),
        Element::WallFinishes => O::WallFinishes(option::WallFinishes::Plaster),
        Element::Plumbing => O::Plumbing(option::Plumbing::StandardPlumbing),
        Element::Electrical => {
            O::Electrical(option::Electrical::StandardElectrical)
        }
        Element::Painting => O::Painting(option::Painting::PvaPaint),
        Element::Veranda => O::Veranda(option::Veranda::ConcreteVeranda),
        Element::BoundaryWall => {
            O::BoundaryWall(option::BoundaryWall::PreCastSlabs)
        }
        Element::ElectricFence => {
            O::ElectricFence(option::ElectricFence::NoElectricFence)
        }
        Element::Gate => O::Gate(option::Gate::SlidingGate),
        Element::SwimmingPool => O::SwimmingPool(option::SwimmingPool::NoPool),
        Element::Paving => O::Paving(option::Paving::ConcretePavers),
        Element::CarPort => O::CarPort(option::CarPort::ShadeNetCarPort),
    }
}

/// Changes bringing the items of a [`ConstructionProp`] in line with a
/// [`Requirement`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// [`ConstructionItem`]s to be created.
    pub create: Vec<ConstructionItem>,

    /// IDs of [`ConstructionItem`]s to be deleted.
    pub delete: Vec<item::Id>,
}

impl Reconciliation {
    /// Indicates whether this [`Reconciliation`] changes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }

    /// Applies this [`Reconciliation`] to the provided [`ConstructionProp`].
    pub fn apply_to(&self, prop: &mut ConstructionProp) {
        prop.items.retain(|i| !self.delete.contains(&i.id));
        prop.items.extend(self.create.iter().cloned());
    }
}

/// Creates default items of the [`ConstructionProp`]'s own
/// [`CalculatorKind`] if it has none.
#[must_use]
pub fn ensure_defaults(prop: &ConstructionProp) -> Reconciliation {
    if !prop.items.is_empty() {
        return Reconciliation::default();
    }
    Reconciliation {
        create: seed(prop, prop.kind, requirement(prop.kind).elements()),
        delete: vec![],
    }
}

/// Diffs the items of the [`ConstructionProp`] against the [`Requirement`] of
/// the provided [`CalculatorKind`].
///
/// Items of kept [`Element`]s are left untouched, so user edits survive.
/// Only items of [`Element`]s specialised for another [`CalculatorKind`] are
/// deleted. Duplicated [`Element`]s are collapsed to the first item.
#[must_use]
pub fn ensure_for_kind(
    prop: &ConstructionProp,
    kind: CalculatorKind,
) -> Reconciliation {
    let req = requirement(kind);

    let mut present = HashSet::new();
    let delete = prop
        .items
        .iter()
        .filter(|i| !req.keeps(i.element()) || !present.insert(i.element()))
        .map(|i| i.id)
        .collect::<Vec<_>>();

    let create = match req {
        Requirement::Exact(elements) => {
            let missing = elements
                .iter()
                .copied()
                .filter(|e| !present.contains(e))
                .collect::<Vec<_>>();
            seed(prop, kind, &missing)
        }
        Requirement::Universe(_) if present.is_empty() => {
            let pruned = ConstructionProp {
                kind,
                items: vec![],
                ..*prop
            };
            ensure_defaults(&pruned).create
        }
        Requirement::Universe(_) => vec![],
    };

    Reconciliation { create, delete }
}

/// Creates default [`ConstructionItem`]s of the provided [`Element`]s.
fn seed(
    prop: &ConstructionProp,
    kind: CalculatorKind,
    elements: &[Element],
) -> Vec<ConstructionItem> {
    elements
        .iter()
        .map(|&e| ConstructionItem::new(prop.id, default_option(e, kind)))
        .collect()
}

#[cfg(test)]
mod spec {
    use std::collections::BTreeSet;

    use super::{
        default_option, ensure_defaults, ensure_for_kind, requirement,
        Requirement,
    };
    use crate::domain::{
        construction::{self, Area},
        element::option,
        CalculatorKind, ConstructionItem, ConstructionProp, Element,
        Multiplier, PropertyOption, QualityOfFinish,
    };

    fn prop(kind: CalculatorKind) -> ConstructionProp {
        ConstructionProp {
            id: construction::Id::new(),
            kind,
            floor_area: Area::new(150.0).unwrap(),
            veranda_floor_area: Area::ZERO,
            dev_year: None,
            items: vec![],
        }
    }

    fn elements(prop: &ConstructionProp) -> BTreeSet<Element> {
        prop.items.iter().map(ConstructionItem::element).collect()
    }

    #[test]
    fn default_options_belong_to_their_elements() {
        for &kind in CalculatorKind::ALL {
            for &element in Element::ALL {
                assert_eq!(default_option(element, kind).element(), element);
            }
        }
    }

    #[test]
    fn specialised_kinds_are_exact() {
        assert_eq!(
            requirement(CalculatorKind::BoundaryWall),
            Requirement::Exact(&[
                Element::BoundaryWall,
                Element::ElectricFence,
                Element::Gate,
            ]),
        );
        assert_eq!(
            requirement(CalculatorKind::ExternalWorksResidential),
            Requirement::Exact(&[
                Element::SwimmingPool,
                Element::Paving,
                Element::CarPort,
            ]),
        );
        assert_eq!(
            requirement(CalculatorKind::Commercial),
            Requirement::Universe(Element::BASELINE),
        );
    }

    #[test]
    fn seeds_defaults_only_when_empty() {
        let mut p = prop(CalculatorKind::ResidentialSsUpTo100m2);
        assert!(!ensure_for_kind(&p, p.kind).is_noop());

        let r = ensure_defaults(&p);
        assert_eq!(r.create.len(), Element::BASELINE.len());
        assert!(r
            .create
            .iter()
            .all(|i| i.quality == QualityOfFinish::Excellent));
        r.apply_to(&mut p);
        assert!(ensure_for_kind(&p, p.kind).is_noop());

        assert!(ensure_defaults(&p).is_noop());
    }

    #[test]
    fn defaults_are_kind_appropriate() {
        let mut p = prop(CalculatorKind::Industrial);
        ensure_defaults(&p).apply_to(&mut p);

        assert_eq!(
            p.item(Element::RoofingCover).map(|i| i.option),
            Some(PropertyOption::RoofingCover(
                option::RoofingCover::IbrSheeting,
            )),
        );
    }

    #[test]
    fn exact_kind_completes_and_keeps_general_items() {
        let mut p = prop(CalculatorKind::ResidentialSsUpTo100m2);
        ensure_defaults(&p).apply_to(&mut p);
        let general = p.items.clone();
        let mut gate = ConstructionItem::new(
            p.id,
            PropertyOption::Gate(option::Gate::SwingGate),
        );
        gate.quality = QualityOfFinish::Fair;
        p.items.push(gate.clone());

        let r = ensure_for_kind(&p, CalculatorKind::BoundaryWall);
        assert!(r.delete.is_empty());
        assert_eq!(r.create.len(), 2);
        r.apply_to(&mut p);

        let wall = BTreeSet::from([
            Element::BoundaryWall,
            Element::ElectricFence,
            Element::Gate,
        ]);
        assert!(elements(&p).is_superset(&wall));
        assert_eq!(elements(&p).len(), wall.len() + Element::BASELINE.len());
        assert_eq!(p.items[..general.len()], general[..]);
        // Present element is left untouched.
        assert_eq!(p.item(Element::Gate), Some(&gate));
    }

    #[test]
    fn exact_kind_drops_items_of_other_specialised_kinds() {
        let mut p = prop(CalculatorKind::ExternalWorksResidential);
        ensure_defaults(&p).apply_to(&mut p);
        let pool = p.items.clone();

        let r = ensure_for_kind(&p, CalculatorKind::BoundaryWall);
        assert_eq!(r.delete, pool.iter().map(|i| i.id).collect::<Vec<_>>());
        r.apply_to(&mut p);

        assert_eq!(
            elements(&p),
            BTreeSet::from([
                Element::BoundaryWall,
                Element::ElectricFence,
                Element::Gate,
            ]),
        );
    }

    #[test]
    fn general_items_survive_wall_round_trip() {
        let mut p = prop(CalculatorKind::ResidentialSsAbove100m2);
        ensure_defaults(&p).apply_to(&mut p);
        let bricks = p
            .items
            .iter_mut()
            .find(|i| i.element() == Element::Brickwork)
            .unwrap();
        bricks.option =
            PropertyOption::Brickwork(option::Brickwork::FaceBricks);
        bricks.quality = QualityOfFinish::Poor;
        bricks.multiplier = Multiplier::new(1.7);
        let before = p.items.clone();

        ensure_for_kind(&p, CalculatorKind::BoundaryWall).apply_to(&mut p);
        let back = ensure_for_kind(&p, CalculatorKind::ResidentialSsAbove100m2);
        assert_eq!(back.delete.len(), 3);
        assert!(back.create.is_empty());
        back.apply_to(&mut p);

        assert_eq!(p.items, before);
    }

    #[test]
    fn ensure_for_kind_is_idempotent() {
        for &from in CalculatorKind::ALL {
            for &to in CalculatorKind::ALL {
                let mut p = prop(from);
                ensure_defaults(&p).apply_to(&mut p);

                ensure_for_kind(&p, to).apply_to(&mut p);
                let once = p.clone();
                let again = ensure_for_kind(&p, to);

                assert!(again.is_noop(), "{from} -> {to}: {again:?}");
                again.apply_to(&mut p);
                assert_eq!(p, once);
            }
        }
    }

    #[test]
    fn collapses_duplicated_elements() {
        let mut p = prop(CalculatorKind::BoundaryWall);
        ensure_defaults(&p).apply_to(&mut p);
        let dup = ConstructionItem::new(
            p.id,
            PropertyOption::Gate(option::Gate::PedestrianGate),
        );
        p.items.push(dup.clone());

        let r = ensure_for_kind(&p, CalculatorKind::BoundaryWall);
        assert_eq!(r.delete, vec![dup.id]);
        assert!(r.create.is_empty());
    }

    #[test]
    fn general_kinds_never_purge_each_other() {
        let mut p = prop(CalculatorKind::ResidentialSsUpTo100m2);
        ensure_defaults(&p).apply_to(&mut p);
        p.items.retain(|i| i.element() != Element::Painting);

        assert!(ensure_for_kind(&p, CalculatorKind::Commercial).is_noop());
        assert!(ensure_for_kind(&p, CalculatorKind::Flats).is_noop());
    }

    #[test]
    fn general_kind_removes_only_specialised_items() {
        let mut p = prop(CalculatorKind::ResidentialSsUpTo100m2);
        let mut bricks = ConstructionItem::new(
            p.id,
            PropertyOption::Brickwork(option::Brickwork::FaceBricks),
        );
        bricks.quality = QualityOfFinish::Good;
        let gate = ConstructionItem::new(
            p.id,
            PropertyOption::Gate(option::Gate::SlidingGate),
        );
        p.items = vec![bricks.clone(), gate.clone()];

        let r = ensure_for_kind(&p, CalculatorKind::ResidentialSsUpTo100m2);
        assert_eq!(r.delete, vec![gate.id]);
        assert!(r.create.is_empty());
        r.apply_to(&mut p);

        assert_eq!(p.items, vec![bricks]);
    }
}
