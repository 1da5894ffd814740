//! Aggregation of [`ConstructionItem`]s into a replacement [`Rate`].

use common::Percent;
use derive_more::Display;

use super::{
    catalog, year_range::RateTable, Area, CalculatorKind, ConstructionItem,
    ConstructionProp, ConfigurationError, DevYear, Element, YearRangeValue,
};

/// Cost figures of a [`ConstructionProp`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Figures {
    /// Unscaled cost per square metre of floor area.
    pub cost_per_sqm_typical: f64,

    /// Quality scaled cost per square metre of floor area.
    pub cost_per_sqm_quality: f64,

    /// Unscaled total cost, separately charged [`Element`]s included.
    pub total_typical_estimate: f64,

    /// Quality scaled total cost, separately charged [`Element`]s included.
    pub total_quality_estimate: f64,
}

impl Figures {
    /// Scales all these [`Figures`] by the provided `factor`.
    #[must_use]
    fn scaled(self, factor: f64) -> Self {
        Self {
            cost_per_sqm_typical: self.cost_per_sqm_typical * factor,
            cost_per_sqm_quality: self.cost_per_sqm_quality * factor,
            total_typical_estimate: self.total_typical_estimate * factor,
            total_quality_estimate: self.total_quality_estimate * factor,
        }
    }
}

/// Reference rate missing for a [`ConstructionItem`], so it contributes
/// nothing.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("no reference rate of `{identifier}` for `{element}` element")]
pub struct MissingRate {
    /// [`Element`] of the unrated [`ConstructionItem`].
    pub element: Element,

    /// Identifier of the unrated option.
    pub identifier: &'static str,
}

/// Replacement rate of a [`ConstructionProp`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rate {
    /// Reported [`Figures`], VAT inclusive once [`Rate::with_vat()`] applied.
    pub figures: Figures,

    /// [`Figures`] without VAT.
    pub without_vat: Figures,

    /// [`ConstructionItem`]s contributing nothing due to missing rates.
    pub warnings: Vec<MissingRate>,
}

impl Rate {
    /// Applies the provided VAT to the reported [`Figures`], keeping the
    /// [`Rate::without_vat`] ones intact.
    #[must_use]
    pub fn with_vat(mut self, vat: Percent) -> Self {
        self.figures = self.without_vat.scaled(1.0 + vat.as_f64() / 100.0);
        self
    }
}

/// Computes the [`Rate`] of the provided [`ConstructionItem`]s using the
/// reference `rows` applicable to the provided [`CalculatorKind`].
///
/// Items of [`Element`]s not required by the [`CalculatorKind`] are kept
/// dormant and don't take part in the [`Rate`].
#[must_use]
pub fn compute(
    kind: CalculatorKind,
    items: &[ConstructionItem],
    dev_year: DevYear,
    floor_area: Area,
    veranda_floor_area: Area,
    rows: &[YearRangeValue],
) -> Rate {
    let required = catalog::requirement(kind);
    aggregate(
        &RateTable::new(kind, rows),
        items.iter().filter(|i| required.allows(i.element())),
        dev_year,
        floor_area,
        veranda_floor_area,
    )
}

/// Computes the [`Rate`] of the provided [`ConstructionProp`].
///
/// # Errors
///
/// If the [`ConstructionProp`] has no [`DevYear`] chosen.
pub fn of_prop(
    prop: &ConstructionProp,
    rows: &[YearRangeValue],
) -> Result<Rate, ConfigurationError> {
    Ok(compute(
        prop.kind,
        &prop.items,
        prop.require_dev_year()?,
        prop.floor_area,
        prop.veranda_floor_area,
        rows,
    ))
}

/// Aggregates the provided [`ConstructionItem`]s against the [`RateTable`].
fn aggregate<'i>(
    table: &RateTable,
    items: impl IntoIterator<Item = &'i ConstructionItem>,
    dev_year: DevYear,
    floor_area: Area,
    veranda_floor_area: Area,
) -> Rate {
    let mut per_sqm = (0.0, 0.0);
    let mut veranda = (0.0, 0.0);
    let mut warnings = vec![];

    for item in items {
        let identifier = item.option.identifier();
        let Some(bands) = table.find(identifier) else {
            warnings.push(MissingRate {
                element: item.element(),
                identifier,
            });
            continue;
        };

        let typical = bands.select(dev_year);
        let quality = typical * item.scalar();
        if item.element().is_separately_charged() {
            let area = item.area.unwrap_or(veranda_floor_area).sqm();
            veranda.0 += typical * area;
            veranda.1 += quality * area;
        } else {
            per_sqm.0 += typical;
            per_sqm.1 += quality;
        }
    }

    let figures = Figures {
        cost_per_sqm_typical: per_sqm.0,
        cost_per_sqm_quality: per_sqm.1,
        total_typical_estimate: per_sqm.0 * floor_area.sqm() + veranda.0,
        total_quality_estimate: per_sqm.1 * floor_area.sqm() + veranda.1,
    };
    Rate {
        figures,
        without_vat: figures,
        warnings,
    }
}

#[cfg(test)]
mod spec {
    use common::Percent;

    use super::{compute, of_prop, MissingRate};
    use crate::domain::{
        construction,
        element::option,
        year_range::{Bands, Identifier},
        Area, CalculatorKind, ConfigurationError, ConstructionItem,
        ConstructionProp, DevYear, Element, Multiplier, PropertyOption,
        QualityOfFinish, YearRangeValue,
    };

    fn row(
        kind: Option<CalculatorKind>,
        id: &str,
        first: f64,
        second: f64,
        third: f64,
    ) -> YearRangeValue {
        YearRangeValue {
            kind,
            identifier: Identifier::new(id).unwrap(),
            bands: Bands {
                first,
                second,
                third,
            },
        }
    }

    fn item(option: PropertyOption) -> ConstructionItem {
        ConstructionItem::new(construction::Id::new(), option)
    }

    fn sqm(v: f64) -> Area {
        Area::new(v).unwrap()
    }

    #[test]
    fn boundary_wall_scenario() {
        let kind = CalculatorKind::BoundaryWall;
        let rows = [
            row(Some(kind), "PRE_CAST_SLABS", 410.0, 455.5, 520.0),
            row(None, "PRE_CAST_SLABS", 1.0, 2.0, 3.0),
        ];
        let items = [item(PropertyOption::BoundaryWall(
            option::BoundaryWall::PreCastSlabs,
        ))];

        let rate = compute(
            kind,
            &items,
            DevYear::Second,
            sqm(500.0),
            Area::ZERO,
            &rows,
        );

        assert_eq!(rate.figures.cost_per_sqm_quality, 455.5);
        assert_eq!(rate.figures.cost_per_sqm_typical, 455.5);
        assert_eq!(rate.figures.total_quality_estimate, 455.5 * 500.0);
        assert_eq!(rate.figures, rate.without_vat);
        assert!(rate.warnings.is_empty());
    }

    #[test]
    fn selects_exactly_one_band() {
        let kind = CalculatorKind::Flats;
        let rows = [
            row(Some(kind), "STOCK_BRICKS", 100.0, 200.0, 400.0),
            row(Some(kind), "PVA_PAINT", 10.0, 20.0, 40.0),
        ];
        let items = [
            item(PropertyOption::Brickwork(option::Brickwork::StockBricks)),
            item(PropertyOption::Painting(option::Painting::PvaPaint)),
        ];

        for (dev_year, expected) in [
            (DevYear::First, 110.0),
            (DevYear::Second, 220.0),
            (DevYear::Third, 440.0),
        ] {
            let rate =
                compute(kind, &items, dev_year, sqm(1.0), Area::ZERO, &rows);
            assert_eq!(
                rate.figures.cost_per_sqm_typical, expected,
                "{dev_year}",
            );
        }
    }

    #[test]
    fn missing_row_contributes_nothing() {
        let kind = CalculatorKind::Commercial;
        let rows = [row(None, "STOCK_BRICKS", 100.0, 200.0, 300.0)];
        let items = [
            item(PropertyOption::Brickwork(option::Brickwork::StockBricks)),
            item(PropertyOption::Doors(option::Doors::SteelDoors)),
        ];

        let rate = compute(
            kind,
            &items,
            DevYear::First,
            sqm(10.0),
            Area::ZERO,
            &rows,
        );

        assert_eq!(rate.figures.cost_per_sqm_typical, 100.0);
        assert_eq!(rate.figures.cost_per_sqm_quality, 100.0);
        assert_eq!(rate.figures.total_typical_estimate, 1000.0);
        assert_eq!(
            rate.warnings,
            [MissingRate {
                element: Element::Doors,
                identifier: "STEEL_DOORS",
            }],
        );
    }

    #[test]
    fn quality_scales_only_quality_figures() {
        let kind = CalculatorKind::Industrial;
        let rows = [row(None, "IBR_SHEETING", 200.0, 200.0, 200.0)];
        let mut roof = item(PropertyOption::RoofingCover(
            option::RoofingCover::IbrSheeting,
        ));
        roof.quality = QualityOfFinish::Average;

        let rate = compute(
            kind,
            &[roof.clone()],
            DevYear::Third,
            sqm(2.0),
            Area::ZERO,
            &rows,
        );
        assert_eq!(rate.figures.cost_per_sqm_typical, 200.0);
        assert_eq!(rate.figures.cost_per_sqm_quality, 200.0 * 0.8);

        roof.multiplier = Multiplier::new(1.5);
        let rate =
            compute(kind, &[roof], DevYear::Third, sqm(2.0), Area::ZERO, &rows);
        assert_eq!(rate.figures.cost_per_sqm_quality, 300.0);
        assert_eq!(rate.figures.total_quality_estimate, 600.0);
    }

    #[test]
    fn separately_charged_elements_use_their_own_area() {
        let kind = CalculatorKind::ExternalWorksResidential;
        let rows = [
            row(Some(kind), "CONCRETE_PAVERS", 50.0, 50.0, 50.0),
            row(Some(kind), "SHADE_NET_CARPORT", 30.0, 30.0, 30.0),
            row(None, "CONCRETE_VERANDA", 20.0, 20.0, 20.0),
        ];
        let mut carport =
            item(PropertyOption::CarPort(option::CarPort::ShadeNetCarPort));
        carport.area = Area::new(18.0);
        let mut items = vec![
            item(PropertyOption::Paving(option::Paving::ConcretePavers)),
            carport,
        ];

        let rate = compute(
            kind,
            &items,
            DevYear::First,
            sqm(100.0),
            sqm(12.0),
            &rows,
        );
        assert_eq!(rate.figures.cost_per_sqm_typical, 50.0);
        assert_eq!(
            rate.figures.total_typical_estimate,
            50.0 * 100.0 + 30.0 * 18.0,
        );

        items[1].area = None;
        let rate = compute(
            kind,
            &items,
            DevYear::First,
            sqm(100.0),
            sqm(12.0),
            &rows,
        );
        assert_eq!(
            rate.figures.total_typical_estimate,
            50.0 * 100.0 + 30.0 * 12.0,
        );
    }

    #[test]
    fn dormant_items_are_not_rated() {
        let kind = CalculatorKind::BoundaryWall;
        let rows = [
            row(None, "PALISADE", 40.0, 40.0, 40.0),
            row(None, "STOCK_BRICKS", 90.0, 90.0, 90.0),
        ];
        let items = [
            item(PropertyOption::BoundaryWall(option::BoundaryWall::Palisade)),
            item(PropertyOption::Brickwork(option::Brickwork::StockBricks)),
            item(PropertyOption::Painting(option::Painting::PvaPaint)),
        ];

        let rate = compute(
            kind,
            &items,
            DevYear::First,
            sqm(10.0),
            Area::ZERO,
            &rows,
        );

        assert_eq!(rate.figures.cost_per_sqm_typical, 40.0);
        assert!(rate.warnings.is_empty());
    }

    #[test]
    fn vat_keeps_figures_without_it() {
        let kind = CalculatorKind::Flats;
        let rows = [row(None, "PLASTER", 80.0, 80.0, 80.0)];
        let items =
            [item(PropertyOption::WallFinishes(option::WallFinishes::Plaster))];

        let rate = compute(
            kind,
            &items,
            DevYear::First,
            sqm(10.0),
            Area::ZERO,
            &rows,
        )
        .with_vat(Percent::from_f64(25.0).unwrap());

        assert_eq!(rate.figures.cost_per_sqm_typical, 100.0);
        assert_eq!(rate.figures.total_quality_estimate, 1000.0);
        assert_eq!(rate.without_vat.cost_per_sqm_typical, 80.0);
    }

    #[test]
    fn requires_dev_year_of_prop() {
        let prop = ConstructionProp {
            id: construction::Id::new(),
            kind: CalculatorKind::Flats,
            floor_area: sqm(1.0),
            veranda_floor_area: Area::ZERO,
            dev_year: None,
            items: vec![],
        };

        assert_eq!(
            of_prop(&prop, &[]),
            Err(ConfigurationError::MissingDevYear(prop.id)),
        );
    }
}
