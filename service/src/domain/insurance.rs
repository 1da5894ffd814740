//! Insurance reinstatement [`Total`] of a plot.

use std::collections::HashMap;

use common::{
    define_kind,
    rounding::{round, round_down},
};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use super::{
    construction,
    plot::{self, Tenant},
    rate::Rate,
};

/// Insurance line-item of a plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// ID of the plot this [`Item`] insures.
    pub plot_id: plot::Id,

    /// Description of this [`Item`].
    pub description: String,

    /// Reinstatement rate, currency per square metre.
    pub rate: f64,

    /// ID of the [`ConstructionProp`] this [`Item`] takes its rate from.
    ///
    /// [`ConstructionProp`]: super::ConstructionProp
    pub construction_prop_id: Option<construction::Id>,
}

impl Item {
    /// Takes the rate of this [`Item`] from the provided [`Rate`] of its
    /// [`ConstructionProp`].
    ///
    /// [`ConstructionProp`]: super::ConstructionProp
    pub fn refresh(&mut self, rate: &Rate) {
        self.rate = rate.figures.cost_per_sqm_quality;
    }
}

/// ID of an insurance [`Item`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Identifier of an externally configured value of the insurance \
             pipeline."]
    enum NamedValue {
        #[doc = "VAT percentage."]
        InsuranceVat => "insuranceVat",

        #[doc = "Professional fees percentage."]
        ProfFee => "profFee",

        #[doc = "Yearly escalation percentage before the tender."]
        PreTenderEscalation => "preTenderEscalation",

        #[doc = "Number of months before the tender."]
        PreTenderMonths => "preTenderMonths",

        #[doc = "Yearly escalation percentage after the tender."]
        PostTenderEscalation => "postTenderEscalation",

        #[doc = "Number of months after the tender."]
        PostTenderMonths => "postTenderMonths",
    }
}

/// Values of [`NamedValue`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedValues(HashMap<NamedValue, f64>);

impl NamedValues {
    /// Returns the value of the provided [`NamedValue`], or `0` if it's not
    /// configured.
    #[must_use]
    pub fn get(&self, name: NamedValue) -> f64 {
        self.0.get(&name).copied().unwrap_or_default()
    }

    /// Sets the value of the provided [`NamedValue`].
    pub fn set(&mut self, name: NamedValue, value: f64) {
        _ = self.0.insert(name, value);
    }
}

impl FromIterator<(NamedValue, f64)> for NamedValues {
    fn from_iter<T: IntoIterator<Item = (NamedValue, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Breakdown of the insurance reinstatement total of a plot.
///
/// Every figure is rounded to cents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Total {
    /// Rates of all the [`Item`]s over the leased area.
    pub sub_total: f64,

    /// VAT of the [`Total::sub_total`].
    pub vat: f64,

    /// Commercial property surcharge, never charged currently.
    pub com_property: f64,

    /// Professional fees.
    pub prof_fees: f64,

    /// Replacement cost, fees included.
    pub replacement_cost: f64,

    /// Escalation before the tender.
    pub pre_tender_escalation: f64,

    /// Escalation after the tender.
    pub post_tender_escalation: f64,

    /// Final total, rounded down to millions.
    pub total: f64,
}

/// Computes the insurance reinstatement [`Total`] of the provided [`Item`]s
/// over the area leased by the provided [`Tenant`]s.
#[must_use]
pub fn compute_total(
    items: &[Item],
    tenants: &[Tenant],
    values: &NamedValues,
) -> Total {
    use NamedValue as V;

    let cents = |v: f64| round(v, 2);

    let area = plot::leased_area(tenants);
    let sub_total = cents(items.iter().map(|i| i.rate * area).sum());
    let vat = cents(sub_total * values.get(V::InsuranceVat) / 100.0);
    let com_property = 0.0;
    let prof_fees = cents(
        values.get(V::ProfFee) * 0.01 * (sub_total + vat + com_property),
    );
    let replacement_cost = cents(sub_total + vat + com_property + prof_fees);
    let pre_tender_escalation = cents(
        values.get(V::PreTenderEscalation) / 100.0
            * values.get(V::PreTenderMonths)
            / 12.0
            * replacement_cost,
    );
    let post_tender_escalation = cents(
        values.get(V::PostTenderEscalation) / 100.0
            * values.get(V::PostTenderMonths)
            / 12.0
            * sub_total,
    );
    let total = round_down(
        cents(
            replacement_cost + pre_tender_escalation + post_tender_escalation,
        ),
        -6,
    );

    Total {
        sub_total,
        vat,
        com_property,
        prof_fees,
        replacement_cost,
        pre_tender_escalation,
        post_tender_escalation,
        total,
    }
}

#[cfg(test)]
mod spec {
    use uuid::Uuid;

    use super::{compute_total, Id, Item, NamedValue, NamedValues};
    use crate::domain::{
        plot::{self, Tenant},
        Area,
    };

    fn items(plot_id: plot::Id, rates: &[f64]) -> Vec<Item> {
        rates
            .iter()
            .map(|&rate| Item {
                id: Id::new(),
                plot_id,
                description: "Main building".into(),
                rate,
                construction_prop_id: None,
            })
            .collect()
    }

    fn tenants(plot_id: plot::Id, areas: &[f64]) -> Vec<Tenant> {
        areas
            .iter()
            .map(|&sqm| Tenant {
                id: Uuid::new_v4(),
                plot_id,
                area_per_client: Area::new(sqm).unwrap(),
            })
            .collect()
    }

    #[test]
    fn floors_small_totals_to_zero() {
        let plot = plot::Id::new();
        let values = NamedValues::from_iter([
            (NamedValue::InsuranceVat, 12.0),
            (NamedValue::ProfFee, 15.0),
        ]);

        let total = compute_total(
            &items(plot, &[600.0, 400.0]),
            &tenants(plot, &[60.0, 40.0]),
            &values,
        );

        assert_eq!(total.sub_total, 100_000.0);
        assert_eq!(total.vat, 12_000.0);
        assert_eq!(total.com_property, 0.0);
        assert_eq!(total.prof_fees, 16_800.0);
        assert_eq!(total.replacement_cost, 128_800.0);
        assert_eq!(total.pre_tender_escalation, 0.0);
        assert_eq!(total.post_tender_escalation, 0.0);
        assert_eq!(total.total, 0.0);
    }

    #[test]
    fn escalates_and_floors_to_millions() {
        let plot = plot::Id::new();
        let values = NamedValues::from_iter([
            (NamedValue::InsuranceVat, 12.0),
            (NamedValue::ProfFee, 15.0),
            (NamedValue::PreTenderEscalation, 10.0),
            (NamedValue::PreTenderMonths, 6.0),
            (NamedValue::PostTenderEscalation, 6.0),
            (NamedValue::PostTenderMonths, 12.0),
        ]);

        let total = compute_total(
            &items(plot, &[100_000.0]),
            &tenants(plot, &[100.0]),
            &values,
        );

        assert_eq!(total.sub_total, 10_000_000.0);
        assert_eq!(total.vat, 1_200_000.0);
        assert_eq!(total.prof_fees, 1_680_000.0);
        assert_eq!(total.replacement_cost, 12_880_000.0);
        assert_eq!(total.pre_tender_escalation, 644_000.0);
        assert_eq!(total.post_tender_escalation, 600_000.0);
        assert_eq!(total.total, 14_000_000.0);
    }

    #[test]
    fn missing_values_default_to_zero() {
        let plot = plot::Id::new();

        let total = compute_total(
            &items(plot, &[25_000.0]),
            &tenants(plot, &[120.0]),
            &NamedValues::default(),
        );

        assert_eq!(total.replacement_cost, total.sub_total);
        assert_eq!(total.total, 3_000_000.0);
    }

    #[test]
    fn no_tenants_means_nothing_to_insure() {
        let plot = plot::Id::new();
        let values =
            NamedValues::from_iter([(NamedValue::InsuranceVat, 15.0)]);

        let total = compute_total(&items(plot, &[1_000.0]), &[], &values);

        assert_eq!(total, super::Total::default());
    }
}
