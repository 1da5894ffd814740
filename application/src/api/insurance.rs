//! Insurance-related definitions.

use derive_more::{Display, From, Into};
use juniper::{GraphQLObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

/// Unique identifier of a plot.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::plot::Id)]
#[into(domain::plot::Id)]
#[graphql(name = "PlotId", transparent)]
pub struct PlotId(Uuid);

/// Breakdown of the insurance reinstatement total of a plot.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "InsuranceTotal")]
pub struct Total {
    /// Rates of all the insurance items over the leased area.
    pub sub_total: f64,

    /// VAT of the `subTotal`.
    pub vat: f64,

    /// Commercial property surcharge.
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

impl From<domain::insurance::Total> for Total {
    fn from(total: domain::insurance::Total) -> Self {
        let domain::insurance::Total {
            sub_total,
            vat,
            com_property,
            prof_fees,
            replacement_cost,
            pre_tender_escalation,
            post_tender_escalation,
            total,
        } = total;
        Self {
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
}
