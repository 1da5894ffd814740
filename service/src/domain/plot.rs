//! Plot-scoped [`Tenant`] and [`Outgoing`] definitions.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use super::Area;

/// ID of a plot.
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

/// Leaseholder of a plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: Uuid,

    /// ID of the plot this [`Tenant`] leases on.
    pub plot_id: Id,

    /// Leased [`Area`].
    pub area_per_client: Area,
}

/// Returns the total [`Area`] leased by the provided [`Tenant`]s.
#[must_use]
pub fn leased_area(tenants: &[Tenant]) -> f64 {
    tenants.iter().map(|t| t.area_per_client.sqm()).sum()
}

define_kind! {
    #[doc = "Kind of an [`Outgoing`] expense."]
    enum OutgoingKind {
        #[doc = "Insurance premium."]
        Insurance => "Insurance",

        #[doc = "Maintenance and repairs."]
        MaintenanceAndRepairs => "Maintenance and Repairs",

        #[doc = "Any other expense."]
        Other => "Other",
    }
}

impl OutgoingKind {
    /// Indicates whether [`Outgoing`]s of this kind carry the insurance
    /// reinstatement total.
    #[must_use]
    pub fn tracks_insurance(self) -> bool {
        matches!(self, Self::Insurance | Self::MaintenanceAndRepairs)
    }
}

/// Periodic expense of a plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outgoing {
    /// ID of this [`Outgoing`].
    pub id: Uuid,

    /// ID of the plot this [`Outgoing`] belongs to.
    pub plot_id: Id,

    /// [`OutgoingKind`] of this [`Outgoing`].
    pub kind: OutgoingKind,

    /// Amount of this [`Outgoing`].
    pub amount: f64,
}

#[cfg(test)]
mod spec {
    use uuid::Uuid;

    use super::{leased_area, Id, OutgoingKind, Tenant};
    use crate::domain::Area;

    #[test]
    fn sums_leased_area() {
        let plot_id = Id::new();
        let tenants = [60.0, 40.5].map(|sqm| Tenant {
            id: Uuid::new_v4(),
            plot_id,
            area_per_client: Area::new(sqm).unwrap(),
        });

        assert_eq!(leased_area(&tenants), 100.5);
        assert_eq!(leased_area(&[]), 0.0);
    }

    #[test]
    fn only_insurance_and_maintenance_track_insurance() {
        assert!(OutgoingKind::Insurance.tracks_insurance());
        assert!(OutgoingKind::MaintenanceAndRepairs.tracks_insurance());
        assert!(!OutgoingKind::Other.tracks_insurance());
        assert_eq!(
            "Maintenance and Repairs".parse(),
            Ok(OutgoingKind::MaintenanceAndRepairs),
        );
    }
}
