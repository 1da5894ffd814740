//! [`YearRangeValue`] reference rates and their in-memory [`RateTable`].

use std::collections::HashMap;

use derive_more::{AsRef, Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{CalculatorKind, DevYear};

/// Reference row holding a unit rate per vintage band.
#[derive(Clone, Debug, PartialEq)]
pub struct YearRangeValue {
    /// [`CalculatorKind`] this row applies to, or [`None`] for a global row.
    pub kind: Option<CalculatorKind>,

    /// [`Identifier`] of the option this row rates.
    pub identifier: Identifier,

    /// Unit rates of this row.
    pub bands: Bands,
}

/// Unique key of a [`YearRangeValue`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// [`CalculatorKind`] of the row, or [`None`] for a global row.
    pub kind: Option<CalculatorKind>,

    /// [`Identifier`] of the row.
    pub identifier: Identifier,
}

impl YearRangeValue {
    /// Returns the [`Key`] of this [`YearRangeValue`].
    #[must_use]
    pub fn key(&self) -> Key {
        Key {
            kind: self.kind,
            identifier: self.identifier.clone(),
        }
    }
}

/// Selector of the [`YearRangeValue`]s applicable to a [`CalculatorKind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Applicable {
    /// [`CalculatorKind`] to select the rows for.
    pub kind: CalculatorKind,

    /// Whether only global rows are applicable.
    pub bulk: bool,
}

impl Applicable {
    /// Indicates whether the provided [`YearRangeValue`] is applicable.
    #[must_use]
    pub fn includes(self, row: &YearRangeValue) -> bool {
        match row.kind {
            None => true,
            Some(kind) => !self.bulk && kind == self.kind,
        }
    }
}

/// Identifier of a rated option, as extracted from the reference
/// spreadsheets.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new [`Identifier`] if the provided one is not blank.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        (!id.is_empty() && id.len() <= 128).then(|| Self(id.to_owned()))
    }

    /// Returns this [`Identifier`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Currency per square metre rates, one per [`DevYear`] band.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bands {
    /// Rate of the [`DevYear::First`] band.
    pub first: f64,

    /// Rate of the [`DevYear::Second`] band.
    pub second: f64,

    /// Rate of the [`DevYear::Third`] band.
    pub third: f64,
}

impl Bands {
    /// Selects exactly the rate of the provided [`DevYear`] band.
    #[must_use]
    pub fn select(self, dev_year: DevYear) -> f64 {
        match dev_year {
            DevYear::First => self.first,
            DevYear::Second => self.second,
            DevYear::Third => self.third,
        }
    }
}

/// [`YearRangeValue`]s applicable to a [`CalculatorKind`], indexed by their
/// [`Identifier`]s.
///
/// Rows of the [`CalculatorKind`] take precedence over global rows with the
/// same [`Identifier`].
#[derive(Clone, Debug, Default)]
pub struct RateTable {
    /// [`Bands`] by their [`Identifier`]s.
    rows: HashMap<String, Bands>,
}

impl RateTable {
    /// Builds a [`RateTable`] for the provided [`CalculatorKind`] out of the
    /// provided rows, ignoring the ones of other [`CalculatorKind`]s.
    #[must_use]
    pub fn new<'r>(
        kind: CalculatorKind,
        rows: impl IntoIterator<Item = &'r YearRangeValue>,
    ) -> Self {
        let mut global = HashMap::new();
        let mut own = HashMap::new();
        for row in rows {
            let id = row.identifier.as_str().to_owned();
            match row.kind {
                None => {
                    _ = global.insert(id, row.bands);
                }
                Some(k) if k == kind => {
                    _ = own.insert(id, row.bands);
                }
                Some(_) => {}
            }
        }
        global.extend(own);
        Self { rows: global }
    }

    /// Finds the [`Bands`] of the provided identifier.
    #[must_use]
    pub fn find(&self, identifier: &str) -> Option<Bands> {
        self.rows.get(identifier).copied()
    }
}

#[cfg(test)]
mod spec {
    use super::{Applicable, Bands, Identifier, RateTable, YearRangeValue};
    use crate::domain::{CalculatorKind, DevYear};

    fn row(kind: Option<CalculatorKind>, id: &str, r: f64) -> YearRangeValue {
        YearRangeValue {
            kind,
            identifier: Identifier::new(id).unwrap(),
            bands: Bands {
                first: r,
                second: r * 2.0,
                third: r * 3.0,
            },
        }
    }

    #[test]
    fn selects_single_band() {
        let bands = Bands {
            first: 10.0,
            second: 20.0,
            third: 30.0,
        };
        assert_eq!(bands.select(DevYear::First), 10.0);
        assert_eq!(bands.select(DevYear::Second), 20.0);
        assert_eq!(bands.select(DevYear::Third), 30.0);
    }

    #[test]
    fn kind_rows_override_global_ones() {
        let rows = [
            row(None, "PALISADE", 1.0),
            row(Some(CalculatorKind::BoundaryWall), "PALISADE", 5.0),
            row(None, "GRAVEL", 7.0),
            row(Some(CalculatorKind::Commercial), "STOCK_BRICKS", 9.0),
        ];
        let table = RateTable::new(CalculatorKind::BoundaryWall, &rows);

        assert_eq!(table.find("PALISADE").map(|b| b.first), Some(5.0));
        assert_eq!(table.find("GRAVEL").map(|b| b.first), Some(7.0));
        assert_eq!(table.find("STOCK_BRICKS"), None);
    }

    #[test]
    fn bulk_applies_only_global_rows() {
        let own = row(Some(CalculatorKind::Flats), "PLASTER", 1.0);
        let global = row(None, "PLASTER", 2.0);
        let other = row(Some(CalculatorKind::Commercial), "PLASTER", 3.0);

        let scope = Applicable {
            kind: CalculatorKind::Flats,
            bulk: false,
        };
        assert!(scope.includes(&own));
        assert!(scope.includes(&global));
        assert!(!scope.includes(&other));

        let bulk = Applicable { bulk: true, ..scope };
        assert!(!bulk.includes(&own));
        assert!(bulk.includes(&global));
    }

    #[test]
    fn identifier_is_trimmed_and_not_blank() {
        assert_eq!(
            Identifier::new("  PRE_CAST_SLABS ").unwrap().as_str(),
            "PRE_CAST_SLABS",
        );
        assert!(Identifier::new("   ").is_none());
    }
}
