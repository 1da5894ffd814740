//! [`YearRangeValue`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        year_range::{self, Bands, Identifier},
        CalculatorKind, ConfigurationError, YearRangeValue,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Parses a [`YearRangeValue`] out of the provided [`Row`].
fn from_row(row: &Row) -> Result<YearRangeValue, ConfigurationError> {
    Ok(YearRangeValue {
        kind: row
            .get::<_, Option<&str>>("kind")
            .map(CalculatorKind::parse)
            .transpose()?,
        identifier: row.get("identifier"),
        bands: Bands {
            first: row.get("first"),
            second: row.get("second"),
            third: row.get("third"),
        },
    })
}

impl<C> Database<Select<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let kind: Option<CalculatorKind> = by.into_inner();

        const SQL: &str = "\
            SELECT kind, identifier, first, second, third \
            FROM year_range_values \
            WHERE kind IS NOT DISTINCT FROM $1::VARCHAR \
            ORDER BY identifier";
        self.query(SQL, &[&kind])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Select<By<Vec<YearRangeValue>, year_range::Applicable>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<YearRangeValue>, year_range::Applicable>>,
    ) -> Result<Self::Ok, Self::Err> {
        let year_range::Applicable { kind, bulk } = by.into_inner();

        const SQL: &str = "\
            SELECT kind, identifier, first, second, third \
            FROM year_range_values \
            WHERE kind IS NULL \
               OR (NOT $2::BOOL AND kind = $1::VARCHAR) \
            ORDER BY identifier";
        self.query(SQL, &[&kind, &bulk])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Select<By<Option<YearRangeValue>, year_range::Key>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<YearRangeValue>, year_range::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let year_range::Key { kind, identifier } = by.into_inner();

        const SQL: &str = "\
            SELECT kind, identifier, first, second, third \
            FROM year_range_values \
            WHERE kind IS NOT DISTINCT FROM $1::VARCHAR \
              AND identifier = $2::VARCHAR \
            LIMIT 1";
        self.query_opt(SQL, &[&kind, &identifier])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Lock<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Global rows are locked under an empty key.
        let key = by.into_inner().map_or("", CalculatorKind::as_str);

        const SQL: &str = "\
            SELECT pg_advisory_xact_lock(\
                hashtext('year_range_values:' || $1::VARCHAR)\
            )";
        self.query(SQL, &[&key])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let kind: Option<CalculatorKind> = by.into_inner();

        const SQL: &str = "\
            DELETE FROM year_range_values \
            WHERE kind IS NOT DISTINCT FROM $1::VARCHAR";
        self.exec(SQL, &[&kind])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Vec<YearRangeValue>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rows): Insert<Vec<YearRangeValue>>,
    ) -> Result<Self::Ok, Self::Err> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut kinds = Vec::with_capacity(rows.len());
        let mut identifiers = Vec::with_capacity(rows.len());
        let mut firsts = Vec::with_capacity(rows.len());
        let mut seconds = Vec::with_capacity(rows.len());
        let mut thirds = Vec::with_capacity(rows.len());
        for row in &rows {
            kinds.push(row.kind.map(CalculatorKind::as_str));
            identifiers.push(row.identifier.as_str());
            firsts.push(row.bands.first);
            seconds.push(row.bands.second);
            thirds.push(row.bands.third);
        }

        const SQL: &str = "\
            INSERT INTO year_range_values (\
                kind, identifier, first, second, third\
            ) \
            SELECT * FROM UNNEST(\
                $1::VARCHAR[], $2::VARCHAR[], \
                $3::FLOAT8[], $4::FLOAT8[], $5::FLOAT8[]\
            ) \
            ON CONFLICT ((COALESCE(kind, '')), identifier) DO UPDATE \
            SET first = EXCLUDED.first, \
                second = EXCLUDED.second, \
                third = EXCLUDED.third";
        self.exec(SQL, &[&kinds, &identifiers, &firsts, &seconds, &thirds])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
