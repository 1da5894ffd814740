//! [`ConstructionProp`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        construction::{self, item},
        Area, CalculatorKind, ConfigurationError, ConstructionItem,
        ConstructionProp, DevYear, Element, Multiplier, PropertyOption,
        QualityOfFinish,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Parses a [`ConstructionProp`] without items out of the provided [`Row`].
fn prop_from_row(row: &Row) -> Result<ConstructionProp, ConfigurationError> {
    Ok(ConstructionProp {
        id: row.get("id"),
        kind: CalculatorKind::parse(row.get("kind"))?,
        floor_area: area(row, "floor_area")?,
        veranda_floor_area: area(row, "veranda_floor_area")?,
        dev_year: row
            .get::<_, Option<&str>>("dev_year")
            .map(DevYear::parse)
            .transpose()?,
        items: vec![],
    })
}

/// Parses a [`ConstructionItem`] out of the provided [`Row`].
fn item_from_row(row: &Row) -> Result<ConstructionItem, ConfigurationError> {
    let element = Element::parse(row.get("element"))?;
    Ok(ConstructionItem {
        id: row.get("id"),
        prop_id: row.get("prop_id"),
        option: PropertyOption::parse(element, row.get("property_option"))?,
        quality: QualityOfFinish::parse(row.get("quality"))?,
        multiplier: row
            .get::<_, Option<f64>>("multiplier")
            .map(checked_multiplier)
            .transpose()?,
        area: row
            .get::<_, Option<f64>>("area")
            .map(|value| checked_area("area", value))
            .transpose()?,
    })
}

/// Reads a non-negative [`Area`] column of the provided [`Row`].
pub(super) fn area(
    row: &Row,
    column: &'static str,
) -> Result<Area, ConfigurationError> {
    checked_area(column, row.get(column))
}

/// Checks the `value` stored in the provided `column` is a valid [`Area`].
fn checked_area(
    column: &'static str,
    value: f64,
) -> Result<Area, ConfigurationError> {
    Area::new(value)
        .ok_or(ConfigurationError::NegativeArea { column, value })
}

/// Checks the stored `value` is a valid [`Multiplier`].
fn checked_multiplier(value: f64) -> Result<Multiplier, ConfigurationError> {
    Multiplier::new(value).ok_or(ConfigurationError::InvalidMultiplier(value))
}

impl<C> Database<Select<By<Option<ConstructionProp>, construction::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<ConstructionProp>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ConstructionProp>, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: construction::Id = by.into_inner();

        const PROP_SQL: &str = "\
            SELECT id, kind, floor_area, veranda_floor_area, dev_year \
            FROM construction_props \
            WHERE id = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(PROP_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };
        let mut prop = prop_from_row(&row)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        const ITEMS_SQL: &str = "\
            SELECT id, prop_id, element, property_option, quality, \
                   multiplier, area \
            FROM construction_items \
            WHERE prop_id = $1::UUID \
            ORDER BY seq";
        prop.items = self
            .query(ITEMS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(item_from_row)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        Ok(Some(prop))
    }
}

impl<C> Database<Lock<By<ConstructionProp, construction::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<ConstructionProp, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: construction::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM construction_props \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<ConstructionProp>> for Postgres<C>
where
    C: Connection,
    Self: Database<
            Update<ConstructionProp>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Insert<ConstructionItem>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut prop): Insert<ConstructionProp>,
    ) -> Result<Self::Ok, Self::Err> {
        let items = std::mem::take(&mut prop.items);

        self.execute(Update(prop)).await.map_err(tracerr::wrap!())?;
        for item in items {
            self.execute(Insert(item)).await.map_err(tracerr::wrap!())?;
        }
        Ok(())
    }
}

impl<C> Database<Update<ConstructionProp>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(prop): Update<ConstructionProp>,
    ) -> Result<Self::Ok, Self::Err> {
        let ConstructionProp {
            id,
            kind,
            floor_area,
            veranda_floor_area,
            dev_year,
            items: _,
        } = prop;

        let floor_area = floor_area.sqm();
        let veranda_floor_area = veranda_floor_area.sqm();

        const SQL: &str = "\
            INSERT INTO construction_props (\
                id, kind, floor_area, veranda_floor_area, dev_year\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::FLOAT8, $4::FLOAT8, $5::VARCHAR\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET kind = EXCLUDED.kind, \
                floor_area = EXCLUDED.floor_area, \
                veranda_floor_area = EXCLUDED.veranda_floor_area, \
                dev_year = EXCLUDED.dev_year";
        self.exec(
            SQL,
            &[&id, &kind, &floor_area, &veranda_floor_area, &dev_year],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<ConstructionProp, construction::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<ConstructionProp, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: construction::Id = by.into_inner();

        // Items are removed by `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM construction_props \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<ConstructionItem>, item::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<ConstructionItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ConstructionItem>, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: item::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, prop_id, element, property_option, quality, \
                   multiplier, area \
            FROM construction_items \
            WHERE id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(item_from_row)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Insert<ConstructionItem>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<ConstructionItem>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<ConstructionItem>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(item)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<ConstructionItem>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<ConstructionItem>,
    ) -> Result<Self::Ok, Self::Err> {
        let ConstructionItem {
            id,
            prop_id,
            option,
            quality,
            multiplier,
            area,
        } = item;

        let element = option.element();
        let option = option.identifier();
        let multiplier = multiplier.map(Multiplier::get);
        let area = area.map(Area::sqm);

        const SQL: &str = "\
            INSERT INTO construction_items (\
                id, prop_id, element, property_option, quality, \
                multiplier, area\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::FLOAT8, $7::FLOAT8\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET element = EXCLUDED.element, \
                property_option = EXCLUDED.property_option, \
                quality = EXCLUDED.quality, \
                multiplier = EXCLUDED.multiplier, \
                area = EXCLUDED.area";
        self.exec(
            SQL,
            &[
                &id,
                &prop_id,
                &element,
                &option,
                &quality,
                &multiplier,
                &area,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<ConstructionItem, item::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<ConstructionItem, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: item::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM construction_items \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{Area, ConfigurationError, Multiplier};

    use super::{checked_area, checked_multiplier};

    #[test]
    fn rejects_invalid_stored_multiplier() {
        assert_eq!(
            checked_multiplier(1.25),
            Ok(Multiplier::new(1.25).unwrap()),
        );
        assert!(matches!(
            checked_multiplier(f64::NAN),
            Err(ConfigurationError::InvalidMultiplier(v)) if v.is_nan(),
        ));
        assert_eq!(
            checked_multiplier(-0.5),
            Err(ConfigurationError::InvalidMultiplier(-0.5)),
        );
    }

    #[test]
    fn rejects_negative_stored_area() {
        assert_eq!(checked_area("area", 3.0), Ok(Area::new(3.0).unwrap()));
        assert_eq!(
            checked_area("floor_area", -1.0),
            Err(ConfigurationError::NegativeArea {
                column: "floor_area",
                value: -1.0,
            }),
        );
    }
}
