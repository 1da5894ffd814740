//! Insurance-related [`Database`] implementations.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        insurance::{self, NamedValue, NamedValues},
        plot::{self, Outgoing, OutgoingKind, Tenant},
        ConfigurationError,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::construction::area;

impl<C> Database<Select<By<Vec<insurance::Item>, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<insurance::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<insurance::Item>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let plot_id: plot::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, plot_id, description, rate, construction_prop_id \
            FROM insurance_items \
            WHERE plot_id = $1::UUID \
            ORDER BY id";
        Ok(self
            .query(SQL, &[&plot_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| insurance::Item {
                id: row.get("id"),
                plot_id: row.get("plot_id"),
                description: row.get("description"),
                rate: row.get("rate"),
                construction_prop_id: row.get("construction_prop_id"),
            })
            .collect())
    }
}

impl<C> Database<Update<insurance::Item>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<insurance::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE insurance_items \
            SET description = $2::VARCHAR, \
                rate = $3::FLOAT8, \
                construction_prop_id = $4::UUID \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &item.id,
                &item.description,
                &item.rate,
                &item.construction_prop_id,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Tenant>, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Tenant>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let plot_id: plot::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, plot_id, area_per_client \
            FROM tenants \
            WHERE plot_id = $1::UUID";
        self.query(SQL, &[&plot_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                Ok(Tenant {
                    id: row.get("id"),
                    plot_id: row.get("plot_id"),
                    area_per_client: area(row, "area_per_client")?,
                })
            })
            .collect::<Result<_, ConfigurationError>>()
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C> Database<Select<By<Vec<Outgoing>, plot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Outgoing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Outgoing>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let plot_id: plot::Id = by.into_inner();
        let kinds = OutgoingKind::ALL;

        const SQL: &str = "\
            SELECT id, plot_id, kind, amount \
            FROM outgoings \
            WHERE plot_id = $1::UUID \
              AND kind = ANY($2::VARCHAR[])";
        Ok(self
            .query(SQL, &[&plot_id, &kinds])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Outgoing {
                id: row.get("id"),
                plot_id: row.get("plot_id"),
                kind: row.get("kind"),
                amount: row.get("amount"),
            })
            .collect())
    }
}

impl<C> Database<Update<Outgoing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(outgoing): Update<Outgoing>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE outgoings \
            SET kind = $2::VARCHAR, \
                amount = $3::FLOAT8 \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&outgoing.id, &outgoing.kind, &outgoing.amount])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<NamedValues, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = NamedValues;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<NamedValues, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let names = NamedValue::ALL;

        const SQL: &str = "\
            SELECT identifier, value \
            FROM named_values \
            WHERE identifier = ANY($1::VARCHAR[])";
        Ok(self
            .query(SQL, &[&names])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| (row.get("identifier"), row.get("value")))
            .collect())
    }
}
