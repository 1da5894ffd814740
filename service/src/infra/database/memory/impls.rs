//! [`Database`] implementations of [`Memory`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{
        construction::{self, item},
        insurance::{self, NamedValues},
        plot::{self, Outgoing, Tenant},
        year_range, CalculatorKind, ConstructionItem, ConstructionProp,
        YearRangeValue,
    },
    infra::{database, Database},
};

use super::{Memory, NonTx, State, Storage, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::begin(&self.0).await))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.0.commit().await;
        Ok(())
    }
}

impl State {
    /// Assembles the [`ConstructionProp`] with its items.
    fn prop(&self, id: construction::Id) -> Option<ConstructionProp> {
        let mut prop = self.props.iter().find(|p| p.id == id)?.clone();
        prop.items = self
            .items
            .iter()
            .filter(|i| i.prop_id == id)
            .cloned()
            .collect();
        Some(prop)
    }
}

impl<T: Storage>
    Database<Select<By<Option<ConstructionProp>, construction::Id>>>
    for Memory<T>
{
    type Ok = Option<ConstructionProp>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ConstructionProp>, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|s| s.prop(id)).await)
    }
}

impl<T: Storage> Database<Lock<By<ConstructionProp, construction::Id>>>
    for Memory<T>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<ConstructionProp, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Transactions hold the whole `State` exclusively.
        Ok(())
    }
}

impl<T: Storage> Database<Insert<ConstructionProp>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut prop): Insert<ConstructionProp>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            s.items.append(&mut prop.items);
            s.props.retain(|p| p.id != prop.id);
            s.props.push(prop);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Update<ConstructionProp>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(mut prop): Update<ConstructionProp>,
    ) -> Result<Self::Ok, Self::Err> {
        prop.items.clear();
        self.write(|s| {
            if let Some(p) = s.props.iter_mut().find(|p| p.id == prop.id) {
                *p = prop;
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Delete<By<ConstructionProp, construction::Id>>>
    for Memory<T>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<ConstructionProp, construction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            s.items.retain(|i| i.prop_id != id);
            s.props.retain(|p| p.id != id);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<Option<ConstructionItem>, item::Id>>>
    for Memory<T>
{
    type Ok = Option<ConstructionItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ConstructionItem>, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read(|s| s.items.iter().find(|i| i.id == id).cloned())
            .await)
    }
}

impl<T: Storage> Database<Insert<ConstructionItem>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<ConstructionItem>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.items.push(item))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Update<ConstructionItem>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<ConstructionItem>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if let Some(i) = s.items.iter_mut().find(|i| i.id == item.id) {
                *i = item;
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Delete<By<ConstructionItem, item::Id>>>
    for Memory<T>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<ConstructionItem, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| s.items.retain(|i| i.id != id))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage>
    Database<Select<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Memory<T>
{
    type Ok = Vec<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let kind = by.into_inner();
        Ok(self
            .read(|s| {
                s.year_range_values
                    .iter()
                    .filter(|r| r.kind == kind)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<T: Storage>
    Database<Select<By<Vec<YearRangeValue>, year_range::Applicable>>>
    for Memory<T>
{
    type Ok = Vec<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<YearRangeValue>, year_range::Applicable>>,
    ) -> Result<Self::Ok, Self::Err> {
        let scope = by.into_inner();
        Ok(self
            .read(|s| {
                s.year_range_values
                    .iter()
                    .filter(|r| scope.includes(r))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<T: Storage>
    Database<Select<By<Option<YearRangeValue>, year_range::Key>>>
    for Memory<T>
{
    type Ok = Option<YearRangeValue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<YearRangeValue>, year_range::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self
            .read(|s| {
                s.year_range_values.iter().find(|r| r.key() == key).cloned()
            })
            .await)
    }
}

impl<T: Storage>
    Database<Lock<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Memory<T>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Transactions hold the whole `State` exclusively.
        Ok(())
    }
}

impl<T: Storage>
    Database<Delete<By<Vec<YearRangeValue>, Option<CalculatorKind>>>>
    for Memory<T>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let kind = by.into_inner();
        self.write(|s| s.year_range_values.retain(|r| r.kind != kind))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Insert<Vec<YearRangeValue>>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut rows): Insert<Vec<YearRangeValue>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            s.year_range_values
                .retain(|r| rows.iter().all(|n| n.key() != r.key()));
            s.year_range_values.append(&mut rows);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<Vec<insurance::Item>, plot::Id>>>
    for Memory<T>
{
    type Ok = Vec<insurance::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<insurance::Item>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plot_id = by.into_inner();
        Ok(self
            .read(|s| {
                s.insurance_items
                    .iter()
                    .filter(|i| i.plot_id == plot_id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<T: Storage> Database<Insert<insurance::Item>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<insurance::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.insurance_items.push(item))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Update<insurance::Item>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<insurance::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if let Some(i) =
                s.insurance_items.iter_mut().find(|i| i.id == item.id)
            {
                *i = item;
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<Vec<Tenant>, plot::Id>>> for Memory<T> {
    type Ok = Vec<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Tenant>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plot_id = by.into_inner();
        Ok(self
            .read(|s| {
                s.tenants
                    .iter()
                    .filter(|t| t.plot_id == plot_id)
                    .copied()
                    .collect()
            })
            .await)
    }
}

impl<T: Storage> Database<Insert<Tenant>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(tenant): Insert<Tenant>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.tenants.push(tenant))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<Vec<Outgoing>, plot::Id>>> for Memory<T> {
    type Ok = Vec<Outgoing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Outgoing>, plot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plot_id = by.into_inner();
        Ok(self
            .read(|s| {
                s.outgoings
                    .iter()
                    .filter(|o| o.plot_id == plot_id)
                    .copied()
                    .collect()
            })
            .await)
    }
}

impl<T: Storage> Database<Insert<Outgoing>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(outgoing): Insert<Outgoing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.outgoings.push(outgoing))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Update<Outgoing>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(outgoing): Update<Outgoing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            let found = s.outgoings.iter_mut().find(|o| o.id == outgoing.id);
            if let Some(o) = found {
                *o = outgoing;
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<NamedValues, ()>>> for Memory<T> {
    type Ok = NamedValues;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<NamedValues, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.named_values.clone()).await)
    }
}

impl<T: Storage> Database<Update<NamedValues>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(values): Update<NamedValues>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.named_values = values)
            .await
            .map_err(tracerr::wrap!())
    }
}
