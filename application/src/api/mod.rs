//! GraphQL API definitions.

pub mod construction;
pub mod insurance;
mod mutation;
mod query;
pub mod scalar;
pub mod year_range;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{mutation::Mutation, query::Query};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

define_error! {
    enum ConstructionPropError {
        #[code = "CONSTRUCTION_PROP_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`ConstructionProp` with the provided ID does not exist"]
        NotExists,

        #[code = "CONSTRUCTION_ITEM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`ConstructionItem` with the provided ID does not exist"]
        ItemNotExists,
    }
}
