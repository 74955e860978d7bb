//! GraphQL schema and resolvers for the Star Wars catalog
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for planets, characters and starships
//! - Mutation resolvers for catalog writes
//! - Type definitions with batched relationship resolvers
//! - The request-scoped loaders behind those relationships

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use schema::{build_schema, SchemaBuilder, StarWarsSchema};

use async_graphql::{ErrorExtensions, ID};

use crate::error::ApiError;
use crate::models::EntityId;

/// Convert an error into a GraphQL error carrying an `extensions.code`
pub(crate) fn to_graphql_error(error: impl Into<ApiError>) -> async_graphql::Error {
    error.into().extend()
}

/// Parse a GraphQL `ID` argument into an entity id
///
/// Fails with `INVALID_KEY` before any loader or query sees the value.
pub(crate) fn parse_id(id: &ID) -> async_graphql::Result<EntityId> {
    id.parse::<EntityId>().map_err(to_graphql_error)
}

/// Render an entity id as a GraphQL `ID`
pub(crate) fn to_id(id: EntityId) -> ID {
    ID(id.to_string())
}
