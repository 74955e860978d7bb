//! GraphQL schema builder for the Star Wars catalog
//!
//! This module provides the schema construction for the async-graphql API.
//! Process-wide services are attached here; per-request data (caller claims
//! and the loader registry) is attached by the HTTP handler.

use async_graphql::{EmptySubscription, Schema};
use sqlx::SqlitePool;

use crate::services::CatalogService;

use super::mutation::Mutation;
use super::query::Query;

/// The Star Wars GraphQL schema type
pub type StarWarsSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema with required services
#[derive(Default)]
pub struct SchemaBuilder {
    pool: Option<SqlitePool>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database pool
    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build the schema with all configured services
    ///
    /// # Panics
    /// Panics if the database pool is not configured
    pub fn build(self) -> StarWarsSchema {
        let pool = self.pool.expect("database pool is required");

        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(CatalogService::new(pool))
            .finish()
    }
}

/// Create a new GraphQL schema over the given pool
pub fn build_schema(pool: SqlitePool) -> StarWarsSchema {
    SchemaBuilder::new().pool(pool).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_default() {
        let builder = SchemaBuilder::default();
        assert!(builder.pool.is_none());
    }

    #[tokio::test]
    async fn test_sdl_exposes_catalog_fields() {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        let sdl = build_schema(pool).sdl();

        for field in [
            "allCharacters",
            "allPlanets",
            "allStarships",
            "homePlanet",
            "pilotedStarships",
            "residents",
            "pilots",
            "assignStarship",
            "deletePlanet",
        ] {
            assert!(sdl.contains(field), "missing {field} in schema");
        }
    }
}
