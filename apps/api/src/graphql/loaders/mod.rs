//! Batched loaders for GraphQL relationship fields
//!
//! This module provides the loaders that solve N+1 query problems in the
//! relationship resolvers. Each loader batches the keys requested during one
//! accumulation window into a single database query and caches the results
//! for the rest of the request.
//!
//! There are two types of loaders:
//! - Single-entity loaders: resolve to `Option<T>` for a single entity by ID
//! - Collection loaders: resolve to `Vec<T>` for related entities by parent ID,
//!   an empty list when there are none
//!
//! Loaders are request-scoped. The GraphQL handler attaches a fresh
//! [`LoaderRegistry`] to every request with [`attach_loaders`], and resolvers
//! reach the shared instances through [`LoadersExt::loaders`].

mod batch;
mod character;
mod character_starships;
mod list;
mod planet;
mod planet_residents;
mod starship;
mod starship_pilots;

pub use batch::{BatchConfig, BatchFn, BatchLoader, LoadResult, LoaderError};
pub use character::CharacterLoader;
pub use character_starships::CharacterStarshipsLoader;
pub use list::{group_rows, ListLoader};
pub use planet::PlanetLoader;
pub use planet_residents::PlanetResidentsLoader;
pub use starship::StarshipLoader;
pub use starship_pilots::StarshipPilotsLoader;

use std::sync::{Arc, OnceLock};

use async_graphql::Context;
use sqlx::SqlitePool;

use crate::repositories::{CharacterRepository, PlanetRepository, StarshipRepository};

/// The six loaders shared by every resolver of one request
#[derive(Clone)]
pub struct Loaders {
    pub planets: BatchLoader<PlanetLoader>,
    pub characters: BatchLoader<CharacterLoader>,
    pub starships: BatchLoader<StarshipLoader>,
    pub character_starships: ListLoader<CharacterStarshipsLoader>,
    pub planet_residents: ListLoader<PlanetResidentsLoader>,
    pub starship_pilots: ListLoader<StarshipPilotsLoader>,
}

impl Loaders {
    /// Create all loaders over one connection pool
    pub fn new(pool: SqlitePool, config: BatchConfig) -> Self {
        let planets = PlanetRepository::new(pool.clone());
        let characters = CharacterRepository::new(pool.clone());
        let starships = StarshipRepository::new(pool);

        Self {
            planets: BatchLoader::with_config(PlanetLoader::new(planets), config),
            characters: BatchLoader::with_config(CharacterLoader::new(characters.clone()), config),
            starships: BatchLoader::with_config(StarshipLoader::new(starships.clone()), config),
            character_starships: ListLoader::with_config(
                CharacterStarshipsLoader::new(starships),
                config,
            ),
            planet_residents: ListLoader::with_config(
                PlanetResidentsLoader::new(characters.clone()),
                config,
            ),
            starship_pilots: ListLoader::with_config(StarshipPilotsLoader::new(characters), config),
        }
    }
}

/// Request-scoped holder that builds [`Loaders`] on first use
///
/// One registry is created per incoming request; it is never shared between
/// requests, so neither are pending windows or caches. Clones refer to the
/// same loaders.
#[derive(Clone)]
pub struct LoaderRegistry {
    pool: SqlitePool,
    config: BatchConfig,
    loaders: Arc<OnceLock<Loaders>>,
}

impl LoaderRegistry {
    pub fn new(pool: SqlitePool, config: BatchConfig) -> Self {
        Self {
            pool,
            config,
            loaders: Arc::new(OnceLock::new()),
        }
    }

    /// The loaders of this request, created by the first caller
    pub fn loaders(&self) -> &Loaders {
        self.loaders
            .get_or_init(|| Loaders::new(self.pool.clone(), self.config))
    }
}

/// Attach a fresh [`LoaderRegistry`] to a GraphQL request
pub fn attach_loaders(
    request: async_graphql::Request,
    pool: &SqlitePool,
    config: BatchConfig,
) -> async_graphql::Request {
    request.data(LoaderRegistry::new(pool.clone(), config))
}

/// Access to the request's loaders from a resolver context
pub trait LoadersExt {
    fn loaders(&self) -> async_graphql::Result<&Loaders>;
}

impl LoadersExt for Context<'_> {
    fn loaders(&self) -> async_graphql::Result<&Loaders> {
        Ok(self.data::<LoaderRegistry>()?.loaders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy_pool() -> SqlitePool {
        SqlitePool::connect_lazy("sqlite::memory:").unwrap()
    }

    #[tokio::test]
    async fn test_registry_returns_same_instances() {
        let registry = LoaderRegistry::new(lazy_pool(), BatchConfig::default());

        let first = registry.loaders();
        let second = registry.loaders();

        assert!(std::ptr::eq(first, second));
    }

    #[tokio::test]
    async fn test_registry_is_built_lazily() {
        let registry = LoaderRegistry::new(lazy_pool(), BatchConfig::default());
        assert!(registry.loaders.get().is_none());

        registry.loaders();
        assert!(registry.loaders.get().is_some());
    }

    #[tokio::test]
    async fn test_registry_is_shared_across_threads() {
        let registry = Arc::new(LoaderRegistry::new(lazy_pool(), BatchConfig::default()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.loaders() as *const Loaders as usize })
            })
            .collect();

        let mut addresses = Vec::new();
        for handle in handles {
            addresses.push(handle.await.unwrap());
        }
        addresses.dedup();
        assert_eq!(addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_registry_clones_share_loaders() {
        let registry = LoaderRegistry::new(lazy_pool(), BatchConfig::default());
        let attached = registry.clone();

        assert!(std::ptr::eq(registry.loaders(), attached.loaders()));
    }
}
