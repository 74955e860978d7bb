//! Planet GraphQL type

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::loaders::LoadersExt;
use crate::graphql::{to_graphql_error, to_id};
use crate::models::Planet as DbPlanet;

use super::Character;

/// Planet exposed via GraphQL
pub struct Planet {
    inner: DbPlanet,
}

impl From<DbPlanet> for Planet {
    fn from(planet: DbPlanet) -> Self {
        Self { inner: planet }
    }
}

#[Object]
impl Planet {
    /// Unique planet identifier
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn climate(&self) -> Option<&str> {
        self.inner.climate.as_deref()
    }

    async fn terrain(&self) -> Option<&str> {
        self.inner.terrain.as_deref()
    }

    /// Characters whose home planet this is (batched)
    async fn residents(&self, ctx: &Context<'_>) -> Result<Option<Vec<Character>>> {
        let residents = ctx
            .loaders()?
            .planet_residents
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(Some(residents.into_iter().map(Character::from).collect()))
    }
}
