//! Character GraphQL type

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::loaders::LoadersExt;
use crate::graphql::{to_graphql_error, to_id};
use crate::models::Character as DbCharacter;

use super::{Planet, Starship};

/// Character exposed via GraphQL
pub struct Character {
    inner: DbCharacter,
}

impl From<DbCharacter> for Character {
    fn from(character: DbCharacter) -> Self {
        Self { inner: character }
    }
}

#[Object]
impl Character {
    /// Unique character identifier
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn species(&self) -> Option<&str> {
        self.inner.species.as_deref()
    }

    /// Home planet, if any (batched)
    async fn home_planet(&self, ctx: &Context<'_>) -> Result<Option<Planet>> {
        let Some(planet_id) = self.inner.home_planet_id else {
            return Ok(None);
        };

        let planet = ctx
            .loaders()?
            .planets
            .load(planet_id)
            .await
            .map_err(to_graphql_error)?;
        Ok(planet.map(Planet::from))
    }

    /// Starships this character pilots (batched)
    async fn piloted_starships(&self, ctx: &Context<'_>) -> Result<Option<Vec<Starship>>> {
        let starships = ctx
            .loaders()?
            .character_starships
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(Some(starships.into_iter().map(Starship::from).collect()))
    }
}
