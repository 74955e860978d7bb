//! Character mutations
//!
//! - createCharacter / updateCharacter / deleteCharacter
//! - assignStarship: Record that a character pilots a starship

use async_graphql::{Context, InputObject, Object, Result, ID};

use crate::graphql::loaders::{Loaders, LoadersExt};
use crate::graphql::types::Character;
use crate::graphql::{parse_id, to_graphql_error};
use crate::models::{CreateCharacter, EntityId, UpdateCharacter};
use crate::services::CatalogService;

use super::require_auth;

#[derive(Debug, Clone, InputObject)]
pub struct CreateCharacterInput {
    pub name: String,
    pub species: Option<String>,
    pub home_planet_id: Option<ID>,
}

/// Omitted or null fields keep their stored value
#[derive(Debug, Clone, InputObject)]
pub struct UpdateCharacterInput {
    pub id: ID,
    pub name: Option<String>,
    pub species: Option<String>,
    pub home_planet_id: Option<ID>,
}

#[derive(Debug, Clone, InputObject)]
pub struct AssignStarshipInput {
    pub character_id: ID,
    pub starship_id: ID,
}

/// Loader keys whose cached values mention a character
#[derive(Debug, Default)]
struct CharacterLinks {
    home_planet: Option<EntityId>,
    starships: Vec<EntityId>,
}

impl CharacterLinks {
    /// Read the links through the loaders; failures are logged and leave them empty
    async fn lookup(loaders: &Loaders, id: EntityId) -> Self {
        let home_planet = loaders
            .characters
            .load(id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    character_id = %id,
                    error = %e,
                    "Could not read character before write"
                );
                None
            })
            .and_then(|character| character.home_planet_id);
        let starships = loaders
            .character_starships
            .load(id)
            .await
            .map(|ships| ships.into_iter().map(|ship| ship.id).collect())
            .unwrap_or_else(|e| {
                tracing::warn!(
                    character_id = %id,
                    error = %e,
                    "Could not read piloted starships before write"
                );
                Vec::new()
            });

        Self {
            home_planet,
            starships,
        }
    }

    fn clear(&self, loaders: &Loaders, id: EntityId) {
        loaders.characters.clear(&id);
        loaders.character_starships.clear(&id);
        if let Some(planet_id) = self.home_planet {
            loaders.planet_residents.clear(&planet_id);
        }
        for starship_id in &self.starships {
            loaders.starship_pilots.clear(starship_id);
        }
    }
}

fn parse_optional_id(id: Option<&ID>) -> Result<Option<EntityId>> {
    id.map(parse_id).transpose()
}

#[derive(Default)]
pub struct CharacterMutation;

#[Object]
impl CharacterMutation {
    async fn create_character(
        &self,
        ctx: &Context<'_>,
        input: CreateCharacterInput,
    ) -> Result<Character> {
        require_auth(ctx)?;
        let home_planet_id = parse_optional_id(input.home_planet_id.as_ref())?;
        let service = ctx.data::<CatalogService>()?;

        let character = service
            .create_character(CreateCharacter {
                name: input.name,
                species: input.species,
                home_planet_id,
            })
            .await
            .map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.characters.clear(&character.id);
            if let Some(planet_id) = character.home_planet_id {
                loaders.planet_residents.clear(&planet_id);
            }
        }
        Ok(character.into())
    }

    async fn update_character(
        &self,
        ctx: &Context<'_>,
        input: UpdateCharacterInput,
    ) -> Result<Character> {
        require_auth(ctx)?;
        let id = parse_id(&input.id)?;
        let home_planet_id = parse_optional_id(input.home_planet_id.as_ref())?;
        let service = ctx.data::<CatalogService>()?;

        let loaders = ctx.loaders().ok();
        let links = match loaders {
            Some(loaders) => CharacterLinks::lookup(loaders, id).await,
            None => CharacterLinks::default(),
        };

        let character = service
            .update_character(
                id,
                UpdateCharacter {
                    name: input.name,
                    species: input.species,
                    home_planet_id,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        if let Some(loaders) = loaders {
            links.clear(loaders, id);
            if let Some(planet_id) = character.home_planet_id {
                loaders.planet_residents.clear(&planet_id);
            }
        }
        Ok(character.into())
    }

    /// Returns true once the character and its piloting records are gone
    async fn delete_character(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_auth(ctx)?;
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;

        let loaders = ctx.loaders().ok();
        let links = match loaders {
            Some(loaders) => CharacterLinks::lookup(loaders, id).await,
            None => CharacterLinks::default(),
        };

        service.delete_character(id).await.map_err(to_graphql_error)?;

        if let Some(loaders) = loaders {
            links.clear(loaders, id);
        }
        Ok(true)
    }

    /// Assigning a pair that already exists is a no-op
    async fn assign_starship(
        &self,
        ctx: &Context<'_>,
        input: AssignStarshipInput,
    ) -> Result<Character> {
        require_auth(ctx)?;
        let character_id = parse_id(&input.character_id)?;
        let starship_id = parse_id(&input.starship_id)?;
        let service = ctx.data::<CatalogService>()?;

        let character = service
            .assign_starship(character_id, starship_id)
            .await
            .map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.character_starships.clear(&character_id);
            loaders.starship_pilots.clear(&starship_id);
        }
        Ok(character.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use tracing_test::traced_test;

    use crate::graphql::loaders::BatchConfig;

    #[tokio::test]
    #[traced_test]
    async fn test_failed_link_lookup_is_logged() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        sqlx::query("DROP TABLE character_starships")
            .execute(&pool)
            .await
            .unwrap();

        let loaders = Loaders::new(pool, BatchConfig::default());
        let links = CharacterLinks::lookup(&loaders, EntityId::new(1)).await;

        assert!(links.home_planet.is_none());
        assert!(links.starships.is_empty());
        assert!(logs_contain("Could not read piloted starships before write"));
        assert!(!logs_contain("Could not read character before write"));
    }
}
