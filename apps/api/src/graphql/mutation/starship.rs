//! Starship mutations

use async_graphql::{Context, InputObject, Object, Result, ID};

use crate::graphql::loaders::{Loaders, LoadersExt};
use crate::graphql::types::Starship;
use crate::graphql::{parse_id, to_graphql_error};
use crate::models::{CreateStarship, EntityId, UpdateStarship};
use crate::services::CatalogService;

use super::require_auth;

#[derive(Debug, Clone, InputObject)]
pub struct CreateStarshipInput {
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
}

/// Omitted or null fields keep their stored value
#[derive(Debug, Clone, InputObject)]
pub struct UpdateStarshipInput {
    pub id: ID,
    pub name: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
}

/// Pilot ids of a starship as currently seen by the loaders
async fn pilot_ids(loaders: &Loaders, id: EntityId) -> Vec<EntityId> {
    loaders
        .starship_pilots
        .load(id)
        .await
        .map(|pilots| pilots.into_iter().map(|pilot| pilot.id).collect())
        .unwrap_or_else(|e| {
            tracing::warn!(
                starship_id = %id,
                error = %e,
                "Could not read pilots before write"
            );
            Vec::new()
        })
}

fn clear_starship(loaders: &Loaders, id: EntityId, pilots: &[EntityId]) {
    loaders.starships.clear(&id);
    loaders.starship_pilots.clear(&id);
    for pilot_id in pilots {
        loaders.character_starships.clear(pilot_id);
    }
}

#[derive(Default)]
pub struct StarshipMutation;

#[Object]
impl StarshipMutation {
    async fn create_starship(
        &self,
        ctx: &Context<'_>,
        input: CreateStarshipInput,
    ) -> Result<Starship> {
        require_auth(ctx)?;
        let service = ctx.data::<CatalogService>()?;

        let starship = service
            .create_starship(CreateStarship {
                name: input.name,
                model: input.model,
                manufacturer: input.manufacturer,
            })
            .await
            .map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.starships.clear(&starship.id);
        }
        Ok(starship.into())
    }

    async fn update_starship(
        &self,
        ctx: &Context<'_>,
        input: UpdateStarshipInput,
    ) -> Result<Starship> {
        require_auth(ctx)?;
        let id = parse_id(&input.id)?;
        let service = ctx.data::<CatalogService>()?;

        let loaders = ctx.loaders().ok();
        let pilots = match loaders {
            Some(loaders) => pilot_ids(loaders, id).await,
            None => Vec::new(),
        };

        let starship = service
            .update_starship(
                id,
                UpdateStarship {
                    name: input.name,
                    model: input.model,
                    manufacturer: input.manufacturer,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        if let Some(loaders) = loaders {
            clear_starship(loaders, id, &pilots);
        }
        Ok(starship.into())
    }

    /// Returns true once the starship and its piloting records are gone
    async fn delete_starship(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_auth(ctx)?;
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;

        let loaders = ctx.loaders().ok();
        let pilots = match loaders {
            Some(loaders) => pilot_ids(loaders, id).await,
            None => Vec::new(),
        };

        service.delete_starship(id).await.map_err(to_graphql_error)?;

        if let Some(loaders) = loaders {
            clear_starship(loaders, id, &pilots);
        }
        Ok(true)
    }
}
