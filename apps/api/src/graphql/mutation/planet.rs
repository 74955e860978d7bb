//! Planet mutations
//!
//! - createPlanet: Add a planet
//! - updatePlanet: Partially update a planet
//! - deletePlanet: Delete a planet that has no residents

use async_graphql::{Context, InputObject, Object, Result, ID};

use crate::graphql::loaders::LoadersExt;
use crate::graphql::types::Planet;
use crate::graphql::{parse_id, to_graphql_error};
use crate::models::{CreatePlanet, UpdatePlanet};
use crate::services::CatalogService;

use super::require_auth;

#[derive(Debug, Clone, InputObject)]
pub struct CreatePlanetInput {
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

/// Omitted or null fields keep their stored value
#[derive(Debug, Clone, InputObject)]
pub struct UpdatePlanetInput {
    pub id: ID,
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

#[derive(Default)]
pub struct PlanetMutation;

#[Object]
impl PlanetMutation {
    async fn create_planet(&self, ctx: &Context<'_>, input: CreatePlanetInput) -> Result<Planet> {
        require_auth(ctx)?;
        let service = ctx.data::<CatalogService>()?;

        let planet = service
            .create_planet(CreatePlanet {
                name: input.name,
                climate: input.climate,
                terrain: input.terrain,
            })
            .await
            .map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.planets.clear(&planet.id);
        }
        Ok(planet.into())
    }

    async fn update_planet(&self, ctx: &Context<'_>, input: UpdatePlanetInput) -> Result<Planet> {
        require_auth(ctx)?;
        let id = parse_id(&input.id)?;
        let service = ctx.data::<CatalogService>()?;

        let planet = service
            .update_planet(
                id,
                UpdatePlanet {
                    name: input.name,
                    climate: input.climate,
                    terrain: input.terrain,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.planets.clear(&id);
        }
        Ok(planet.into())
    }

    /// Returns true once the planet is gone
    async fn delete_planet(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_auth(ctx)?;
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;

        service.delete_planet(id).await.map_err(to_graphql_error)?;

        if let Ok(loaders) = ctx.loaders() {
            loaders.planets.clear(&id);
            loaders.planet_residents.clear(&id);
        }
        Ok(true)
    }
}
