//! Planet queries

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::types::Planet;
use crate::graphql::{parse_id, to_graphql_error};
use crate::services::CatalogService;

#[derive(Default)]
pub struct PlanetQuery;

#[Object]
impl PlanetQuery {
    /// List every planet ordered by id
    async fn all_planets(&self, ctx: &Context<'_>) -> Result<Vec<Planet>> {
        let service = ctx.data::<CatalogService>()?;
        let planets = service.list_planets().await.map_err(to_graphql_error)?;
        Ok(planets.into_iter().map(Planet::from).collect())
    }

    /// Get a planet by ID
    async fn planet(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Planet>> {
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;
        let planet = service.get_planet(id).await.map_err(to_graphql_error)?;
        Ok(planet.map(Planet::from))
    }
}
