//! Starship queries

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::types::Starship;
use crate::graphql::{parse_id, to_graphql_error};
use crate::services::CatalogService;

#[derive(Default)]
pub struct StarshipQuery;

#[Object]
impl StarshipQuery {
    /// List every starship ordered by id
    async fn all_starships(&self, ctx: &Context<'_>) -> Result<Vec<Starship>> {
        let service = ctx.data::<CatalogService>()?;
        let starships = service.list_starships().await.map_err(to_graphql_error)?;
        Ok(starships.into_iter().map(Starship::from).collect())
    }

    /// Get a starship by ID
    async fn starship(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Starship>> {
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;
        let starship = service.get_starship(id).await.map_err(to_graphql_error)?;
        Ok(starship.map(Starship::from))
    }
}
