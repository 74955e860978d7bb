//! Character queries

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::types::Character;
use crate::graphql::{parse_id, to_graphql_error};
use crate::services::CatalogService;

#[derive(Default)]
pub struct CharacterQuery;

#[Object]
impl CharacterQuery {
    /// List every character ordered by id
    async fn all_characters(&self, ctx: &Context<'_>) -> Result<Vec<Character>> {
        let service = ctx.data::<CatalogService>()?;
        let characters = service.list_characters().await.map_err(to_graphql_error)?;
        Ok(characters.into_iter().map(Character::from).collect())
    }

    /// Get a character by ID
    async fn character(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Character>> {
        let id = parse_id(&id)?;
        let service = ctx.data::<CatalogService>()?;
        let character = service.get_character(id).await.map_err(to_graphql_error)?;
        Ok(character.map(Character::from))
    }
}
