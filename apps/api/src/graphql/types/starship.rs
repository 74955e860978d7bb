//! Starship GraphQL type

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::loaders::LoadersExt;
use crate::graphql::{to_graphql_error, to_id};
use crate::models::Starship as DbStarship;

use super::Character;

/// Starship exposed via GraphQL
pub struct Starship {
    inner: DbStarship,
}

impl From<DbStarship> for Starship {
    fn from(starship: DbStarship) -> Self {
        Self { inner: starship }
    }
}

#[Object]
impl Starship {
    /// Unique starship identifier
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn model(&self) -> Option<&str> {
        self.inner.model.as_deref()
    }

    async fn manufacturer(&self) -> Option<&str> {
        self.inner.manufacturer.as_deref()
    }

    /// Characters piloting this starship (batched)
    async fn pilots(&self, ctx: &Context<'_>) -> Result<Option<Vec<Character>>> {
        let pilots = ctx
            .loaders()?
            .starship_pilots
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(Some(pilots.into_iter().map(Character::from).collect()))
    }
}
