//! Pilots-of-starship loader

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use super::list::group_rows;
use crate::models::{Character, EntityId};
use crate::repositories::CharacterRepository;

/// Batch function for the characters piloting each starship
#[derive(Clone)]
pub struct StarshipPilotsLoader {
    repo: CharacterRepository,
}

impl StarshipPilotsLoader {
    pub fn new(repo: CharacterRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for StarshipPilotsLoader {
    type Key = EntityId;
    type Value = Vec<Character>;

    async fn load(
        &self,
        keys: &[EntityId],
    ) -> Result<HashMap<EntityId, Vec<Character>>, LoaderError> {
        let rows = self.repo.find_pilots_of(keys).await?;
        tracing::debug!(keys = keys.len(), rows = rows.len(), "Loaded starship pilots batch");

        Ok(group_rows(keys, rows))
    }
}
