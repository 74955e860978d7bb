//! Character-by-id loader

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use crate::models::{Character, EntityId};
use crate::repositories::CharacterRepository;

/// Batch function for characters keyed by id
#[derive(Clone)]
pub struct CharacterLoader {
    repo: CharacterRepository,
}

impl CharacterLoader {
    pub fn new(repo: CharacterRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for CharacterLoader {
    type Key = EntityId;
    type Value = Character;

    async fn load(&self, keys: &[EntityId]) -> Result<HashMap<EntityId, Character>, LoaderError> {
        let characters = self.repo.find_by_ids(keys).await?;
        tracing::debug!(keys = keys.len(), found = characters.len(), "Loaded characters batch");

        Ok(characters.into_iter().map(|c| (c.id, c)).collect())
    }
}
