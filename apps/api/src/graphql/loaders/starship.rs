//! Starship-by-id loader

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use crate::models::{EntityId, Starship};
use crate::repositories::StarshipRepository;

/// Batch function for starships keyed by id
#[derive(Clone)]
pub struct StarshipLoader {
    repo: StarshipRepository,
}

impl StarshipLoader {
    pub fn new(repo: StarshipRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for StarshipLoader {
    type Key = EntityId;
    type Value = Starship;

    async fn load(&self, keys: &[EntityId]) -> Result<HashMap<EntityId, Starship>, LoaderError> {
        let starships = self.repo.find_by_ids(keys).await?;
        tracing::debug!(keys = keys.len(), found = starships.len(), "Loaded starships batch");

        Ok(starships.into_iter().map(|s| (s.id, s)).collect())
    }
}
