//! Starships-piloted-by-character loader
//!
//! Batches `Character.pilotedStarships` into one join over
//! `character_starships` per window, grouped by character id.

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use super::list::group_rows;
use crate::models::{EntityId, Starship};
use crate::repositories::StarshipRepository;

/// Batch function for the starships each character pilots
#[derive(Clone)]
pub struct CharacterStarshipsLoader {
    repo: StarshipRepository,
}

impl CharacterStarshipsLoader {
    pub fn new(repo: StarshipRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for CharacterStarshipsLoader {
    type Key = EntityId;
    type Value = Vec<Starship>;

    async fn load(
        &self,
        keys: &[EntityId],
    ) -> Result<HashMap<EntityId, Vec<Starship>>, LoaderError> {
        let rows = self.repo.find_piloted_by(keys).await?;
        tracing::debug!(keys = keys.len(), rows = rows.len(), "Loaded piloted starships batch");

        Ok(group_rows(keys, rows))
    }
}
