//! Residents-of-planet loader
//!
//! Batches `Planet.residents` into one `home_planet_id IN (...)` query per
//! window, grouped by planet id.

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use super::list::group_rows;
use crate::models::{Character, EntityId};
use crate::repositories::CharacterRepository;

/// Batch function for the characters living on each planet
#[derive(Clone)]
pub struct PlanetResidentsLoader {
    repo: CharacterRepository,
}

impl PlanetResidentsLoader {
    pub fn new(repo: CharacterRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for PlanetResidentsLoader {
    type Key = EntityId;
    type Value = Vec<Character>;

    async fn load(
        &self,
        keys: &[EntityId],
    ) -> Result<HashMap<EntityId, Vec<Character>>, LoaderError> {
        let residents = self.repo.find_by_home_planets(keys).await?;
        tracing::debug!(keys = keys.len(), rows = residents.len(), "Loaded planet residents batch");

        let rows = residents
            .into_iter()
            .filter_map(|c| c.home_planet_id.map(|planet_id| (planet_id, c)));

        Ok(group_rows(keys, rows))
    }
}
