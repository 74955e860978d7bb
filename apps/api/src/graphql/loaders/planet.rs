//! Planet-by-id loader
//!
//! Batches `Character.homePlanet` lookups into a single `WHERE id IN (...)`
//! query per window.

use std::collections::HashMap;

use super::batch::{BatchFn, LoaderError};
use crate::models::{EntityId, Planet};
use crate::repositories::PlanetRepository;

/// Batch function for planets keyed by id
#[derive(Clone)]
pub struct PlanetLoader {
    repo: PlanetRepository,
}

impl PlanetLoader {
    pub fn new(repo: PlanetRepository) -> Self {
        Self { repo }
    }
}

impl BatchFn for PlanetLoader {
    type Key = EntityId;
    type Value = Planet;

    async fn load(&self, keys: &[EntityId]) -> Result<HashMap<EntityId, Planet>, LoaderError> {
        let planets = self.repo.find_by_ids(keys).await?;
        tracing::debug!(keys = keys.len(), found = planets.len(), "Loaded planets batch");

        Ok(planets.into_iter().map(|p| (p.id, p)).collect())
    }
}
