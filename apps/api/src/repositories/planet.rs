//! Planet repository for centralized database operations
//!
//! This module provides all planet-related database operations in a single location,
//! following the repository pattern.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::utils::{push_id_list, PLANET_COLUMNS};
use crate::models::{CreatePlanet, EntityId, Planet, UpdatePlanet};

/// Outcome of a guarded planet delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetDeletion {
    Deleted,
    NotFound,
    /// Refused; the planet is still the home of this many characters
    HasResidents(i64),
}

/// Repository for planet database operations
#[derive(Clone)]
pub struct PlanetRepository {
    pool: SqlitePool,
}

impl PlanetRepository {
    /// Create a new PlanetRepository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every planet in id order
    pub async fn find_all(&self) -> Result<Vec<Planet>, sqlx::Error> {
        let sql = format!("SELECT {} FROM planets ORDER BY id", PLANET_COLUMNS);
        sqlx::query_as::<_, Planet>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Find a planet by its unique ID
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<Planet>, sqlx::Error> {
        let sql = format!("SELECT {} FROM planets WHERE id = ?", PLANET_COLUMNS);
        sqlx::query_as::<_, Planet>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch every planet whose id is in `ids` with one query
    pub async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Planet>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM planets WHERE id", PLANET_COLUMNS));
        push_id_list(&mut builder, ids);
        builder.build_query_as::<Planet>().fetch_all(&self.pool).await
    }

    /// Check whether a planet exists
    pub async fn exists(&self, id: EntityId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM planets WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a planet and return the stored row
    pub async fn create(&self, input: &CreatePlanet) -> Result<Planet, sqlx::Error> {
        let sql = format!(
            "INSERT INTO planets (name, climate, terrain) VALUES (?, ?, ?) RETURNING {}",
            PLANET_COLUMNS
        );
        sqlx::query_as::<_, Planet>(&sql)
            .bind(&input.name)
            .bind(&input.climate)
            .bind(&input.terrain)
            .fetch_one(&self.pool)
            .await
    }

    /// Apply a partial update; fields left as `None` keep their stored value
    ///
    /// Returns `Ok(None)` if no planet has this id.
    pub async fn update(
        &self,
        id: EntityId,
        input: &UpdatePlanet,
    ) -> Result<Option<Planet>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE planets SET
                name = COALESCE(?, name),
                climate = COALESCE(?, climate),
                terrain = COALESCE(?, terrain)
            WHERE id = ?
            RETURNING {}"#,
            PLANET_COLUMNS
        );
        sqlx::query_as::<_, Planet>(&sql)
            .bind(&input.name)
            .bind(&input.climate)
            .bind(&input.terrain)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a planet unless a character still lives there
    ///
    /// The resident check and the delete run in one transaction.
    pub async fn delete_if_unreferenced(&self, id: EntityId) -> Result<PlanetDeletion, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let residents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM characters WHERE home_planet_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if residents > 0 {
            return Ok(PlanetDeletion::HasResidents(residents));
        }

        let result = sqlx::query("DELETE FROM planets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() == 0 {
            Ok(PlanetDeletion::NotFound)
        } else {
            Ok(PlanetDeletion::Deleted)
        }
    }
}
