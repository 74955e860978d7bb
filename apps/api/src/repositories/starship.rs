//! Starship repository for centralized database operations

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::utils::{push_id_list, STARSHIP_COLUMNS};
use crate::models::{CreateStarship, EntityId, Starship, UpdateStarship};

/// Starship row tagged with the character piloting it
#[derive(FromRow)]
struct PilotedStarshipRow {
    character_id: EntityId,
    #[sqlx(flatten)]
    starship: Starship,
}

/// Repository for starship database operations
#[derive(Clone)]
pub struct StarshipRepository {
    pool: SqlitePool,
}

impl StarshipRepository {
    /// Create a new StarshipRepository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every starship in id order
    pub async fn find_all(&self) -> Result<Vec<Starship>, sqlx::Error> {
        let sql = format!("SELECT {} FROM starships ORDER BY id", STARSHIP_COLUMNS);
        sqlx::query_as::<_, Starship>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Find a starship by its unique ID
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<Starship>, sqlx::Error> {
        let sql = format!("SELECT {} FROM starships WHERE id = ?", STARSHIP_COLUMNS);
        sqlx::query_as::<_, Starship>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch every starship whose id is in `ids` with one query
    pub async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Starship>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM starships WHERE id",
            STARSHIP_COLUMNS
        ));
        push_id_list(&mut builder, ids);
        builder
            .build_query_as::<Starship>()
            .fetch_all(&self.pool)
            .await
    }

    /// Starships piloted by each character in `character_ids` as
    /// `(character_id, starship)` pairs
    pub async fn find_piloted_by(
        &self,
        character_ids: &[EntityId],
    ) -> Result<Vec<(EntityId, Starship)>, sqlx::Error> {
        if character_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"SELECT cs.character_id, s.id, s.name, s.model, s.manufacturer
            FROM character_starships cs
            JOIN starships s ON s.id = cs.starship_id
            WHERE cs.character_id"#,
        );
        push_id_list(&mut builder, character_ids);
        builder.push(" ORDER BY s.id");

        let rows = builder
            .build_query_as::<PilotedStarshipRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.character_id, row.starship))
            .collect())
    }

    /// Check whether a starship exists
    pub async fn exists(&self, id: EntityId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM starships WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a starship and return the stored row
    pub async fn create(&self, input: &CreateStarship) -> Result<Starship, sqlx::Error> {
        let sql = format!(
            "INSERT INTO starships (name, model, manufacturer) VALUES (?, ?, ?) RETURNING {}",
            STARSHIP_COLUMNS
        );
        sqlx::query_as::<_, Starship>(&sql)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.manufacturer)
            .fetch_one(&self.pool)
            .await
    }

    /// Apply a partial update; fields left as `None` keep their stored value
    ///
    /// Returns `Ok(None)` if no starship has this id.
    pub async fn update(
        &self,
        id: EntityId,
        input: &UpdateStarship,
    ) -> Result<Option<Starship>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE starships SET
                name = COALESCE(?, name),
                model = COALESCE(?, model),
                manufacturer = COALESCE(?, manufacturer)
            WHERE id = ?
            RETURNING {}"#,
            STARSHIP_COLUMNS
        );
        sqlx::query_as::<_, Starship>(&sql)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.manufacturer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a starship and its piloting rows in one transaction
    ///
    /// Returns `false` if no starship has this id.
    pub async fn delete(&self, id: EntityId) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM character_starships WHERE starship_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM starships WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
