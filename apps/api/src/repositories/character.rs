//! Character repository for centralized database operations
//!
//! Besides plain CRUD this owns the two character-shaped relation queries:
//! residents of a set of planets and pilots of a set of starships.

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::utils::{push_id_list, CHARACTER_COLUMNS};
use crate::models::{Character, CreateCharacter, EntityId, UpdateCharacter};

/// Character row tagged with the starship it pilots
#[derive(FromRow)]
struct PilotRow {
    starship_id: EntityId,
    #[sqlx(flatten)]
    character: Character,
}

/// Repository for character database operations
#[derive(Clone)]
pub struct CharacterRepository {
    pool: SqlitePool,
}

impl CharacterRepository {
    /// Create a new CharacterRepository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every character in id order
    pub async fn find_all(&self) -> Result<Vec<Character>, sqlx::Error> {
        let sql = format!("SELECT {} FROM characters ORDER BY id", CHARACTER_COLUMNS);
        sqlx::query_as::<_, Character>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Find a character by its unique ID
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<Character>, sqlx::Error> {
        let sql = format!("SELECT {} FROM characters WHERE id = ?", CHARACTER_COLUMNS);
        sqlx::query_as::<_, Character>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch every character whose id is in `ids` with one query
    pub async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Character>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM characters WHERE id",
            CHARACTER_COLUMNS
        ));
        push_id_list(&mut builder, ids);
        builder
            .build_query_as::<Character>()
            .fetch_all(&self.pool)
            .await
    }

    /// Characters whose home planet is one of `planet_ids`, in id order
    pub async fn find_by_home_planets(
        &self,
        planet_ids: &[EntityId],
    ) -> Result<Vec<Character>, sqlx::Error> {
        if planet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM characters WHERE home_planet_id",
            CHARACTER_COLUMNS
        ));
        push_id_list(&mut builder, planet_ids);
        builder.push(" ORDER BY id");
        builder
            .build_query_as::<Character>()
            .fetch_all(&self.pool)
            .await
    }

    /// Pilots of each starship in `starship_ids` as `(starship_id, character)` pairs
    pub async fn find_pilots_of(
        &self,
        starship_ids: &[EntityId],
    ) -> Result<Vec<(EntityId, Character)>, sqlx::Error> {
        if starship_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"SELECT cs.starship_id, c.id, c.name, c.species, c.home_planet_id
            FROM character_starships cs
            JOIN characters c ON c.id = cs.character_id
            WHERE cs.starship_id"#,
        );
        push_id_list(&mut builder, starship_ids);
        builder.push(" ORDER BY c.id");

        let rows = builder
            .build_query_as::<PilotRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.starship_id, row.character))
            .collect())
    }

    /// Check whether a character exists
    pub async fn exists(&self, id: EntityId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM characters WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a character and return the stored row
    pub async fn create(&self, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let sql = format!(
            "INSERT INTO characters (name, species, home_planet_id) VALUES (?, ?, ?) RETURNING {}",
            CHARACTER_COLUMNS
        );
        sqlx::query_as::<_, Character>(&sql)
            .bind(&input.name)
            .bind(&input.species)
            .bind(input.home_planet_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Apply a partial update; fields left as `None` keep their stored value
    ///
    /// Returns `Ok(None)` if no character has this id.
    pub async fn update(
        &self,
        id: EntityId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE characters SET
                name = COALESCE(?, name),
                species = COALESCE(?, species),
                home_planet_id = COALESCE(?, home_planet_id)
            WHERE id = ?
            RETURNING {}"#,
            CHARACTER_COLUMNS
        );
        sqlx::query_as::<_, Character>(&sql)
            .bind(&input.name)
            .bind(&input.species)
            .bind(input.home_planet_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a character and its piloting rows in one transaction
    ///
    /// Returns `false` if no character has this id.
    pub async fn delete(&self, id: EntityId) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM character_starships WHERE character_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that a character pilots a starship
    ///
    /// Returns `false` if the pair already existed.
    pub async fn assign_starship(
        &self,
        character_id: EntityId,
        starship_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO character_starships (character_id, starship_id) VALUES (?, ?)",
        )
        .bind(character_id)
        .bind(starship_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get total count of characters
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM characters")
            .fetch_one(&self.pool)
            .await
    }
}
