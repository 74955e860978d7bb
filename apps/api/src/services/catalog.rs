//! Catalog service for planets, characters and starships
//!
//! Owns the domain rules around writes: validation, unique names, referenced
//! home planets, the resident guard on planet deletion and pilot assignment.
//! Reads are thin passthroughs to the repositories.

use sqlx::SqlitePool;

use super::validation;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Character, CreateCharacter, CreatePlanet, CreateStarship, EntityId, Planet, Starship,
    UpdateCharacter, UpdatePlanet, UpdateStarship,
};
use crate::repositories::{
    CharacterRepository, PlanetDeletion, PlanetRepository, StarshipRepository,
};

/// Catalog operations shared by the GraphQL resolvers
#[derive(Clone)]
pub struct CatalogService {
    planets: PlanetRepository,
    characters: CharacterRepository,
    starships: StarshipRepository,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            planets: PlanetRepository::new(pool.clone()),
            characters: CharacterRepository::new(pool.clone()),
            starships: StarshipRepository::new(pool),
        }
    }

    // ==================== Planets ====================

    pub async fn list_planets(&self) -> ApiResult<Vec<Planet>> {
        Ok(self.planets.find_all().await?)
    }

    pub async fn get_planet(&self, id: EntityId) -> ApiResult<Option<Planet>> {
        Ok(self.planets.find_by_id(id).await?)
    }

    pub async fn create_planet(&self, input: CreatePlanet) -> ApiResult<Planet> {
        let input = validation::validate_create_planet(input)?;
        let planet = self
            .planets
            .create(&input)
            .await
            .map_err(|e| ApiError::from_write(e, "planet", &input.name))?;

        tracing::info!(planet_id = %planet.id, name = %planet.name, "Planet created");
        Ok(planet)
    }

    pub async fn update_planet(&self, id: EntityId, input: UpdatePlanet) -> ApiResult<Planet> {
        let input = validation::validate_update_planet(input)?;
        let name = input.name.clone().unwrap_or_default();
        let planet = self
            .planets
            .update(id, &input)
            .await
            .map_err(|e| ApiError::from_write(e, "planet", &name))?
            .ok_or_else(|| ApiError::not_found("planet", id))?;

        tracing::info!(planet_id = %planet.id, "Planet updated");
        Ok(planet)
    }

    /// Delete a planet that no character calls home
    ///
    /// # Errors
    /// - `ApiError::Constraint` if the planet still has residents; the row stays
    /// - `ApiError::NotFound` if no planet has this id
    pub async fn delete_planet(&self, id: EntityId) -> ApiResult<()> {
        match self.planets.delete_if_unreferenced(id).await? {
            PlanetDeletion::Deleted => {
                tracing::info!(planet_id = %id, "Planet deleted");
                Ok(())
            }
            PlanetDeletion::NotFound => Err(ApiError::not_found("planet", id)),
            PlanetDeletion::HasResidents(count) => {
                tracing::warn!(planet_id = %id, residents = count, "Refused to delete inhabited planet");
                Err(ApiError::Constraint(format!(
                    "cannot delete planet {} while {} character(s) live there",
                    id, count
                )))
            }
        }
    }

    // ==================== Characters ====================

    pub async fn list_characters(&self) -> ApiResult<Vec<Character>> {
        Ok(self.characters.find_all().await?)
    }

    pub async fn get_character(&self, id: EntityId) -> ApiResult<Option<Character>> {
        Ok(self.characters.find_by_id(id).await?)
    }

    pub async fn create_character(&self, input: CreateCharacter) -> ApiResult<Character> {
        let input = validation::validate_create_character(input)?;
        self.ensure_planet_exists(input.home_planet_id).await?;

        let character = self
            .characters
            .create(&input)
            .await
            .map_err(|e| ApiError::from_write(e, "character", &input.name))?;

        tracing::info!(character_id = %character.id, name = %character.name, "Character created");
        Ok(character)
    }

    pub async fn update_character(
        &self,
        id: EntityId,
        input: UpdateCharacter,
    ) -> ApiResult<Character> {
        let input = validation::validate_update_character(input)?;
        self.ensure_planet_exists(input.home_planet_id).await?;

        let name = input.name.clone().unwrap_or_default();
        let character = self
            .characters
            .update(id, &input)
            .await
            .map_err(|e| ApiError::from_write(e, "character", &name))?
            .ok_or_else(|| ApiError::not_found("character", id))?;

        tracing::info!(character_id = %character.id, "Character updated");
        Ok(character)
    }

    /// Delete a character together with its piloting records
    pub async fn delete_character(&self, id: EntityId) -> ApiResult<()> {
        if !self.characters.delete(id).await? {
            return Err(ApiError::not_found("character", id));
        }

        tracing::info!(character_id = %id, "Character deleted");
        Ok(())
    }

    /// Record that a character pilots a starship and return the character
    ///
    /// Assigning a pair that already exists is a no-op.
    pub async fn assign_starship(
        &self,
        character_id: EntityId,
        starship_id: EntityId,
    ) -> ApiResult<Character> {
        let character = self
            .characters
            .find_by_id(character_id)
            .await?
            .ok_or_else(|| ApiError::not_found("character", character_id))?;

        if !self.starships.exists(starship_id).await? {
            return Err(ApiError::not_found("starship", starship_id));
        }

        let inserted = self
            .characters
            .assign_starship(character_id, starship_id)
            .await?;

        tracing::info!(
            character_id = %character_id,
            starship_id = %starship_id,
            inserted,
            "Starship assigned"
        );
        Ok(character)
    }

    // ==================== Starships ====================

    pub async fn list_starships(&self) -> ApiResult<Vec<Starship>> {
        Ok(self.starships.find_all().await?)
    }

    pub async fn get_starship(&self, id: EntityId) -> ApiResult<Option<Starship>> {
        Ok(self.starships.find_by_id(id).await?)
    }

    pub async fn create_starship(&self, input: CreateStarship) -> ApiResult<Starship> {
        let input = validation::validate_create_starship(input)?;
        let starship = self
            .starships
            .create(&input)
            .await
            .map_err(|e| ApiError::from_write(e, "starship", &input.name))?;

        tracing::info!(starship_id = %starship.id, name = %starship.name, "Starship created");
        Ok(starship)
    }

    pub async fn update_starship(
        &self,
        id: EntityId,
        input: UpdateStarship,
    ) -> ApiResult<Starship> {
        let input = validation::validate_update_starship(input)?;
        let name = input.name.clone().unwrap_or_default();
        let starship = self
            .starships
            .update(id, &input)
            .await
            .map_err(|e| ApiError::from_write(e, "starship", &name))?
            .ok_or_else(|| ApiError::not_found("starship", id))?;

        tracing::info!(starship_id = %starship.id, "Starship updated");
        Ok(starship)
    }

    /// Delete a starship together with its piloting records
    pub async fn delete_starship(&self, id: EntityId) -> ApiResult<()> {
        if !self.starships.delete(id).await? {
            return Err(ApiError::not_found("starship", id));
        }

        tracing::info!(starship_id = %id, "Starship deleted");
        Ok(())
    }

    async fn ensure_planet_exists(&self, planet_id: Option<EntityId>) -> ApiResult<()> {
        if let Some(id) = planet_id {
            if !self.planets.exists(id).await? {
                return Err(ApiError::not_found("planet", id));
            }
        }
        Ok(())
    }
}
