//! Input validation for catalog writes
//!
//! Runs before any write reaches the store. Names are trimmed and must be
//! non-empty; every text field has a length cap counted in characters.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateCharacter, CreatePlanet, CreateStarship, UpdateCharacter, UpdatePlanet, UpdateStarship,
};

pub const NAME_MAX: usize = 100;
pub const CLIMATE_MAX: usize = 50;
pub const TERRAIN_MAX: usize = 100;
pub const SPECIES_MAX: usize = 50;
pub const MODEL_MAX: usize = 100;
pub const MANUFACTURER_MAX: usize = 100;

/// Trim a name and check it is between 1 and [`NAME_MAX`] characters
pub fn validate_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::ValidationError("name cannot be empty".to_string()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(ApiError::ValidationError(format!(
            "name must be at most {} characters",
            NAME_MAX
        )));
    }
    Ok(name.to_string())
}

/// Check an optional text field against its length cap
pub fn validate_optional(field: &str, value: Option<&str>, max: usize) -> ApiResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(ApiError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

fn validate_optional_name(name: Option<String>) -> ApiResult<Option<String>> {
    name.as_deref().map(validate_name).transpose()
}

pub fn validate_create_planet(mut input: CreatePlanet) -> ApiResult<CreatePlanet> {
    input.name = validate_name(&input.name)?;
    validate_optional("climate", input.climate.as_deref(), CLIMATE_MAX)?;
    validate_optional("terrain", input.terrain.as_deref(), TERRAIN_MAX)?;
    Ok(input)
}

pub fn validate_update_planet(mut input: UpdatePlanet) -> ApiResult<UpdatePlanet> {
    input.name = validate_optional_name(input.name)?;
    validate_optional("climate", input.climate.as_deref(), CLIMATE_MAX)?;
    validate_optional("terrain", input.terrain.as_deref(), TERRAIN_MAX)?;
    Ok(input)
}

pub fn validate_create_character(mut input: CreateCharacter) -> ApiResult<CreateCharacter> {
    input.name = validate_name(&input.name)?;
    validate_optional("species", input.species.as_deref(), SPECIES_MAX)?;
    Ok(input)
}

pub fn validate_update_character(mut input: UpdateCharacter) -> ApiResult<UpdateCharacter> {
    input.name = validate_optional_name(input.name)?;
    validate_optional("species", input.species.as_deref(), SPECIES_MAX)?;
    Ok(input)
}

pub fn validate_create_starship(mut input: CreateStarship) -> ApiResult<CreateStarship> {
    input.name = validate_name(&input.name)?;
    validate_optional("model", input.model.as_deref(), MODEL_MAX)?;
    validate_optional("manufacturer", input.manufacturer.as_deref(), MANUFACTURER_MAX)?;
    Ok(input)
}

pub fn validate_update_starship(mut input: UpdateStarship) -> ApiResult<UpdateStarship> {
    input.name = validate_optional_name(input.name)?;
    validate_optional("model", input.model.as_deref(), MODEL_MAX)?;
    validate_optional("manufacturer", input.manufacturer.as_deref(), MANUFACTURER_MAX)?;
    Ok(input)
}
