//! Character model

use serde::Serialize;
use sqlx::FromRow;

use super::EntityId;

/// Character record from the characters table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    /// Store-assigned identifier
    pub id: EntityId,

    /// Unique character name
    pub name: String,

    /// Species, if known
    pub species: Option<String>,

    /// Home planet reference, if any
    pub home_planet_id: Option<EntityId>,
}

/// Character creation input
#[derive(Debug, Clone, Default)]
pub struct CreateCharacter {
    pub name: String,
    pub species: Option<String>,
    pub home_planet_id: Option<EntityId>,
}

/// Partial character update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub species: Option<String>,
    pub home_planet_id: Option<EntityId>,
}
