//! Planet model

use serde::Serialize;
use sqlx::FromRow;

use super::EntityId;

/// Planet record from the planets table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Planet {
    /// Store-assigned identifier
    pub id: EntityId,

    /// Unique planet name
    pub name: String,

    /// Climate description
    pub climate: Option<String>,

    /// Terrain description
    pub terrain: Option<String>,
}

/// Planet creation input
#[derive(Debug, Clone, Default)]
pub struct CreatePlanet {
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

/// Partial planet update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdatePlanet {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}
