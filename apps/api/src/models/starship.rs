//! Starship model

use serde::Serialize;
use sqlx::FromRow;

use super::EntityId;

/// Starship record from the starships table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Starship {
    /// Store-assigned identifier
    pub id: EntityId,

    /// Unique starship name
    pub name: String,

    /// Model designation
    pub model: Option<String>,

    /// Manufacturer
    pub manufacturer: Option<String>,
}

/// Starship creation input
#[derive(Debug, Clone, Default)]
pub struct CreateStarship {
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
}

/// Partial starship update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateStarship {
    pub name: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
}
