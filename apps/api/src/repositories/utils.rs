//! Shared utility functions for repositories
//!
//! This module provides common functions used across repositories.

use sqlx::{QueryBuilder, Sqlite};

use crate::models::EntityId;

/// Append ` IN (?, ?, ...)` with one bound parameter per id
///
/// Callers must not pass an empty slice; `IN ()` matches nothing and is
/// never worth a round trip.
pub fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[EntityId]) {
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

// ============================================================================
// SQL Column Constants
//
// These constants define the SELECT column lists for each entity type,
// reducing duplication and ensuring consistency across queries.
// ============================================================================

/// SQL columns for planet queries
pub const PLANET_COLUMNS: &str = "id, name, climate, terrain";

/// SQL columns for character queries
pub const CHARACTER_COLUMNS: &str = "id, name, species, home_planet_id";

/// SQL columns for starship queries
pub const STARSHIP_COLUMNS: &str = "id, name, model, manufacturer";

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, username, email, hashed_password, role";
