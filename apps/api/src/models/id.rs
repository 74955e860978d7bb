//! Entity identifiers
//!
//! Every row in the catalog is addressed by a store-assigned integer. GraphQL
//! and JSON clients may send that integer either as a number or as its text
//! representation, so all identifiers funnel through [`EntityId`] and compare
//! as plain integers from then on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer primary key shared by planets, characters, starships and users
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EntityId(i64);

/// Rejected identifier text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{0}': expected a positive integer")]
pub struct InvalidIdError(pub String);

impl EntityId {
    /// Wrap a raw integer key
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer key
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl FromStr for EntityId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(InvalidIdError(s.to_string())),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
