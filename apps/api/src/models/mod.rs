//! Database models and types for the Star Wars catalog
//!
//! This module contains SQLx models for:
//! - Planets, characters and starships
//! - Users and authentication claims
//! - The shared `EntityId` identifier type

pub mod character;
pub mod id;
pub mod planet;
pub mod starship;
pub mod user;

pub use character::{Character, CreateCharacter, UpdateCharacter};
pub use id::{EntityId, InvalidIdError};
pub use planet::{CreatePlanet, Planet, UpdatePlanet};
pub use starship::{CreateStarship, Starship, UpdateStarship};
pub use user::{Claims, User, UserRole};
