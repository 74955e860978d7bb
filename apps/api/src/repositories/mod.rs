//! Database repository layer for the Star Wars catalog
//!
//! This module provides the data access layer, centralizing all database
//! operations into reusable repositories. Every SQL statement the API runs,
//! including the batched `IN (...)` lookups behind the GraphQL loaders,
//! lives here.

pub mod character;
pub mod planet;
pub mod starship;
pub mod user;
pub mod utils;

pub use character::CharacterRepository;
pub use planet::{PlanetDeletion, PlanetRepository};
pub use starship::StarshipRepository;
pub use user::UserRepository;
