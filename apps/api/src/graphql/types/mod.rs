//! GraphQL type definitions
//!
//! Relationship fields on these types resolve through the request's loaders
//! and are nullable, so a failed batch nulls only the field that asked.

mod character;
mod planet;
mod starship;

pub use character::Character;
pub use planet::Planet;
pub use starship::Starship;
