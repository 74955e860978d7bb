//! GraphQL queries for the Star Wars catalog
//!
//! Root queries read the store directly; nested relationships are left to
//! the object types and their loaders.

mod character;
mod planet;
mod starship;

pub use character::CharacterQuery;
pub use planet::PlanetQuery;
pub use starship::StarshipQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(PlanetQuery, CharacterQuery, StarshipQuery);
