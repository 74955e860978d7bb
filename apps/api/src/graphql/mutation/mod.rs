//! GraphQL mutations for the Star Wars catalog
//!
//! Every mutation requires verified claims in the request data. After a
//! write, the affected loader entries are cleared so later fields in the
//! same request observe the new state.

mod character;
mod planet;
mod starship;

pub use character::{AssignStarshipInput, CharacterMutation, CreateCharacterInput, UpdateCharacterInput};
pub use planet::{CreatePlanetInput, PlanetMutation, UpdatePlanetInput};
pub use starship::{CreateStarshipInput, StarshipMutation, UpdateStarshipInput};

use async_graphql::{Context, ErrorExtensions, MergedObject, Result};

use crate::error::ApiError;
use crate::models::Claims;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(PlanetMutation, CharacterMutation, StarshipMutation);

/// Get the caller's claims or fail with `UNAUTHENTICATED`
fn require_auth<'a>(ctx: &'a Context<'a>) -> Result<&'a Claims> {
    ctx.data_opt::<Claims>()
        .ok_or_else(|| ApiError::Unauthorized.extend())
}
