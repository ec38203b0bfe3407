//! Per-request service handle pulled from application state.

use crate::service::PokemonService;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Extractor yielding a `PokemonService` bound to the shared pool.
/// Connections are checked out per query or transaction and returned on every exit path.
pub struct Pokedex(pub PokemonService);

#[async_trait]
impl FromRequestParts<AppState> for Pokedex {
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Pokedex(state.pokemon_service()))
    }
}
