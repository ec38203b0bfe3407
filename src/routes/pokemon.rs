//! Pokemon CRUD routes.

use crate::handlers::pokemon::{
    add_pokemon, get_all_pokemon, get_pokemon_by_id, get_pokemon_by_name, remove_pokemon, update_pokemon,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn pokemon_routes(state: AppState) -> Router {
    Router::new()
        .route("/pokemon", get(get_all_pokemon).post(add_pokemon))
        .route(
            "/pokemon/id/:id",
            get(get_pokemon_by_id).put(update_pokemon).delete(remove_pokemon),
        )
        .route("/pokemon/name/:name", get(get_pokemon_by_name))
        .with_state(state)
}
