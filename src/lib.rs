//! Pokedex API: REST backend for Pokemon records and their abilities, stats and types.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes, common_routes_with_ready, pokemon_routes};
pub use schema::{Ability, Pokemon, Stat, Tables, Type};
pub use service::{validate_pokemon, PageRequest, PokemonInput, PokemonService, ValidationErrors};
pub use state::AppState;
pub use store::{connect, ensure_database_exists, ensure_schema};
