//! PokemonService: CRUD over the Pokemon tables, plus payload validation.

mod pokemon;
mod validation;
pub use pokemon::PokemonService;
pub use validation::{validate_pokemon, FieldError, PageRequest, PokemonInput, ValidationErrors};
