//! OpenAPI document for the Pokemon endpoints, served at `/openapi.json`.

use crate::handlers::pokemon;
use crate::response::{Created, Detail};
use crate::schema::{Ability, Pokemon, Stat, Type};
use crate::service::{FieldError, PokemonInput};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        pokemon::get_pokemon_by_id,
        pokemon::get_pokemon_by_name,
        pokemon::get_all_pokemon,
        pokemon::add_pokemon,
        pokemon::update_pokemon,
        pokemon::remove_pokemon
    ),
    components(schemas(Pokemon, Ability, Stat, Type, PokemonInput, Created, Detail, FieldError)),
    tags((name = "pokemon", description = "Pokemon records with abilities, stats and types"))
)]
pub struct ApiDoc;
