//! Pokemon handlers: lookup by id or name, paginated list, create, full update, delete.

use crate::error::AppError;
use crate::extractors::Pokedex;
use crate::response::{created, detail, total_count_headers, Created, Detail};
use crate::schema::Pokemon;
use crate::service::{validate_pokemon, PageRequest, PokemonInput};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number. Defaults to 1.
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Page size. Defaults to the configured default limit (20).
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/pokemon/id/{id}",
    params(("id" = i32, Path, description = "Pokemon id")),
    responses(
        (status = 200, description = "Pokemon with its abilities, stats and types", body = Pokemon),
        (status = 404, description = "No Pokemon with this id", body = Detail)
    ),
    tag = "pokemon"
)]
pub async fn get_pokemon_by_id(
    Pokedex(service): Pokedex,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Pokemon>, AppError> {
    let Path(id) = id?;
    let pokemon = service
        .fetch_by_id(id)
        .await?
        .ok_or_else(AppError::pokemon_not_found)?;
    Ok(Json(pokemon))
}

#[utoipa::path(
    get,
    path = "/pokemon/name/{name}",
    params(("name" = String, Path, description = "Exact Pokemon name")),
    responses(
        (status = 200, description = "Pokemon with its abilities, stats and types", body = Pokemon),
        (status = 404, description = "No Pokemon with this name", body = Detail)
    ),
    tag = "pokemon"
)]
pub async fn get_pokemon_by_name(
    Pokedex(service): Pokedex,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<Pokemon>, AppError> {
    let Path(name) = name?;
    let pokemon = service
        .fetch_by_name(&name)
        .await?
        .ok_or_else(AppError::pokemon_not_found)?;
    Ok(Json(pokemon))
}

#[utoipa::path(
    get,
    path = "/pokemon",
    params(ListParams),
    responses(
        (status = 200, description = "One page of Pokemon ordered by id; X-Total-Count holds the total", body = Vec<Pokemon>),
        (status = 422, description = "page or limit not an integer or out of range")
    ),
    tag = "pokemon"
)]
pub async fn get_all_pokemon(
    State(state): State<AppState>,
    Pokedex(service): Pokedex,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<Pokemon>>), AppError> {
    let Query(params) = params?;
    let page = PageRequest::from_query(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.settings.default_page_limit,
        state.settings.max_page_limit,
    )?;
    let rows = service.fetch_all(page).await?;
    let total = service.count().await?;
    Ok((total_count_headers(total), Json(rows)))
}

#[utoipa::path(
    post,
    path = "/pokemon",
    request_body = PokemonInput,
    responses(
        (status = 201, description = "Pokemon stored", body = Created),
        (status = 400, description = "Name already taken or malformed JSON", body = Detail),
        (status = 422, description = "Payload failed validation")
    ),
    tag = "pokemon"
)]
pub async fn add_pokemon(
    Pokedex(service): Pokedex,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Json(body) = body?;
    let input = validate_pokemon(&body)?;
    let id = service.create(&input).await?;
    Ok(created(id))
}

#[utoipa::path(
    put,
    path = "/pokemon/id/{id}",
    params(("id" = i32, Path, description = "Pokemon id")),
    request_body = PokemonInput,
    responses(
        (status = 200, description = "Pokemon and all of its children replaced", body = Detail),
        (status = 400, description = "Name already taken by another Pokemon", body = Detail),
        (status = 404, description = "No Pokemon with this id", body = Detail),
        (status = 422, description = "Payload failed validation")
    ),
    tag = "pokemon"
)]
pub async fn update_pokemon(
    Pokedex(service): Pokedex,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let input = validate_pokemon(&body)?;
    if service.fetch_by_id(id).await?.is_none() {
        return Err(AppError::pokemon_not_found());
    }
    service.update(id, &input).await?;
    Ok(detail("Pokemon updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/pokemon/id/{id}",
    params(("id" = i32, Path, description = "Pokemon id")),
    responses(
        (status = 200, description = "Pokemon and its children removed", body = Detail),
        (status = 404, description = "No Pokemon with this id", body = Detail)
    ),
    tag = "pokemon"
)]
pub async fn remove_pokemon(
    Pokedex(service): Pokedex,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Path(id) = id?;
    if !service.delete(id).await? {
        return Err(AppError::pokemon_not_found());
    }
    Ok(detail("Pokemon deleted"))
}
