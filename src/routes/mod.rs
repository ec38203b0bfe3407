//! Router assembly: common probes, OpenAPI document, Pokemon CRUD.

mod common;
mod pokemon;
pub use common::{common_routes, common_routes_with_ready};
pub use pokemon::pokemon_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application router with body limit and request tracing.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit_bytes;
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(pokemon_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
