//! Shared helpers for integration tests.
//!
//! Database-backed tests need `DATABASE_URL`; each one runs in its own freshly
//! created schema and is skipped when the variable is unset.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use pokedex_api::{ensure_schema, Ability, AppState, PokemonInput, Settings, Stat, Type};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

/// State backed by an isolated schema, or None when no database is configured.
pub async fn db_state() -> Option<AppState> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };
    let settings = Settings {
        database_url: url,
        schema: format!("pokedex_test_{}", uuid::Uuid::new_v4().simple()),
        ..Settings::default()
    };
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&settings.database_url)
        .await
        .expect("connect to DATABASE_URL");
    let state = AppState::new(pool, settings);
    ensure_schema(&state.pool, &state.tables).await.expect("create tables");
    Some(state)
}

pub async fn drop_schema(state: &AppState) {
    sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", state.tables.schema))
        .execute(&state.pool)
        .await
        .expect("drop test schema");
}

/// State whose pool never connects; for requests rejected before any query.
pub fn offline_state(settings: Settings) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://127.0.0.1:1/unreachable")
        .expect("lazy pool");
    AppState::new(pool, settings)
}

/// Number of child rows in `table` that still reference `pokemon_id`.
pub async fn child_rows(state: &AppState, table: &str, pokemon_id: i32) -> i64 {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE pokemon_id = $1",
        state.tables.qualified(table)
    );
    let (n,): (i64,) = sqlx::query_as(&sql)
        .bind(pokemon_id)
        .fetch_one(&state.pool)
        .await
        .expect("count child rows");
    n
}

pub fn pikachu_json() -> Value {
    json!({
        "name": "Pikachu",
        "height": 4,
        "weight": 60,
        "xp": 112,
        "image_url": "http://x/img.png",
        "pokemon_url": "http://x/p/25",
        "abilities": [{"name": "Static", "is_hidden": false}],
        "stats": [{"name": "hp", "base_stat": 35}],
        "types": [{"name": "Electric"}]
    })
}

pub fn input(name: &str) -> PokemonInput {
    PokemonInput {
        name: name.to_string(),
        height: 7,
        weight: 69,
        xp: 64,
        image_url: format!("https://img.example/{}.png", name),
        pokemon_url: format!("https://dex.example/{}", name),
        abilities: vec![
            Ability {
                name: "Overgrow".into(),
                is_hidden: false,
            },
            Ability {
                name: "Chlorophyll".into(),
                is_hidden: true,
            },
        ],
        stats: vec![
            Stat {
                name: "hp".into(),
                base_stat: 45,
            },
            Stat {
                name: "attack".into(),
                base_stat: 49,
            },
        ],
        types: vec![
            Type {
                name: "Grass".into(),
            },
            Type {
                name: "Poison".into(),
            },
        ],
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
