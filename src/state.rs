//! Shared application state for all routes.

use crate::config::Settings;
use crate::schema::Tables;
use crate::service::PokemonService;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tables: Tables,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        Self {
            pool,
            tables: Tables::new(settings.schema.clone()),
            settings: Arc::new(settings),
        }
    }

    pub fn pokemon_service(&self) -> PokemonService {
        PokemonService::new(self.pool.clone(), self.tables.clone())
    }
}
