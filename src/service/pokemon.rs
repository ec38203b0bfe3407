//! Pokemon persistence against PostgreSQL.
//!
//! Every mutation runs in one transaction. A `Transaction` that is dropped
//! without `commit` rolls back, so any early `?` return leaves the store untouched.

use crate::error::{is_unique_violation, AppError};
use crate::schema::{Pokemon, Tables, ABILITIES, STATS, TYPES};
use crate::service::{PageRequest, PokemonInput};
use crate::sql;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};

/// CRUD over `pokemon` and its child tables. Cheap to clone: holds a pool handle, never a connection.
#[derive(Clone, Debug)]
pub struct PokemonService {
    pool: PgPool,
    tables: Tables,
}

impl PokemonService {
    pub fn new(pool: PgPool, tables: Tables) -> Self {
        Self { pool, tables }
    }

    /// Fetch one Pokemon with children by id. Absence is `Ok(None)`.
    pub async fn fetch_by_id(&self, id: i32) -> Result<Option<Pokemon>, AppError> {
        let q = sql::select_by_id(&self.tables);
        tracing::debug!(sql = %q, id, "query");
        let row = sqlx::query_as::<_, Pokemon>(&q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Fetch one Pokemon with children by exact name. Absence is `Ok(None)`.
    pub async fn fetch_by_name(&self, name: &str) -> Result<Option<Pokemon>, AppError> {
        let q = sql::select_by_name(&self.tables);
        tracing::debug!(sql = %q, name, "query");
        let row = sqlx::query_as::<_, Pokemon>(&q)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// One page ordered by id. A page past the end is an empty list.
    pub async fn fetch_all(&self, page: PageRequest) -> Result<Vec<Pokemon>, AppError> {
        let q = sql::select_page(&self.tables);
        tracing::debug!(sql = %q, page = page.page(), limit = page.limit(), "query");
        let rows = sqlx::query_as::<_, Pokemon>(&q)
            .bind(page.limit() as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let q = sql::count(&self.tables);
        let (n,): (i64,) = sqlx::query_as(&q).fetch_one(&self.pool).await?;
        Ok(n)
    }

    /// Insert a Pokemon and its children. Returns the generated id.
    pub async fn create(&self, input: &PokemonInput) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;
        let q = sql::insert_pokemon(&self.tables);
        tracing::debug!(sql = %q, name = %input.name, "query (tx)");
        let row = bind_scalars(sqlx::query(&q), input)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_or_db(e, &input.name))?;
        let id: i32 = row.try_get("id")?;
        self.insert_children(&mut tx, id, input).await?;
        tx.commit().await?;
        tracing::info!(id, name = %input.name, "pokemon created");
        Ok(id)
    }

    /// Replace every scalar and every child collection of `id`.
    pub async fn update(&self, id: i32, input: &PokemonInput) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let q = sql::update_pokemon(&self.tables);
        tracing::debug!(sql = %q, id, "query (tx)");
        let result = bind_scalars(sqlx::query(&q), input)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_or_db(e, &input.name))?;
        if result.rows_affected() == 0 {
            return Err(AppError::pokemon_not_found());
        }
        self.delete_children(&mut tx, id).await?;
        self.insert_children(&mut tx, id, input).await?;
        tx.commit().await?;
        tracing::info!(id, name = %input.name, "pokemon updated");
        Ok(())
    }

    /// Delete children then the Pokemon. Returns false if no such id existed.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        self.delete_children(&mut tx, id).await?;
        let q = sql::delete_pokemon(&self.tables);
        tracing::debug!(sql = %q, id, "query (tx)");
        let result = sqlx::query(&q).bind(id).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        tx.commit().await?;
        tracing::info!(id, "pokemon deleted");
        Ok(true)
    }

    async fn delete_children(&self, conn: &mut PgConnection, id: i32) -> Result<(), AppError> {
        for child in [ABILITIES, STATS, TYPES] {
            let q = sql::delete_children(&self.tables, &child);
            sqlx::query(&q).bind(id).execute(&mut *conn).await?;
        }
        Ok(())
    }

    async fn insert_children(&self, conn: &mut PgConnection, id: i32, input: &PokemonInput) -> Result<(), AppError> {
        if !input.abilities.is_empty() {
            let mut qb = QueryBuilder::<Postgres>::new(sql::insert_children_prefix(&self.tables, &ABILITIES));
            qb.push_values(&input.abilities, |mut b, a| {
                b.push_bind(id).push_bind(a.name.as_str()).push_bind(a.is_hidden);
            });
            qb.build().execute(&mut *conn).await?;
        }
        if !input.stats.is_empty() {
            let mut qb = QueryBuilder::<Postgres>::new(sql::insert_children_prefix(&self.tables, &STATS));
            qb.push_values(&input.stats, |mut b, s| {
                b.push_bind(id).push_bind(s.name.as_str()).push_bind(s.base_stat);
            });
            qb.build().execute(&mut *conn).await?;
        }
        if !input.types.is_empty() {
            let mut qb = QueryBuilder::<Postgres>::new(sql::insert_children_prefix(&self.tables, &TYPES));
            qb.push_values(&input.types, |mut b, t| {
                b.push_bind(id).push_bind(t.name.as_str());
            });
            qb.build().execute(&mut *conn).await?;
        }
        Ok(())
    }
}

/// Bind the six scalar columns in `sql::POKEMON_COLUMNS` order.
fn bind_scalars<'q>(q: Query<'q, Postgres, PgArguments>, input: &'q PokemonInput) -> Query<'q, Postgres, PgArguments> {
    q.bind(input.name.as_str())
        .bind(input.height)
        .bind(input.weight)
        .bind(input.xp)
        .bind(input.image_url.as_str())
        .bind(input.pokemon_url.as_str())
}

fn conflict_or_db(err: sqlx::Error, name: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(format!("Pokemon with name '{}' already exists", name))
    } else {
        AppError::Db(err)
    }
}
