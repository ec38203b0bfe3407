//! Pokemon record types and the table layout backing them.
//!
//! A Pokemon exclusively owns its abilities, stats and types: every child table
//! carries a `pokemon_id` foreign key with `ON DELETE CASCADE`.

use crate::sql::{qualified_table, quoted};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const POKEMON_NAME_MAX: usize = 15;
pub const URL_MAX: usize = 150;
pub const ABILITY_NAME_MAX: usize = 15;
pub const TYPE_NAME_MAX: usize = 10;

pub const POKEMON_TABLE: &str = "pokemon";
pub const ABILITIES_TABLE: &str = "abilities";
pub const STATS_TABLE: &str = "stats";
pub const TYPES_TABLE: &str = "types";

/// A persisted Pokemon with its children, as returned by every read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Pokemon {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub xp: i32,
    pub image_url: String,
    pub pokemon_url: String,
    #[sqlx(json)]
    pub abilities: Vec<Ability>,
    #[sqlx(json)]
    pub stats: Vec<Stat>,
    #[sqlx(json)]
    pub types: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Stat {
    pub name: String,
    pub base_stat: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Type {
    pub name: String,
}

/// Column layout of a table owned by `pokemon` through `pokemon_id`.
#[derive(Clone, Copy, Debug)]
pub struct ChildTable {
    pub table: &'static str,
    /// Payload columns, in the order they are inserted and serialized.
    pub columns: &'static [&'static str],
    /// JSON key the collection is exposed under on `Pokemon`.
    pub field: &'static str,
}

pub const ABILITIES: ChildTable = ChildTable {
    table: ABILITIES_TABLE,
    columns: &["name", "is_hidden"],
    field: "abilities",
};

pub const STATS: ChildTable = ChildTable {
    table: STATS_TABLE,
    columns: &["name", "base_stat"],
    field: "stats",
};

pub const TYPES: ChildTable = ChildTable {
    table: TYPES_TABLE,
    columns: &["name"],
    field: "types",
};

pub const CHILD_TABLES: [ChildTable; 3] = [ABILITIES, STATS, TYPES];

/// Schema-qualified table names for one PostgreSQL schema.
#[derive(Clone, Debug)]
pub struct Tables {
    pub schema: String,
}

impl Tables {
    pub fn new(schema: impl Into<String>) -> Self {
        Self { schema: schema.into() }
    }

    /// `"schema"."table"`.
    pub fn qualified(&self, table: &str) -> String {
        qualified_table(&self.schema, table)
    }

    pub fn pokemon(&self) -> String {
        self.qualified(POKEMON_TABLE)
    }

    /// DDL for the four tables, in dependency order. Every statement is idempotent.
    pub fn ddl(&self) -> Vec<String> {
        let pokemon = self.pokemon();
        let abilities = self.qualified(ABILITIES_TABLE);
        let stats = self.qualified(STATS_TABLE);
        let types = self.qualified(TYPES_TABLE);
        vec![
            format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&self.schema)),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {pokemon} (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR({name_max}) NOT NULL UNIQUE,
                    height INTEGER NOT NULL,
                    weight INTEGER NOT NULL,
                    xp INTEGER NOT NULL,
                    image_url VARCHAR({url_max}) NOT NULL,
                    pokemon_url VARCHAR({url_max}) NOT NULL
                )
                "#,
                name_max = POKEMON_NAME_MAX,
                url_max = URL_MAX,
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {abilities} (
                    id SERIAL PRIMARY KEY,
                    pokemon_id INTEGER NOT NULL REFERENCES {pokemon} (id) ON DELETE CASCADE,
                    name VARCHAR({ability_max}) NOT NULL,
                    is_hidden BOOLEAN NOT NULL
                )
                "#,
                ability_max = ABILITY_NAME_MAX,
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {stats} (
                    id SERIAL PRIMARY KEY,
                    pokemon_id INTEGER NOT NULL REFERENCES {pokemon} (id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    base_stat INTEGER NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {types} (
                    id SERIAL PRIMARY KEY,
                    pokemon_id INTEGER NOT NULL REFERENCES {pokemon} (id) ON DELETE CASCADE,
                    name VARCHAR({type_max}) NOT NULL
                )
                "#,
                type_max = TYPE_NAME_MAX,
            ),
            format!("CREATE INDEX IF NOT EXISTS abilities_pokemon_id_idx ON {abilities} (pokemon_id)"),
            format!("CREATE INDEX IF NOT EXISTS stats_pokemon_id_idx ON {stats} (pokemon_id)"),
            format!("CREATE INDEX IF NOT EXISTS types_pokemon_id_idx ON {types} (pokemon_id)"),
        ]
    }
}
