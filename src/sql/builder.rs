//! Builds the parameterized statements used by the Pokemon service.

use crate::schema::{ChildTable, Tables, CHILD_TABLES};

/// Columns of `pokemon` that the caller writes; `id` is assigned by the store.
pub const POKEMON_COLUMNS: [&str; 6] = ["name", "height", "weight", "xp", "image_url", "pokemon_url"];

const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL (safe: only from schema constants and validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// Scalar subquery aggregating one child collection into a JSON array, in insertion order.
fn child_subquery(tables: &Tables, child: &ChildTable) -> String {
    let pairs = child
        .columns
        .iter()
        .map(|c| format!("'{}', c.{}", c, quoted(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "(SELECT COALESCE(json_agg(json_build_object({}) ORDER BY c.id), '[]'::json) FROM {} c WHERE c.pokemon_id = {}.id) AS {}",
        pairs,
        tables.qualified(child.table),
        MAIN_ALIAS,
        quoted(child.field)
    )
}

/// SELECT pokemon with all child collections in a single query; `tail` is appended verbatim.
fn select_with_children(tables: &Tables, tail: &str) -> String {
    let mut select_parts = vec![format!("{}.id", MAIN_ALIAS)];
    select_parts.extend(POKEMON_COLUMNS.iter().map(|c| format!("{}.{}", MAIN_ALIAS, quoted(c))));
    select_parts.extend(CHILD_TABLES.iter().map(|child| child_subquery(tables, child)));
    format!(
        "SELECT {} FROM {} {}{}",
        select_parts.join(", "),
        tables.pokemon(),
        MAIN_ALIAS,
        tail
    )
}

/// SELECT one pokemon by id. Param: $1 id.
pub fn select_by_id(tables: &Tables) -> String {
    select_with_children(tables, &format!(" WHERE {}.id = $1", MAIN_ALIAS))
}

/// SELECT one pokemon by exact name. Param: $1 name.
pub fn select_by_name(tables: &Tables) -> String {
    select_with_children(tables, &format!(" WHERE {}.{} = $1", MAIN_ALIAS, quoted("name")))
}

/// SELECT a page ordered by id. Params: $1 limit, $2 offset.
pub fn select_page(tables: &Tables) -> String {
    select_with_children(tables, &format!(" ORDER BY {}.id LIMIT $1 OFFSET $2", MAIN_ALIAS))
}

pub fn count(tables: &Tables) -> String {
    format!("SELECT COUNT(*) FROM {}", tables.pokemon())
}

/// INSERT pokemon scalars. Params: $1..$6 in `POKEMON_COLUMNS` order.
pub fn insert_pokemon(tables: &Tables) -> String {
    let cols: Vec<String> = POKEMON_COLUMNS.iter().map(|c| quoted(c)).collect();
    let placeholders: Vec<String> = (1..=POKEMON_COLUMNS.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        tables.pokemon(),
        cols.join(", "),
        placeholders.join(", ")
    )
}

/// UPDATE every pokemon scalar by id. Params: $1..$6 in `POKEMON_COLUMNS` order, $7 id.
pub fn update_pokemon(tables: &Tables) -> String {
    let sets: Vec<String> = POKEMON_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quoted(c), i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        tables.pokemon(),
        sets.join(", "),
        POKEMON_COLUMNS.len() + 1
    )
}

/// Prefix of a multi-row child INSERT; values are pushed by the caller.
pub fn insert_children_prefix(tables: &Tables, child: &ChildTable) -> String {
    let mut cols = vec![quoted("pokemon_id")];
    cols.extend(child.columns.iter().map(|c| quoted(c)));
    format!("INSERT INTO {} ({}) ", tables.qualified(child.table), cols.join(", "))
}

/// DELETE every child row of one pokemon. Param: $1 pokemon id.
pub fn delete_children(tables: &Tables, child: &ChildTable) -> String {
    format!("DELETE FROM {} WHERE pokemon_id = $1", tables.qualified(child.table))
}

/// DELETE pokemon by id. Param: $1 id.
pub fn delete_pokemon(tables: &Tables) -> String {
    format!("DELETE FROM {} WHERE id = $1", tables.pokemon())
}
