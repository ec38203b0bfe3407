//! Runtime settings loaded from the environment (and `.env` via dotenvy in the binary).

use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/pokedex";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// PostgreSQL schema holding the Pokemon tables. Must be a plain identifier.
    pub schema: String,
    pub max_connections: u32,
    /// `limit` used by GET /pokemon when the query string omits it.
    pub default_page_limit: u32,
    /// Largest accepted `limit`. `None` means uncapped.
    pub max_page_limit: Option<u32>,
    pub body_limit_bytes: usize,
    /// Create the database named in `database_url` when it does not exist.
    pub create_database: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: ([0, 0, 0, 0], 8000).into(),
            schema: DEFAULT_SCHEMA.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            create_database: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or empty keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let database_url = get("DATABASE_URL").unwrap_or(defaults.database_url);
        let bind_addr = match get("POKEDEX_BIND_ADDR") {
            Some(v) => parse("POKEDEX_BIND_ADDR", &v)?,
            None => parse("POKEDEX_BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };
        let schema = get("POKEDEX_SCHEMA").unwrap_or(defaults.schema);
        validate_schema_name(&schema)?;
        let max_connections = match get("POKEDEX_DB_MAX_CONNECTIONS") {
            Some(v) => positive("POKEDEX_DB_MAX_CONNECTIONS", &v)?,
            None => defaults.max_connections,
        };
        let default_page_limit = match get("POKEDEX_DEFAULT_PAGE_LIMIT") {
            Some(v) => positive("POKEDEX_DEFAULT_PAGE_LIMIT", &v)?,
            None => defaults.default_page_limit,
        };
        let max_page_limit = match get("POKEDEX_MAX_PAGE_LIMIT") {
            Some(v) => Some(positive("POKEDEX_MAX_PAGE_LIMIT", &v)?),
            None => None,
        };
        if let Some(max) = max_page_limit {
            if default_page_limit > max {
                return Err(ConfigError::Invalid {
                    key: "POKEDEX_DEFAULT_PAGE_LIMIT",
                    message: format!("{} exceeds POKEDEX_MAX_PAGE_LIMIT {}", default_page_limit, max),
                });
            }
        }
        let body_limit_bytes = match get("POKEDEX_BODY_LIMIT_BYTES") {
            Some(v) => parse("POKEDEX_BODY_LIMIT_BYTES", &v)?,
            None => defaults.body_limit_bytes,
        };
        let create_database = match get("POKEDEX_CREATE_DATABASE") {
            Some(v) => parse_bool("POKEDEX_CREATE_DATABASE", &v)?,
            None => defaults.create_database,
        };

        Ok(Settings {
            database_url,
            bind_addr,
            schema,
            max_connections,
            default_page_limit,
            max_page_limit,
            body_limit_bytes,
            create_database,
        })
    }
}

fn parse<T>(key: &'static str, v: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    v.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

fn positive(key: &'static str, v: &str) -> Result<u32, ConfigError> {
    let n: u32 = parse(key, v)?;
    if n == 0 {
        return Err(ConfigError::Invalid {
            key,
            message: "must be at least 1".into(),
        });
    }
    Ok(n)
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            message: format!("expected a boolean, got '{}'", v),
        }),
    }
}

/// Schema names are interpolated into DDL, so only plain identifiers are allowed.
pub fn validate_schema_name(name: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    if !re.is_match(name) {
        return Err(ConfigError::Invalid {
            key: "POKEDEX_SCHEMA",
            message: format!("'{}' is not a valid PostgreSQL identifier", name),
        });
    }
    Ok(())
}
