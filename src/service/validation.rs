//! Request validation: untyped JSON payloads into typed Pokemon input.
//!
//! Every violation is collected so the caller can report them all at once.

use crate::schema::{Ability, Stat, Type, ABILITY_NAME_MAX, POKEMON_NAME_MAX, TYPE_NAME_MAX, URL_MAX};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// One field-level violation. `field` uses `abilities[0].name` notation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// True if some violation was reported for exactly `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        ValidationErrors(errors)
    }
}

/// Validated body of POST /pokemon and PUT /pokemon/id/{id}.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct PokemonInput {
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub xp: i32,
    pub image_url: String,
    pub pokemon_url: String,
    pub abilities: Vec<Ability>,
    pub stats: Vec<Stat>,
    pub types: Vec<Type>,
}

/// Integer value of a JSON number, including floats with no fractional part (`4.0`).
fn as_integer(v: &Value) -> Option<i64> {
    let Value::Number(n) = v else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Accumulates violations while walking a payload.
#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required<'a>(&mut self, obj: &'a Map<String, Value>, key: &str, path: &str) -> Option<&'a Value> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.push(path, "is required");
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Non-empty string, at most `max` characters when bounded.
    fn string(&mut self, obj: &Map<String, Value>, key: &str, path: &str, max: Option<usize>) -> Option<String> {
        let v = self.required(obj, key, path)?;
        let Some(s) = v.as_str() else {
            self.push(path, "must be a string");
            return None;
        };
        let len = s.chars().count();
        if len == 0 {
            self.push(path, "must not be empty");
            return None;
        }
        if let Some(max) = max {
            if len > max {
                self.push(path, format!("must be at most {} characters", max));
                return None;
            }
        }
        Some(s.to_string())
    }

    fn integer(&mut self, obj: &Map<String, Value>, key: &str, path: &str, min: i64) -> Option<i32> {
        let v = self.required(obj, key, path)?;
        let Some(n) = as_integer(v) else {
            self.push(path, "must be an integer");
            return None;
        };
        if n < min {
            self.push(path, format!("must be at least {}", min));
            return None;
        }
        match i32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                self.push(path, format!("must be at most {}", i32::MAX));
                None
            }
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<bool> {
        let v = self.required(obj, key, path)?;
        match v.as_bool() {
            Some(b) => Some(b),
            None => {
                self.push(path, "must be a boolean");
                None
            }
        }
    }

    fn url(&mut self, obj: &Map<String, Value>, key: &str) -> Option<String> {
        let s = self.string(obj, key, key, Some(URL_MAX))?;
        match url::Url::parse(&s) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Some(s),
            Ok(_) => {
                self.push(key, "must be an http or https URL");
                None
            }
            Err(e) => {
                self.push(key, format!("must be a valid URL ({})", e));
                None
            }
        }
    }

    /// Walk an array of objects, validating each with `item`. Returns None if anything failed.
    fn list<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        mut item: impl FnMut(&mut Self, &Map<String, Value>, &str) -> Option<T>,
    ) -> Option<Vec<T>> {
        let v = self.required(obj, key, key)?;
        let Some(arr) = v.as_array() else {
            self.push(key, "must be an array");
            return None;
        };
        let mut out = Vec::with_capacity(arr.len());
        let mut ok = true;
        for (i, entry) in arr.iter().enumerate() {
            let path = format!("{}[{}]", key, i);
            let Some(entry) = entry.as_object() else {
                self.push(&path, "must be an object");
                ok = false;
                continue;
            };
            match item(self, entry, &path) {
                Some(t) => out.push(t),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(v) if self.errors.is_empty() => Ok(v),
            _ => Err(ValidationErrors(self.errors)),
        }
    }
}

fn ability(c: &mut Collector, obj: &Map<String, Value>, path: &str) -> Option<Ability> {
    let name = c.string(obj, "name", &format!("{}.name", path), Some(ABILITY_NAME_MAX));
    let is_hidden = c.boolean(obj, "is_hidden", &format!("{}.is_hidden", path));
    Some(Ability {
        name: name?,
        is_hidden: is_hidden?,
    })
}

fn stat(c: &mut Collector, obj: &Map<String, Value>, path: &str) -> Option<Stat> {
    let name = c.string(obj, "name", &format!("{}.name", path), None);
    let base_stat = c.integer(obj, "base_stat", &format!("{}.base_stat", path), i32::MIN as i64);
    Some(Stat {
        name: name?,
        base_stat: base_stat?,
    })
}

fn pokemon_type(c: &mut Collector, obj: &Map<String, Value>, path: &str) -> Option<Type> {
    let name = c.string(obj, "name", &format!("{}.name", path), Some(TYPE_NAME_MAX))?;
    Some(Type { name })
}

/// Validate a POST/PUT body. Pure: no I/O, every violation reported.
pub fn validate_pokemon(body: &Value) -> Result<PokemonInput, ValidationErrors> {
    let mut c = Collector::default();
    let Some(obj) = body.as_object() else {
        c.push("body", "must be a JSON object");
        return c.finish(None);
    };
    let name = c.string(obj, "name", "name", Some(POKEMON_NAME_MAX));
    let height = c.integer(obj, "height", "height", 0);
    let weight = c.integer(obj, "weight", "weight", 0);
    let xp = c.integer(obj, "xp", "xp", 0);
    let image_url = c.url(obj, "image_url");
    let pokemon_url = c.url(obj, "pokemon_url");
    let abilities = c.list(obj, "abilities", ability);
    let stats = c.list(obj, "stats", stat);
    let types = c.list(obj, "types", pokemon_type);

    let input = (|| {
        Some(PokemonInput {
            name: name?,
            height: height?,
            weight: weight?,
            xp: xp?,
            image_url: image_url?,
            pokemon_url: pokemon_url?,
            abilities: abilities?,
            stats: stats?,
            types: types?,
        })
    })();
    c.finish(input)
}

/// Validated pagination window. `page` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    offset: i64,
}

impl PageRequest {
    /// Rejects `page < 1`, `limit < 1`, `limit` above `max_limit` when a cap is set,
    /// and windows whose offset does not fit in a BIGINT. Never clamps.
    pub fn new(page: i64, limit: i64, max_limit: Option<u32>) -> Result<Self, ValidationErrors> {
        Self::check(Collector::default(), Some(page), Some(limit), max_limit)
    }

    /// Build from raw query-string values. Absent values fall back to page 1 and `default_limit`.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: Option<u32>,
    ) -> Result<Self, ValidationErrors> {
        let mut c = Collector::default();
        let page = query_integer(&mut c, "page", page, 1);
        let limit = query_integer(&mut c, "limit", limit, default_limit as i64);
        Self::check(c, page, limit, max_limit)
    }

    fn check(
        mut c: Collector,
        page: Option<i64>,
        limit: Option<i64>,
        max_limit: Option<u32>,
    ) -> Result<Self, ValidationErrors> {
        let page = page.and_then(|page| {
            if page < 1 {
                c.push("page", "must be at least 1");
                None
            } else if page > u32::MAX as i64 {
                c.push("page", format!("must be at most {}", u32::MAX));
                None
            } else {
                Some(page as u32)
            }
        });
        let cap = max_limit.unwrap_or(u32::MAX);
        let limit = limit.and_then(|limit| {
            if limit < 1 {
                c.push("limit", "must be at least 1");
                None
            } else if limit > cap as i64 {
                c.push("limit", format!("must be at most {}", cap));
                None
            } else {
                Some(limit as u32)
            }
        });
        let req = match (page, limit) {
            (Some(page), Some(limit)) => match (page as i64 - 1).checked_mul(limit as i64) {
                Some(offset) => Some(PageRequest { page, limit, offset }),
                None => {
                    c.push("page", "is too large for the requested limit");
                    None
                }
            },
            _ => None,
        };
        c.finish(req)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

fn query_integer(c: &mut Collector, field: &str, raw: Option<&str>, default: i64) -> Option<i64> {
    let Some(raw) = raw else {
        return Some(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            c.push(field, "must be an integer");
            None
        }
    }
}
