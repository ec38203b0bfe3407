//! HTTP handlers for Pokemon CRUD.

pub mod pokemon;
pub use pokemon::*;
