//! Request extractors.

mod service;
pub use service::Pokedex;
