//! Service configuration: environment-driven settings.

mod settings;
pub use settings::*;
