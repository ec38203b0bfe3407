//! Safe SQL builder: identifiers from schema constants only, values as parameters.

mod builder;
pub use builder::*;
