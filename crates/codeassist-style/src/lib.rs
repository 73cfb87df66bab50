//! Code style preferences for generated and translated code.
//!
//! The preference record is small and every field has a default, so callers
//! never have to deal with a missing or damaged file: [`PreferenceStore::load`]
//! always returns something usable.

mod error;
pub mod paths;
mod preferences;
mod store;

pub use error::PreferenceError;
pub use preferences::{Indentation, NamingConvention, StylePreferences};
pub use store::PreferenceStore;
