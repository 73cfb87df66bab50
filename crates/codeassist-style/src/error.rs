//! Error types for preference storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading, validating or writing a preference record.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// I/O error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
