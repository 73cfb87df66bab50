//! Error types for model routing, backends and tools.

use thiserror::Error;

use crate::task::Task;

/// The registry cannot serve a task. Fatal for the request that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no model configured for task: {0}")]
    UnconfiguredTask(Task),
}

/// Errors from the model runtime.
///
/// Chains never let these escape; they become inline error markers.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Ollama API error: {0}")]
    Api(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Ollama server not running at {0}. Start it with: ollama serve")]
    ServerNotRunning(String),
    #[error("Model '{0}' not found. Pull it with: ollama pull {0}")]
    ModelNotFound(String),
}

/// Errors raised while running an agent tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input for {tool}: {source}")]
    InvalidInput {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
