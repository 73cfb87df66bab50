//! The seam between chains and the model runtime.

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::BackendError;

/// Something that turns a prompt into text under a given model config.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn invoke(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError>;
}
