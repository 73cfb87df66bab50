//! # Codeassist AI
//!
//! Routes coding tasks to local models served by Ollama.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   TaskRequest   │ --> │      Agent      │ --> │     Chains      │
//! │ (JSON or text)  │     │ (planner loop)  │     │ explain/gen/tr  │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//!                                                         │
//!                                                 ┌───────┴───────┐
//!                                                 │ ModelRegistry │
//!                                                 │  -> Ollama    │
//!                                                 └───────────────┘
//! ```
//!
//! Every task has its own model and sampling parameters in the
//! [`ModelRegistry`]. Chains turn backend failures into inline
//! `// Error: ...` text; only a missing registry entry is an error.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use codeassist_ai::{Agent, AssistConfig, ModelRegistry, OllamaClient, TaskRequest};
//! use codeassist_style::PreferenceStore;
//!
//! let config = AssistConfig::from_env();
//! let registry = Arc::new(ModelRegistry::with_defaults(Arc::new(OllamaClient::with_url(&config.ollama_url))));
//! registry.validate()?;
//! let mut agent = Agent::from_config(registry, Arc::new(PreferenceStore::open_default()), &config);
//!
//! let response = agent.process_request(TaskRequest::parse(r#"{"type": "generate", "description": "fizzbuzz"}"#)?).await?;
//! ```

mod agent;
mod backend;
mod chain;
mod config;
mod error;
mod memory;
mod ollama;
mod planner;
mod prompt;
mod registry;
mod request;
mod task;
mod tools;

#[cfg(test)]
mod testing;

pub use agent::{Agent, AgentReply, AgentSettings, AgentState, AgentStep, STOPPED_MESSAGE};
pub use backend::ModelBackend;
pub use chain::{
    error_marker, ChainResult, ExplainChain, ExplainRequest, GenerateChain, GenerateRequest,
    TranslateChain, TranslateRequest, DEFAULT_LANGUAGE, ERROR_MARKER_PREFIX,
};
pub use config::{
    AssistConfig, AssistConfigBuilder, ModelConfig, DEFAULT_MAX_STEPS, DEFAULT_MEMORY_WINDOW,
    DEFAULT_PLANNER_MODEL,
};
pub use error::{BackendError, ConfigurationError, ToolError};
pub use memory::{ConversationMemory, Role, Turn};
pub use ollama::{OllamaClient, DEFAULT_OLLAMA_URL};
pub use planner::{parse_reply, PlannerReply, ReplyParseError};
pub use registry::{
    default_model_configs, strip_opening_fence, truncate_at_stop, ModelHandle, ModelRegistry,
};
pub use request::{TaskRequest, TaskResponse};
pub use task::Task;
pub use tools::Tool;
