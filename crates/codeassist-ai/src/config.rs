//! Model and assistant configuration.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::ollama::DEFAULT_OLLAMA_URL;

/// Model used by the planner unless overridden.
pub const DEFAULT_PLANNER_MODEL: &str = "codellama:7b-instruct";

/// Upper bound on planner iterations per free-form request.
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Turns of history shown to the planner.
pub const DEFAULT_MEMORY_WINDOW: usize = 10;

/// Sampling parameters for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier, e.g. `codellama:7b-instruct`
    pub name: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    /// Output is cut at the first occurrence of any of these
    #[serde(default)]
    pub stop: IndexSet<String>,
}

impl ModelConfig {
    /// A config with default sampling and no stop sequences.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: 0.1,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            stop: IndexSet::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_repeat_penalty(mut self, penalty: f32) -> Self {
        self.repeat_penalty = penalty;
        self
    }

    /// Append stop sequences. Duplicates and empty strings are dropped.
    pub fn with_stop<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop.extend(
            stops
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty()),
        );
        self
    }
}

/// Process-wide settings for the assistant.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Ollama server URL
    pub ollama_url: String,
    /// Preference file; `None` means the default location
    pub preferences_path: Option<PathBuf>,
    /// Model the agent plans with
    pub planner_model: String,
    /// Planner iterations before giving up
    pub max_steps: usize,
    /// History turns the planner sees
    pub memory_window: usize,
    /// Per-request timeout for backend calls
    pub request_timeout: Option<Duration>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            preferences_path: None,
            planner_model: DEFAULT_PLANNER_MODEL.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
            memory_window: DEFAULT_MEMORY_WINDOW,
            request_timeout: None,
        }
    }
}

impl AssistConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ollama_url = std::env::var("CODEASSIST_OLLAMA_URL")
            .or_else(|_| std::env::var("OLLAMA_HOST"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.ollama_url);

        let preferences_path = std::env::var("CODEASSIST_PREFERENCES")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let planner_model =
            std::env::var("CODEASSIST_PLANNER_MODEL").unwrap_or(defaults.planner_model);

        let max_steps = env_number("CODEASSIST_MAX_STEPS")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_steps);

        let memory_window = env_number("CODEASSIST_MEMORY_WINDOW").unwrap_or(defaults.memory_window);

        let request_timeout = env_number("CODEASSIST_TIMEOUT_SECS")
            .filter(|n| *n > 0)
            .map(|secs| Duration::from_secs(secs as u64));

        Self {
            ollama_url,
            preferences_path,
            planner_model,
            max_steps,
            memory_window,
            request_timeout,
        }
    }

    /// Planner sampling: deterministic, stopping before a made-up observation.
    pub fn planner_config(&self) -> ModelConfig {
        ModelConfig::new(self.planner_model.clone())
            .with_temperature(0.0)
            .with_stop(["Observation:"])
    }

    /// Create a builder for configuration.
    pub fn builder() -> AssistConfigBuilder {
        AssistConfigBuilder::default()
    }
}

fn env_number(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for assistant configuration.
#[derive(Debug, Default)]
pub struct AssistConfigBuilder {
    config: AssistConfig,
}

impl AssistConfigBuilder {
    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama_url = url.into();
        self
    }

    pub fn preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.preferences_path = Some(path.into());
        self
    }

    pub fn planner_model(mut self, model: impl Into<String>) -> Self {
        self.config.planner_model = model.into();
        self
    }

    pub fn max_steps(mut self, steps: usize) -> Self {
        self.config.max_steps = steps.max(1);
        self
    }

    pub fn memory_window(mut self, turns: usize) -> Self {
        self.config.memory_window = turns;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> AssistConfig {
        self.config
    }
}
