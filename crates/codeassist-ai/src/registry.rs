//! Task to model routing.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::backend::ModelBackend;
use crate::config::ModelConfig;
use crate::error::{BackendError, ConfigurationError};
use crate::task::Task;

/// The built-in model table.
pub fn default_model_configs() -> IndexMap<Task, ModelConfig> {
    let mut configs = IndexMap::new();
    configs.insert(
        Task::CodeGeneration,
        ModelConfig::new("codellama:7b-instruct")
            .with_temperature(0.2)
            .with_top_p(0.1)
            .with_top_k(40)
            .with_repeat_penalty(1.2)
            .with_stop([
                "```",
                "```python",
                "```javascript",
                "```java",
                "```cpp",
                "# Task:",
                "# System:",
                "# Response",
            ]),
    );
    configs.insert(
        Task::CodeTranslation,
        ModelConfig::new("codellama:7b-instruct")
            .with_temperature(0.1)
            .with_top_p(0.2)
            .with_top_k(40)
            .with_repeat_penalty(1.1)
            .with_stop(["```", "# Task:", "# System:", "# Requirements:", "Original code"]),
    );
    configs.insert(
        Task::CodeExplanation,
        ModelConfig::new("wizardcoder:7b-python")
            .with_temperature(0.3)
            .with_stop(["```"]),
    );
    configs
}

/// Immutable task to model mapping sharing one backend.
///
/// Built once at startup; after that it is only read, so it can sit behind
/// an `Arc` and be used from any number of requests.
pub struct ModelRegistry {
    configs: IndexMap<Task, Arc<ModelConfig>>,
    backend: Arc<dyn ModelBackend>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            configs: IndexMap::new(),
            backend,
        }
    }

    /// A registry loaded with [`default_model_configs`].
    pub fn with_defaults(backend: Arc<dyn ModelBackend>) -> Self {
        default_model_configs()
            .into_iter()
            .fold(Self::new(backend), |registry, (task, config)| {
                registry.register(task, config)
            })
    }

    /// Set the config for a task, replacing any previous one.
    pub fn register(mut self, task: Task, config: ModelConfig) -> Self {
        self.configs.insert(task, Arc::new(config));
        self
    }

    /// Get a handle for a task.
    pub fn get_model(&self, task: Task) -> Result<ModelHandle, ConfigurationError> {
        let config = self
            .configs
            .get(&task)
            .ok_or(ConfigurationError::UnconfiguredTask(task))?;
        debug!("Routing {} to {}", task, config.name);
        Ok(ModelHandle {
            config: Arc::clone(config),
            backend: Arc::clone(&self.backend),
        })
    }

    /// A handle for a model outside the task table, such as the planner.
    pub fn handle_for(&self, config: ModelConfig) -> ModelHandle {
        ModelHandle {
            config: Arc::new(config),
            backend: Arc::clone(&self.backend),
        }
    }

    /// The config registered for a task.
    pub fn config(&self, task: Task) -> Option<&ModelConfig> {
        self.configs.get(&task).map(|c| c.as_ref())
    }

    /// Registered configs in insertion order.
    pub fn configs(&self) -> impl Iterator<Item = (Task, &ModelConfig)> {
        self.configs.iter().map(|(task, config)| (*task, config.as_ref()))
    }

    /// Fail if any task lacks a model.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match Task::ALL.iter().find(|task| !self.configs.contains_key(*task)) {
            Some(task) => Err(ConfigurationError::UnconfiguredTask(*task)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("configs", &self.configs)
            .finish_non_exhaustive()
    }
}

/// A model bound to its sampling config.
#[derive(Clone)]
pub struct ModelHandle {
    config: Arc<ModelConfig>,
    backend: Arc<dyn ModelBackend>,
}

impl ModelHandle {
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run the prompt. An opening code fence is dropped, then output is cut
    /// at the first stop sequence.
    pub async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let raw = self.backend.invoke(prompt, &self.config).await?;
        let body = strip_opening_fence(&raw);
        Ok(truncate_at_stop(body, &self.config.stop).to_string())
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Drop a leading ```` ```lang ```` line so a fenced reply is not cut to
/// nothing by a fence stop.
pub fn strip_opening_fence(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after) = trimmed.strip_prefix("```") else {
        return text;
    };
    match after.split_once('\n') {
        Some((info, rest)) if !info.trim().contains(char::is_whitespace) => rest,
        _ => text,
    }
}

/// Cut `text` at the earliest occurrence of any stop sequence.
pub fn truncate_at_stop<'a>(text: &'a str, stops: &IndexSet<String>) -> &'a str {
    let end = stops
        .iter()
        .filter_map(|stop| text.find(stop.as_str()))
        .min()
        .unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;

    fn registry() -> ModelRegistry {
        ModelRegistry::with_defaults(Arc::new(ScriptedBackend::new()))
    }

    #[test]
    fn test_default_table() {
        let registry = registry();
        registry.validate().unwrap();

        let generation = registry.config(Task::CodeGeneration).unwrap();
        assert_eq!(generation.name, "codellama:7b-instruct");
        assert_eq!(generation.temperature, 0.2);
        assert_eq!(generation.top_p, 0.1);
        assert_eq!(generation.repeat_penalty, 1.2);
        assert_eq!(generation.stop.len(), 8);
        assert_eq!(generation.stop.first().map(String::as_str), Some("```"));

        let translation = registry.config(Task::CodeTranslation).unwrap();
        assert_eq!(translation.temperature, 0.1);
        assert_eq!(translation.top_p, 0.2);
        assert!(translation.stop.contains("Original code"));

        let explanation = registry.config(Task::CodeExplanation).unwrap();
        assert_eq!(explanation.name, "wizardcoder:7b-python");
        assert_eq!(explanation.temperature, 0.3);
        assert_eq!(explanation.top_p, 0.9);
        assert_eq!(explanation.top_k, 40);
        assert_eq!(explanation.repeat_penalty, 1.1);
    }

    #[test]
    fn test_same_handle_config_every_time() {
        let registry = registry();
        let a = registry.get_model(Task::CodeTranslation).unwrap();
        let b = registry.get_model(Task::CodeTranslation).unwrap();
        assert_eq!(a.config(), b.config());
    }

    #[test]
    fn test_unconfigured_task() {
        let registry = ModelRegistry::new(Arc::new(ScriptedBackend::new()))
            .register(Task::CodeGeneration, ModelConfig::new("m"));

        assert_eq!(
            registry.get_model(Task::CodeExplanation).unwrap_err(),
            ConfigurationError::UnconfiguredTask(Task::CodeExplanation)
        );
        assert_eq!(
            registry.validate().unwrap_err(),
            ConfigurationError::UnconfiguredTask(Task::CodeTranslation)
        );
    }

    #[test]
    fn test_configs_in_order() {
        let tasks: Vec<Task> = registry().configs().map(|(task, _)| task).collect();
        assert_eq!(tasks, Task::ALL.to_vec());
    }

    #[test]
    fn test_truncate_at_earliest_stop() {
        let stops: IndexSet<String> = ["# Task:", "```"].iter().map(|s| s.to_string()).collect();
        assert_eq!(truncate_at_stop("a = 1\n```\n# Task: more", &stops), "a = 1\n");
        assert_eq!(truncate_at_stop("no stops here", &stops), "no stops here");
        assert_eq!(truncate_at_stop("```", &stops), "");
        assert_eq!(truncate_at_stop("x", &IndexSet::new()), "x");
    }

    #[test]
    fn test_strip_opening_fence() {
        assert_eq!(strip_opening_fence("```python\nx = 1\n```"), "x = 1\n```");
        assert_eq!(strip_opening_fence("  ```\nx\n"), "x\n");
        assert_eq!(strip_opening_fence("x = 1\n```"), "x = 1\n```");
        assert_eq!(strip_opening_fence("``` not a fence line\nx"), "``` not a fence line\nx");
        assert_eq!(strip_opening_fence("```"), "```");
    }

    #[tokio::test]
    async fn test_handle_keeps_fenced_reply_body() {
        let backend =
            Arc::new(ScriptedBackend::new().reply("```python\nprint('hello world')\n```"));
        let registry = ModelRegistry::with_defaults(backend);
        let handle = registry.get_model(Task::CodeGeneration).unwrap();

        let out = handle.invoke("prompt").await.unwrap();
        assert_eq!(out, "print('hello world')\n");
    }

    #[tokio::test]
    async fn test_handle_applies_stops() {
        let backend = Arc::new(ScriptedBackend::new().reply("def f():\n    pass\n```\nextra"));
        let registry = ModelRegistry::with_defaults(backend.clone());
        let handle = registry.get_model(Task::CodeGeneration).unwrap();

        let out = handle.invoke("prompt").await.unwrap();
        assert_eq!(out, "def f():\n    pass\n");
        assert_eq!(backend.calls()[0].1, "codellama:7b-instruct");
    }
}
