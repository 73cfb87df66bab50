//! Prompt-to-model pipelines for the three tasks.
//!
//! A chain never fails because the model did: backend errors come back as an
//! inline `// Error: ...` marker and empty output as the task's empty marker.
//! Only a missing registry entry is reported as an error.

use std::fmt;
use std::sync::Arc;

use codeassist_lexer::detect_language;
use codeassist_style::{PreferenceStore, StylePreferences};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigurationError;
use crate::prompt;
use crate::registry::ModelRegistry;
use crate::task::Task;

/// Prefix of the text a chain returns when the backend failed.
pub const ERROR_MARKER_PREFIX: &str = "// Error:";

/// Language used when a request names none.
pub const DEFAULT_LANGUAGE: &str = "python";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Format a failure as an error marker.
pub fn error_marker(err: &impl fmt::Display) -> String {
    format!("{} {}", ERROR_MARKER_PREFIX, err)
}

/// What a chain produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    /// Model output, or a marker
    pub text: String,
    /// Language of `text` (or of the explained code)
    pub language: String,
    /// Detected or given source language, for translations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

impl ChainResult {
    /// Whether the text is an error marker.
    pub fn is_error(&self) -> bool {
        self.text.starts_with(ERROR_MARKER_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub code: String,
    /// Detected from the code when absent
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Overrides the stored preferences for this request
    #[serde(default)]
    pub style: Option<StylePreferences>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub code: String,
    /// Detected from the code when absent
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default = "default_language")]
    pub target_language: String,
    /// Overrides the stored preferences for this request
    #[serde(default)]
    pub style: Option<StylePreferences>,
}

/// Explains code in natural language.
#[derive(Debug, Clone)]
pub struct ExplainChain {
    registry: Arc<ModelRegistry>,
}

impl ExplainChain {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub async fn run(&self, request: &ExplainRequest) -> Result<ChainResult, ConfigurationError> {
        let language = given_or_detected(request.language.as_deref(), &request.code);
        let text = execute(&self.registry, Task::CodeExplanation, &request.code, || {
            prompt::build_explain_prompt(&request.code, &language)
        })
        .await?;

        Ok(ChainResult {
            text,
            language,
            source_language: None,
        })
    }
}

/// Writes code from a description.
pub struct GenerateChain {
    registry: Arc<ModelRegistry>,
    preferences: Arc<PreferenceStore>,
}

impl GenerateChain {
    pub fn new(registry: Arc<ModelRegistry>, preferences: Arc<PreferenceStore>) -> Self {
        Self {
            registry,
            preferences,
        }
    }

    pub async fn run(&self, request: &GenerateRequest) -> Result<ChainResult, ConfigurationError> {
        let language = request.language.trim().to_string();
        let style = resolve_style(request.style.as_ref(), &self.preferences);
        let text = execute(&self.registry, Task::CodeGeneration, &request.description, || {
            prompt::build_generate_prompt(&request.description, &language, &style)
        })
        .await?;

        Ok(ChainResult {
            text,
            language,
            source_language: None,
        })
    }
}

/// Rewrites code in another language.
pub struct TranslateChain {
    registry: Arc<ModelRegistry>,
    preferences: Arc<PreferenceStore>,
}

impl TranslateChain {
    pub fn new(registry: Arc<ModelRegistry>, preferences: Arc<PreferenceStore>) -> Self {
        Self {
            registry,
            preferences,
        }
    }

    pub async fn run(&self, request: &TranslateRequest) -> Result<ChainResult, ConfigurationError> {
        let source = given_or_detected(request.source_language.as_deref(), &request.code);
        let target = request.target_language.clone();
        let style = resolve_style(request.style.as_ref(), &self.preferences);
        let text = execute(&self.registry, Task::CodeTranslation, &request.code, || {
            prompt::build_translate_prompt(&request.code, &source, &target, &style)
        })
        .await?;

        Ok(ChainResult {
            text,
            language: target,
            source_language: Some(source),
        })
    }
}

fn given_or_detected(given: Option<&str>, code: &str) -> String {
    match given.map(str::trim).filter(|l| !l.is_empty()) {
        Some(language) => language.to_string(),
        None => detect_language(code),
    }
}

fn resolve_style(
    explicit: Option<&StylePreferences>,
    store: &PreferenceStore,
) -> StylePreferences {
    match explicit {
        Some(style) if style.validate().is_ok() => style.clone(),
        Some(_) => {
            warn!("Ignoring invalid style override, using stored preferences");
            store.load()
        }
        None => store.load(),
    }
}

/// Shared body of every chain: route, short-circuit blank input, invoke,
/// normalize.
async fn execute(
    registry: &ModelRegistry,
    task: Task,
    input: &str,
    build_prompt: impl FnOnce() -> String,
) -> Result<String, ConfigurationError> {
    let handle = registry.get_model(task)?;

    if input.trim().is_empty() {
        debug!("Empty input for {}, skipping model call", task);
        return Ok(task.empty_output_marker().to_string());
    }

    match handle.invoke(&build_prompt()).await {
        Ok(raw) => {
            let text = raw.trim();
            if text.is_empty() {
                Ok(task.empty_output_marker().to_string())
            } else {
                Ok(text.to_string())
            }
        }
        Err(e) => {
            warn!("{} failed on {}: {}", task, handle.config().name, e);
            Ok(error_marker(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama::OllamaClient;
    use crate::registry::ModelRegistry;
    use crate::testing::ScriptedBackend;
    use codeassist_lexer::detect_language;
    use codeassist_style::NamingConvention;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        backend: Arc<ScriptedBackend>,
        registry: Arc<ModelRegistry>,
        preferences: Arc<PreferenceStore>,
        _dir: TempDir,
    }

    fn fixture(backend: ScriptedBackend) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(backend);
        Fixture {
            registry: Arc::new(ModelRegistry::with_defaults(backend.clone())),
            preferences: Arc::new(PreferenceStore::new(dir.path().join("style.json"))),
            backend,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_explain_detects_language() {
        let f = fixture(ScriptedBackend::new().reply("  It prints a greeting.\n"));
        let chain = ExplainChain::new(f.registry.clone());

        let result = chain
            .run(&ExplainRequest {
                code: "print('hello')".to_string(),
                language: None,
            })
            .await
            .unwrap();

        assert_eq!(result.text, "It prints a greeting.");
        assert_eq!(result.language, "python");
        assert_eq!(f.backend.calls()[0].1, "wizardcoder:7b-python");
    }

    #[tokio::test]
    async fn test_explain_empty_code_skips_backend() {
        let f = fixture(ScriptedBackend::new());
        let chain = ExplainChain::new(f.registry.clone());

        let result = chain.run(&ExplainRequest::default()).await.unwrap();

        assert_eq!(result.text, "No explanation generated.");
        assert_eq!(result.language, "unknown");
        assert!(f.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_truncates_at_fence() {
        let f = fixture(ScriptedBackend::new().reply(
            "function reverse(s) {\n  return s.split('').reverse().join('');\n}\n```\nThis reverses",
        ));
        let chain = GenerateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&GenerateRequest {
                description: "reverse a string".to_string(),
                language: "javascript".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(
            result.text,
            "function reverse(s) {\n  return s.split('').reverse().join('');\n}"
        );
        assert_eq!(result.language, "javascript");
        assert!(!result.text.contains("```"));
    }

    #[tokio::test]
    async fn test_generate_passes_other_language_through() {
        let f = fixture(ScriptedBackend::new().reply("fn main() { println!(\"hi\"); }"));
        let chain = GenerateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&GenerateRequest {
                description: "say hi".to_string(),
                language: "python".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.text, "fn main() { println!(\"hi\"); }");
        assert_eq!(result.language, "python");
    }

    #[tokio::test]
    async fn test_generate_scenario_no_stop_sequences() {
        let f = fixture(ScriptedBackend::new().reply(
            "```python\nprint('hello world')\n```\n# Task: say goodbye\n```javascript\nconsole.log('bye')",
        ));
        let chain = GenerateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&GenerateRequest {
                description: "print hello world".to_string(),
                language: "python".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.text, "print('hello world')");
        let stops = &f.registry.config(Task::CodeGeneration).unwrap().stop;
        assert!(!stops.is_empty());
        for stop in stops {
            assert!(!result.text.contains(stop.as_str()), "found stop {:?}", stop);
        }
    }

    #[tokio::test]
    async fn test_translate_source_equals_detector() {
        let f = fixture(ScriptedBackend::new().reply("console.log('hi');"));
        let chain = TranslateChain::new(f.registry.clone(), f.preferences.clone());
        let code = "print('hi')";

        let result = chain
            .run(&TranslateRequest {
                code: code.to_string(),
                source_language: None,
                target_language: "javascript".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.source_language, Some(detect_language(code)));
        assert_eq!(result.source_language.as_deref(), Some("python"));
        assert_eq!(result.language, "javascript");
        assert!(!result.text.is_empty());
        assert!(f.backend.prompts()[0].contains("Translate the python code"));
    }

    #[tokio::test]
    async fn test_translate_target_taken_verbatim() {
        let f = fixture(ScriptedBackend::new().reply("x"));
        let chain = TranslateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&TranslateRequest {
                code: "x = 1".to_string(),
                source_language: Some("python".to_string()),
                target_language: " TypeScript ".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.language, " TypeScript ");
        assert!(f.backend.prompts()[0].contains("into  TypeScript "));
    }

    #[tokio::test]
    async fn test_generate_empty_output_marker() {
        let f = fixture(ScriptedBackend::new().reply("  \n\t\n"));
        let chain = GenerateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&GenerateRequest {
                description: "anything".to_string(),
                language: "python".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.text, "// No code generated");
    }

    #[tokio::test]
    async fn test_generate_uses_stored_style() {
        let f = fixture(ScriptedBackend::new().reply("code"));
        f.preferences
            .save(&StylePreferences {
                naming_convention: NamingConvention::PascalCase,
                ..StylePreferences::default()
            })
            .unwrap();
        let chain = GenerateChain::new(f.registry.clone(), f.preferences.clone());

        chain
            .run(&GenerateRequest {
                description: "a counter".to_string(),
                language: "go".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert!(f.backend.prompts()[0].contains("PascalCase"));
    }

    #[tokio::test]
    async fn test_translate_reports_source_and_target() {
        let f = fixture(ScriptedBackend::new().reply("fn main() {\n    println!(\"hi\");\n}"));
        let chain = TranslateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&TranslateRequest {
                code: "def main():\n    print('hi')\n".to_string(),
                source_language: None,
                target_language: "rust".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.language, "rust");
        assert_eq!(result.source_language.as_deref(), Some("python"));
        assert!(result.text.starts_with("fn main()"));
        assert!(f.backend.prompts()[0].contains("Translate the python code below into rust"));
    }

    #[tokio::test]
    async fn test_translate_keeps_given_source() {
        let f = fixture(ScriptedBackend::new().reply("x"));
        let chain = TranslateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&TranslateRequest {
                code: "x = 1".to_string(),
                source_language: Some("ruby".to_string()),
                target_language: "python".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert_eq!(result.source_language.as_deref(), Some("ruby"));
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_marker() {
        let f = fixture(ScriptedBackend::new().fail("http://localhost:11434"));
        let chain = TranslateChain::new(f.registry.clone(), f.preferences.clone());

        let result = chain
            .run(&TranslateRequest {
                code: "x = 1".to_string(),
                source_language: None,
                target_language: "go".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert!(result.is_error());
        assert!(result.text.starts_with("// Error:"));
    }

    #[tokio::test]
    async fn test_unreachable_ollama_becomes_marker() {
        let dir = tempfile::tempdir().unwrap();
        let backend = OllamaClient::with_url("http://127.0.0.1:1").with_timeout(Duration::from_secs(5));
        let registry = Arc::new(ModelRegistry::with_defaults(Arc::new(backend)));
        let preferences = Arc::new(PreferenceStore::new(dir.path().join("style.json")));
        let chain = GenerateChain::new(registry, preferences);

        let result = chain
            .run(&GenerateRequest {
                description: "hello world".to_string(),
                language: "python".to_string(),
                style: None,
            })
            .await
            .unwrap();

        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_unconfigured_task_is_fatal() {
        let registry = Arc::new(ModelRegistry::new(Arc::new(ScriptedBackend::new())));
        let chain = ExplainChain::new(registry);

        let err = chain
            .run(&ExplainRequest {
                code: "x".to_string(),
                language: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, ConfigurationError::UnconfiguredTask(Task::CodeExplanation));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let generate: GenerateRequest =
            serde_json::from_str(r#"{"description": "sort a list"}"#).unwrap();
        assert_eq!(generate.language, "python");

        let translate: TranslateRequest = serde_json::from_str(r#"{"code": "x"}"#).unwrap();
        assert_eq!(translate.target_language, "python");
        assert!(translate.source_language.is_none());
    }
}
