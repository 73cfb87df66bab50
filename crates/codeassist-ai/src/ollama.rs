//! Ollama API client for local LLM inference.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::ModelBackend;
use crate::config::ModelConfig;
use crate::error::BackendError;

/// Default Ollama server URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama API client.
///
/// The model and sampling options travel with each call, so one client
/// serves every task.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

/// Request to Ollama generate API.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

/// Ollama generation options.
#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<&'a str>,
}

impl<'a> OllamaOptions<'a> {
    fn from_config(config: &'a ModelConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            repeat_penalty: config.repeat_penalty,
            stop: config.stop.iter().map(String::as_str).collect(),
        }
    }
}

/// Response from Ollama generate API.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

/// Response from Ollama tags API (list models).
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client for the given server.
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Bound every request by a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Names of the models pulled on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let tags_url = format!("{}/api/tags", self.base_url);
        let response = self
            .with_deadline(self.client.get(&tags_url))
            .send()
            .await
            .map_err(|_| BackendError::ServerNotRunning(self.base_url.clone()))?;

        if !response.status().is_success() {
            return Err(BackendError::ServerNotRunning(self.base_url.clone()));
        }

        let tags: OllamaTagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check the server is running and has the model.
    pub async fn check_availability(&self, model: &str) -> Result<(), BackendError> {
        let models = self.list_models().await?;
        if !has_model(&models, model) {
            return Err(BackendError::ModelNotFound(model.to_string()));
        }
        Ok(())
    }

    /// Send a prompt to Ollama and get a response.
    pub async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError> {
        let request = OllamaRequest {
            model: &config.name,
            prompt,
            stream: false,
            options: OllamaOptions::from_config(config),
        };

        let url = format!("{}/api/generate", self.base_url);
        debug!("POST {} model={}", url, config.name);

        let response = self
            .with_deadline(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::ServerNotRunning(self.base_url.clone())
                } else {
                    BackendError::Http(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::ModelNotFound(config.name.clone()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("{}: {}", status, text)));
        }

        let response: OllamaResponse = response.json().await?;

        if let Some(error) = response.error {
            return Err(BackendError::Api(error));
        }

        Ok(response.response)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_deadline(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for OllamaClient {
    async fn invoke(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError> {
        self.complete(prompt, config).await
    }
}

/// Match `name` exactly, or an untagged name against any tag of it.
fn has_model(available: &[String], name: &str) -> bool {
    available.iter().any(|m| {
        m == name
            || (!name.contains(':') && m.split(':').next() == Some(name))
            || m.strip_suffix(":latest") == Some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client() {
        let client = OllamaClient::new();
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_builder_pattern() {
        let client = OllamaClient::with_url("http://myserver:11434")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://myserver:11434");
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_request_body() {
        let config = ModelConfig::new("codellama:7b-instruct")
            .with_temperature(0.2)
            .with_top_k(40)
            .with_stop(["```", "# Task:"]);
        let request = OllamaRequest {
            model: &config.name,
            prompt: "hello",
            stream: false,
            options: OllamaOptions::from_config(&config),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "codellama:7b-instruct");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["top_k"], 40);
        assert_eq!(json["options"]["stop"][0], "```");
        assert_eq!(json["options"]["stop"][1], "# Task:");
    }

    #[test]
    fn test_empty_stop_omitted() {
        let config = ModelConfig::new("m");
        let json = serde_json::to_value(OllamaOptions::from_config(&config)).unwrap();
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_has_model() {
        let available = vec![
            "codellama:7b-instruct".to_string(),
            "mistral:latest".to_string(),
        ];
        assert!(has_model(&available, "codellama:7b-instruct"));
        assert!(has_model(&available, "codellama"));
        assert!(has_model(&available, "mistral"));
        assert!(!has_model(&available, "codellama:13b"));
        assert!(!has_model(&available, "wizardcoder:7b-python"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = OllamaClient::with_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(5));
        let err = client
            .complete("hi", &ModelConfig::new("m"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::ServerNotRunning(_) | BackendError::Http(_)
        ));
    }
}
