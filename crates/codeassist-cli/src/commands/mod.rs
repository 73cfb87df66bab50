//! CLI commands.

pub mod analyze;
pub mod ask;
pub mod explain;
pub mod generate;
pub mod info;
pub mod models;
pub mod prefs;
pub mod request;
pub mod translate;

use std::future::Future;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use codeassist_ai::{
    Agent, AssistConfig, ModelRegistry, OllamaClient, TaskRequest, TaskResponse,
    ERROR_MARKER_PREFIX,
};
use codeassist_style::PreferenceStore;
use tracing::debug;

/// Run an async command on a fresh runtime.
pub(crate) fn block_on<F>(future: F) -> miette::Result<()>
where
    F: Future<Output = miette::Result<()>>,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| miette::miette!("Failed to start async runtime: {}", e))?
        .block_on(future)
}

/// Drive `future` unless Ctrl-C arrives first, which drops (and so cancels) it.
pub(crate) async fn until_interrupted<F: Future>(future: F) -> miette::Result<F::Output> {
    tokio::select! {
        output = future => Ok(output),
        _ = tokio::signal::ctrl_c() => Err(miette::miette!("Interrupted")),
    }
}

/// Read a file, or stdin when no path (or `-`) is given.
pub(crate) fn read_input(file: Option<&Path>) -> miette::Result<String> {
    match file.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| miette::miette!("Failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

pub(crate) fn preference_store(config: &AssistConfig) -> PreferenceStore {
    match &config.preferences_path {
        Some(path) => PreferenceStore::new(path),
        None => PreferenceStore::open_default(),
    }
}

pub(crate) fn ollama_client(config: &AssistConfig) -> OllamaClient {
    let client = OllamaClient::with_url(config.ollama_url.clone());
    match config.request_timeout {
        Some(timeout) => client.with_timeout(timeout),
        None => client,
    }
}

/// Build the registry and check every task has a model.
pub(crate) fn registry(config: &AssistConfig) -> miette::Result<Arc<ModelRegistry>> {
    let registry = ModelRegistry::with_defaults(Arc::new(ollama_client(config)));
    registry
        .validate()
        .map_err(|e| miette::miette!("Invalid model configuration: {}", e))?;
    Ok(Arc::new(registry))
}

/// Wire up an agent for one session.
pub(crate) fn agent(config: &AssistConfig) -> miette::Result<Agent> {
    let registry = registry(config)?;
    let preferences = Arc::new(preference_store(config));
    debug!("Preferences at {}", preferences.path().display());
    Ok(Agent::from_config(registry, preferences, config))
}

/// Run one request through the agent, cancellable with Ctrl-C.
pub(crate) async fn process(agent: &mut Agent, request: TaskRequest) -> miette::Result<TaskResponse> {
    until_interrupted(agent.process_request(request))
        .await?
        .map_err(|e| miette::miette!("{}", e))
}

/// Print a response, as JSON or as its text.
pub(crate) fn print_response(response: &TaskResponse, json: bool) -> miette::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(response)
            .map_err(|e| miette::miette!("Failed to encode response: {}", e))?;
        println!("{}", out);
    } else {
        println!("{}", response.text());
    }
    Ok(())
}

/// Turn an inline error marker into a failing exit status.
pub(crate) fn check_marker(response: &TaskResponse) -> miette::Result<()> {
    if response.text().starts_with(ERROR_MARKER_PREFIX) {
        Err(miette::miette!(
            help = "Is Ollama running? Start it with: ollama serve",
            "Model backend failed"
        ))
    } else {
        Ok(())
    }
}
