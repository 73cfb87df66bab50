//! Models command - list the task table and check the server.

use codeassist_ai::{AssistConfig, BackendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Available,
    Missing,
}

impl Availability {
    fn label(&self) -> &'static str {
        match self {
            Availability::Available => "  [available]",
            Availability::Missing => "  [missing: ollama pull]",
        }
    }
}

/// A missing model is reported per task; anything else stops the command.
fn availability(result: Result<(), BackendError>) -> miette::Result<Availability> {
    match result {
        Ok(()) => Ok(Availability::Available),
        Err(BackendError::ModelNotFound(_)) => Ok(Availability::Missing),
        Err(BackendError::ServerNotRunning(url)) => Err(miette::miette!(
            help = "Start it with: ollama serve",
            "Ollama server not running at {}",
            url
        )),
        Err(e) => Err(miette::miette!("Failed to check models: {}", e)),
    }
}

pub(crate) async fn run(config: AssistConfig, check: bool) -> miette::Result<()> {
    let registry = super::registry(&config)?;
    let client = super::ollama_client(&config);

    println!("Server: {}\n", config.ollama_url);
    for (task, model) in registry.configs() {
        let status = if check {
            let result = super::until_interrupted(client.check_availability(&model.name)).await?;
            availability(result)?.label()
        } else {
            ""
        };
        println!("{}: {}{}", task, model.name, status);
        println!(
            "  temperature={} top_p={} top_k={} repeat_penalty={}",
            model.temperature, model.top_p, model.top_k, model.repeat_penalty
        );
        if !model.stop.is_empty() {
            let stops: Vec<String> = model.stop.iter().map(|s| format!("{:?}", s)).collect();
            println!("  stop=[{}]", stops.join(", "));
        }
    }

    println!("\nplanner: {}", config.planner_model);
    Ok(())
}
