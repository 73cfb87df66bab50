//! Info command - show configuration and paths.

use codeassist_ai::{AssistConfig, Tool};
use codeassist_lexer::SUPPORTED_LANGUAGES;

pub(crate) fn run(config: &AssistConfig) -> miette::Result<()> {
    println!("Codeassist");
    println!("==========");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Components:");
    println!("  codeassist-lexer  - Tokenization, language detection, complexity");
    println!("  codeassist-style  - Style preferences");
    println!("  codeassist-ai     - Model registry, chains and agent");
    println!();

    println!("Configuration:");
    println!("  Ollama URL:     {}", config.ollama_url);
    println!("  Planner model:  {}", config.planner_model);
    println!("  Max steps:      {}", config.max_steps);
    println!("  Memory window:  {}", config.memory_window);
    match config.request_timeout {
        Some(timeout) => println!("  Timeout:        {}s", timeout.as_secs()),
        None => println!("  Timeout:        none"),
    }
    println!(
        "  Preferences:    {}",
        super::preference_store(config).path().display()
    );
    println!();

    println!("Agent tools:");
    for tool in Tool::ALL {
        println!("  {:18} {}", tool.name(), tool.description());
    }
    println!();

    println!("Detected languages: {}", SUPPORTED_LANGUAGES.join(", "));

    Ok(())
}
