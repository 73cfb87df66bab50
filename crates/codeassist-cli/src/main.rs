//! Codeassist CLI - explain, generate and translate code with local models.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use codeassist_ai::AssistConfig;

mod commands;

/// Codeassist - a local code assistant backed by Ollama
#[derive(Parser)]
#[command(name = "codeassist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ollama server URL
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Style preference file
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    /// Model used by the agent planner
    #[arg(long, global = true)]
    planner_model: Option<String>,

    /// Timeout for each model request, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain what a piece of code does
    Explain {
        /// Input file (stdin if omitted or `-`)
        file: Option<PathBuf>,
        /// Language of the code (detected if omitted)
        #[arg(short, long)]
        language: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate code from a description
    Generate {
        /// What the code should do
        description: String,
        /// Target language
        #[arg(short, long, default_value = "python")]
        language: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate code to another language
    Translate {
        /// Input file (stdin if omitted or `-`)
        file: Option<PathBuf>,
        /// Target language
        #[arg(short, long, default_value = "python")]
        to: String,
        /// Source language (detected if omitted)
        #[arg(short, long)]
        from: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect the language of a snippet
    Detect {
        /// Input file (stdin if omitted or `-`)
        file: Option<PathBuf>,
    },

    /// Report complexity metrics for a snippet
    Analyze {
        /// Input file (stdin if omitted or `-`)
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the assistant; starts an interactive session without a question
    Ask {
        /// Question or JSON request
        question: Option<String>,
        /// Planner iterations per request
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Answer a JSON request and print a JSON response
    Request {
        /// Request file (stdin if omitted or `-`)
        file: Option<PathBuf>,
    },

    /// Show or change style preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Show the configured models
    Models {
        /// Check each model is available on the server
        #[arg(long)]
        check: bool,
    },

    /// Show configuration and paths
    Info,
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the current preferences
    Show,
    /// Write the default preferences if none exist
    Init,
    /// Update individual fields
    Set {
        /// `spaces` or `tabs`
        #[arg(long)]
        indentation: Option<String>,
        /// Width of one indentation level
        #[arg(long)]
        indent_size: Option<u32>,
        /// Maximum line length
        #[arg(long)]
        max_line_length: Option<u32>,
        /// snake_case, camelCase, PascalCase or kebab-case
        #[arg(long)]
        naming_convention: Option<String>,
    },
}

impl Cli {
    /// Environment first, then flags.
    fn config(&self) -> AssistConfig {
        let mut config = AssistConfig::from_env();
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &self.preferences {
            config.preferences_path = Some(path.clone());
        }
        if let Some(model) = &self.planner_model {
            config.planner_model = model.clone();
        }
        if let Some(secs) = self.timeout.filter(|s| *s > 0) {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        config
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = cli.config();

    match cli.command {
        Commands::Explain {
            file,
            language,
            json,
        } => commands::block_on(commands::explain::run(
            config,
            file.as_deref(),
            language,
            json,
        )),
        Commands::Generate {
            description,
            language,
            json,
        } => commands::block_on(commands::generate::run(config, description, language, json)),
        Commands::Translate {
            file,
            to,
            from,
            json,
        } => commands::block_on(commands::translate::run(
            config,
            file.as_deref(),
            from,
            to,
            json,
        )),
        Commands::Detect { file } => commands::analyze::detect(file.as_deref()),
        Commands::Analyze { file, json } => commands::analyze::run(file.as_deref(), json),
        Commands::Ask {
            question,
            max_steps,
        } => {
            let mut config = config;
            if let Some(steps) = max_steps.filter(|s| *s > 0) {
                config.max_steps = steps;
            }
            commands::block_on(commands::ask::run(config, question))
        }
        Commands::Request { file } => {
            commands::block_on(commands::request::run(config, file.as_deref()))
        }
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::show(&config),
            PrefsAction::Init => commands::prefs::init(&config),
            PrefsAction::Set {
                indentation,
                indent_size,
                max_line_length,
                naming_convention,
            } => commands::prefs::set(
                &config,
                commands::prefs::Changes {
                    indentation,
                    indent_size,
                    max_line_length,
                    naming_convention,
                },
            ),
        },
        Commands::Models { check } => commands::block_on(commands::models::run(config, check)),
        Commands::Info => commands::info::run(&config),
    }
}
