//! Request command - JSON in, JSON out.

use std::path::Path;

use codeassist_ai::{AssistConfig, TaskRequest};

pub(crate) async fn run(config: AssistConfig, file: Option<&Path>) -> miette::Result<()> {
    let input = super::read_input(file)?;
    let request =
        TaskRequest::parse(&input).map_err(|e| miette::miette!("Invalid request: {}", e))?;

    let mut agent = super::agent(&config)?;
    let response = super::process(&mut agent, request).await?;

    // Backend failures are part of the response, so the exit status stays 0.
    super::print_response(&response, true)
}
