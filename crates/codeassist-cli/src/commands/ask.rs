//! Ask command - one question, or an interactive session.

use std::io::Write;

use codeassist_ai::{AssistConfig, TaskRequest};
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) async fn run(config: AssistConfig, question: Option<String>) -> miette::Result<()> {
    let mut agent = super::agent(&config)?;

    if let Some(question) = question {
        let request = TaskRequest::parse(&question)
            .map_err(|e| miette::miette!("Invalid request: {}", e))?;
        let response = super::process(&mut agent, request).await?;
        super::print_response(&response, false)?;
        return super::check_marker(&response);
    }

    println!("Code assistant. Type a question or a JSON request; `exit` to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = tokio::select! {
            line = lines.next_line() => line
                .map_err(|e| miette::miette!("Failed to read input: {}", e))?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let request = match TaskRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("Invalid request: {}", e);
                continue;
            }
        };

        match super::process(&mut agent, request).await {
            Ok(response) => println!("{}\n", response.text()),
            // Ctrl-C cancels the request, not the session
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}
