//! Explain command - describe what code does.

use std::path::Path;

use codeassist_ai::{AssistConfig, ExplainRequest, TaskRequest, TaskResponse};

pub(crate) async fn run(
    config: AssistConfig,
    file: Option<&Path>,
    language: Option<String>,
    json: bool,
) -> miette::Result<()> {
    let code = super::read_input(file)?;
    let mut agent = super::agent(&config)?;

    let response = super::process(
        &mut agent,
        TaskRequest::Explain(ExplainRequest { code, language }),
    )
    .await?;

    if json {
        super::print_response(&response, true)?;
    } else if let TaskResponse::Explain {
        explanation,
        language,
        complexity_analysis,
    } = &response
    {
        println!("Language: {}\n", language);
        println!("{}\n", explanation);
        println!("Complexity\n----------");
        println!("{}", complexity_analysis);
    }

    super::check_marker(&response)
}
