//! Translate command - rewrite code in another language.

use std::path::Path;

use codeassist_ai::{AssistConfig, TaskRequest, TaskResponse, TranslateRequest};

pub(crate) async fn run(
    config: AssistConfig,
    file: Option<&Path>,
    source_language: Option<String>,
    target_language: String,
    json: bool,
) -> miette::Result<()> {
    let code = super::read_input(file)?;
    let mut agent = super::agent(&config)?;

    let response = super::process(
        &mut agent,
        TaskRequest::Translate(TranslateRequest {
            code,
            source_language,
            target_language,
            style: None,
        }),
    )
    .await?;

    if let TaskResponse::Translate {
        source_language,
        target_language,
        ..
    } = &response
    {
        if !json {
            eprintln!("Translated {} -> {}", source_language, target_language);
        }
    }
    super::print_response(&response, json)?;
    super::check_marker(&response)
}
