//! Generate command - write code from a description.

use codeassist_ai::{AssistConfig, GenerateRequest, TaskRequest};

pub(crate) async fn run(
    config: AssistConfig,
    description: String,
    language: String,
    json: bool,
) -> miette::Result<()> {
    let mut agent = super::agent(&config)?;

    let response = super::process(
        &mut agent,
        TaskRequest::Generate(GenerateRequest {
            description,
            language,
            style: None,
        }),
    )
    .await?;

    super::print_response(&response, json)?;
    super::check_marker(&response)
}
