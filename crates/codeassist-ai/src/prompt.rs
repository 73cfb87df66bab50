//! Prompt templates for the chains and the planner.

use codeassist_style::{Indentation, StylePreferences};

use crate::agent::AgentStep;
use crate::memory::{Role, Turn};
use crate::tools::Tool;

/// Render style preferences as prompt bullet points.
pub fn style_guidelines(style: &StylePreferences) -> String {
    let indentation = match style.indentation {
        Indentation::Spaces => format!("{} spaces per level", style.indent_size),
        Indentation::Tabs => format!("tabs, one per level ({} columns wide)", style.indent_size),
    };
    format!(
        "- Indentation: {indentation}\n- Maximum line length: {} characters\n- Naming convention: {}",
        style.max_line_length, style.naming_convention
    )
}

/// Build the prompt for explaining a snippet.
pub fn build_explain_prompt(code: &str, language: &str) -> String {
    format!(
        r#"You are an experienced {language} developer and a patient teacher. Explain the following {language} code.

{code}

Your explanation should:
1. Summarize what the code does overall
2. Walk through the important parts step by step
3. Point out edge cases, possible bugs or inefficiencies
4. Suggest concrete improvements

Use markdown headings and lists. Write prose only, without fenced code blocks.

Explanation:
"#
    )
}

/// Build the prompt for generating code from a description.
pub fn build_generate_prompt(description: &str, language: &str, style: &StylePreferences) -> String {
    let style = style_guidelines(style);
    format!(
        r#"You are an expert {language} programmer. Write {language} code for the task below.

Task description: {description}

Guidelines:
1. Write idiomatic {language}
2. Keep the code clean and efficient
3. Handle errors and edge cases
4. Add short comments where the logic is not obvious
5. Follow this style:
{style}

Return ONLY the code, with no explanation before or after it.

```{language}
"#
    )
}

/// Build the prompt for translating code between languages.
pub fn build_translate_prompt(
    code: &str,
    source_language: &str,
    target_language: &str,
    style: &StylePreferences,
) -> String {
    let style = style_guidelines(style);
    format!(
        r#"You are a polyglot programmer. Translate the {source_language} code below into {target_language}.

{source_language} code:
{code}

When translating:
1. Keep the behavior identical
2. Use {target_language} idioms instead of copying {source_language} patterns
3. Replace library calls with their {target_language} equivalents
4. Keep comments that still apply
5. Follow this style:
{style}

Return ONLY the translated {target_language} code, with no explanation.

```{target_language}
"#
    )
}

/// Build the planner prompt for one step of the agent loop.
///
/// The reply is expected either as an `Action:`/`Action Input:` pair or as a
/// `Final Answer:`.
pub fn build_planner_prompt(history: &[Turn], input: &str, steps: &[AgentStep]) -> String {
    let tools = Tool::ALL
        .iter()
        .map(|tool| format!("{}: {}", tool.name(), tool.description()))
        .collect::<Vec<_>>()
        .join("\n");
    let tool_names = Tool::ALL
        .iter()
        .map(|tool| tool.name())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        r#"You are a helpful programming assistant. Use the tools below to answer the user's request about code.

Tools:
{tools}

Respond in this format:

Thought: what to do next
Action: one of [{tool_names}]
Action Input: the input for the tool
Observation: the tool result
... (Thought/Action/Action Input/Observation may repeat)
Thought: I now know the answer
Final Answer: the answer for the user
"#
    );

    if !history.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for turn in history {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
        }
    }

    prompt.push_str(&format!("\nRequest: {input}\n"));
    for step in steps {
        prompt.push_str(&format!(
            "Action: {}\nAction Input: {}\nObservation: {}\n",
            step.tool, step.input, step.observation
        ));
    }
    prompt.push_str("Thought:");
    prompt
}
