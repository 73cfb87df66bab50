//! Parsing planner replies.

use thiserror::Error;

/// What the planner decided to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerReply {
    /// Call a tool
    Action { tool: String, input: String },
    /// Stop with an answer for the user
    Final(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyParseError {
    #[error("expected `Action:` or `Final Answer:`")]
    MissingAction,
    #[error("missing `Action Input:` after `Action: {0}`")]
    MissingActionInput(String),
}

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

/// Parse one planner reply. Whichever of `Action:` or `Final Answer:` comes
/// first wins.
pub fn parse_reply(text: &str) -> Result<PlannerReply, ReplyParseError> {
    let action_at = text.find(ACTION);
    let final_at = text.find(FINAL_ANSWER);

    match (action_at, final_at) {
        (Some(a), f) if f.map_or(true, |f| a < f) => {
            let rest = &text[a + ACTION.len()..];
            let tool = rest.lines().next().unwrap_or_default().trim().to_string();
            let input_at = rest
                .find(ACTION_INPUT)
                .ok_or_else(|| ReplyParseError::MissingActionInput(tool.clone()))?;
            let mut input = &rest[input_at + ACTION_INPUT.len()..];
            if let Some(end) = input.find(OBSERVATION) {
                input = &input[..end];
            }
            Ok(PlannerReply::Action {
                tool,
                input: unwrap_input(input).to_string(),
            })
        }
        (_, Some(f)) => Ok(PlannerReply::Final(
            text[f + FINAL_ANSWER.len()..].trim().to_string(),
        )),
        _ => Err(ReplyParseError::MissingAction),
    }
}

/// Strip a surrounding code fence or quote pair from a tool input.
fn unwrap_input(input: &str) -> &str {
    let input = input.trim();
    if let Some(body) = input.strip_prefix("```") {
        let body = body.strip_suffix("```").unwrap_or(body);
        // drop an info string such as `json` on the opening line
        return match body.split_once('\n') {
            Some((info, rest)) if !info.trim().contains(' ') => rest.trim(),
            _ => body.trim(),
        };
    }
    for quote in ['"', '\''] {
        if input.len() >= 2 && input.starts_with(quote) && input.ends_with(quote) {
            return &input[1..input.len() - 1];
        }
    }
    input
}
