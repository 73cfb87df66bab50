//! Transport-level request and response shapes.

use codeassist_lexer::ComplexityReport;
use serde::Serialize;
use serde_json::Value;

use crate::chain::{ExplainRequest, GenerateRequest, TranslateRequest};

/// An incoming request, dispatched on its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Explain(ExplainRequest),
    Generate(GenerateRequest),
    Translate(TranslateRequest),
    /// Anything without a known `type`, handled by the planner
    FreeForm { input: String },
}

impl TaskRequest {
    /// Interpret a JSON value.
    ///
    /// Unknown or missing `type` falls back to free-form with the `input`
    /// field, or the whole document when there is none. A known `type` with
    /// badly typed fields is an error.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        let request = match kind.as_deref() {
            Some("explain") => TaskRequest::Explain(serde_json::from_value(value)?),
            Some("generate") => TaskRequest::Generate(serde_json::from_value(value)?),
            Some("translate") => TaskRequest::Translate(serde_json::from_value(value)?),
            _ => TaskRequest::FreeForm {
                input: match value.get("input") {
                    Some(Value::String(s)) => s.clone(),
                    _ => value.to_string(),
                },
            },
        };
        Ok(request)
    }

    /// Parse a request from text. Text that is not a JSON object is a
    /// free-form request.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => Self::from_value(value),
            _ => Ok(Self::free_form(text.trim())),
        }
    }

    pub fn free_form(input: impl Into<String>) -> Self {
        TaskRequest::FreeForm {
            input: input.into(),
        }
    }
}

/// The answer to a [`TaskRequest`], shaped by its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskResponse {
    Explain {
        explanation: String,
        language: String,
        complexity_analysis: ComplexityReport,
    },
    Generate {
        code: String,
        language: String,
    },
    Translate {
        code: String,
        source_language: String,
        target_language: String,
    },
    FreeForm {
        result: String,
    },
}

impl TaskResponse {
    /// The main text of the response.
    pub fn text(&self) -> &str {
        match self {
            TaskResponse::Explain { explanation, .. } => explanation,
            TaskResponse::Generate { code, .. } | TaskResponse::Translate { code, .. } => code,
            TaskResponse::FreeForm { result } => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_types() {
        let request = TaskRequest::from_value(json!({
            "type": "explain",
            "code": "x = 1",
        }))
        .unwrap();
        assert_eq!(
            request,
            TaskRequest::Explain(ExplainRequest {
                code: "x = 1".to_string(),
                language: None,
            })
        );

        let request = TaskRequest::from_value(json!({
            "type": "generate",
            "description": "fizzbuzz",
        }))
        .unwrap();
        match request {
            TaskRequest::Generate(g) => {
                assert_eq!(g.description, "fizzbuzz");
                assert_eq!(g.language, "python");
                assert!(g.style.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        let request = TaskRequest::from_value(json!({
            "type": "translate",
            "code": "print(1)",
            "target_language": "go",
            "style": {"indentation": "tabs"},
        }))
        .unwrap();
        match request {
            TaskRequest::Translate(t) => {
                assert_eq!(t.target_language, "go");
                assert!(t.source_language.is_none());
                assert!(t.style.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_free_form_fallback() {
        let request = TaskRequest::from_value(json!({"input": "hello"})).unwrap();
        assert_eq!(request, TaskRequest::free_form("hello"));

        let request = TaskRequest::from_value(json!({"type": "chat", "q": 1})).unwrap();
        match request {
            TaskRequest::FreeForm { input } => assert!(input.contains("\"q\":1")),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            TaskRequest::parse("  what does this do?  ").unwrap(),
            TaskRequest::free_form("what does this do?")
        );
    }

    #[test]
    fn test_bad_fields_rejected() {
        assert!(TaskRequest::from_value(json!({"type": "explain", "code": 5})).is_err());
    }

    #[test]
    fn test_response_shapes() {
        let response = TaskResponse::Generate {
            code: "x".to_string(),
            language: "python".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"code": "x", "language": "python"})
        );

        let response = TaskResponse::FreeForm {
            result: "done".to_string(),
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"result": "done"}));
        assert_eq!(response.text(), "done");
    }
}
