//! The closed set of tools the agent can call.

use std::fmt;

/// A named capability offered to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    ExplainCode,
    GenerateCode,
    TranslateCode,
    DetectLanguage,
    AnalyzeComplexity,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::ExplainCode,
        Tool::GenerateCode,
        Tool::TranslateCode,
        Tool::DetectLanguage,
        Tool::AnalyzeComplexity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::ExplainCode => "ExplainCode",
            Tool::GenerateCode => "GenerateCode",
            Tool::TranslateCode => "TranslateCode",
            Tool::DetectLanguage => "DetectLanguage",
            Tool::AnalyzeComplexity => "AnalyzeComplexity",
        }
    }

    /// Description shown to the planner, including the input shape.
    pub fn description(&self) -> &'static str {
        match self {
            Tool::ExplainCode => {
                r#"Explain what a piece of code does. Input: JSON {"code": "...", "language": "..."}, language optional."#
            }
            Tool::GenerateCode => {
                r#"Write code from a description. Input: JSON {"description": "...", "language": "..."}, language defaults to python."#
            }
            Tool::TranslateCode => {
                r#"Translate code to another language. Input: JSON {"code": "...", "source_language": "...", "target_language": "..."}, source optional, target defaults to python."#
            }
            Tool::DetectLanguage => "Detect the programming language of a snippet. Input: the raw code.",
            Tool::AnalyzeComplexity => {
                "Report size, nesting and branching of a snippet with recommendations. Input: the raw code."
            }
        }
    }

    /// Look a tool up by name, ignoring case and surrounding quotes.
    pub fn from_name(name: &str) -> Option<Tool> {
        let name = name.trim().trim_matches(|c| c == '`' || c == '"' || c == '\'');
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(name))
    }

    /// Whether the tool runs a model chain and takes JSON input.
    pub fn uses_model(&self) -> bool {
        matches!(
            self,
            Tool::ExplainCode | Tool::GenerateCode | Tool::TranslateCode
        )
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
