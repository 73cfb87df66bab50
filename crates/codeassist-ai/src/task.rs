//! Task identifiers used to route requests to models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unit of work that has its own model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    CodeGeneration,
    CodeTranslation,
    CodeExplanation,
}

impl Task {
    /// Every task, in registry order.
    pub const ALL: [Task; 3] = [
        Task::CodeGeneration,
        Task::CodeTranslation,
        Task::CodeExplanation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::CodeGeneration => "code_generation",
            Task::CodeTranslation => "code_translation",
            Task::CodeExplanation => "code_explanation",
        }
    }

    /// Text substituted when the model returns nothing.
    pub fn empty_output_marker(&self) -> &'static str {
        match self {
            Task::CodeGeneration => "// No code generated",
            Task::CodeTranslation => "// No translation generated",
            Task::CodeExplanation => "No explanation generated.",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
