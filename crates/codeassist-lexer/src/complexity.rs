//! Line-based complexity heuristics.
//!
//! Nothing here parses the target language. Counts come from whole-word
//! keyword matches per line and nesting from indentation width, which is
//! good enough to flag code worth a second look.

use std::fmt;

use serde::Serialize;

/// Columns per nesting level.
pub const ASSUMED_INDENT_WIDTH: usize = 4;

/// More non-empty lines than this suggests splitting the code up.
pub const MAX_LINES: usize = 100;

/// Deeper nesting than this suggests refactoring.
pub const MAX_NESTING_DEPTH: usize = 3;

/// More branching constructs than this suggests simplifying.
pub const MAX_BRANCHES: usize = 10;

/// Returned alone when no threshold is exceeded.
pub const NO_RECOMMENDATIONS: &str =
    "No specific recommendations. The code complexity looks reasonable.";

const FUNCTION_KEYWORDS: &[&str] = &["def", "function", "func", "fn", "fun"];

const BRANCH_KEYWORDS: &[&str] = &[
    "if", "elif", "elsif", "for", "foreach", "while", "case", "switch", "catch", "except",
    "match", "unless", "when",
];

/// Heuristic complexity figures for a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    /// Non-empty lines
    pub line_count: usize,
    /// Lines declaring a function or method
    pub function_count: usize,
    /// Deepest indentation level
    pub max_nesting_depth: usize,
    /// Branching keywords
    pub branch_count: usize,
    /// Human-readable suggestions, never empty
    pub recommendations: Vec<String>,
}

impl fmt::Display for ComplexityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lines of code: {}", self.line_count)?;
        writeln!(f, "Functions: {}", self.function_count)?;
        writeln!(f, "Max nesting depth: {}", self.max_nesting_depth)?;
        writeln!(f, "Branching constructs: {}", self.branch_count)?;
        write!(f, "Recommendations:")?;
        for recommendation in &self.recommendations {
            write!(f, "\n- {}", recommendation)?;
        }
        Ok(())
    }
}

/// Analyze a snippet.
pub fn analyze_complexity(code: &str) -> ComplexityReport {
    let mut line_count = 0;
    let mut function_count = 0;
    let mut max_nesting_depth = 0;
    let mut branch_count = 0;

    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        line_count += 1;

        max_nesting_depth = max_nesting_depth.max(indent_width(line) / ASSUMED_INDENT_WIDTH);

        let mut declares_function = false;
        for word in words(trimmed) {
            if FUNCTION_KEYWORDS.contains(&word) {
                declares_function = true;
            }
            if BRANCH_KEYWORDS.contains(&word) {
                branch_count += 1;
            }
        }
        if declares_function {
            function_count += 1;
        }
    }

    let mut recommendations = Vec::new();
    if line_count > MAX_LINES {
        recommendations.push(
            "Consider breaking this code into smaller modules or functions.".to_string(),
        );
    }
    if max_nesting_depth > MAX_NESTING_DEPTH {
        recommendations.push(
            "Deep nesting detected. Consider extracting nested blocks into helper functions."
                .to_string(),
        );
    }
    if branch_count > MAX_BRANCHES {
        recommendations.push(
            "High number of branching constructs. Consider simplifying the control flow."
                .to_string(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push(NO_RECOMMENDATIONS.to_string());
    }

    ComplexityReport {
        line_count,
        function_count,
        max_nesting_depth,
        branch_count,
        recommendations,
    }
}

/// Leading whitespace width, tabs counted as a full indent.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { ASSUMED_INDENT_WIDTH } else { 1 })
        .sum()
}

fn words(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}
