//! # Codeassist Lexer
//!
//! Lexical analysis of code snippets in arbitrary languages.
//!
//! The lexer uses the `logos` crate for fast, zero-copy tokenization. On top of
//! the token stream sit two heuristics used by the assistant:
//!
//! - [`detect_language`] guesses which language a snippet is written in.
//! - [`analyze_complexity`] reports line, function, nesting and branching
//!   counts with recommendations.
//!
//! ## Example
//!
//! ```
//! use codeassist_lexer::{analyze_complexity, detect_language};
//!
//! assert_eq!(detect_language("print('hi')"), "python");
//!
//! let report = analyze_complexity("def f():\n    return 1\n");
//! assert_eq!(report.function_count, 1);
//! ```

mod complexity;
mod detect;
mod error;
mod lexer;
mod token;

pub use complexity::{
    analyze_complexity, ComplexityReport, MAX_BRANCHES, MAX_LINES, MAX_NESTING_DEPTH,
    NO_RECOMMENDATIONS,
};
pub use detect::{
    detect_language, guess_lexer_name, normalize_language_name, SUPPORTED_LANGUAGES,
    UNKNOWN_LANGUAGE,
};
pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
