//! Lexer error definitions.

use thiserror::Error;

/// A lexer error.
///
/// The detector treats these as noise: a snippet in a language the token set
/// was not built for produces plenty of them and still gets classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character")]
    UnexpectedChar { span: std::ops::Range<usize> },
}
