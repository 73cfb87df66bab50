//! High-level lexer interface.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use logos::Logos;

/// A lexer over an arbitrary code snippet.
///
/// Wraps the logos-generated lexer with a nicer interface and error handling.
/// Comments are kept in the stream because they carry language signal.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(kind) => Some(Ok(Token::new(kind, self.inner.span()))),
            Err(()) => Some(Err(LexError::UnexpectedChar {
                span: self.inner.span(),
            })),
        }
    }
}
