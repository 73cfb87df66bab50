//! Token definitions shared by every language the detector knows about.
//!
//! The token set is deliberately language-agnostic: identifiers, literals and
//! the handful of punctuation shapes that tell languages apart (`::`, `:=`,
//! `===`, `!!`, `<?php`, `#include`, ...). Keywords are not tokens of their
//! own; they arrive as [`TokenKind::Ident`] and are weighed by the detector.

use logos::Logos;
use smol_str::SmolStr;

/// A token with its kind and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: std::ops::Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, span: std::ops::Range<usize>) -> Self {
        Self { kind, span }
    }

    /// True when `other` starts exactly where this token ends.
    pub fn touches(&self, other: &Token) -> bool {
        self.span.end == other.span.start
    }
}

/// Token kinds.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")] // Skip spaces and tabs
pub enum TokenKind {
    // ========================================================================
    // Words
    // ========================================================================
    /// Identifier or keyword
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| SmolStr::from(lex.slice()))]
    Ident(SmolStr),

    /// Hyphenated word (`font-size`, `border-top-width`)
    #[regex(r"[a-z]+(-[a-z]+)+", |lex| SmolStr::from(lex.slice()))]
    HyphenWord(SmolStr),

    /// `$name` variable (PHP, shell)
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    /// `@Name` annotation or decorator
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*", |lex| SmolStr::from(&lex.slice()[1..]))]
    Annotation(SmolStr),

    // ========================================================================
    // Markup
    // ========================================================================
    /// `<?php`
    #[token("<?php")]
    PhpOpen,

    /// `<tag`, name lowercased
    #[regex(r"<[A-Za-z][A-Za-z0-9]*", |lex| SmolStr::from(lex.slice()[1..].to_ascii_lowercase()))]
    OpenTag(SmolStr),

    /// `</tag`, name lowercased
    #[regex(r"</[A-Za-z][A-Za-z0-9]*", |lex| SmolStr::from(lex.slice()[2..].to_ascii_lowercase()))]
    CloseTag(SmolStr),

    /// `<!DOCTYPE` and friends
    #[regex(r"<![A-Za-z]+")]
    MarkupDecl,

    // ========================================================================
    // Literals
    // ========================================================================
    /// Number literal
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    /// Number with a CSS unit (`10px`, `1.5em`, `50%`)
    #[regex(r"[0-9]+(\.[0-9]+)?(px|em|rem|vh|vw|pt|%)")]
    Dimension,

    /// Double-quoted string
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleQuoted,

    /// Single-quoted string or character literal
    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleQuoted,

    /// Backtick template literal
    #[regex(r"`[^`]*`")]
    Template,

    // ========================================================================
    // Punctuation
    // ========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(":=")]
    Walrus,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("===")]
    StrictEq,
    #[token("!")]
    Bang,
    #[token("!!")]
    BangBang,
    #[token("?.")]
    SafeCall,
    #[token("?:")]
    Elvis,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("#")]
    Hash,
    #[token("|")]
    Pipe,

    // ========================================================================
    // Whitespace and Comments
    // ========================================================================
    /// Newline
    #[regex(r"\n|\r\n")]
    Newline,

    /// `//` line comment
    #[regex(r"//[^\n]*")]
    LineComment,

    /// `/* ... */` block comment, unterminated ones run to end of input
    #[token("/*", block_comment)]
    BlockComment,
}

impl TokenKind {
    /// Identifier text, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    #[test]
    fn test_identifiers_and_punctuation() {
        let mut lex = TokenKind::lexer("std::cout;");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("std")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::ColonColon)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("cout")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Semi)));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_markup() {
        let mut lex = TokenKind::lexer("<!DOCTYPE <DIV </p <?php");
        assert_eq!(lex.next(), Some(Ok(TokenKind::MarkupDecl)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::OpenTag(SmolStr::from("div")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::CloseTag(SmolStr::from("p")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::PhpOpen)));
    }

    #[test]
    fn test_css_shapes() {
        let mut lex = TokenKind::lexer("font-size: 12px");
        assert_eq!(
            lex.next(),
            Some(Ok(TokenKind::HyphenWord(SmolStr::from("font-size"))))
        );
        assert_eq!(lex.next(), Some(Ok(TokenKind::Colon)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Dimension)));
    }

    #[test]
    fn test_longest_operator_wins() {
        let mut lex = TokenKind::lexer("x := a === b!!");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("x")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Walrus)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("a")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::StrictEq)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("b")))));
        assert_eq!(lex.next(), Some(Ok(TokenKind::BangBang)));
    }

    #[test]
    fn test_comments() {
        let mut lex = TokenKind::lexer("// note\n/* block\n comment */ x");
        assert_eq!(lex.next(), Some(Ok(TokenKind::LineComment)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Newline)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::BlockComment)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Ident(SmolStr::from("x")))));
    }

    #[test]
    fn test_strings() {
        let mut lex = TokenKind::lexer(r#""a \"b\"" 'c' `t ${x}`"#);
        assert_eq!(lex.next(), Some(Ok(TokenKind::DoubleQuoted)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::SingleQuoted)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Template)));
    }
}
