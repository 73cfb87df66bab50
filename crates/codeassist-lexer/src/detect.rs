//! Programming language detection.
//!
//! Detection is a two step affair. The snippet is tokenized and every
//! candidate language is scored from keyword frequencies plus a few token
//! shapes (`:=`, `#include`, `println!(`, `<?php`, ...). The best scoring
//! lexer name ("Python 3", "C++", ...) is then mapped onto the normalized
//! vocabulary callers work with.
//!
//! Snippets that are valid in several languages (`print("hi")`) resolve by
//! weight and, on an exact tie, by profile order. The result is stable for a
//! given input but can be surprising on input written to be ambiguous.

use rustc_hash::FxHashMap;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Sentinel returned when nothing matches.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Every identifier [`detect_language`] can return besides [`UNKNOWN_LANGUAGE`].
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "cpp",
    "csharp",
    "java",
    "html",
    "css",
    "php",
    "ruby",
    "go",
    "rust",
    "swift",
    "kotlin",
];

/// Lexer display name to normalized identifier.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("Python 3", "python"),
    ("Python", "python"),
    ("JavaScript", "javascript"),
    ("TypeScript", "typescript"),
    ("C++", "cpp"),
    ("C#", "csharp"),
    ("Java", "java"),
    ("HTML", "html"),
    ("CSS", "css"),
    ("PHP", "php"),
    ("Ruby", "ruby"),
    ("Go", "go"),
    ("Rust", "rust"),
    ("Swift", "swift"),
    ("Kotlin", "kotlin"),
];

/// Minimum score for a guess to count.
const MIN_SCORE: f32 = 2.0;

/// How many occurrences of one keyword are counted.
const KEYWORD_CAP: usize = 3;

const HTML_ELEMENTS: &[&str] = &[
    "html", "head", "body", "title", "meta", "link", "script", "style", "div", "span", "p", "a",
    "ul", "ol", "li", "table", "tr", "td", "th", "img", "form", "input", "button", "nav",
    "section", "header", "footer", "main", "h1", "h2", "h3", "h4", "h5", "h6", "br", "label",
];

const CSS_PROPERTIES: &[&str] = &[
    "color",
    "background",
    "background-color",
    "margin",
    "padding",
    "border",
    "display",
    "width",
    "height",
    "font-size",
    "font-family",
    "font-weight",
    "text-align",
    "position",
    "top",
    "left",
    "flex",
    "justify-content",
    "align-items",
];

const TS_TYPES: &[&str] = &["string", "number", "boolean", "any", "void", "unknown", "never"];

/// Keyword weights for one candidate language.
struct Profile {
    name: &'static str,
    keywords: &'static [(&'static str, f32)],
}

const PROFILES: &[Profile] = &[
    Profile {
        name: "Python 3",
        keywords: &[
            ("def", 3.0),
            ("elif", 4.0),
            ("self", 2.0),
            ("None", 3.0),
            ("True", 2.0),
            ("False", 1.0),
            ("print", 2.0),
            ("lambda", 2.0),
            ("pass", 2.0),
            ("__init__", 3.0),
            ("__name__", 3.0),
            ("range", 1.0),
            ("import", 0.5),
            ("from", 0.5),
            ("not", 0.5),
            ("and", 0.5),
            ("or", 0.5),
        ],
    },
    Profile {
        name: "JavaScript",
        keywords: &[
            ("function", 2.0),
            ("const", 1.5),
            ("let", 1.0),
            ("var", 2.0),
            ("console", 3.0),
            ("document", 3.0),
            ("window", 2.0),
            ("require", 2.0),
            ("undefined", 2.0),
            ("module", 0.5),
            ("exports", 2.0),
            ("null", 0.5),
        ],
    },
    Profile {
        name: "TypeScript",
        keywords: &[
            ("interface", 2.0),
            ("readonly", 3.0),
            ("namespace", 0.5),
            ("implements", 0.5),
            ("type", 1.0),
            ("keyof", 4.0),
        ],
    },
    Profile {
        name: "Java",
        keywords: &[
            ("public", 1.0),
            ("private", 0.5),
            ("class", 1.0),
            ("static", 1.0),
            ("void", 1.0),
            ("System", 2.0),
            ("println", 2.0),
            ("out", 1.0),
            ("extends", 1.0),
            ("package", 1.0),
            ("String", 1.5),
            ("final", 1.0),
            ("throws", 3.0),
            ("new", 0.5),
        ],
    },
    Profile {
        name: "C#",
        keywords: &[
            ("using", 2.0),
            ("namespace", 1.5),
            ("Console", 3.0),
            ("WriteLine", 3.0),
            ("string", 1.0),
            ("public", 0.5),
            ("static", 0.5),
            ("void", 1.0),
            ("get", 0.5),
            ("set", 0.5),
            ("Task", 1.0),
        ],
    },
    Profile {
        name: "C++",
        keywords: &[
            ("std", 3.0),
            ("cout", 3.0),
            ("cin", 3.0),
            ("endl", 3.0),
            ("template", 2.0),
            ("typename", 3.0),
            ("nullptr", 3.0),
            ("namespace", 1.0),
            ("int", 1.0),
            ("vector", 1.0),
        ],
    },
    Profile {
        name: "Go",
        keywords: &[
            ("package", 2.0),
            ("func", 3.0),
            ("fmt", 3.0),
            ("Println", 2.0),
            ("Printf", 1.0),
            ("chan", 3.0),
            ("defer", 3.0),
            ("go", 1.0),
            ("struct", 0.5),
            ("nil", 1.0),
        ],
    },
    Profile {
        name: "Rust",
        keywords: &[
            ("fn", 3.0),
            ("let", 1.0),
            ("mut", 3.0),
            ("impl", 3.0),
            ("pub", 1.0),
            ("crate", 3.0),
            ("use", 1.0),
            ("match", 1.0),
            ("struct", 1.0),
            ("enum", 1.0),
            ("Self", 1.0),
            ("Option", 1.0),
            ("Result", 1.0),
        ],
    },
    Profile {
        name: "Kotlin",
        keywords: &[
            ("fun", 4.0),
            ("val", 3.0),
            ("var", 0.5),
            ("println", 1.0),
            ("when", 2.0),
            ("data", 1.0),
            ("companion", 4.0),
            ("object", 1.0),
            ("override", 0.5),
        ],
    },
    Profile {
        name: "Swift",
        keywords: &[
            ("func", 2.0),
            ("let", 1.0),
            ("var", 0.5),
            ("guard", 3.0),
            ("Foundation", 3.0),
            ("UIKit", 3.0),
            ("protocol", 3.0),
            ("extension", 2.0),
            ("nil", 1.0),
            ("import", 0.5),
        ],
    },
    Profile {
        name: "Ruby",
        keywords: &[
            ("def", 1.5),
            ("end", 2.0),
            ("puts", 3.0),
            ("elsif", 4.0),
            ("unless", 2.0),
            ("nil", 2.0),
            ("attr_accessor", 4.0),
            ("require", 1.0),
            ("do", 1.0),
            ("module", 1.0),
        ],
    },
    Profile {
        name: "PHP",
        keywords: &[
            ("echo", 2.0),
            ("function", 0.5),
            ("array", 1.0),
            ("foreach", 1.0),
        ],
    },
    Profile {
        name: "HTML",
        keywords: &[],
    },
    Profile {
        name: "CSS",
        keywords: &[],
    },
];

/// Token-shape counts gathered in a single pass.
#[derive(Debug, Default)]
struct Shapes {
    semicolons: usize,
    braces: usize,
    line_colons: usize,
    directives: usize,
    attributes: usize,
    macro_calls: usize,
    variables: usize,
    annotations: usize,
    php_open: usize,
    html_tags: usize,
    close_tags: usize,
    markup_decls: usize,
    css_properties: usize,
    dimensions: usize,
    type_annotations: usize,
    colon_colons: usize,
    walruses: usize,
    arrows: usize,
    fat_arrows: usize,
    strict_eqs: usize,
    bang_bangs: usize,
    safe_calls: usize,
    elvis: usize,
    templates: usize,
}

impl Shapes {
    fn scan(tokens: &[Token]) -> Self {
        let mut shapes = Shapes::default();

        for (i, token) in tokens.iter().enumerate() {
            let next = tokens.get(i + 1);
            let next_kind = next.map(|t| &t.kind);

            match &token.kind {
                TokenKind::Semi => shapes.semicolons += 1,
                TokenKind::LBrace | TokenKind::RBrace => shapes.braces += 1,
                TokenKind::Colon => {
                    match next_kind {
                        None | Some(TokenKind::Newline) => shapes.line_colons += 1,
                        Some(TokenKind::Ident(ty)) if TS_TYPES.contains(&ty.as_str()) => {
                            shapes.type_annotations += 1
                        }
                        _ => {}
                    }
                }
                TokenKind::Hash => match next {
                    Some(n) if token.touches(n) => match &n.kind {
                        TokenKind::Ident(word)
                            if matches!(
                                word.as_str(),
                                "include" | "define" | "pragma" | "ifndef" | "ifdef" | "endif"
                            ) =>
                        {
                            shapes.directives += 1
                        }
                        TokenKind::LBracket => shapes.attributes += 1,
                        _ => {}
                    },
                    _ => {}
                },
                TokenKind::Ident(_) => {
                    // `name!(`, `name![`, `name!{`
                    if let (Some(bang), Some(open)) = (next, tokens.get(i + 2)) {
                        if bang.kind == TokenKind::Bang
                            && token.touches(bang)
                            && bang.touches(open)
                            && matches!(
                                open.kind,
                                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
                            )
                        {
                            shapes.macro_calls += 1;
                        }
                    }
                    if let (Some(name), Some(TokenKind::Colon)) = (token.kind.ident(), next_kind) {
                        if CSS_PROPERTIES.contains(&name) {
                            shapes.css_properties += 1;
                        }
                    }
                }
                TokenKind::HyphenWord(name) => {
                    if next_kind == Some(&TokenKind::Colon)
                        && CSS_PROPERTIES.contains(&name.as_str())
                    {
                        shapes.css_properties += 1;
                    }
                }
                TokenKind::Variable => shapes.variables += 1,
                TokenKind::Annotation(_) => shapes.annotations += 1,
                TokenKind::PhpOpen => shapes.php_open += 1,
                TokenKind::OpenTag(name) if HTML_ELEMENTS.contains(&name.as_str()) => {
                    shapes.html_tags += 1
                }
                TokenKind::CloseTag(name) if HTML_ELEMENTS.contains(&name.as_str()) => {
                    shapes.close_tags += 1
                }
                TokenKind::MarkupDecl => shapes.markup_decls += 1,
                TokenKind::Dimension => shapes.dimensions += 1,
                TokenKind::ColonColon => shapes.colon_colons += 1,
                TokenKind::Walrus => shapes.walruses += 1,
                TokenKind::Arrow => shapes.arrows += 1,
                TokenKind::FatArrow => shapes.fat_arrows += 1,
                TokenKind::StrictEq => shapes.strict_eqs += 1,
                TokenKind::BangBang => shapes.bang_bangs += 1,
                TokenKind::SafeCall => shapes.safe_calls += 1,
                TokenKind::Elvis => shapes.elvis += 1,
                TokenKind::Template => shapes.templates += 1,
                _ => {}
            }
        }

        shapes
    }

    /// Score contributed by token shapes for the named profile.
    fn score(&self, profile: &str, has_words: bool) -> f32 {
        match profile {
            "Python 3" => {
                let mut score = 2.0 * capped(self.line_colons, 3);
                if has_words && self.semicolons == 0 && self.braces == 0 {
                    score += 1.5;
                }
                score
            }
            "JavaScript" => {
                2.0 * capped(self.strict_eqs, 3)
                    + capped(self.templates, 3)
                    + 0.5 * capped(self.fat_arrows, 3)
            }
            "TypeScript" => 2.5 * capped(self.type_annotations, 4),
            "Java" => 1.5 * capped(self.annotations, 3),
            "C++" => 4.0 * capped(self.directives, 2) + capped(self.colon_colons, 3),
            "Go" => 2.5 * capped(self.walruses, 3),
            "Rust" => {
                2.5 * capped(self.macro_calls, 3)
                    + 3.0 * capped(self.attributes, 2)
                    + 0.5 * capped(self.colon_colons, 3)
                    + 0.5 * capped(self.arrows, 3)
            }
            "Kotlin" => 2.0 * capped(self.bang_bangs, 2) + 2.0 * capped(self.elvis, 2),
            "Swift" => capped(self.safe_calls, 2) + 0.5 * capped(self.arrows, 2),
            "PHP" => 10.0 * capped(self.php_open, 1) + 1.5 * capped(self.variables, 4),
            "HTML" => {
                5.0 * capped(self.markup_decls, 1)
                    + 2.0 * capped(self.html_tags, 5)
                    + 2.0 * capped(self.close_tags, 5)
            }
            "CSS" => 2.5 * capped(self.css_properties, 6) + 1.5 * capped(self.dimensions, 4),
            _ => 0.0,
        }
    }
}

fn capped(count: usize, cap: usize) -> f32 {
    count.min(cap) as f32
}

/// Guess the lexer name for a snippet, `None` when nothing scores.
pub fn guess_lexer_name(code: &str) -> Option<&'static str> {
    let tokens: Vec<Token> = Lexer::new(code).filter_map(Result::ok).collect();
    if tokens.is_empty() {
        return None;
    }

    let mut words: FxHashMap<&str, usize> = FxHashMap::default();
    for token in &tokens {
        if let Some(word) = token.kind.ident() {
            *words.entry(word).or_insert(0) += 1;
        }
    }

    let shapes = Shapes::scan(&tokens);
    let has_words = !words.is_empty();

    let mut best: Option<(&'static str, f32)> = None;
    for profile in PROFILES {
        let keyword_score: f32 = profile
            .keywords
            .iter()
            .filter_map(|(word, weight)| words.get(*word).map(|n| weight * capped(*n, KEYWORD_CAP)))
            .sum();
        let score = keyword_score + shapes.score(profile.name, has_words);

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((profile.name, score));
        }
    }

    best.filter(|(_, score)| *score >= MIN_SCORE)
        .map(|(name, _)| name)
}

/// Map a lexer display name onto the normalized vocabulary.
///
/// Names that are not in the table are lowercased and passed through.
pub fn normalize_language_name(name: &str) -> String {
    LANGUAGE_MAP
        .iter()
        .find(|(display, _)| *display == name)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| name.to_lowercase())
}

/// Detect the language of a code snippet.
///
/// Returns one of [`SUPPORTED_LANGUAGES`] or [`UNKNOWN_LANGUAGE`]. Never fails.
pub fn detect_language(code: &str) -> String {
    match guess_lexer_name(code) {
        Some(name) => normalize_language_name(name),
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}
