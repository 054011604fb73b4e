//! Tokens and their source contexts
//!
//!     A [`Token`] is an immutable value: a kind, a text value and the [`Context`] it was
//!     read from. Two notions of equality exist and they serve different purposes:
//!
//!         - `==` compares kind and value only. This is what grammar rules use.
//!         - [`Token::matches`] also compares the context. This is what loop detection uses.
//!
//!     A token with an empty value works as a wildcard when used as a pattern, see
//!     [`Token::accepts`]. This lets stop sets be declared as, for example, "any end of line".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a token came from. Only used for diagnostics and loop detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    /// Zero-based line
    pub line: usize,
    /// Zero-based column, in characters
    pub column: usize,
    /// Name of the source (usually a file name), `None` for in-memory text
    pub source: Option<String>,
    /// Raw text of the line
    pub text: String,
}

impl Context {
    pub fn new(line: usize, column: usize, source: Option<String>, text: impl Into<String>) -> Self {
        Self {
            line,
            column,
            source,
            text: text.into(),
        }
    }

    /// Context at the very beginning of a named source
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source.as_deref().unwrap_or("<input>"),
            self.line + 1,
            self.column + 1
        )
    }
}

/// Kinds of tokens produced by the lexer family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Eof,
    Eol,
    Text,
    Literal,
    Whitespace,
    // Line level kinds, produced by the block lexer
    Block,
    Comment,
    MultilineComment,
    HorizontalRule,
    Command,
    Control,
    Arguments,
    Title,
    List,
    Header,
    Variable,
    Content,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "EOL",
            TokenKind::Text => "TEXT",
            TokenKind::Literal => "LITERAL",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Block => "BLOCK",
            TokenKind::Comment => "COMMENT",
            TokenKind::MultilineComment => "MULTILINE_COMMENT",
            TokenKind::HorizontalRule => "HORIZONTAL_RULE",
            TokenKind::Command => "COMMAND",
            TokenKind::Control => "CONTROL",
            TokenKind::Arguments => "ARGUMENTS",
            TokenKind::Title => "TITLE",
            TokenKind::List => "LIST",
            TokenKind::Header => "HEADER",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Content => "CONTENT",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub context: Context,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, context: Context) -> Self {
        Self {
            kind,
            value: value.into(),
            context,
        }
    }

    /// A pattern that accepts any token of the given kind
    pub fn kind(kind: TokenKind) -> Self {
        Self::new(kind, "", Context::default())
    }

    /// Context-free token, mostly useful as a pattern or in tests
    pub fn bare(kind: TokenKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, Context::default())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::bare(TokenKind::Literal, value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::bare(TokenKind::Text, value)
    }

    /// Full comparison, context included
    pub fn matches(&self, other: &Token) -> bool {
        self == other && self.context == other.context
    }

    /// Use `self` as a pattern: an empty value accepts any value of the same kind
    pub fn accepts(&self, other: &Token) -> bool {
        self.kind == other.kind && (self.value.is_empty() || self.value == other.value)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({:?})", self.kind, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_context() {
        let a = Token::new(TokenKind::Text, "x", Context::new(0, 0, None, "x"));
        let b = Token::new(TokenKind::Text, "x", Context::new(4, 2, None, "  x"));

        assert_eq!(a, b);
        assert!(!a.matches(&b));
        assert!(a.matches(&a.clone()));
    }

    #[test]
    fn test_kind_only_pattern_is_a_wildcard() {
        let pattern = Token::kind(TokenKind::Literal);

        assert!(pattern.accepts(&Token::literal("*")));
        assert!(pattern.accepts(&Token::literal("_")));
        assert!(!pattern.accepts(&Token::text("*")));
        assert!(!Token::literal("*").accepts(&Token::literal("_")));
    }

    #[test]
    fn test_context_display_is_one_based() {
        let context = Context::new(0, 0, None, "");
        assert_eq!(context.to_string(), "<input>:1:1");
    }
}
