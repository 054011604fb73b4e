//! Argument lexer
//!
//!     Tokenizes argument lists such as the inside of `[source, python, #tag]`. Only the
//!     characters that structure an argument list are literals: `\`, `=`, `,` and `"`.
//!     Markers like `#tag` and `*subtype` are plain text here and are told apart by the
//!     arguments parser.

use super::{first_lexeme, first_match, tokenize, LexResult, Lexer};
use crate::mau::error::MauError;
use crate::mau::text_buffer::TextBuffer;
use crate::mau::token::{Context, Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Lexeme {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r#"[\\=,"]"#)]
    Literal,

    #[regex(r#"[^ \t\\=,"]+"#)]
    Text,
}

pub struct ArgumentsLexer {
    buffer: TextBuffer,
}

impl ArgumentsLexer {
    pub fn new(text: &str, context: Context) -> Self {
        Self {
            buffer: TextBuffer::new(text, context),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, MauError> {
        tokenize(&mut self)
    }

    fn lexeme(&mut self) -> LexResult {
        let (lexeme, slice) = match first_lexeme::<Lexeme>(self.buffer.tail()) {
            Some((lexeme, slice)) => (lexeme, slice.to_string()),
            None => return Ok(None),
        };

        // Whitespace is kept verbatim, quoted values preserve it
        let kind = match lexeme {
            Lexeme::Whitespace => TokenKind::Whitespace,
            Lexeme::Literal => TokenKind::Literal,
            Lexeme::Text => TokenKind::Text,
        };
        let token = self.token(kind, slice.as_str());
        self.buffer.skip(slice.chars().count());
        Ok(Some(vec![token]))
    }
}

impl Lexer for ArgumentsLexer {
    fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    fn recognize(&mut self) -> LexResult {
        first_match(self, &[Self::lexeme])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_structure_literals() {
        let tokens = ArgumentsLexer::new(r#"a, key="x\"y""#, Context::default())
            .tokenize()
            .unwrap();
        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            rendered,
            vec![
                r#"TEXT("a")"#,
                r#"LITERAL(",")"#,
                r#"WHITESPACE(" ")"#,
                r#"TEXT("key")"#,
                r#"LITERAL("=")"#,
                r#"LITERAL("\"")"#,
                r#"TEXT("x")"#,
                r#"LITERAL("\\")"#,
                r#"LITERAL("\"")"#,
                r#"TEXT("y")"#,
                r#"LITERAL("\"")"#,
                "EOL",
                "EOF",
            ]
        );
    }

    #[test]
    fn test_markers_are_text() {
        let tokens = ArgumentsLexer::new("#tag *sub", Context::default())
            .tokenize()
            .unwrap();

        assert_eq!(tokens[0], Token::text("#tag"));
        assert_eq!(tokens[2], Token::text("*sub"));
    }
}
