//! Inline text lexer
//!
//!     Tokenizes the text of paragraphs, headers, titles, list items and macro arguments
//!     that contain markup. The lexemes are defined with logos:
//!
//!         - runs of spaces and tabs, collapsed into a single `" "` whitespace token
//!         - single character literals used by styles, verbatim, macros and escapes
//!         - runs of anything else, as text
//!
//!     Multi-line input keeps its line structure: the driver emits an `EOL` token between
//!     lines, which the text parser reads as a space.

use super::{first_lexeme, first_match, tokenize, LexResult, Lexer};
use crate::mau::error::MauError;
use crate::mau::text_buffer::TextBuffer;
use crate::mau::token::{Context, Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Lexeme {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r#"[~^_*`{}()\[\]\\"$%]"#)]
    Literal,

    #[regex(r#"[^ \t~^_*`{}()\[\]\\"$%]+"#)]
    Text,
}

pub struct TextLexer {
    buffer: TextBuffer,
}

impl TextLexer {
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

        let token = match lexeme {
            Lexeme::Whitespace => self.token(TokenKind::Whitespace, " "),
            Lexeme::Literal => self.token(TokenKind::Literal, slice.as_str()),
            Lexeme::Text => self.token(TokenKind::Text, slice.as_str()),
        };
        self.buffer.skip(slice.chars().count());
        Ok(Some(vec![token]))
    }
}

impl Lexer for TextLexer {
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
