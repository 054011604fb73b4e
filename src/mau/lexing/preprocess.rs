//! Variable preprocessing lexer
//!
//!     One character per token. The characters that matter to variable substitution
//!     (`\`, `` ` ``, `{` and `}`) become literals, everything else passes through as text.

use super::{first_match, tokenize, LexResult, Lexer};
use crate::mau::error::MauError;
use crate::mau::text_buffer::TextBuffer;
use crate::mau::token::{Context, Token, TokenKind};

const LITERALS: &str = "\\`{}";

pub struct PreprocessLexer {
    buffer: TextBuffer,
}

impl PreprocessLexer {
    pub fn new(text: &str, context: Context) -> Self {
        Self {
            buffer: TextBuffer::new(text, context),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, MauError> {
        tokenize(&mut self)
    }

    fn literal(&mut self) -> LexResult {
        match self.buffer.current_char() {
            Some(c) if LITERALS.contains(c) => {
                let token = self.token(TokenKind::Literal, c.to_string());
                self.buffer.skip(1);
                Ok(Some(vec![token]))
            }
            _ => Ok(None),
        }
    }

    fn character(&mut self) -> LexResult {
        let c = match self.buffer.current_char() {
            Some(c) => c,
            None => return Ok(None),
        };
        let token = self.token(TokenKind::Text, c.to_string());
        self.buffer.skip(1);
        Ok(Some(vec![token]))
    }
}

impl Lexer for PreprocessLexer {
    fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    fn recognize(&mut self) -> LexResult {
        first_match(self, &[Self::literal, Self::character])
    }
}
