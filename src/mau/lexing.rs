//! Lexer
//!
//!     All lexers share one driver loop, [`tokenize`]. A concrete lexer only supplies its
//!     recognizers through [`Lexer::recognize`]; the driver handles the two things every
//!     lexer needs in the same way:
//!
//!         1. End of input: an `EOF` token is emitted and the loop stops.
//!         2. End of line: an `EOL` token is emitted and the cursor moves to the next line.
//!
//!     Only then are the lexer's recognizers tried, in priority order. The first one that
//!     returns `Some` wins, even when it returns no tokens at all (it consumed input that
//!     does not produce anything). If every recognizer returns `None` the input cannot be
//!     tokenized and the lexer fails.
//!
//! The Lexers
//!
//!     - [`block`]: one physical line at a time. Produces the line level kinds (headers,
//!       block delimiters, commands, ...) and executes `::#include` directives.
//!     - [`text`]: inline text. Whitespace runs, style and structure literals, words.
//!     - [`arguments`]: the inside of attribute lists and macro arguments.
//!     - [`preprocess`]: one character at a time, for variable substitution.
//!
//! Loop Guard
//!
//!     Every iteration of the driver must move the cursor. If the cursor context is the
//!     same before and after an iteration a recognizer matched without consuming input,
//!     which would otherwise spin forever. The driver fails with
//!     [`MauError::LoopDetected`] instead.

pub mod arguments;
pub mod block;
pub mod preprocess;
pub mod text;

pub use arguments::ArgumentsLexer;
pub use block::BlockLexer;
pub use preprocess::PreprocessLexer;
pub use text::TextLexer;

use crate::mau::error::MauError;
use crate::mau::text_buffer::TextBuffer;
use crate::mau::token::{Token, TokenKind};

/// Outcome of a recognizer. `None` means "try the next one".
pub type LexResult = Result<Option<Vec<Token>>, MauError>;

/// A single recognizer of a concrete lexer
pub type Recognizer<L> = fn(&mut L) -> LexResult;

pub trait Lexer: Sized {
    fn buffer(&self) -> &TextBuffer;
    fn buffer_mut(&mut self) -> &mut TextBuffer;

    /// Lexer specific recognizers, usually a call to [`first_match`]
    fn recognize(&mut self) -> LexResult;

    /// Token of the given kind at the current position
    fn token(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        Token::new(kind, value, self.buffer().context())
    }
}

/// Try the recognizers in order, stop at the first match
pub fn first_match<L: Lexer>(lexer: &mut L, recognizers: &[Recognizer<L>]) -> LexResult {
    for recognizer in recognizers {
        if let Some(tokens) = recognizer(lexer)? {
            return Ok(Some(tokens));
        }
    }
    Ok(None)
}

/// Run the shared driver loop until `EOF` has been emitted
pub fn tokenize<L: Lexer>(lexer: &mut L) -> Result<Vec<Token>, MauError> {
    let mut tokens = Vec::new();

    loop {
        let before = lexer.buffer().context();

        if lexer.buffer().eof() {
            tokens.push(lexer.token(TokenKind::Eof, ""));
            return Ok(tokens);
        }

        if lexer.buffer().eol() {
            tokens.push(lexer.token(TokenKind::Eol, ""));
            lexer.buffer_mut().nextline();
            continue;
        }

        match lexer.recognize()? {
            Some(found) => tokens.extend(found),
            None => {
                return Err(MauError::lexer(
                    format!("No rule matched {:?}", lexer.buffer().tail()),
                    before,
                ))
            }
        }

        if lexer.buffer().context() == before {
            return Err(MauError::LoopDetected { context: before });
        }
    }
}

/// Run a logos lexer on the rest of the current line and return the first lexeme
/// together with its text.
pub(crate) fn first_lexeme<'s, T>(tail: &'s str) -> Option<(T, &'s str)>
where
    T: logos::Logos<'s, Source = str>,
    T::Extras: Default,
{
    let mut lexer = T::lexer(tail);
    match lexer.next() {
        Some(Ok(lexeme)) => Some((lexeme, lexer.slice())),
        _ => None,
    }
}
