//! Block lexer
//!
//!     Classifies one physical line at a time. Every recognizer either consumes the whole
//!     line or leaves it untouched, so after a match the driver always finds the cursor at
//!     the end of the line and emits the `EOL` token itself.
//!
//!     Recognizers, in priority order:
//!
//!         - block delimiter: exactly four identical characters from ``-=#*_+.~^` ``
//!         - `////` multiline comment delimiter
//!         - `// text` comment
//!         - `---` horizontal rule
//!         - `::name:args` command, `::#name:args` directive (executed here)
//!         - `@op:statement` control
//!         - `[args]` attribute list
//!         - `.text` title
//!         - `* text`, `## text` list item (leading spaces allowed)
//!         - `= text` header
//!         - `:name:value` variable definition
//!         - `<< type:args` attached content
//!         - whitespace only line (no tokens, the line counts as blank)
//!         - any other line is text
//!
//! Includes
//!
//!     `::#include:path` reads `path` through the injected
//!     [`SourceReader`](crate::mau::reader::SourceReader), lexes it with a nested block lexer
//!     whose contexts carry `path` as their source, and splices the resulting tokens in
//!     place of the directive line. The trailing `EOF` of the included text is dropped.
//!     Include chains are tracked so that a file including itself fails instead of
//!     recursing forever.

use super::{first_match, tokenize, LexResult, Lexer};
use crate::mau::error::MauError;
use crate::mau::options::ParserOptions;
use crate::mau::text_buffer::TextBuffer;
use crate::mau::token::{Context, Token, TokenKind};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const BLOCK_DELIMITER_CHARS: &str = "-=#*_+.~^`";

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^::(#?[A-Za-z0-9_\-.]+):(.*)$").unwrap());
static CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([A-Za-z0-9_]+):(.*)$").unwrap());
static ARGUMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]*)\]\s*$").unwrap());
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.([^\s.].*)$").unwrap());
static LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([*#]+)\s+(.*)$").unwrap());
static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(=+)\s+(.*)$").unwrap());
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([+\-]?[A-Za-z0-9_\-.]+):(.*)$").unwrap());
static CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<<\s*([A-Za-z0-9_\-]+):(.*)$").unwrap());

pub struct BlockLexer<'a> {
    buffer: TextBuffer,
    options: &'a ParserOptions,
    includes: Vec<String>,
}

impl<'a> BlockLexer<'a> {
    pub fn new(text: &str, context: Context, options: &'a ParserOptions) -> Self {
        Self {
            buffer: TextBuffer::new(text, context),
            options,
            includes: Vec::new(),
        }
    }

    /// Tokenize the whole text
    pub fn tokenize(mut self) -> Result<Vec<Token>, MauError> {
        tokenize(&mut self)
    }

    /// Consume the current line and emit `tokens`
    fn line(&mut self, tokens: Vec<Token>) -> LexResult {
        let length = self.buffer.current_line().chars().count();
        self.buffer.skip(length);
        Ok(Some(tokens))
    }

    /// `[kind(value)]` followed by `TEXT(text)` unless the text is empty
    fn with_text(&self, kind: TokenKind, value: &str, text: &str) -> Vec<Token> {
        let mut tokens = vec![self.token(kind, value)];
        if !text.is_empty() {
            tokens.push(self.token(TokenKind::Text, text));
        }
        tokens
    }

    fn block_delimiter(&mut self) -> LexResult {
        let line = self.buffer.current_line();
        let mut chars = line.chars();
        let first = match chars.next() {
            Some(c) if BLOCK_DELIMITER_CHARS.contains(c) => c,
            _ => return Ok(None),
        };
        if line.chars().count() != 4 || !line.chars().all(|c| c == first) {
            return Ok(None);
        }
        let token = self.token(TokenKind::Block, line);
        self.line(vec![token])
    }

    fn multiline_comment(&mut self) -> LexResult {
        if self.buffer.current_line() != "////" {
            return Ok(None);
        }
        let token = self.token(TokenKind::MultilineComment, "////");
        self.line(vec![token])
    }

    fn comment(&mut self) -> LexResult {
        let text = match self.buffer.current_line().strip_prefix("//") {
            Some(text) => text.trim().to_string(),
            None => return Ok(None),
        };
        let token = self.token(TokenKind::Comment, text);
        self.line(vec![token])
    }

    fn horizontal_rule(&mut self) -> LexResult {
        if self.buffer.current_line() != "---" {
            return Ok(None);
        }
        let token = self.token(TokenKind::HorizontalRule, "---");
        self.line(vec![token])
    }

    fn command(&mut self) -> LexResult {
        let captures = match COMMAND.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let name = captures[1].to_string();
        let args = captures[2].trim().to_string();

        if let Some(directive) = name.strip_prefix('#') {
            return self.directive(directive, &args);
        }
        let tokens = self.with_text(TokenKind::Command, &name, &args);
        self.line(tokens)
    }

    fn directive(&mut self, name: &str, args: &str) -> LexResult {
        match name {
            "include" => self.include(args),
            _ => Err(MauError::lexer(
                format!("Unknown directive '{}'", name),
                self.buffer.context(),
            )),
        }
    }

    fn include(&mut self, path: &str) -> LexResult {
        let context = self.buffer.context();
        if path.is_empty() {
            return Err(MauError::lexer("Include directive without a path", context));
        }
        if self.includes.iter().any(|included| included == path) {
            return Err(MauError::lexer(
                format!("Circular include of '{}'", path),
                context,
            ));
        }

        debug!("including {} at {}", path, context);
        let text = self
            .options
            .reader()
            .read(path)
            .map_err(|err| MauError::lexer(err.to_string(), context.clone()))?;

        let mut nested = BlockLexer::new(&text, Context::with_source(path), self.options);
        nested.includes = self.includes.clone();
        nested.includes.push(path.to_string());

        let mut tokens = tokenize(&mut nested)?;
        if tokens.last().map(|token| token.is(TokenKind::Eof)) == Some(true) {
            tokens.pop();
        }

        // The directive line leaves no EOL behind, the included lines carry their own
        self.buffer.nextline();
        Ok(Some(tokens))
    }

    fn control(&mut self) -> LexResult {
        let captures = match CONTROL.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let tokens = self.with_text(TokenKind::Control, &captures[1], captures[2].trim());
        self.line(tokens)
    }

    fn arguments(&mut self) -> LexResult {
        let inner = match ARGUMENTS.captures(self.buffer.current_line()) {
            Some(captures) => captures[1].to_string(),
            None => return Ok(None),
        };
        let token = self.token(TokenKind::Arguments, inner);
        self.line(vec![token])
    }

    fn title(&mut self) -> LexResult {
        let title = match TITLE.captures(self.buffer.current_line()) {
            Some(captures) => captures[1].trim_end().to_string(),
            None => return Ok(None),
        };
        let token = self.token(TokenKind::Title, title);
        self.line(vec![token])
    }

    fn list(&mut self) -> LexResult {
        let captures = match LIST.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let tokens = self.with_text(TokenKind::List, &captures[1], captures[2].trim_end());
        self.line(tokens)
    }

    fn header(&mut self) -> LexResult {
        let captures = match HEADER.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let tokens = self.with_text(TokenKind::Header, &captures[1], captures[2].trim_end());
        self.line(tokens)
    }

    fn variable(&mut self) -> LexResult {
        let captures = match VARIABLE.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let tokens = self.with_text(TokenKind::Variable, &captures[1], captures[2].trim());
        self.line(tokens)
    }

    fn content(&mut self) -> LexResult {
        let captures = match CONTENT.captures(self.buffer.current_line()) {
            Some(captures) => captures,
            None => return Ok(None),
        };
        let tokens = self.with_text(TokenKind::Content, &captures[1], captures[2].trim());
        self.line(tokens)
    }

    fn blank(&mut self) -> LexResult {
        if !self.buffer.current_line().trim().is_empty() {
            return Ok(None);
        }
        self.line(Vec::new())
    }

    fn text(&mut self) -> LexResult {
        let token = self.token(TokenKind::Text, self.buffer.current_line());
        self.line(vec![token])
    }
}

impl Lexer for BlockLexer<'_> {
    fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    fn recognize(&mut self) -> LexResult {
        first_match(
            self,
            &[
                Self::block_delimiter,
                Self::multiline_comment,
                Self::comment,
                Self::horizontal_rule,
                Self::command,
                Self::control,
                Self::arguments,
                Self::title,
                Self::list,
                Self::header,
                Self::variable,
                Self::content,
                Self::blank,
                Self::text,
            ],
        )
    }
}
