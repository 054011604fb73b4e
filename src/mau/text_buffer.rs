//! Line-indexed cursor over source text
//!
//!     All reads are side-effect free and degrade gracefully: past the end of a line they
//!     return `None` or an empty string, past the end of the text the current line is empty.
//!     Callers are expected to test [`TextBuffer::eof`] and [`TextBuffer::eol`] explicitly.
//!
//!     The initial context shifts every reported position. Text spliced from an outer
//!     document (nested block content, inline text of a paragraph) reports positions in the
//!     coordinate space of that outer document.

use crate::mau::token::Context;

#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    lines: Vec<String>,
    line: usize,
    column: usize,
    initial_context: Context,
}

impl TextBuffer {
    pub fn new(text: &str, context: Context) -> Self {
        let mut buffer = Self::default();
        buffer.load(text, context);
        buffer
    }

    /// Reset the cursor and split the text into lines
    pub fn load(&mut self, text: &str, context: Context) {
        self.lines = text.lines().map(str::to_string).collect();
        self.line = 0;
        self.column = 0;
        self.initial_context = context;
    }

    pub fn eof(&self) -> bool {
        self.line >= self.lines.len()
    }

    pub fn eol(&self) -> bool {
        self.column >= self.current_line().chars().count()
    }

    pub fn current_line(&self) -> &str {
        self.lines.get(self.line).map(String::as_str).unwrap_or("")
    }

    pub fn current_char(&self) -> Option<char> {
        self.current_line().chars().nth(self.column)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.current_line().chars().nth(self.column + 1)
    }

    /// Remainder of the current line, starting at the cursor
    pub fn tail(&self) -> &str {
        let line = self.current_line();
        match line.char_indices().nth(self.column) {
            Some((offset, _)) => &line[offset..],
            None => "",
        }
    }

    /// Advance the column by `steps` characters, clamped to the line length
    pub fn skip(&mut self, steps: usize) {
        let length = self.current_line().chars().count();
        self.column = (self.column + steps).min(length);
    }

    /// Move to the beginning of the next line, clamped to one past the last line
    pub fn nextline(&mut self) {
        if self.line < self.lines.len() {
            self.line += 1;
        }
        self.column = 0;
    }

    /// Cursor position, not shifted by the initial context
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub fn context(&self) -> Context {
        Context {
            line: self.initial_context.line + self.line,
            column: self.initial_context.column + self.column,
            source: self.initial_context.source.clone(),
            text: self.current_line().to_string(),
        }
    }
}
