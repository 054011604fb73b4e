//! Error types for lexing, parsing and resolution
//!
//!     There are two kinds of failure and they are never confused:
//!
//!         - [`RuleError::Mismatch`]: a grammar rule does not apply at the current position.
//!           It is always swallowed by the nearest [`attempt`](crate::mau::parsing::Backtrack::attempt)
//!           and never reaches the user.
//!         - [`MauError`]: a fatal error. It aborts the whole compile and, where it makes
//!           sense, carries the [`Context`] of the offending token.

use crate::mau::token::Context;
use std::fmt;

/// Fatal errors. No partial AST is produced when one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum MauError {
    /// The lexer could not tokenize the remaining input, or a directive failed
    Lexer { message: String, context: Context },
    /// The parser exhausted its alternatives or found malformed input
    Parser { message: String, context: Context },
    /// A lexer recognizer or parser rule matched without advancing
    LoopDetected { context: Context },
    /// A dotted key was not present in the environment
    VariableNotFound { key: String },
    /// The injected reader failed
    Io { path: String, message: String },
    /// Configuration could not be loaded or deserialized
    Config(String),
}

impl MauError {
    pub fn lexer(message: impl Into<String>, context: Context) -> Self {
        MauError::Lexer {
            message: message.into(),
            context,
        }
    }

    pub fn parser(message: impl Into<String>, context: Context) -> Self {
        MauError::Parser {
            message: message.into(),
            context,
        }
    }

    /// Source position of the error, when there is one
    pub fn context(&self) -> Option<&Context> {
        match self {
            MauError::Lexer { context, .. }
            | MauError::Parser { context, .. }
            | MauError::LoopDetected { context } => Some(context),
            _ => None,
        }
    }
}

impl fmt::Display for MauError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MauError::Lexer { message, context } => {
                write!(f, "{}: lexer error: {}", context, message)?;
                write_line(f, context)
            }
            MauError::Parser { message, context } => {
                write!(f, "{}: parser error: {}", context, message)?;
                write_line(f, context)
            }
            MauError::LoopDetected { context } => {
                write!(f, "{}: loop detected, the cursor did not advance", context)?;
                write_line(f, context)
            }
            MauError::VariableNotFound { key } => write!(f, "Variable '{}' not found", key),
            MauError::Io { path, message } => write!(f, "Cannot read '{}': {}", path, message),
            MauError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, context: &Context) -> fmt::Result {
    if context.text.is_empty() {
        return Ok(());
    }
    write!(f, "\n    {}", context.text)
}

impl std::error::Error for MauError {}

impl From<MauError> for String {
    fn from(err: MauError) -> Self {
        err.to_string()
    }
}

/// Outcome of a single grammar rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The rule does not apply here. Unwinds exactly one scope.
    Mismatch,
    /// Unwinds the entire compile
    Fatal(MauError),
}

impl From<MauError> for RuleError {
    fn from(err: MauError) -> Self {
        RuleError::Fatal(err)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Mismatch => write!(f, "rule does not match"),
            RuleError::Fatal(err) => write!(f, "{}", err),
        }
    }
}

pub type RuleResult<T> = Result<T, RuleError>;

/// Format source code context around an error position
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, context: &Context) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = context.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut excerpt = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        excerpt.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = Context::new(3, 0, None, "error line");

        let excerpt = format_source_context(source, &context);

        assert!(excerpt.contains("line 2"));
        assert!(excerpt.contains(">>   4 | error line"));
        assert!(excerpt.contains("line 5"));
        assert!(!excerpt.contains("line 7"));
    }

    #[test]
    fn test_display_carries_position_and_line() {
        let context = Context::new(1, 4, Some("doc.mau".to_string()), "----");
        let err = MauError::parser("Unterminated block", context);

        assert_eq!(
            err.to_string(),
            "doc.mau:2:5: parser error: Unterminated block\n    ----"
        );
    }

    #[test]
    fn test_fatal_converts_into_rule_error() {
        let err: RuleError = MauError::VariableNotFound { key: "a.b".into() }.into();
        assert!(matches!(err, RuleError::Fatal(MauError::VariableNotFound { .. })));
    }
}
