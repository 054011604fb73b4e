//! Source blocks
//!
//!     Source code is never parsed. Each line may end with a callout marker wrapped in the
//!     callout delimiter (`:` unless the block sets `callouts=`):
//!
//!         x = 1:1:
//!
//!     The marker is cut from the visible line and recorded with its line number. The
//!     highlight marker (`@` unless the block sets `highlight=`) marks the line as
//!     highlighted instead. The secondary content of the block describes the callouts,
//!     one `marker: text` line each.

use crate::mau::error::MauError;
use crate::mau::token::{Context, Token, TokenKind};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_CALLOUT_DELIMITER: &str = ":";
pub const DEFAULT_HIGHLIGHT_MARKER: &str = "@";

static CALLOUT_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:\s]+):\s*(.*)$").unwrap());

/// Raw text of every line covered by `tokens`, with the context of the line
pub fn lines_of(tokens: &[Token]) -> Vec<(String, Context)> {
    tokens
        .iter()
        .filter(|token| token.is(TokenKind::Eol))
        .map(|eol| {
            let context = Context {
                column: 0,
                ..eol.context.clone()
            };
            (eol.context.text.clone(), context)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLines {
    pub code: Vec<String>,
    /// `(line, marker)` pairs, lines are zero based
    pub markers: Vec<(usize, String)>,
    pub highlights: Vec<usize>,
}

pub fn split_callouts(
    lines: &[String],
    delimiter: &str,
    highlight: &str,
) -> Result<SourceLines, MauError> {
    let delimiter = regex::escape(delimiter);
    let pattern = Regex::new(&format!(r"^(.*){d}(\S+?){d}$", d = delimiter))
        .map_err(|err| MauError::Config(format!("Invalid callout delimiter: {}", err)))?;

    let mut source = SourceLines::default();
    for (number, line) in lines.iter().enumerate() {
        let captures = match pattern.captures(line) {
            Some(captures) => captures,
            None => {
                source.code.push(line.clone());
                continue;
            }
        };
        source.code.push(captures[1].to_string());
        if &captures[2] == highlight {
            source.highlights.push(number);
        } else {
            source.markers.push((number, captures[2].to_string()));
        }
    }
    Ok(source)
}

/// Parse the `marker: text` lines of the secondary content
pub fn callout_entries(
    lines: &[(String, Context)],
    markers: &[(usize, String)],
) -> Result<Vec<(String, String)>, MauError> {
    let mut entries = Vec::new();
    for (line, context) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let captures = CALLOUT_ENTRY.captures(line.trim()).ok_or_else(|| {
            MauError::parser(
                format!("Invalid callout description {:?}", line),
                context.clone(),
            )
        })?;
        let marker = captures[1].to_string();
        if !markers.iter().any(|(_, name)| *name == marker) {
            return Err(MauError::parser(
                format!("Callout '{}' is not used in the source", marker),
                context.clone(),
            ));
        }
        entries.push((marker, captures[2].to_string()));
    }

    for (line, marker) in markers {
        if !entries.iter().any(|(name, _)| name == marker) {
            warn!("callout '{}' on line {} has no description", marker, line);
        }
    }
    Ok(entries)
}
