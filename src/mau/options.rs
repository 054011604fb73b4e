//! Parser options and the plugin table
//!
//!     [`ParserOptions`] is built once, before parsing starts, and then passed by reference
//!     to every lexer and parser of a compile, nested ones included. It is never mutated
//!     while parsing, so re-running a compile with the same options and input always gives
//!     the same AST.
//!
//!     It carries what cannot live in the [`Environment`](crate::mau::environment::Environment):
//!     the reader used by includes, the header anchor function, and custom macro handlers.

use crate::mau::ast::{Ast, NodeId};
use crate::mau::error::MauError;
use crate::mau::parsing::arguments::Arguments;
use crate::mau::reader::{FsReader, SourceReader};
use crate::mau::resolution::toc::default_header_anchor;
use crate::mau::token::Context;
use std::collections::HashMap;

/// Computes the anchor of a header from its plain text and level
pub type HeaderAnchorFn = fn(&str, usize) -> String;

/// An inline macro invocation, as handed to custom handlers
#[derive(Debug, Clone)]
pub struct MacroCall {
    pub name: String,
    pub arguments: Arguments,
    pub context: Context,
}

/// Builds the node for a custom macro
pub type MacroHandler = fn(&MacroCall, &mut Ast) -> Result<NodeId, MauError>;

pub struct ParserOptions {
    reader: Box<dyn SourceReader>,
    header_anchor: HeaderAnchorFn,
    macros: HashMap<String, MacroHandler>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self {
            reader: Box::new(FsReader::new()),
            header_anchor: default_header_anchor,
            macros: HashMap::new(),
        }
    }

    pub fn with_reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    pub fn with_header_anchor(mut self, header_anchor: HeaderAnchorFn) -> Self {
        self.header_anchor = header_anchor;
        self
    }

    /// Register a handler for `[name](...)`. Built-in macro names cannot be overridden.
    pub fn register_macro(mut self, name: impl Into<String>, handler: MacroHandler) -> Self {
        self.macros.insert(name.into(), handler);
        self
    }

    pub fn reader(&self) -> &dyn SourceReader {
        self.reader.as_ref()
    }

    pub fn header_anchor(&self, text: &str, level: usize) -> String {
        (self.header_anchor)(text, level)
    }

    pub fn macro_handler(&self, name: &str) -> Option<MacroHandler> {
        self.macros.get(name).copied()
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut macros: Vec<&String> = self.macros.keys().collect();
        macros.sort();
        f.debug_struct("ParserOptions")
            .field("macros", &macros)
            .finish_non_exhaustive()
    }
}
