//! Mau compiler front-end
//!
//!     This module is the root of the pipeline that turns Mau source text into an AST.
//!     The hard parts live in three layers that depend on each other in order:
//!
//!         1. Lexing. A family of line-aware lexers driven by a shared loop. See
//!            [lexing](lexing).
//!         2. Parsing. A family of recursive-descent parsers sharing a token cursor with
//!            transactional rollback. Parsers instantiate each other for nested content.
//!            See [parsing](parsing).
//!         3. Resolution. Footnotes, references and headers are collected while parsing and
//!            resolved once the outermost document is complete. See [resolution](resolution).
//!
//! Ownership
//!
//!     All nodes live in a single [`Ast`](ast::Ast) arena and are addressed by
//!     [`NodeId`](ast::NodeId). Parents own their children through index lists; the parent
//!     back-reference is a plain index and never a second ownership path. Nested parsers
//!     borrow the same arena, so merging their results is a matter of moving ids around.
//!
//! Entry Points
//!
//!     - [`compile`] runs the whole pipeline on a string.
//!     - [`DocumentLoader`](loader::DocumentLoader) loads sources from files or strings.
//!     - [`formats`] serializes the result (JSON, YAML, tree view).

pub mod ast;
pub mod config;
pub mod environment;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod options;
pub mod parsing;
pub mod reader;
pub mod resolution;
pub mod testing;
pub mod text_buffer;
pub mod token;

pub use ast::{Ast, Node, NodeId, NodeKind};
pub use environment::{Environment, Value};
pub use error::{MauError, RuleError, RuleResult};
pub use options::ParserOptions;
pub use parsing::{parse_document as compile, Compilation};
pub use token::{Context, Token, TokenKind};
