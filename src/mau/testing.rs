//! Testing utilities for AST assertions
//!
//!     Mau documents compile into a flat arena, so checking a result by hand means chasing
//!     ids through `children_at` calls and matching on kinds at every step. The intent of a
//!     test disappears behind the plumbing, and the failure message rarely says where in
//!     the tree the mismatch was.
//!
//!     Use [assert_ast](fn@assert_ast) instead. Every step of the fluent API records the path
//!     it walked (`items[1].content[0]`), and failures report that path along with what
//!     was found there:
//!
//!     ```rust-example
//!     use mau::mau::testing::{assert_ast, compile_str};
//!
//!     let compilation = compile_str("= Title\n\n* one\n* two");
//!
//!     assert_ast(&compilation)
//!         .item_count(2)
//!         .item(0, |item| {
//!             item.tag("header").text("Title");
//!         })
//!         .item(1, |item| {
//!             item.tag("list").children("content", |items| {
//!                 items.texts(&["one", "two"]);
//!             });
//!         });
//!     ```
//!
//!     Snapshots of whole trees go through the tree view format, see
//!     [formats::to_treeviz](crate::mau::formats::to_treeviz).
//!
//! Sources
//!
//!     Tests never touch the filesystem. [`compile_str`] uses an empty in-memory reader, and
//!     [`compile_with_files`] one seeded with the given files, so includes and `<< mau:`
//!     content resolve against them.

mod ast_assertions;
mod matchers;

pub use ast_assertions::{assert_ast, ChildrenAssertion, DocumentAssertion, NodeAssertion};
pub use matchers::TextMatch;

use crate::mau::environment::Environment;
use crate::mau::error::MauError;
use crate::mau::options::ParserOptions;
use crate::mau::parsing::{parse_document, Compilation};
use crate::mau::reader::MemoryReader;

/// Compile `source` with an empty environment, panicking on errors
pub fn compile_str(source: &str) -> Compilation {
    try_compile(source, Environment::new(), &[]).unwrap_or_else(|err| panic!("{}", err))
}

/// Compile `source` with in-memory files available to includes
pub fn compile_with_files(source: &str, files: &[(&str, &str)]) -> Compilation {
    try_compile(source, Environment::new(), files).unwrap_or_else(|err| panic!("{}", err))
}

/// Compile without panicking, for tests about errors
pub fn try_compile(
    source: &str,
    environment: Environment,
    files: &[(&str, &str)],
) -> Result<Compilation, MauError> {
    let reader = files
        .iter()
        .fold(MemoryReader::new(), |reader, (path, text)| {
            reader.with_file(*path, *text)
        });
    let options = ParserOptions::new().with_reader(reader);
    parse_document(source, environment, &options)
}
