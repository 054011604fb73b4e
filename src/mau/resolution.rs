//! Cross-reference resolution
//!
//!     Footnotes, references and headers are collected while parsing and resolved in a
//!     second pass, once the outermost document has been parsed.
//!
//! Pass 1: collection
//!
//!     Inline macros register mentions, placeholder nodes keyed by a name (footnotes), a
//!     `(content_type, name)` pair (references) or a header id. Blocks register
//!     definitions: the parsed content, keyed the same way. Headers are appended to a flat
//!     ordered list. Listing commands (`::footnotes:`, `::references:`, `::toc:`) register
//!     their node so that entries can be attached later.
//!
//! Pass 2: resolution
//!
//!     [`Collections::resolve`] numbers mentions in mention order, computes their anchors,
//!     copies the definition content into them, builds the entry nodes and attaches copies
//!     of those entries to every listing command, honoring `exclude_tag` and the other
//!     filters. Headers are folded into the TOC tree, see [`toc::fold_parents`].
//!
//! Merging
//!
//!     Nested parsers have collections of their own. Blocks with the `default` engine merge
//!     them into the enclosing parser with [`Collections::update`], which applies the same
//!     duplicate checks as direct registration. Blocks with the `mau` engine resolve them
//!     on the spot and never merge.

pub mod footnotes;
pub mod references;
pub mod toc;

pub use footnotes::FootnotesManager;
pub use references::ReferencesManager;
pub use toc::TocManager;

use crate::mau::ast::{Ast, NodeId};
use crate::mau::error::MauError;
use crate::mau::token::Context;
use log::debug;
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Content declared by a footnote or reference block
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub content: Vec<NodeId>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub context: Context,
}

/// A placeholder node waiting for resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub node: NodeId,
    pub context: Context,
}

impl Mention {
    pub fn new(node: NodeId, context: Context) -> Self {
        Self { node, context }
    }
}

/// Everything a parser registered for resolution
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub footnotes: FootnotesManager,
    pub references: ReferencesManager,
    pub toc: TocManager,
}

/// Sizes of the collections, used to roll back a failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionsCheckpoint {
    footnotes: [usize; 3],
    references: [usize; 3],
    toc: [usize; 4],
}

/// Output of the resolution pass
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub footnotes: Vec<NodeId>,
    pub references: Vec<NodeId>,
    pub toc: Vec<NodeId>,
}

impl Collections {
    pub fn checkpoint(&self) -> CollectionsCheckpoint {
        CollectionsCheckpoint {
            footnotes: self.footnotes.sizes(),
            references: self.references.sizes(),
            toc: self.toc.sizes(),
        }
    }

    pub fn truncate(&mut self, checkpoint: &CollectionsCheckpoint) {
        self.footnotes.truncate(checkpoint.footnotes);
        self.references.truncate(checkpoint.references);
        self.toc.truncate(checkpoint.toc);
    }

    /// Merge the collections of a nested parser
    pub fn update(&mut self, other: Collections) -> Result<(), MauError> {
        self.footnotes.update(other.footnotes)?;
        self.references.update(other.references)?;
        self.toc.update(other.toc)?;
        Ok(())
    }

    pub fn resolve(self, ast: &mut Ast) -> Result<Resolved, MauError> {
        debug!(
            "resolving {} footnotes, {} references, {} headers",
            self.footnotes.mention_count(),
            self.references.mention_count(),
            self.toc.header_count()
        );
        Ok(Resolved {
            footnotes: self.footnotes.resolve(ast)?,
            references: self.references.resolve(ast)?,
            toc: self.toc.resolve(ast)?,
        })
    }
}

/// Hash of raw bytes. Anchors are built on it, so it only depends on the pinned
/// `rustc-hash` version, never on the toolchain.
pub fn stable_hash(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

/// Eight hex digits derived from the canonical dump of `content`
pub(crate) fn content_hash(ast: &Ast, content: &[NodeId]) -> String {
    let snapshots: Vec<_> = content.iter().map(|id| ast.snapshot(*id)).collect();
    let dump = serde_json::to_vec(&snapshots).unwrap_or_default();
    format!("{:08x}", stable_hash(&dump) & 0xffff_ffff)
}

/// Attach copies of `content` to `parent`
pub(crate) fn copy_content(ast: &mut Ast, parent: NodeId, content: &[NodeId], position: &str) {
    for id in content {
        let copy = ast.deep_copy(*id);
        ast.add_children(parent, [copy], position);
    }
}

/// The `exclude_tag` filter of a listing command
pub(crate) fn excluded_tag(ast: &Ast, listing: NodeId) -> Option<String> {
    ast.info(listing).kwargs.get("exclude_tag").cloned()
}
