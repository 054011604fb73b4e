//! AST arena
//!
//!     Every node of a compile lives in one [`Ast`] and is addressed by a [`NodeId`].
//!
//! Ownership
//!
//!     A node owns its children through an ordered list of ids. Each child records its
//!     parent as a plain id plus an optional parent position (`title`, `primary`, ...) that
//!     tells which slot of the parent it fills. The parent link is never an ownership path;
//!     it exists so that consumers can ask a node for its parent without cycles.
//!
//!     [`Ast::add_children`] is the only way to attach children, which keeps the parent
//!     links consistent. Nodes are never detached or moved after creation. Parsers only
//!     discard nodes by truncating the arena back to a checkpoint, see
//!     [`Backtrack`](crate::mau::parsing::Backtrack).
//!
//! Equality
//!
//!     Structural equality ([`Ast::structurally_equal`]) compares the full recursive shape:
//!     kind, info, parent position and children. The parent link and the arena ids are
//!     excluded, so trees living in different arenas or at different offsets compare equal.

pub mod nodes;
pub mod snapshot;
pub mod visitor;

pub use nodes::{NodeInfo, NodeKind};
pub use snapshot::NodeSnapshot;
pub use visitor::Visitor;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position used when a caller does not fill a named slot
pub const CONTENT: &str = "content";

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub info: NodeInfo,
    parent: Option<NodeId>,
    parent_position: Option<String>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, info: NodeInfo) -> Self {
        Self {
            kind,
            info,
            parent: None,
            parent_position: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn parent_position(&self) -> Option<&str> {
        self.parent_position.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        self.add_with(kind, NodeInfo::default())
    }

    pub fn add_with(&mut self, kind: NodeKind, info: NodeInfo) -> NodeId {
        self.nodes.push(Node::new(kind, info));
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn info(&self, id: NodeId) -> &NodeInfo {
        &self.nodes[id.0].info
    }

    pub fn info_mut(&mut self, id: NodeId) -> &mut NodeInfo {
        &mut self.nodes[id.0].info
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Children filling the given parent position, in order
    pub fn children_at(&self, id: NodeId, position: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.node(*child).parent_position() == Some(position))
            .collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Append children to `parent`, fixing up their parent links
    pub fn add_children<I>(&mut self, parent: NodeId, children: I, position: &str)
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            let node = &mut self.nodes[child.0];
            debug_assert!(
                node.parent.is_none(),
                "node {} is already owned by {:?}",
                child,
                node.parent
            );
            node.parent = Some(parent);
            node.parent_position = Some(position.to_string());
            self.nodes[parent.0].children.push(child);
        }
    }

    /// Drop every node created after the arena had `len` nodes
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Copy a subtree. The copy has no parent.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let node = self.node(id);
        let (kind, info) = (node.kind.clone(), node.info.clone());
        let children: Vec<(NodeId, Option<String>)> = node
            .children
            .iter()
            .map(|child| (*child, self.node(*child).parent_position.clone()))
            .collect();

        let copy = self.add_with(kind, info);
        for (child, position) in children {
            let child_copy = self.deep_copy(child);
            self.add_children(
                copy,
                [child_copy],
                position.as_deref().unwrap_or(CONTENT),
            );
        }
        copy
    }

    /// Compare two subtrees, possibly from different arenas
    pub fn structurally_equal(&self, id: NodeId, other: &Ast, other_id: NodeId) -> bool {
        let (a, b) = (self.node(id), other.node(other_id));
        a.kind == b.kind
            && a.info == b.info
            && a.parent_position == b.parent_position
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(b.children.iter())
                .all(|(x, y)| self.structurally_equal(*x, other, *y))
    }

    /// Concatenated text of every leaf in the subtree
    pub fn plain_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id, &mut text);
        text
    }

    fn collect_text(&self, id: NodeId, text: &mut String) {
        if let Some(value) = self.kind(id).value() {
            text.push_str(value);
        }
        for child in self.children(id) {
            self.collect_text(*child, text);
        }
    }

    /// Ids of the subtree rooted at `id`, depth first, parents before children
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            ids.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        ids
    }

    /// Dispatch to the visitor method named after the node's tag
    pub fn accept(&self, id: NodeId, visitor: &mut dyn Visitor) {
        visitor::dispatch(self, id, visitor);
    }
}
