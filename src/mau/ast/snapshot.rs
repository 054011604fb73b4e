//! Canonical structural dump of a subtree
//!
//! A [`NodeSnapshot`] is a plain owned tree of primitives: the kind fields flattened next
//! to `subtype`, `args`, `kwargs`, `tags`, the parent `position` and the nested children.
//! It is what golden tests compare and what crosses a process boundary when the renderer
//! runs elsewhere. Loading a snapshot back into an arena and dumping it again gives the
//! same snapshot.

use super::nodes::{NodeInfo, NodeKind};
use super::{Ast, NodeId, CONTENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kwargs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    fn info(&self) -> NodeInfo {
        NodeInfo {
            subtype: self.subtype.clone(),
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
            tags: self.tags.clone(),
        }
    }
}

impl Ast {
    /// Dump the subtree rooted at `id`
    pub fn snapshot(&self, id: NodeId) -> NodeSnapshot {
        let node = self.node(id);
        NodeSnapshot {
            kind: node.kind.clone(),
            subtype: node.info.subtype.clone(),
            args: node.info.args.clone(),
            kwargs: node.info.kwargs.clone(),
            tags: node.info.tags.clone(),
            position: node.parent_position().map(str::to_string),
            children: node
                .children()
                .iter()
                .map(|child| self.snapshot(*child))
                .collect(),
        }
    }

    /// Load a dumped subtree into this arena. The root keeps no parent.
    pub fn load_snapshot(&mut self, snapshot: &NodeSnapshot) -> NodeId {
        let id = self.add_with(snapshot.kind.clone(), snapshot.info());
        for child in &snapshot.children {
            let child_id = self.load_snapshot(child);
            let position = child.position.as_deref().unwrap_or(CONTENT);
            self.add_children(id, [child_id], position);
        }
        id
    }

    /// Build a fresh arena from a dump
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let root = ast.load_snapshot(snapshot);
        (ast, root)
    }
}
