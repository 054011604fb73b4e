//! Fluent assertion API for AST nodes

use super::matchers::TextMatch;
use crate::mau::ast::{Ast, NodeId, NodeKind, CONTENT};
use crate::mau::parsing::Compilation;

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a compiled document
pub fn assert_ast(compilation: &Compilation) -> DocumentAssertion<'_> {
    DocumentAssertion { compilation }
}

fn summarize_items(ast: &Ast, ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| ast.node(*id).tag())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Document Assertions
// ============================================================================

pub struct DocumentAssertion<'a> {
    compilation: &'a Compilation,
}

impl<'a> DocumentAssertion<'a> {
    fn ast(&self) -> &'a Ast {
        &self.compilation.ast
    }

    fn items(&self) -> Vec<NodeId> {
        self.ast().children_at(self.compilation.document, CONTENT)
    }

    /// Assert the kind of the root node
    pub fn root(self, expected: NodeKind) -> Self {
        let actual = self.ast().kind(self.compilation.document);
        assert_eq!(actual, &expected, "root: Expected {:?}, found {:?}", expected, actual);
        self
    }

    /// Assert the number of top level items
    pub fn item_count(self, expected: usize) -> Self {
        let items = self.items();
        assert_eq!(
            items.len(),
            expected,
            "Expected {} items, found {} items: [{}]",
            expected,
            items.len(),
            summarize_items(self.ast(), &items)
        );
        self
    }

    /// Assert on a specific top level item
    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let items = self.items();
        assert!(
            index < items.len(),
            "Item index {} out of bounds (document has {} items)",
            index,
            items.len()
        );
        assertion(NodeAssertion {
            ast: self.ast(),
            id: items[index],
            context: format!("items[{}]", index),
        });
        self
    }

    /// Assert the tags of the top level items, in order
    pub fn item_tags(self, expected: &[&str]) -> Self {
        let items = self.items();
        let actual: Vec<&str> = items.iter().map(|id| self.ast().node(*id).tag()).collect();
        assert_eq!(actual, expected, "Unexpected items: [{}]", actual.join(", "));
        self
    }

    pub fn footnotes<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ChildrenAssertion<'a>),
    {
        assertion(ChildrenAssertion {
            ast: self.ast(),
            children: self.compilation.footnotes.clone(),
            context: "footnotes".to_string(),
        });
        self
    }

    pub fn references<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ChildrenAssertion<'a>),
    {
        assertion(ChildrenAssertion {
            ast: self.ast(),
            children: self.compilation.references.clone(),
            context: "references".to_string(),
        });
        self
    }

    /// Assert on the top level TOC entries
    pub fn toc<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ChildrenAssertion<'a>),
    {
        assertion(ChildrenAssertion {
            ast: self.ast(),
            children: self.compilation.toc.clone(),
            context: "toc".to_string(),
        });
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    ast: &'a Ast,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Assert the node's tag (`paragraph`, `list-item`, ...)
    pub fn tag(self, expected: &str) -> Self {
        let actual = self.ast.node(self.id).tag();
        assert_eq!(
            actual, expected,
            "{}: Expected {}, found {}",
            self.context, expected, actual
        );
        self
    }

    /// Assert the node's kind and its fields
    pub fn kind(self, expected: NodeKind) -> Self {
        let actual = self.ast.kind(self.id);
        assert_eq!(
            actual, &expected,
            "{}: Expected {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    /// Assert something about the kind that a full comparison would make noisy
    pub fn kind_matches<F>(self, description: &str, predicate: F) -> Self
    where
        F: FnOnce(&NodeKind) -> bool,
    {
        let actual = self.ast.kind(self.id);
        assert!(
            predicate(actual),
            "{}: Expected {}, found {:?}",
            self.context,
            description,
            actual
        );
        self
    }

    /// Assert the concatenated text of every leaf below the node
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        let expected: TextMatch = expected.into();
        expected.assert(&self.ast.plain_text(self.id), &self.context);
        self
    }

    pub fn subtype(self, expected: Option<&str>) -> Self {
        let actual = self.ast.info(self.id).subtype.as_deref();
        assert_eq!(
            actual, expected,
            "{}: Expected subtype {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn arg(self, index: usize, expected: &str) -> Self {
        let actual = self.ast.info(self.id).args.get(index).map(String::as_str);
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected args[{}] to be '{}', found {:?}",
            self.context,
            index,
            expected,
            actual
        );
        self
    }

    pub fn kwarg(self, key: &str, expected: &str) -> Self {
        let actual = self.ast.info(self.id).kwargs.get(key).map(String::as_str);
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected kwarg '{}' to be '{}', found {:?}",
            self.context,
            key,
            expected,
            actual
        );
        self
    }

    pub fn has_tag(self, expected: &str) -> Self {
        assert!(
            self.ast.info(self.id).has_tag(expected),
            "{}: Expected tag '{}', found {:?}",
            self.context,
            expected,
            self.ast.info(self.id).tags
        );
        self
    }

    /// Assert the number of children at a parent position
    pub fn child_count(self, position: &str, expected: usize) -> Self {
        let children = self.ast.children_at(self.id, position);
        assert_eq!(
            children.len(),
            expected,
            "{}.{}: Expected {} children, found {} children: [{}]",
            self.context,
            position,
            expected,
            children.len(),
            summarize_items(self.ast, &children)
        );
        self
    }

    /// Assert on a child at a parent position
    pub fn child<F>(self, position: &str, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.ast.children_at(self.id, position);
        assert!(
            index < children.len(),
            "{}.{}: Child index {} out of bounds ({} children)",
            self.context,
            position,
            index,
            children.len()
        );
        assertion(NodeAssertion {
            ast: self.ast,
            id: children[index],
            context: format!("{}.{}[{}]", self.context, position, index),
        });
        self
    }

    /// Shortcut for [`child`](Self::child) at the `content` position
    pub fn content<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.child(CONTENT, index, assertion)
    }

    /// Bulk assertions on the children at a parent position
    pub fn children<F>(self, position: &str, assertion: F) -> Self
    where
        F: FnOnce(ChildrenAssertion<'a>),
    {
        assertion(ChildrenAssertion {
            ast: self.ast,
            children: self.ast.children_at(self.id, position),
            context: format!("{}.{}", self.context, position),
        });
        self
    }
}

// ============================================================================
// Children Assertions (bulk operations)
// ============================================================================

pub struct ChildrenAssertion<'a> {
    ast: &'a Ast,
    children: Vec<NodeId>,
    context: String,
}

impl<'a> ChildrenAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.children.len(),
            expected,
            "{}: Expected {} children, found {} children: [{}]",
            self.context,
            expected,
            self.children.len(),
            summarize_items(self.ast, &self.children)
        );
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.children.len(),
            "{}: Child index {} out of bounds ({} children)",
            self.context,
            index,
            self.children.len()
        );
        assertion(NodeAssertion {
            ast: self.ast,
            id: self.children[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    pub fn tags(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self
            .children
            .iter()
            .map(|id| self.ast.node(*id).tag())
            .collect();
        assert_eq!(actual, expected, "{}: Unexpected children", self.context);
        self
    }

    /// Plain text of every child, in order
    pub fn texts(self, expected: &[&str]) -> Self {
        let actual: Vec<String> = self
            .children
            .iter()
            .map(|id| self.ast.plain_text(*id))
            .collect();
        assert_eq!(actual, expected, "{}: Unexpected texts", self.context);
        self
    }
}
