//! Visitor dispatch
//!
//! This is the seam an external renderer uses. Every node kind has a method named after its
//! tag; the default implementation of each falls back to [`Visitor::visit_default`]. A
//! renderer therefore overrides only the kinds it cares about, and a new node kind only
//! needs a new method here.
//!
//! Traversal is up to the visitor: dispatch does not descend into children. Use
//! [`walk_children`] from inside a method to continue depth first.

use super::{Ast, NodeId};
use crate::mau::ast::nodes::NodeKind;

pub trait Visitor {
    /// Handler for every kind without a dedicated override
    fn visit_default(&mut self, ast: &Ast, id: NodeId);

    fn visit_document(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_container(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_header(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_block(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_paragraph(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_list(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_list_item(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_sentence(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_text(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_verbatim(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_raw(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_style(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_macro(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_macro_class(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_macro_link(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_macro_image(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_macro_header(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_footnote(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_footnote_entry(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_footnotes(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_reference(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_reference_entry(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_references(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_toc(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_toc_entry(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_horizontal_rule(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_source(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_callout(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_callout_entry(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_content(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_content_image(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
    fn visit_command(&mut self, ast: &Ast, id: NodeId) {
        self.visit_default(ast, id)
    }
}

pub(super) fn dispatch(ast: &Ast, id: NodeId, visitor: &mut dyn Visitor) {
    match ast.kind(id) {
        NodeKind::Document => visitor.visit_document(ast, id),
        NodeKind::Container => visitor.visit_container(ast, id),
        NodeKind::Header { .. } => visitor.visit_header(ast, id),
        NodeKind::Block { .. } => visitor.visit_block(ast, id),
        NodeKind::Paragraph => visitor.visit_paragraph(ast, id),
        NodeKind::List { .. } => visitor.visit_list(ast, id),
        NodeKind::ListItem { .. } => visitor.visit_list_item(ast, id),
        NodeKind::Sentence => visitor.visit_sentence(ast, id),
        NodeKind::Text { .. } => visitor.visit_text(ast, id),
        NodeKind::Verbatim { .. } => visitor.visit_verbatim(ast, id),
        NodeKind::Raw { .. } => visitor.visit_raw(ast, id),
        NodeKind::Style { .. } => visitor.visit_style(ast, id),
        NodeKind::Macro { .. } => visitor.visit_macro(ast, id),
        NodeKind::MacroClass { .. } => visitor.visit_macro_class(ast, id),
        NodeKind::MacroLink { .. } => visitor.visit_macro_link(ast, id),
        NodeKind::MacroImage { .. } => visitor.visit_macro_image(ast, id),
        NodeKind::MacroHeader { .. } => visitor.visit_macro_header(ast, id),
        NodeKind::Footnote { .. } => visitor.visit_footnote(ast, id),
        NodeKind::FootnoteEntry { .. } => visitor.visit_footnote_entry(ast, id),
        NodeKind::Footnotes => visitor.visit_footnotes(ast, id),
        NodeKind::Reference { .. } => visitor.visit_reference(ast, id),
        NodeKind::ReferenceEntry { .. } => visitor.visit_reference_entry(ast, id),
        NodeKind::References { .. } => visitor.visit_references(ast, id),
        NodeKind::Toc => visitor.visit_toc(ast, id),
        NodeKind::TocEntry { .. } => visitor.visit_toc_entry(ast, id),
        NodeKind::HorizontalRule => visitor.visit_horizontal_rule(ast, id),
        NodeKind::Source { .. } => visitor.visit_source(ast, id),
        NodeKind::Callout { .. } => visitor.visit_callout(ast, id),
        NodeKind::CalloutEntry { .. } => visitor.visit_callout_entry(ast, id),
        NodeKind::Content { .. } => visitor.visit_content(ast, id),
        NodeKind::ContentImage { .. } => visitor.visit_content_image(ast, id),
        NodeKind::Command { .. } => visitor.visit_command(ast, id),
    }
}

/// Visit every child of `id`, in order
pub fn walk_children(ast: &Ast, id: NodeId, visitor: &mut dyn Visitor) {
    for child in ast.children(id) {
        ast.accept(*child, visitor);
    }
}
