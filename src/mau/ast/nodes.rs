//! Node kinds
//!
//!     One variant per concrete node kind. Variants only carry scalar data; anything that
//!     is a node lives in the owning node's children, tagged with a parent position
//!     (for example `title`, `primary` or `content`).

use serde::{Deserialize, Serialize};

/// Data that every node carries besides its kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub kwargs: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NodeInfo {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Document,
    Container,
    Header {
        level: usize,
        anchor: String,
        #[serde(default)]
        id: Option<String>,
    },
    Block {
        #[serde(default)]
        blocktype: Option<String>,
        engine: String,
    },
    Paragraph,
    List {
        ordered: bool,
        main_node: bool,
        #[serde(default)]
        start: Option<usize>,
    },
    ListItem {
        level: usize,
    },
    Sentence,
    Text {
        value: String,
    },
    Verbatim {
        value: String,
    },
    Raw {
        value: String,
    },
    Style {
        value: String,
    },
    Macro {
        name: String,
    },
    MacroClass {
        classes: Vec<String>,
    },
    MacroLink {
        target: String,
    },
    MacroImage {
        uri: String,
        #[serde(default)]
        alt_text: Option<String>,
        #[serde(default)]
        width: Option<String>,
        #[serde(default)]
        height: Option<String>,
    },
    MacroHeader {
        header_id: String,
        #[serde(default)]
        header_anchor: Option<String>,
    },
    Footnote {
        name: String,
        #[serde(default)]
        number: Option<usize>,
        #[serde(default)]
        reference_anchor: Option<String>,
        #[serde(default)]
        content_anchor: Option<String>,
    },
    FootnoteEntry {
        name: String,
        number: usize,
        reference_anchor: String,
        content_anchor: String,
    },
    Footnotes,
    Reference {
        content_type: String,
        name: String,
        #[serde(default)]
        number: Option<usize>,
        #[serde(default)]
        reference_anchor: Option<String>,
        #[serde(default)]
        content_anchor: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
    ReferenceEntry {
        content_type: String,
        name: String,
        number: usize,
        reference_anchor: String,
        content_anchor: String,
        #[serde(default)]
        category: Option<String>,
    },
    References {
        #[serde(default)]
        content_type: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
    Toc,
    TocEntry {
        level: usize,
        anchor: String,
        value: String,
    },
    HorizontalRule,
    Source {
        language: String,
        #[serde(default)]
        highlights: Vec<usize>,
    },
    Callout {
        line: usize,
        name: String,
    },
    CalloutEntry {
        marker: String,
        value: String,
    },
    Content {
        content_type: String,
        #[serde(default)]
        uris: Vec<String>,
    },
    ContentImage {
        uri: String,
        #[serde(default)]
        alt_text: Option<String>,
    },
    Command {
        name: String,
    },
}

impl NodeKind {
    /// Tag string used by visitors and serializers
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Container => "container",
            NodeKind::Header { .. } => "header",
            NodeKind::Block { .. } => "block",
            NodeKind::Paragraph => "paragraph",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "list-item",
            NodeKind::Sentence => "sentence",
            NodeKind::Text { .. } => "text",
            NodeKind::Verbatim { .. } => "verbatim",
            NodeKind::Raw { .. } => "raw",
            NodeKind::Style { .. } => "style",
            NodeKind::Macro { .. } => "macro",
            NodeKind::MacroClass { .. } => "macro-class",
            NodeKind::MacroLink { .. } => "macro-link",
            NodeKind::MacroImage { .. } => "macro-image",
            NodeKind::MacroHeader { .. } => "macro-header",
            NodeKind::Footnote { .. } => "footnote",
            NodeKind::FootnoteEntry { .. } => "footnote-entry",
            NodeKind::Footnotes => "footnotes",
            NodeKind::Reference { .. } => "reference",
            NodeKind::ReferenceEntry { .. } => "reference-entry",
            NodeKind::References { .. } => "references",
            NodeKind::Toc => "toc",
            NodeKind::TocEntry { .. } => "toc-entry",
            NodeKind::HorizontalRule => "horizontal-rule",
            NodeKind::Source { .. } => "source",
            NodeKind::Callout { .. } => "callout",
            NodeKind::CalloutEntry { .. } => "callout-entry",
            NodeKind::Content { .. } => "content",
            NodeKind::ContentImage { .. } => "content-image",
            NodeKind::Command { .. } => "command",
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NodeKind::Text {
            value: value.into(),
        }
    }

    /// Literal value of leaf text nodes
    pub fn value(&self) -> Option<&str> {
        match self {
            NodeKind::Text { value } | NodeKind::Verbatim { value } | NodeKind::Raw { value } => {
                Some(value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_kebab_case_like_the_serialized_type() {
        let kind = NodeKind::MacroLink {
            target: "https://example.com".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();

        assert_eq!(json["type"], kind.tag());
        assert_eq!(
            serde_json::to_value(NodeKind::HorizontalRule).unwrap()["type"],
            "horizontal-rule"
        );
    }
}
