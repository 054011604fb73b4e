//! Treeviz formatter for AST nodes
//!
//! Treeviz is a one line per node rendering of the tree, meant for quick scanning and for
//! snapshot tests. Nesting is drawn with box characters, two columns per level:
//!
//!     ⧉ document
//!     ├─ § header 1 #intro
//!     │ └─ [text] ◦ text "Intro"
//!     └─ ¶ paragraph
//!       └─ ↵ sentence
//!         └─ ◦ text "Hello"
//!
//! A line is `<icon> <tag> <details>`. Children attached anywhere but `content` are
//! prefixed with their parent position in brackets. Text values are truncated to 30
//! characters.
//!
//! Icons
//!     Structure:
//!         Document, Container: ⧉
//!         Header: §
//!         Paragraph: ¶
//!         Sentence: ↵
//!         List: ☰
//!         ListItem: •
//!         Block, Source: 𝒱
//!         HorizontalRule: ―
//!         Content, ContentImage: ➔
//!         Command: ∷
//!     Inline:
//!         Text: ◦
//!         Verbatim: ƒ
//!         Raw: ℣
//!         Style: 𝐁
//!         Macros: ⊕
//!     Cross references:
//!         Footnote, FootnoteEntry: ³
//!         Reference, ReferenceEntry: †
//!         Footnotes, References, Toc: ≡
//!         TocEntry: #
//!         Callout, CalloutEntry: ◫

use super::registry::{FormatError, Formatter};
use crate::mau::ast::{Ast, NodeId, NodeKind, CONTENT};

const MAX_LABEL: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", truncate(value, MAX_LABEL))
}

fn get_icon(tag: &str) -> &'static str {
    match tag {
        "document" | "container" => "⧉",
        "header" => "§",
        "paragraph" => "¶",
        "sentence" => "↵",
        "list" => "☰",
        "list-item" => "•",
        "block" | "source" => "𝒱",
        "horizontal-rule" => "―",
        "content" | "content-image" => "➔",
        "command" => "∷",
        "text" => "◦",
        "verbatim" => "ƒ",
        "raw" => "℣",
        "style" => "𝐁",
        "macro" | "macro-class" | "macro-link" | "macro-image" | "macro-header" => "⊕",
        "footnote" | "footnote-entry" => "³",
        "reference" | "reference-entry" => "†",
        "footnotes" | "references" | "toc" => "≡",
        "toc-entry" => "#",
        "callout" | "callout-entry" => "◫",
        _ => "○",
    }
}

/// Kind specific details shown after the tag
fn details(kind: &NodeKind) -> Option<String> {
    let details = match kind {
        NodeKind::Text { value } | NodeKind::Verbatim { value } | NodeKind::Raw { value } => {
            quoted(value)
        }
        NodeKind::Header { level, anchor, .. } => format!("{} #{}", level, anchor),
        NodeKind::Block { blocktype, engine } => {
            format!("{} ({})", blocktype.as_deref().unwrap_or("-"), engine)
        }
        NodeKind::List { ordered, start, .. } => match (ordered, start) {
            (true, Some(start)) => format!("ordered from {}", start),
            (true, None) => "ordered".to_string(),
            (false, _) => "unordered".to_string(),
        },
        NodeKind::ListItem { level } => format!("level {}", level),
        NodeKind::Style { value } | NodeKind::Macro { name: value } => value.clone(),
        NodeKind::Command { name } => name.clone(),
        NodeKind::MacroClass { classes } => classes.join(" "),
        NodeKind::MacroLink { target } => target.clone(),
        NodeKind::MacroImage { uri, .. } | NodeKind::ContentImage { uri, .. } => uri.clone(),
        NodeKind::MacroHeader { header_id, .. } => header_id.clone(),
        NodeKind::Footnote { name, number, .. } => match number {
            Some(number) => format!("{} {}", number, name),
            None => name.clone(),
        },
        NodeKind::FootnoteEntry { name, number, .. } => format!("{} {}", number, name),
        NodeKind::Reference {
            content_type,
            name,
            number,
            ..
        } => match number {
            Some(number) => format!("{} {}:{}", number, content_type, name),
            None => format!("{}:{}", content_type, name),
        },
        NodeKind::ReferenceEntry {
            content_type,
            name,
            number,
            ..
        } => format!("{} {}:{}", number, content_type, name),
        NodeKind::References {
            content_type: Some(content_type),
            ..
        } => content_type.clone(),
        NodeKind::TocEntry { level, value, .. } => format!("{} {}", level, quoted(value)),
        NodeKind::Source { language, .. } => language.clone(),
        NodeKind::Callout { line, name } => format!("{} on line {}", name, line),
        NodeKind::CalloutEntry { marker, value } => format!("{}: {}", marker, quoted(value)),
        NodeKind::Content { content_type, uris } => {
            let mut details = content_type.clone();
            for uri in uris {
                details.push(' ');
                details.push_str(uri);
            }
            details
        }
        _ => return None,
    };
    Some(details)
}

fn label(ast: &Ast, id: NodeId) -> String {
    let node = ast.node(id);
    let mut label = String::new();
    if let Some(position) = node.parent_position().filter(|p| *p != CONTENT) {
        label.push_str(&format!("[{}] ", position));
    }
    label.push_str(get_icon(node.tag()));
    label.push(' ');
    label.push_str(node.tag());
    if let Some(details) = details(ast.kind(id)) {
        label.push(' ');
        label.push_str(&details);
    }
    label
}

fn format_node(ast: &Ast, id: NodeId, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{}{} {}\n", prefix, connector, label(ast, id)));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let children = ast.children(id);
    for (i, child) in children.iter().enumerate() {
        format_node(ast, *child, &child_prefix, i == children.len() - 1, output);
    }
}

/// Render the subtree rooted at `root`
pub fn to_treeviz(ast: &Ast, root: NodeId) -> String {
    let mut output = format!("{}\n", label(ast, root));
    let children = ast.children(root);
    for (i, child) in children.iter().enumerate() {
        format_node(ast, *child, "", i == children.len() - 1, &mut output);
    }
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, ast: &Ast, root: NodeId) -> Result<String, FormatError> {
        Ok(to_treeviz(ast, root))
    }

    fn description(&self) -> &str {
        "One line per node tree view"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_nested_prefixes() {
        let mut ast = Ast::new();
        let word = ast.add(NodeKind::text("Hello"));
        let sentence = ast.add(NodeKind::Sentence);
        ast.add_children(sentence, [word], CONTENT);
        let paragraph = ast.add(NodeKind::Paragraph);
        ast.add_children(paragraph, [sentence], CONTENT);
        let rule = ast.add(NodeKind::HorizontalRule);
        let document = ast.add(NodeKind::Document);
        ast.add_children(document, [paragraph, rule], CONTENT);

        insta::assert_snapshot!(to_treeviz(&ast, document), @r###"
        ⧉ document
        ├─ ¶ paragraph
        │ └─ ↵ sentence
        │   └─ ◦ text "Hello"
        └─ ― horizontal-rule
        "###);
    }

    #[test]
    fn test_positions_are_shown() {
        let mut ast = Ast::new();
        let title = ast.add(NodeKind::text("Intro"));
        let header = ast.add(NodeKind::Header {
            level: 1,
            anchor: "intro".into(),
            id: None,
        });
        ast.add_children(header, [title], "text");

        insta::assert_snapshot!(to_treeviz(&ast, header), @r###"
        § header 1 #intro
        └─ [text] ◦ text "Intro"
        "###);
    }
}
