//! Table of contents
//!
//!     Headers are recorded in document order. Resolution folds the flat list into a tree
//!     of `toc-entry` nodes, resolves `[header](id)` macros against headers that carry an
//!     `id`, and fills every `::toc:` command with a copy of the tree.

use super::{excluded_tag, stable_hash, Mention};
use crate::mau::ast::{Ast, NodeId, NodeInfo, NodeKind, CONTENT};
use crate::mau::error::MauError;
use crate::mau::token::Context;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Anchor used for headers unless [`ParserOptions`](crate::mau::options::ParserOptions)
/// installs another function
pub fn default_header_anchor(text: &str, level: usize) -> String {
    let lower = text.to_lowercase();
    let sanitized = NON_ALPHANUMERIC.replace_all(&lower, "-");
    let sanitized = sanitized.trim_matches('-');

    let hash = stable_hash(format!("{} {}", level, text).as_bytes());
    format!("{}-{:04x}", sanitized, hash & 0xffff)
}

/// Parent index of every header given the header levels in document order.
///
/// A header hangs off the latest header with a smaller level. Latest headers at the same
/// or deeper levels are forgotten, so `1, 3, 2` gives the level 2 header the level 1
/// header as parent, not the level 3 one.
pub fn fold_parents(levels: &[usize]) -> Vec<Option<usize>> {
    let mut latest: BTreeMap<usize, usize> = BTreeMap::new();
    levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            latest.split_off(level);
            let parent = latest.values().next_back().copied();
            latest.insert(*level, index);
            parent
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TocManager {
    headers: Vec<NodeId>,
    ids: IndexMap<String, Mention>,
    mentions: Vec<(String, Mention)>,
    listings: Vec<NodeId>,
}

impl TocManager {
    pub fn add_header(
        &mut self,
        node: NodeId,
        id: Option<&str>,
        context: Context,
    ) -> Result<(), MauError> {
        if let Some(id) = id {
            if self.ids.contains_key(id) {
                return Err(MauError::parser(
                    format!("Header id '{}' has already been defined", id),
                    context,
                ));
            }
            self.ids
                .insert(id.to_string(), Mention::new(node, context));
        }
        self.headers.push(node);
        Ok(())
    }

    /// Register a `[header](id)` macro node
    pub fn add_mention(&mut self, id: &str, node: NodeId, context: Context) {
        self.mentions
            .push((id.to_string(), Mention::new(node, context)));
    }

    /// Register a `::toc:` command node
    pub fn add_listing(&mut self, node: NodeId) {
        self.listings.push(node);
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub(super) fn sizes(&self) -> [usize; 4] {
        [
            self.headers.len(),
            self.ids.len(),
            self.mentions.len(),
            self.listings.len(),
        ]
    }

    pub(super) fn truncate(&mut self, [headers, ids, mentions, listings]: [usize; 4]) {
        self.headers.truncate(headers);
        self.ids.truncate(ids);
        self.mentions.truncate(mentions);
        self.listings.truncate(listings);
    }

    pub fn update(&mut self, other: TocManager) -> Result<(), MauError> {
        for (id, header) in other.ids {
            if self.ids.contains_key(&id) {
                return Err(MauError::parser(
                    format!("Header id '{}' has already been defined", id),
                    header.context,
                ));
            }
            self.ids.insert(id, header);
        }
        self.headers.extend(other.headers);
        self.mentions.extend(other.mentions);
        self.listings.extend(other.listings);
        Ok(())
    }

    /// Build the entry tree, resolve header macros and fill the listings. Returns the top
    /// level entries.
    pub fn resolve(self, ast: &mut Ast) -> Result<Vec<NodeId>, MauError> {
        for (id, mention) in &self.mentions {
            let header = self.ids.get(id).ok_or_else(|| {
                MauError::parser(
                    format!("Header id '{}' has not been defined", id),
                    mention.context.clone(),
                )
            })?;
            let anchor = match ast.kind(header.node) {
                NodeKind::Header { anchor, .. } => anchor.clone(),
                _ => continue,
            };
            if let NodeKind::MacroHeader { header_anchor, .. } = ast.kind_mut(mention.node) {
                *header_anchor = Some(anchor);
            }
        }

        let mut levels = Vec::with_capacity(self.headers.len());
        let mut entries = Vec::with_capacity(self.headers.len());
        for header in &self.headers {
            let (level, anchor) = match ast.kind(*header) {
                NodeKind::Header { level, anchor, .. } => (*level, anchor.clone()),
                _ => continue,
            };
            let value = ast
                .children_at(*header, "text")
                .into_iter()
                .map(|child| ast.plain_text(child))
                .collect::<String>();
            let tags = ast.info(*header).tags.clone();
            let entry = ast.add_with(
                NodeKind::TocEntry {
                    level,
                    anchor,
                    value,
                },
                NodeInfo {
                    tags,
                    ..NodeInfo::default()
                },
            );
            levels.push(level);
            entries.push(entry);
        }

        let mut roots = Vec::new();
        for (index, parent) in fold_parents(&levels).into_iter().enumerate() {
            match parent {
                Some(parent) => ast.add_children(entries[parent], [entries[index]], CONTENT),
                None => roots.push(entries[index]),
            }
        }

        for listing in &self.listings {
            let exclude = excluded_tag(ast, *listing);
            for root in &roots {
                if let Some(copy) = pruned_copy(ast, *root, exclude.as_deref()) {
                    ast.add_children(*listing, [copy], "entries");
                }
            }
        }

        Ok(roots)
    }
}

/// Copy a subtree leaving out every node tagged `exclude`, and its descendants
fn pruned_copy(ast: &mut Ast, id: NodeId, exclude: Option<&str>) -> Option<NodeId> {
    if exclude.is_some_and(|tag| ast.info(id).has_tag(tag)) {
        return None;
    }
    let node = ast.node(id);
    let (kind, info) = (node.kind.clone(), node.info.clone());
    let children = node.children().to_vec();

    let copy = ast.add_with(kind, info);
    for child in children {
        if let Some(child_copy) = pruned_copy(ast, child, exclude) {
            ast.add_children(copy, [child_copy], CONTENT);
        }
    }
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn toc(headers: &[(usize, &str)], tagged: &[&str]) -> (Ast, TocManager) {
        let mut ast = Ast::new();
        let mut manager = TocManager::default();
        for (level, text) in headers {
            let title = ast.add(NodeKind::text(*text));
            let tags = if tagged.contains(text) {
                vec!["skip".to_string()]
            } else {
                Vec::new()
            };
            let header = ast.add_with(
                NodeKind::Header {
                    level: *level,
                    anchor: default_header_anchor(text, *level),
                    id: None,
                },
                NodeInfo {
                    tags,
                    ..NodeInfo::default()
                },
            );
            ast.add_children(header, [title], "text");
            manager.add_header(header, None, Context::default()).unwrap();
        }
        (ast, manager)
    }

    fn shape(ast: &Ast, id: NodeId) -> String {
        let value = match ast.kind(id) {
            NodeKind::TocEntry { value, .. } => value.clone(),
            _ => String::new(),
        };
        let children: Vec<String> = ast.children(id).iter().map(|c| shape(ast, *c)).collect();
        if children.is_empty() {
            value
        } else {
            format!("{}({})", value, children.join(" "))
        }
    }

    #[test]
    fn test_headers_fold_into_a_tree() {
        let (mut ast, manager) = toc(
            &[(1, "A"), (2, "A.1"), (2, "A.2"), (1, "B"), (2, "B.1"), (3, "B.1.1")],
            &[],
        );
        let roots = manager.resolve(&mut ast).unwrap();

        let shapes: Vec<String> = roots.iter().map(|r| shape(&ast, *r)).collect();
        assert_eq!(shapes, vec!["A(A.1 A.2)", "B(B.1(B.1.1))"]);
    }

    #[test]
    fn test_orphan_levels_attach_to_the_nearest_ancestor() {
        let (mut ast, manager) = toc(&[(1, "A"), (3, "A.x"), (2, "A.y")], &[]);
        let roots = manager.resolve(&mut ast).unwrap();

        assert_eq!(roots.len(), 1);
        assert_eq!(shape(&ast, roots[0]), "A(A.x A.y)");
    }

    #[test]
    fn test_listing_prunes_excluded_subtrees() {
        let (mut ast, mut manager) = toc(&[(1, "A"), (2, "A.1"), (3, "A.1.a"), (2, "A.2")], &["A.1"]);
        let listing = ast.add_with(
            NodeKind::Toc,
            NodeInfo {
                kwargs: [("exclude_tag".to_string(), "skip".to_string())].into(),
                ..NodeInfo::default()
            },
        );
        manager.add_listing(listing);
        let roots = manager.resolve(&mut ast).unwrap();

        let listed = ast.children_at(listing, "entries");
        assert_eq!(shape(&ast, listed[0]), "A(A.2)");
        assert_eq!(shape(&ast, roots[0]), "A(A.1(A.1.a) A.2)");
    }

    #[test]
    fn test_header_macros_get_the_header_anchor() {
        let mut ast = Ast::new();
        let mut manager = TocManager::default();
        let header = ast.add(NodeKind::Header {
            level: 1,
            anchor: "intro-1234".to_string(),
            id: Some("intro".to_string()),
        });
        manager
            .add_header(header, Some("intro"), Context::default())
            .unwrap();
        let mention = ast.add(NodeKind::MacroHeader {
            header_id: "intro".to_string(),
            header_anchor: None,
        });
        manager.add_mention("intro", mention, Context::default());

        manager.resolve(&mut ast).unwrap();

        assert_eq!(
            ast.kind(mention),
            &NodeKind::MacroHeader {
                header_id: "intro".to_string(),
                header_anchor: Some("intro-1234".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_header_id_is_fatal() {
        let mut ast = Ast::new();
        let mut manager = TocManager::default();
        let mention = ast.add(NodeKind::MacroHeader {
            header_id: "nowhere".to_string(),
            header_anchor: None,
        });
        manager.add_mention("nowhere", mention, Context::default());

        assert!(manager.resolve(&mut ast).is_err());
    }

    #[test]
    fn test_default_header_anchor_is_sanitized_and_stable() {
        let anchor = default_header_anchor("Hello, World!", 2);

        assert!(anchor.starts_with("hello-world-"));
        assert_eq!(anchor.len(), "hello-world-".len() + 4);
        assert_eq!(anchor, default_header_anchor("Hello, World!", 2));
        assert_ne!(anchor, default_header_anchor("Hello, World!", 3));
        assert_eq!(
            anchor,
            format!("hello-world-{:04x}", stable_hash(b"2 Hello, World!") & 0xffff)
        );
    }

    proptest! {
        #[test]
        fn test_parents_are_earlier_and_shallower(levels in prop::collection::vec(1usize..6, 0..30)) {
            let parents = fold_parents(&levels);
            prop_assert_eq!(parents.len(), levels.len());
            for (index, parent) in parents.iter().enumerate() {
                match parent {
                    Some(parent) => {
                        prop_assert!(*parent < index);
                        prop_assert!(levels[*parent] < levels[index]);
                    }
                    None => prop_assert!(levels[..index].iter().all(|l| *l >= levels[index])),
                }
            }
        }
    }
}
