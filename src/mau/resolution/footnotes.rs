//! Footnotes
//!
//!     Mentions come from `[footnote](name)` macros, definitions from `[footnote, name]`
//!     blocks. Both are keyed by name and each name may be used once on each side.
//!     Numbers follow the order of the mentions, which the insertion ordered maps keep.

use super::{content_hash, copy_content, excluded_tag, Definition, Mention};
use crate::mau::ast::{Ast, NodeId, NodeInfo, NodeKind};
use crate::mau::error::MauError;
use crate::mau::token::Context;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct FootnotesManager {
    mentions: IndexMap<String, Mention>,
    definitions: IndexMap<String, Definition>,
    listings: Vec<NodeId>,
}

impl FootnotesManager {
    pub fn add_mention(&mut self, name: &str, node: NodeId, context: Context) -> Result<(), MauError> {
        if self.mentions.contains_key(name) {
            return Err(MauError::parser(
                format!("Footnote '{}' has already been mentioned", name),
                context,
            ));
        }
        self.mentions
            .insert(name.to_string(), Mention::new(node, context));
        Ok(())
    }

    pub fn add_definition(&mut self, name: &str, definition: Definition) -> Result<(), MauError> {
        if self.definitions.contains_key(name) {
            return Err(MauError::parser(
                format!("Footnote '{}' has already been defined", name),
                definition.context,
            ));
        }
        self.definitions.insert(name.to_string(), definition);
        Ok(())
    }

    /// Register a `::footnotes:` command node
    pub fn add_listing(&mut self, node: NodeId) {
        self.listings.push(node);
    }

    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }

    pub(super) fn sizes(&self) -> [usize; 3] {
        [self.mentions.len(), self.definitions.len(), self.listings.len()]
    }

    pub(super) fn truncate(&mut self, [mentions, definitions, listings]: [usize; 3]) {
        self.mentions.truncate(mentions);
        self.definitions.truncate(definitions);
        self.listings.truncate(listings);
    }

    pub fn update(&mut self, other: FootnotesManager) -> Result<(), MauError> {
        for (name, mention) in other.mentions {
            self.add_mention(&name, mention.node, mention.context)?;
        }
        for (name, definition) in other.definitions {
            self.add_definition(&name, definition)?;
        }
        self.listings.extend(other.listings);
        Ok(())
    }

    /// Number and fill every mention, build the entries and fill the listings
    pub fn resolve(self, ast: &mut Ast) -> Result<Vec<NodeId>, MauError> {
        let mut entries = Vec::with_capacity(self.mentions.len());

        for (index, (name, mention)) in self.mentions.iter().enumerate() {
            let definition = self.definitions.get(name).ok_or_else(|| {
                MauError::parser(
                    format!("Footnote '{}' has not been defined", name),
                    mention.context.clone(),
                )
            })?;

            let number = index + 1;
            let hash = content_hash(ast, &definition.content);
            let reference_anchor = format!("ref-footnote-{}-{}", number, hash);
            let content_anchor = format!("cnt-footnote-{}-{}", number, hash);

            *ast.kind_mut(mention.node) = NodeKind::Footnote {
                name: name.clone(),
                number: Some(number),
                reference_anchor: Some(reference_anchor.clone()),
                content_anchor: Some(content_anchor.clone()),
            };
            copy_content(ast, mention.node, &definition.content, "content");

            let entry = ast.add_with(
                NodeKind::FootnoteEntry {
                    name: name.clone(),
                    number,
                    reference_anchor,
                    content_anchor,
                },
                NodeInfo {
                    tags: definition.tags.clone(),
                    ..NodeInfo::default()
                },
            );
            copy_content(ast, entry, &definition.content, "content");
            entries.push(entry);
        }

        for listing in &self.listings {
            let exclude = excluded_tag(ast, *listing);
            for entry in &entries {
                if exclude.as_deref().is_some_and(|tag| ast.info(*entry).has_tag(tag)) {
                    continue;
                }
                let copy = ast.deep_copy(*entry);
                ast.add_children(*listing, [copy], "entries");
            }
        }

        Ok(entries)
    }
}
