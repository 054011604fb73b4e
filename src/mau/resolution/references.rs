//! References
//!
//!     Same two sided model as footnotes, keyed by `(content_type, name)`. Every content
//!     type has its own counter, so the first book and the first article are both number 1.
//!     Definitions may carry a category that `::references:` listings can filter on.

use super::{content_hash, copy_content, excluded_tag, Definition, Mention};
use crate::mau::ast::{Ast, NodeId, NodeInfo, NodeKind};
use crate::mau::error::MauError;
use crate::mau::token::Context;
use indexmap::IndexMap;
use std::collections::HashMap;

type Key = (String, String);

#[derive(Debug, Clone, Default)]
pub struct ReferencesManager {
    mentions: IndexMap<Key, Mention>,
    definitions: IndexMap<Key, Definition>,
    listings: Vec<NodeId>,
}

impl ReferencesManager {
    pub fn add_mention(
        &mut self,
        content_type: &str,
        name: &str,
        node: NodeId,
        context: Context,
    ) -> Result<(), MauError> {
        let key = (content_type.to_string(), name.to_string());
        if self.mentions.contains_key(&key) {
            return Err(MauError::parser(
                format!("Reference {}:{} has already been mentioned", content_type, name),
                context,
            ));
        }
        self.mentions.insert(key, Mention::new(node, context));
        Ok(())
    }

    pub fn add_definition(
        &mut self,
        content_type: &str,
        name: &str,
        definition: Definition,
    ) -> Result<(), MauError> {
        let key = (content_type.to_string(), name.to_string());
        if self.definitions.contains_key(&key) {
            return Err(MauError::parser(
                format!("Reference {}:{} has already been defined", content_type, name),
                definition.context,
            ));
        }
        self.definitions.insert(key, definition);
        Ok(())
    }

    /// Register a `::references:` command node
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

    pub fn update(&mut self, other: ReferencesManager) -> Result<(), MauError> {
        for ((content_type, name), mention) in other.mentions {
            self.add_mention(&content_type, &name, mention.node, mention.context)?;
        }
        for ((content_type, name), definition) in other.definitions {
            self.add_definition(&content_type, &name, definition)?;
        }
        self.listings.extend(other.listings);
        Ok(())
    }

    pub fn resolve(self, ast: &mut Ast) -> Result<Vec<NodeId>, MauError> {
        let mut counters: HashMap<&str, usize> = HashMap::new();
        let mut entries = Vec::with_capacity(self.mentions.len());

        for ((content_type, name), mention) in &self.mentions {
            let key = (content_type.clone(), name.clone());
            let definition = self.definitions.get(&key).ok_or_else(|| {
                MauError::parser(
                    format!("Reference {}:{} has not been defined", content_type, name),
                    mention.context.clone(),
                )
            })?;

            let counter = counters.entry(content_type.as_str()).or_insert(0);
            *counter += 1;
            let number = *counter;

            let hash = content_hash(ast, &definition.content);
            let reference_anchor = format!("ref-{}-{}-{}", content_type, number, hash);
            let content_anchor = format!("cnt-{}-{}-{}", content_type, number, hash);

            *ast.kind_mut(mention.node) = NodeKind::Reference {
                content_type: content_type.clone(),
                name: name.clone(),
                number: Some(number),
                reference_anchor: Some(reference_anchor.clone()),
                content_anchor: Some(content_anchor.clone()),
                category: definition.category.clone(),
            };
            copy_content(ast, mention.node, &definition.content, "content");

            let entry = ast.add_with(
                NodeKind::ReferenceEntry {
                    content_type: content_type.clone(),
                    name: name.clone(),
                    number,
                    reference_anchor,
                    content_anchor,
                    category: definition.category.clone(),
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
            let (wanted_type, wanted_category) = match ast.kind(*listing) {
                NodeKind::References {
                    content_type,
                    category,
                } => (content_type.clone(), category.clone()),
                _ => (None, None),
            };
            let exclude = excluded_tag(ast, *listing);

            for entry in &entries {
                let (entry_type, entry_category) = match ast.kind(*entry) {
                    NodeKind::ReferenceEntry {
                        content_type,
                        category,
                        ..
                    } => (content_type.clone(), category.clone()),
                    _ => continue,
                };
                if wanted_type.as_ref().is_some_and(|t| *t != entry_type)
                    || wanted_category.is_some() && wanted_category != entry_category
                    || exclude.as_deref().is_some_and(|tag| ast.info(*entry).has_tag(tag))
                {
                    continue;
                }
                let copy = ast.deep_copy(*entry);
                ast.add_children(*listing, [copy], "entries");
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(
        ast: &mut Ast,
        manager: &mut ReferencesManager,
        content_type: &str,
        name: &str,
        category: Option<&str>,
    ) -> NodeId {
        let node = ast.add(NodeKind::Reference {
            content_type: content_type.to_string(),
            name: name.to_string(),
            number: None,
            reference_anchor: None,
            content_anchor: None,
            category: None,
        });
        manager
            .add_mention(content_type, name, node, Context::default())
            .unwrap();
        let content = vec![ast.add(NodeKind::text(name))];
        manager
            .add_definition(
                content_type,
                name,
                Definition {
                    content,
                    tags: Vec::new(),
                    category: category.map(str::to_string),
                    context: Context::default(),
                },
            )
            .unwrap();
        node
    }

    fn number(ast: &Ast, id: NodeId) -> Option<usize> {
        match ast.kind(id) {
            NodeKind::Reference { number, .. } => *number,
            _ => None,
        }
    }

    #[test]
    fn test_numbering_is_per_content_type() {
        let mut ast = Ast::new();
        let mut manager = ReferencesManager::default();
        let a1 = register(&mut ast, &mut manager, "A", "one", None);
        let b1 = register(&mut ast, &mut manager, "B", "one", None);
        let a2 = register(&mut ast, &mut manager, "A", "two", None);

        manager.resolve(&mut ast).unwrap();

        assert_eq!(number(&ast, a1), Some(1));
        assert_eq!(number(&ast, a2), Some(2));
        assert_eq!(number(&ast, b1), Some(1));
        match ast.kind(a2) {
            NodeKind::Reference {
                reference_anchor, ..
            } => assert!(reference_anchor.as_deref().unwrap().starts_with("ref-A-2-")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_listing_filters_type_and_category() {
        let mut ast = Ast::new();
        let mut manager = ReferencesManager::default();
        register(&mut ast, &mut manager, "book", "knuth", Some("cs"));
        register(&mut ast, &mut manager, "book", "tolkien", Some("fiction"));
        register(&mut ast, &mut manager, "paper", "turing", Some("cs"));
        let listing = ast.add(NodeKind::References {
            content_type: Some("book".to_string()),
            category: Some("cs".to_string()),
        });
        manager.add_listing(listing);

        manager.resolve(&mut ast).unwrap();

        let listed = ast.children_at(listing, "entries");
        assert_eq!(listed.len(), 1);
        assert_eq!(ast.plain_text(listed[0]), "knuth");
    }
}
