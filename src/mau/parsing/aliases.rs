//! Block aliases
//!
//!     The first unnamed argument of a block names its type. When that name is a
//!     registered alias, the block takes the alias' blocktype, its remaining unnamed
//!     arguments are renamed after the alias' positional names, and the alias' defaults
//!     fill whatever is still missing:
//!
//!         ::defblock:aside, admonition, class, icon, label=Note
//!
//!         [aside, warning, fire]
//!
//!     gives a block of type `admonition` with `class=warning, icon=fire, label=Note`.
//!     Defaults lose to named arguments, named arguments lose to positional ones. The
//!     `engine` keyword is taken out of the arguments and selects the block engine.
//!
//!     Aliases come from three places, later ones override earlier ones: the built-in
//!     table, `mau.parser.block_definitions` in the environment, and `::defblock:`
//!     commands in the document.

use crate::mau::environment::{Environment, Value};
use crate::mau::error::MauError;
use crate::mau::parsing::arguments::Arguments;
use crate::mau::token::Context;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_ENGINE: &str = "default";

const DEFINITIONS_KEY: &str = "mau.parser.block_definitions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAlias {
    pub blocktype: Option<String>,
    pub names: Vec<String>,
    pub defaults: BTreeMap<String, String>,
}

impl BlockAlias {
    pub fn new(blocktype: &str, names: &[&str], defaults: &[(&str, &str)]) -> Self {
        Self {
            blocktype: Some(blocktype.to_string()),
            names: names.iter().map(|n| n.to_string()).collect(),
            defaults: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// A block's arguments after alias resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock {
    pub blocktype: Option<String>,
    pub engine: String,
    pub arguments: Arguments,
}

#[derive(Debug, Clone, Default)]
pub struct BlockAliases {
    aliases: HashMap<String, BlockAlias>,
}

impl BlockAliases {
    pub fn builtin() -> Self {
        let mut aliases = Self::default();
        aliases.define(
            "source",
            BlockAlias::new("source", &["language"], &[("engine", "source"), ("language", "text")]),
        );
        aliases.define(
            "footnote",
            BlockAlias::new("footnote", &["name"], &[("engine", "footnote")]),
        );
        aliases.define(
            "reference",
            BlockAlias::new("reference", &["content_type", "name"], &[("engine", "reference")]),
        );
        aliases.define(
            "admonition",
            BlockAlias::new("admonition", &["class", "icon", "label"], &[]),
        );
        aliases.define("quote", BlockAlias::new("quote", &["attribution"], &[]));
        aliases.define("raw", BlockAlias::new("raw", &[], &[("engine", "raw")]));
        aliases
    }

    /// Built-in aliases plus the ones configured under `mau.parser.block_definitions`
    pub fn from_environment(environment: &Environment) -> Result<Self, MauError> {
        let mut aliases = Self::builtin();
        let definitions = match environment.get(DEFINITIONS_KEY) {
            Ok(Value::Map(definitions)) => definitions,
            Ok(_) => {
                return Err(MauError::Config(format!(
                    "{} must be a table of block definitions",
                    DEFINITIONS_KEY
                )))
            }
            Err(_) => return Ok(aliases),
        };

        for (name, definition) in definitions {
            let table = definition.as_map().ok_or_else(|| {
                MauError::Config(format!("Block definition '{}' must be a table", name))
            })?;
            let alias = BlockAlias {
                blocktype: table.get("blocktype").and_then(Value::as_text),
                names: table
                    .get("args")
                    .map(Value::as_string_list)
                    .unwrap_or_default(),
                defaults: table
                    .get("kwargs")
                    .and_then(Value::as_map)
                    .map(|kwargs| {
                        kwargs
                            .iter()
                            .filter_map(|(k, v)| v.as_text().map(|v| (k.clone(), v)))
                            .collect()
                    })
                    .unwrap_or_default(),
            };
            aliases.define(name, alias);
        }
        Ok(aliases)
    }

    pub fn define(&mut self, name: &str, alias: BlockAlias) {
        self.aliases.insert(name.to_string(), alias);
    }

    /// Register the alias described by a `::defblock:` command
    pub fn define_from_arguments(
        &mut self,
        arguments: &Arguments,
        context: &Context,
    ) -> Result<(), MauError> {
        let (name, blocktype) = match (arguments.positional(0), arguments.positional(1)) {
            (Some(name), Some(blocktype)) => (name, blocktype),
            _ => {
                return Err(MauError::parser(
                    "Block definitions need an alias and a blocktype",
                    context.clone(),
                ))
            }
        };
        self.define(
            name,
            BlockAlias {
                blocktype: Some(blocktype.to_string()),
                names: arguments.args[2..].to_vec(),
                defaults: arguments.kwargs.clone(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockAlias> {
        self.aliases.get(name)
    }

    pub fn resolve(&self, mut arguments: Arguments) -> ResolvedBlock {
        let blocktype = if arguments.args.is_empty() {
            None
        } else {
            Some(arguments.args.remove(0))
        };

        let alias = blocktype.as_deref().and_then(|name| self.get(name));
        let blocktype = match alias {
            Some(alias) => {
                let positional = std::mem::take(&mut arguments.args);
                let mut leftover = Vec::new();
                for (index, value) in positional.into_iter().enumerate() {
                    match alias.names.get(index) {
                        Some(name) => {
                            arguments.kwargs.insert(name.clone(), value);
                        }
                        None => leftover.push(value),
                    }
                }
                arguments.args = leftover;
                for (key, value) in &alias.defaults {
                    arguments
                        .kwargs
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
                alias.blocktype.clone()
            }
            None => blocktype,
        };

        let engine = arguments
            .kwargs
            .remove("engine")
            .unwrap_or_else(|| DEFAULT_ENGINE.to_string());

        ResolvedBlock {
            blocktype,
            engine,
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Arguments {
        Arguments::parse(text, Context::default()).unwrap()
    }

    #[test]
    fn test_source_alias_fills_language() {
        let resolved = BlockAliases::builtin().resolve(args("source, py"));

        assert_eq!(resolved.blocktype.as_deref(), Some("source"));
        assert_eq!(resolved.engine, "source");
        assert_eq!(resolved.arguments.named("language"), Some("py"));
        assert!(resolved.arguments.args.is_empty());
    }

    #[test]
    fn test_positional_beats_named_beats_default() {
        let mut aliases = BlockAliases::builtin();
        aliases.define_from_arguments(
            &args("aside, admonition, class, icon, label=Note, icon=star"),
            &Context::default(),
        )
        .unwrap();

        let resolved = aliases.resolve(args("aside, warning, icon=fire"));
        assert_eq!(resolved.blocktype.as_deref(), Some("admonition"));
        assert_eq!(resolved.arguments.named("class"), Some("warning"));
        assert_eq!(resolved.arguments.named("icon"), Some("fire"));
        assert_eq!(resolved.arguments.named("label"), Some("Note"));

        let resolved = aliases.resolve(args("aside, warning, bolt, icon=fire"));
        assert_eq!(resolved.arguments.named("icon"), Some("bolt"));
    }

    #[test]
    fn test_unknown_blocktype_keeps_its_arguments() {
        let resolved = BlockAliases::builtin().resolve(args("sidebar, left, engine=mau"));

        assert_eq!(resolved.blocktype.as_deref(), Some("sidebar"));
        assert_eq!(resolved.engine, "mau");
        assert_eq!(resolved.arguments.args, vec!["left"]);
    }

    #[test]
    fn test_no_arguments_use_the_default_engine() {
        let resolved = BlockAliases::builtin().resolve(Arguments::default());
        assert_eq!(resolved.blocktype, None);
        assert_eq!(resolved.engine, DEFAULT_ENGINE);
    }

    #[test]
    fn test_aliases_from_environment() {
        let mut environment = Environment::new();
        environment.set("mau.parser.block_definitions.note.blocktype", "admonition");
        environment.set("mau.parser.block_definitions.note.kwargs.class", "note");

        let aliases = BlockAliases::from_environment(&environment).unwrap();
        let resolved = aliases.resolve(args("note"));

        assert_eq!(resolved.blocktype.as_deref(), Some("admonition"));
        assert_eq!(resolved.arguments.named("class"), Some("note"));
        assert!(aliases.get("source").is_some());
    }

    #[test]
    fn test_defblock_needs_alias_and_blocktype() {
        let mut aliases = BlockAliases::builtin();
        assert!(aliases
            .define_from_arguments(&args("lonely"), &Context::default())
            .is_err());
    }
}
