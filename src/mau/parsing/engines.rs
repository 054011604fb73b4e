//! Block engines
//!
//!     The `engine` argument of a block (after alias resolution) selects how its content
//!     is interpreted:
//!
//!         default     nested main parsers share the environment and the block aliases,
//!                     footnotes, references and headers are merged into the enclosing
//!                     parser
//!         mau         a separate document: fresh environment, resolved on the spot
//!         raw         one raw node per line, not parsed
//!         source      code lines with callouts, see [source](super::source)
//!         footnote    content parsed and stored as a footnote definition, no node
//!         reference   content parsed and stored as a reference definition, no node
//!
//!     Any other engine name is a fatal error.

use super::main::MainParser;
use super::source::{
    callout_entries, lines_of, split_callouts, DEFAULT_CALLOUT_DELIMITER,
    DEFAULT_HIGHLIGHT_MARKER,
};
use crate::mau::ast::{NodeId, NodeInfo, NodeKind};
use crate::mau::error::MauError;
use crate::mau::parsing::arguments::Arguments;
use crate::mau::resolution::Definition;
use crate::mau::token::{Context, Token};
use log::debug;

/// A block split into its parts, ready for an engine
#[derive(Debug, Clone)]
pub struct BlockParts {
    pub blocktype: Option<String>,
    pub engine: String,
    pub arguments: Arguments,
    pub title: Option<NodeId>,
    pub primary: Vec<Token>,
    pub secondary: Vec<Token>,
    pub context: Context,
}

impl MainParser<'_> {
    /// Run the engine selected by the block. Definition engines return no node.
    pub(super) fn run_engine(&mut self, parts: BlockParts) -> Result<Option<NodeId>, MauError> {
        debug!("running engine {} at {}", parts.engine, parts.context);
        let engine = parts.engine.clone();
        match engine.as_str() {
            "default" => self.default_engine(parts).map(Some),
            "mau" => self.mau_engine(parts).map(Some),
            "raw" => Ok(Some(self.raw_engine(parts))),
            "source" => self.source_engine(parts).map(Some),
            "footnote" => self.footnote_engine(parts).map(|_| None),
            "reference" => self.reference_engine(parts).map(|_| None),
            other => Err(MauError::parser(
                format!("Engine '{}' is not available", other),
                parts.context,
            )),
        }
    }

    fn block_node(&mut self, blocktype: Option<String>, engine: &str, info: NodeInfo, title: Option<NodeId>) -> NodeId {
        let node = self.ast.add_with(
            NodeKind::Block {
                blocktype,
                engine: engine.to_string(),
            },
            info,
        );
        if let Some(title) = title {
            self.ast.add_children(node, [title], "title");
        }
        node
    }

    fn default_engine(&mut self, parts: BlockParts) -> Result<NodeId, MauError> {
        let primary = self.parse_nested(parts.primary)?;
        let secondary = self.parse_nested(parts.secondary)?;

        let node = self.block_node(
            parts.blocktype,
            &parts.engine,
            parts.arguments.into_info(),
            parts.title,
        );
        self.ast.add_children(node, primary, "primary");
        self.ast.add_children(node, secondary, "secondary");
        Ok(node)
    }

    fn mau_engine(&mut self, parts: BlockParts) -> Result<NodeId, MauError> {
        let primary = self.parse_isolated(parts.primary)?;
        let secondary = self.parse_nested(parts.secondary)?;

        let node = self.block_node(
            parts.blocktype,
            &parts.engine,
            parts.arguments.into_info(),
            parts.title,
        );
        self.ast.add_children(node, primary, "primary");
        self.ast.add_children(node, secondary, "secondary");
        Ok(node)
    }

    fn raw_engine(&mut self, parts: BlockParts) -> NodeId {
        let lines: Vec<NodeId> = lines_of(&parts.primary)
            .into_iter()
            .map(|(line, _)| self.ast.add(NodeKind::Raw { value: line }))
            .collect();

        let node = self.block_node(
            parts.blocktype,
            &parts.engine,
            parts.arguments.into_info(),
            parts.title,
        );
        self.ast.add_children(node, lines, "primary");
        node
    }

    fn source_engine(&mut self, parts: BlockParts) -> Result<NodeId, MauError> {
        let arguments = parts.arguments;
        let language = arguments.named("language").unwrap_or("text").to_string();
        let delimiter = arguments
            .named("callouts")
            .unwrap_or(DEFAULT_CALLOUT_DELIMITER);
        let highlight = arguments
            .named("highlight")
            .unwrap_or(DEFAULT_HIGHLIGHT_MARKER);

        let lines: Vec<String> = lines_of(&parts.primary)
            .into_iter()
            .map(|(line, _)| line)
            .collect();
        let source = split_callouts(&lines, delimiter, highlight)?;
        let entries = callout_entries(&lines_of(&parts.secondary), &source.markers)?;

        let code: Vec<NodeId> = source
            .code
            .into_iter()
            .map(|line| self.ast.add(NodeKind::Verbatim { value: line }))
            .collect();
        let markers: Vec<NodeId> = source
            .markers
            .iter()
            .map(|(line, name)| {
                self.ast.add(NodeKind::Callout {
                    line: *line,
                    name: name.clone(),
                })
            })
            .collect();
        let callouts: Vec<NodeId> = entries
            .into_iter()
            .map(|(marker, value)| self.ast.add(NodeKind::CalloutEntry { marker, value }))
            .collect();

        let node = self.ast.add_with(
            NodeKind::Source {
                language,
                highlights: source.highlights,
            },
            arguments.into_info(),
        );
        self.ast.add_children(node, code, "code");
        self.ast.add_children(node, markers, "markers");
        self.ast.add_children(node, callouts, "callouts");
        if let Some(title) = parts.title {
            self.ast.add_children(node, [title], "title");
        }
        Ok(node)
    }

    fn definition(&mut self, parts: BlockParts) -> Result<Definition, MauError> {
        let content = self.parse_nested(parts.primary)?;
        Ok(Definition {
            content,
            category: parts.arguments.named("category").map(str::to_string),
            tags: parts.arguments.tags,
            context: parts.context,
        })
    }

    fn footnote_engine(&mut self, parts: BlockParts) -> Result<(), MauError> {
        let name = required(&parts, "name")?;
        let definition = self.definition(parts)?;
        self.collections.footnotes.add_definition(&name, definition)
    }

    fn reference_engine(&mut self, parts: BlockParts) -> Result<(), MauError> {
        let content_type = required(&parts, "content_type")?;
        let name = required(&parts, "name")?;
        let definition = self.definition(parts)?;
        self.collections
            .references
            .add_definition(&content_type, &name, definition)
    }
}

fn required(parts: &BlockParts, key: &str) -> Result<String, MauError> {
    parts
        .arguments
        .named(key)
        .map(str::to_string)
        .ok_or_else(|| {
            MauError::parser(
                format!("Blocks with engine '{}' need the argument '{}'", parts.engine, key),
                parts.context.clone(),
            )
        })
}

#[cfg(test)]
mod tests {
    use crate::mau::ast::{Ast, NodeId, NodeKind, CONTENT};
    use crate::mau::environment::Environment;
    use crate::mau::error::MauError;
    use crate::mau::options::ParserOptions;
    use crate::mau::parsing::{parse_document, Compilation};
    use crate::mau::reader::MemoryReader;

    fn compile(source: &str) -> Result<Compilation, MauError> {
        let options = ParserOptions::new().with_reader(MemoryReader::new());
        parse_document(source, Environment::new(), &options)
    }

    fn content(compilation: &Compilation) -> Vec<NodeId> {
        compilation.ast.children_at(compilation.document, CONTENT)
    }

    fn tags(ast: &Ast, nodes: &[NodeId]) -> Vec<&'static str> {
        nodes.iter().map(|id| ast.node(*id).tag()).collect()
    }

    #[test]
    fn test_default_engine_parses_primary_and_secondary() {
        let compilation = compile("[aside]\n----\n= Inside\n\nText\n----\nAfter\n").unwrap();
        let ast = &compilation.ast;
        let block = content(&compilation)[0];

        assert_eq!(
            ast.kind(block),
            &NodeKind::Block {
                blocktype: Some("aside".to_string()),
                engine: "default".to_string()
            }
        );
        assert_eq!(tags(ast, &ast.children_at(block, "primary")), vec!["header", "paragraph"]);
        assert_eq!(tags(ast, &ast.children_at(block, "secondary")), vec!["paragraph"]);
        assert_eq!(compilation.toc.len(), 1);
    }

    #[test]
    fn test_default_engine_shares_variables() {
        let compilation = compile("----\n:inner:yes\n----\n\n{inner}").unwrap();
        let last = *content(&compilation).last().unwrap();

        assert_eq!(compilation.ast.plain_text(last), "yes");
    }

    #[test]
    fn test_mau_engine_is_isolated() {
        let err = compile(":outer:1\n\n[engine=mau]\n----\n{outer}\n----").unwrap_err();
        assert!(err.to_string().contains("Variable 'outer' has not been defined"));

        let compilation =
            compile("[engine=mau]\n----\n= Local\n----\n\n= Global").unwrap();
        assert_eq!(compilation.toc.len(), 1);
    }

    #[test]
    fn test_raw_engine_keeps_lines() {
        let compilation = compile("[raw]\n----\n<div>\n  *not bold*\n----").unwrap();
        let ast = &compilation.ast;
        let block = content(&compilation)[0];
        let lines: Vec<String> = ast
            .children_at(block, "primary")
            .into_iter()
            .map(|id| ast.plain_text(id))
            .collect();

        assert_eq!(lines, vec!["<div>", "  *not bold*"]);
    }

    #[test]
    fn test_source_engine_with_callouts() {
        let compilation = compile("[source,py]\n----\nx = 1:1:\n----\n1: assignment\n").unwrap();
        let ast = &compilation.ast;
        let source = content(&compilation)[0];

        assert_eq!(
            ast.kind(source),
            &NodeKind::Source {
                language: "py".to_string(),
                highlights: vec![]
            }
        );
        let markers = ast.children_at(source, "markers");
        assert_eq!(
            ast.kind(markers[0]),
            &NodeKind::Callout {
                line: 0,
                name: "1".to_string()
            }
        );
        let callouts = ast.children_at(source, "callouts");
        assert_eq!(
            ast.kind(callouts[0]),
            &NodeKind::CalloutEntry {
                marker: "1".to_string(),
                value: "assignment".to_string()
            }
        );
        assert_eq!(ast.plain_text(ast.children_at(source, "code")[0]), "x = 1");
    }

    #[test]
    fn test_source_lines_are_not_lexed_as_markup() {
        let compilation =
            compile("[source, python]\n----\n# comment\n// not a comment\n----").unwrap();
        let ast = &compilation.ast;
        let code: Vec<String> = ast
            .children_at(content(&compilation)[0], "code")
            .into_iter()
            .map(|id| ast.plain_text(id))
            .collect();

        assert_eq!(code, vec!["# comment", "// not a comment"]);
    }

    #[test]
    fn test_footnote_definitions_produce_no_node() {
        let compilation = compile(
            "Text[footnote](note)\n\n[footnote, note]\n----\nThe *note*\n----\n\n::footnotes:",
        )
        .unwrap();
        let ast = &compilation.ast;

        assert_eq!(tags(ast, &content(&compilation)), vec!["paragraph", "footnotes"]);
        assert_eq!(compilation.footnotes.len(), 1);
        let listing = content(&compilation)[1];
        assert_eq!(ast.children_at(listing, "entries").len(), 1);
    }

    #[test]
    fn test_reference_definitions() {
        let compilation = compile(
            "[reference](book, knuth)\n\n[reference, book, knuth, category=cs]\n----\nTAOCP\n----",
        )
        .unwrap();
        let ast = &compilation.ast;

        match ast.kind(compilation.references[0]) {
            NodeKind::ReferenceEntry {
                number, category, ..
            } => {
                assert_eq!(*number, 1);
                assert_eq!(category.as_deref(), Some("cs"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_engine_is_fatal() {
        let err = compile("[engine=magic]\n----\ntext\n----").unwrap_err();
        assert!(err.to_string().contains("Engine 'magic' is not available"));
    }

    #[test]
    fn test_unclosed_block_is_fatal() {
        let err = compile("----\nnever closed").unwrap_err();
        assert!(err.to_string().contains("Unclosed block"));
    }
}
