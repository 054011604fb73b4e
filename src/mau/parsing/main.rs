//! Main parser
//!
//!     Turns block lexer tokens into document nodes. Rules, in priority order:
//!
//!         blank_line          `EOL`
//!         horizontal_rule     `---`
//!         comment             `// text`
//!         multiline_comment   everything between two `////` lines
//!         variable            `:name:value`, `:+flag:`, `:-flag:`
//!         command             `::name:args`
//!         control             `@if:name==value`, applies to the next element
//!         title               `.text`, kept for the next element
//!         attributes          `[args]`, kept for the next element
//!         header              `== text`
//!         block               delimited blocks, handed to a block engine
//!         content             `<< type:args`
//!         list                `* item`, `# item`, nested by marker length
//!         paragraph           consecutive text lines
//!
//! Pending title and attributes
//!
//!     Title and attribute lines do not produce nodes. They are stored and consumed by the
//!     next element that accepts them: blocks, paragraphs, lists, content and commands take
//!     both, headers and horizontal rules only take attributes.
//!
//! Nesting
//!
//!     Blocks parse their content with nested main parsers sharing the arena and the
//!     options. See [engines](super::engines) for how the environment and the collected
//!     footnotes, references and headers flow between the two.

use super::aliases::BlockAliases;
use super::arguments::Arguments;
use super::engines::BlockParts;
use super::text::parse_inline;
use super::{first_rule, run, Backtrack, Parser, TokenCursor};
use crate::mau::ast::{Ast, NodeId, NodeInfo, NodeKind, CONTENT};
use crate::mau::environment::Environment;
use crate::mau::error::{MauError, RuleError, RuleResult};
use crate::mau::lexing::BlockLexer;
use crate::mau::options::ParserOptions;
use crate::mau::resolution::{Collections, CollectionsCheckpoint};
use crate::mau::token::{Context, Token, TokenKind};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static CONDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.\-+]+)\s*(==|!=)\s*(.*)$").unwrap());

/// What a main parser leaves behind
#[derive(Debug, Clone)]
pub struct MainOutput {
    pub nodes: Vec<NodeId>,
    pub collections: Collections,
    pub environment: Environment,
    pub aliases: BlockAliases,
}

pub struct MainParser<'a> {
    pub(super) cursor: TokenCursor,
    pub(super) ast: &'a mut Ast,
    pub(super) options: &'a ParserOptions,
    pub(super) environment: Environment,
    pub(super) aliases: BlockAliases,
    pub(super) collections: Collections,
    pub(super) nodes: Vec<NodeId>,
    pub(super) title: Option<NodeId>,
    pub(super) arguments: Option<Arguments>,
}

pub struct MainCheckpoint {
    position: usize,
    arena: usize,
    nodes: usize,
    collections: CollectionsCheckpoint,
    title: Option<NodeId>,
    arguments: Option<Arguments>,
}

impl<'a> MainParser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        ast: &'a mut Ast,
        options: &'a ParserOptions,
        environment: Environment,
    ) -> Result<Self, MauError> {
        let aliases = BlockAliases::from_environment(&environment)?;
        Ok(Self::with_aliases(tokens, ast, options, environment, aliases))
    }

    pub fn with_aliases(
        tokens: Vec<Token>,
        ast: &'a mut Ast,
        options: &'a ParserOptions,
        environment: Environment,
        aliases: BlockAliases,
    ) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            ast,
            options,
            environment,
            aliases,
            collections: Collections::default(),
            nodes: Vec::new(),
            title: None,
            arguments: None,
        }
    }

    pub fn parse(&mut self) -> Result<(), MauError> {
        run(self)
    }

    pub fn finish(self) -> MainOutput {
        MainOutput {
            nodes: self.nodes,
            collections: self.collections,
            environment: self.environment,
            aliases: self.aliases,
        }
    }

    /// Parse `tokens` with a nested parser that shares the environment and the block
    /// aliases, and hands its collections up to this one
    pub(super) fn parse_nested(&mut self, tokens: Vec<Token>) -> Result<Vec<NodeId>, MauError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        debug!("starting nested parser at {}", tokens[0].context);
        let environment = std::mem::take(&mut self.environment);
        let aliases = std::mem::take(&mut self.aliases);
        let options = self.options;
        let mut parser =
            MainParser::with_aliases(tokens, &mut *self.ast, options, environment, aliases);
        let outcome = parser.parse();
        let output = parser.finish();
        self.environment = output.environment;
        self.aliases = output.aliases;
        outcome?;

        self.collections.update(output.collections)?;
        Ok(output.nodes)
    }

    /// Parse `tokens` as a separate document: only the `mau` namespace of the environment
    /// is visible, and footnotes, references and headers are resolved on the spot
    pub(super) fn parse_isolated(&mut self, tokens: Vec<Token>) -> Result<Vec<NodeId>, MauError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        debug!("starting isolated parser at {}", tokens[0].context);
        let mut environment = Environment::new();
        if let Ok(config) = self.environment.get("mau") {
            environment.set("mau", config.clone());
        }
        let aliases = BlockAliases::from_environment(&environment)?;
        let options = self.options;
        let mut parser =
            MainParser::with_aliases(tokens, &mut *self.ast, options, environment, aliases);
        parser.parse()?;
        let output = parser.finish();

        output.collections.resolve(&mut *self.ast)?;
        Ok(output.nodes)
    }

    /// Parse inline text and register what it mentions
    fn inline(&mut self, text: &str, context: Context) -> Result<Vec<NodeId>, MauError> {
        let output = parse_inline(
            text,
            context,
            &mut *self.ast,
            self.options,
            &self.environment,
        )?;
        self.collections.update(output.collections)?;
        Ok(output.nodes)
    }

    fn sentence(&mut self, text: &str, context: Context) -> Result<NodeId, MauError> {
        let children = self.inline(text, context)?;
        let sentence = self.ast.add(NodeKind::Sentence);
        self.ast.add_children(sentence, children, CONTENT);
        Ok(sentence)
    }

    /// `EOL`, or nothing at the end of the input
    fn end_of_line(&mut self) -> RuleResult<()> {
        if self.cursor.at_eof() {
            return Ok(());
        }
        self.cursor.expect(TokenKind::Eol, None)?;
        Ok(())
    }

    /// Value of the `TEXT` token following a line token, if any
    fn line_text(&mut self) -> String {
        if self.cursor.peek_kind(TokenKind::Text) {
            self.cursor.advance().value
        } else {
            String::new()
        }
    }

    /// `inline` info merged with the pending attributes. Inline values win.
    fn take_info(&mut self, inline: NodeInfo) -> NodeInfo {
        let pending = match self.arguments.take() {
            Some(pending) => pending.into_info(),
            None => return inline,
        };
        let mut info = inline;
        if info.args.is_empty() {
            info.args = pending.args;
        }
        for (key, value) in pending.kwargs {
            info.kwargs.entry(key).or_insert(value);
        }
        for tag in pending.tags {
            if !info.has_tag(&tag) {
                info.tags.push(tag);
            }
        }
        info.subtype = info.subtype.or(pending.subtype);
        info
    }

    fn attach_title(&mut self, node: NodeId) {
        if let Some(title) = self.title.take() {
            self.ast.add_children(node, [title], "title");
        }
    }

    fn blank_line(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Eol, None)?;
        Ok(())
    }

    fn horizontal_rule(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::HorizontalRule, None)?;
        self.end_of_line()?;

        let info = self.take_info(NodeInfo::default());
        let node = self.ast.add_with(NodeKind::HorizontalRule, info);
        self.nodes.push(node);
        Ok(())
    }

    fn comment(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Comment, None)?;
        self.end_of_line()
    }

    fn multiline_comment(&mut self) -> RuleResult<()> {
        let opening = self.cursor.expect(TokenKind::MultilineComment, None)?;
        self.end_of_line()?;

        loop {
            if self.cursor.at_eof() {
                return Err(MauError::parser("Unclosed multiline comment", opening.context).into());
            }
            if self.cursor.advance().is(TokenKind::MultilineComment) {
                return self.end_of_line();
            }
        }
    }

    fn variable(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Variable, None)?;
        let value = self.line_text();
        self.end_of_line()?;

        if let Some(flag) = token.value.strip_prefix('+') {
            self.environment.set(flag, true);
        } else if let Some(flag) = token.value.strip_prefix('-') {
            self.environment.set(flag, false);
        } else {
            self.environment.set(&token.value, value);
        }
        Ok(())
    }

    fn command(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Command, None)?;
        let raw = self.line_text();
        self.end_of_line()?;

        let context = token.context;
        let arguments = Arguments::parse(&raw, context.clone())?;
        let kind = match token.value.as_str() {
            "defblock" => {
                self.aliases.define_from_arguments(&arguments, &context)?;
                return Ok(());
            }
            "toc" => NodeKind::Toc,
            "footnotes" => NodeKind::Footnotes,
            "references" => NodeKind::References {
                content_type: arguments.value(0, "content_type").map(str::to_string),
                category: arguments.named("category").map(str::to_string),
            },
            name => NodeKind::Command {
                name: name.to_string(),
            },
        };

        let info = self.take_info(arguments.into_info());
        let node = self.ast.add_with(kind, info);
        match self.ast.kind(node) {
            NodeKind::Toc => self.collections.toc.add_listing(node),
            NodeKind::Footnotes => self.collections.footnotes.add_listing(node),
            NodeKind::References { .. } => self.collections.references.add_listing(node),
            _ => {}
        }
        self.attach_title(node);
        self.nodes.push(node);
        Ok(())
    }

    /// `@if:name==value`. The next element is parsed either way. When the condition does
    /// not hold, everything it produced is rolled back, variables and aliases included.
    fn control(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Control, None)?;
        let statement = self.line_text();
        self.end_of_line()?;

        if token.value != "if" {
            return Err(MauError::parser(
                format!("Unknown control operator '{}'", token.value),
                token.context,
            )
            .into());
        }
        let holds = self.condition(&statement, &token.context)?;

        let checkpoint = self.checkpoint();
        let environment = self.environment.clone();
        let aliases = self.aliases.clone();

        while !self.cursor.at_eof() {
            let rule = self.step()?;
            if !matches!(rule, "title" | "attributes" | "blank_line") {
                break;
            }
        }

        if !holds {
            let position = self.cursor.position();
            self.restore(checkpoint);
            self.cursor.set_position(position);
            self.environment = environment;
            self.aliases = aliases;
            self.title = None;
            self.arguments = None;
        }
        Ok(())
    }

    fn condition(&self, statement: &str, context: &Context) -> Result<bool, MauError> {
        let captures = CONDITION.captures(statement.trim()).ok_or_else(|| {
            MauError::parser(format!("Invalid condition {:?}", statement), context.clone())
        })?;
        let name = &captures[1];
        let value = self
            .environment
            .get(name)
            .map_err(|_| {
                MauError::parser(
                    format!("Variable '{}' has not been defined", name),
                    context.clone(),
                )
            })?
            .as_text()
            .unwrap_or_default();

        let expected = captures[3].trim();
        Ok(match &captures[2] {
            "==" => value == expected,
            _ => value != expected,
        })
    }

    fn title(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Title, None)?;
        self.end_of_line()?;

        let sentence = self.sentence(&token.value, token.context)?;
        self.title = Some(sentence);
        Ok(())
    }

    fn attributes(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Arguments, None)?;
        self.end_of_line()?;

        self.arguments = Some(Arguments::parse(&token.value, token.context)?);
        Ok(())
    }

    fn header(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Header, None)?;
        let text = self.line_text();
        self.end_of_line()?;

        let level = token.value.chars().count();
        let info = self.take_info(NodeInfo::default());
        let id = info.kwargs.get("id").cloned();

        let children = self.inline(&text, token.context.clone())?;
        let plain: String = children.iter().map(|c| self.ast.plain_text(*c)).collect();
        let anchor = self.options.header_anchor(&plain, level);

        let node = self.ast.add_with(
            NodeKind::Header {
                level,
                anchor,
                id: id.clone(),
            },
            info,
        );
        self.ast.add_children(node, children, "text");
        self.collections
            .toc
            .add_header(node, id.as_deref(), token.context)?;
        self.nodes.push(node);
        Ok(())
    }

    fn block(&mut self) -> RuleResult<()> {
        let opening = self.cursor.expect(TokenKind::Block, None)?;
        self.end_of_line()?;

        let mut primary = Vec::new();
        loop {
            let token = self.cursor.peek();
            if token.is(TokenKind::Eof) {
                return Err(MauError::parser(
                    format!("Unclosed block, expected {}", opening.value),
                    opening.context,
                )
                .into());
            }
            if token.is(TokenKind::Block) && token.value == opening.value {
                break;
            }
            primary.push(self.cursor.advance());
        }
        self.cursor.advance();
        self.end_of_line()?;
        let secondary = self.secondary_content();

        let arguments = self.arguments.take().unwrap_or_default();
        let resolved = self.aliases.resolve(arguments);
        debug!(
            "block {} with engine {} at {}",
            resolved.blocktype.as_deref().unwrap_or("-"),
            resolved.engine,
            opening.context
        );

        let parts = BlockParts {
            blocktype: resolved.blocktype,
            engine: resolved.engine,
            arguments: resolved.arguments,
            title: self.title.take(),
            primary,
            secondary,
            context: opening.context,
        };
        if let Some(node) = self.run_engine(parts)? {
            self.nodes.push(node);
        }
        Ok(())
    }

    /// Lines right after a closing delimiter, up to the next blank line
    fn secondary_content(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while !self.cursor.at_eof() && !self.cursor.peek_kind(TokenKind::Eol) {
            while !self.cursor.at_eof() {
                let token = self.cursor.advance();
                let end = token.is(TokenKind::Eol);
                tokens.push(token);
                if end {
                    break;
                }
            }
        }
        tokens
    }

    fn content(&mut self) -> RuleResult<()> {
        let token = self.cursor.expect(TokenKind::Content, None)?;
        let raw = self.line_text();
        self.end_of_line()?;

        let context = token.context;
        let arguments = Arguments::parse(&raw, context.clone())?;
        let uri = arguments.value(0, "uri").map(str::to_string);
        let require_uri = || {
            uri.clone().ok_or_else(|| {
                MauError::parser(
                    format!("Content of type '{}' needs a uri", token.value),
                    context.clone(),
                )
            })
        };

        let node = match token.value.as_str() {
            "image" => {
                let kind = NodeKind::ContentImage {
                    uri: require_uri()?,
                    alt_text: arguments.value(1, "alt_text").map(str::to_string),
                };
                let info = self.take_info(arguments.into_info());
                self.ast.add_with(kind, info)
            }
            "mau" => {
                let uri = require_uri()?;
                debug!("reading mau content {} at {}", uri, context);
                let text = self.options.reader().read(&uri)?;
                let tokens =
                    BlockLexer::new(&text, Context::with_source(uri.as_str()), self.options)
                        .tokenize()?;
                let children = self.parse_nested(tokens)?;

                let info = self.take_info(arguments.into_info());
                let node = self.ast.add_with(
                    NodeKind::Content {
                        content_type: "mau".to_string(),
                        uris: vec![uri],
                    },
                    info,
                );
                self.ast.add_children(node, children, CONTENT);
                node
            }
            content_type => {
                let kind = NodeKind::Content {
                    content_type: content_type.to_string(),
                    uris: arguments.args.clone(),
                };
                let info = self.take_info(arguments.into_info());
                self.ast.add_with(kind, info)
            }
        };
        self.attach_title(node);
        self.nodes.push(node);
        Ok(())
    }

    fn list(&mut self) -> RuleResult<()> {
        let marker = self.cursor.peek();
        if !marker.is(TokenKind::List) {
            return Err(RuleError::Mismatch);
        }
        let level = marker.value.chars().count();

        let info = self.take_info(NodeInfo::default());
        let start = info.kwargs.get("start").and_then(|s| s.parse().ok());
        let node = self.list_level(level, true, start)?;
        *self.ast.info_mut(node) = info;
        self.attach_title(node);
        self.nodes.push(node);
        Ok(())
    }

    /// Items at `level` and, recursively, their sub-lists
    fn list_level(
        &mut self,
        level: usize,
        main_node: bool,
        start: Option<usize>,
    ) -> Result<NodeId, MauError> {
        let ordered = self.cursor.peek().value.starts_with('#');
        let mut items: Vec<NodeId> = Vec::new();

        loop {
            let marker = self.cursor.peek().clone();
            if !marker.is(TokenKind::List) {
                break;
            }
            let depth = marker.value.chars().count();

            if depth > level {
                let sublist = self.list_level(depth, false, None)?;
                match items.last() {
                    Some(item) => self.ast.add_children(*item, [sublist], CONTENT),
                    None => {
                        let item = self.ast.add(NodeKind::ListItem { level });
                        self.ast.add_children(item, [sublist], CONTENT);
                        items.push(item);
                    }
                }
                continue;
            }
            if depth < level {
                break;
            }

            self.cursor.advance();
            let text = self.line_text();
            if !self.cursor.at_eof() {
                self.cursor.advance();
            }

            let sentence = self.sentence(&text, marker.context)?;
            let item = self.ast.add(NodeKind::ListItem { level });
            self.ast.add_children(item, [sentence], CONTENT);
            items.push(item);
        }

        let list = self.ast.add(NodeKind::List {
            ordered,
            main_node,
            start,
        });
        self.ast.add_children(list, items, CONTENT);
        Ok(list)
    }

    fn paragraph(&mut self) -> RuleResult<()> {
        let context = self.cursor.peek().context.clone();
        let mut lines = Vec::new();
        while self.cursor.peek_kind(TokenKind::Text) {
            lines.push(self.cursor.advance().value.trim().to_string());
            self.end_of_line()?;
        }
        if lines.is_empty() {
            return Err(RuleError::Mismatch);
        }

        let sentence = self.sentence(&lines.join("\n"), context)?;
        let info = self.take_info(NodeInfo::default());
        let node = self.ast.add_with(NodeKind::Paragraph, info);
        self.ast.add_children(node, [sentence], CONTENT);
        self.attach_title(node);
        self.nodes.push(node);
        Ok(())
    }
}

impl Backtrack for MainParser<'_> {
    type Checkpoint = MainCheckpoint;

    fn checkpoint(&self) -> MainCheckpoint {
        MainCheckpoint {
            position: self.cursor.position(),
            arena: self.ast.len(),
            nodes: self.nodes.len(),
            collections: self.collections.checkpoint(),
            title: self.title,
            arguments: self.arguments.clone(),
        }
    }

    fn restore(&mut self, checkpoint: MainCheckpoint) {
        self.cursor.set_position(checkpoint.position);
        self.ast.truncate(checkpoint.arena);
        self.nodes.truncate(checkpoint.nodes);
        self.collections.truncate(&checkpoint.collections);
        self.title = checkpoint.title;
        self.arguments = checkpoint.arguments;
    }
}

impl Parser for MainParser<'_> {
    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn step(&mut self) -> Result<&'static str, MauError> {
        first_rule(
            self,
            &[
                ("blank_line", Self::blank_line),
                ("horizontal_rule", Self::horizontal_rule),
                ("comment", Self::comment),
                ("multiline_comment", Self::multiline_comment),
                ("variable", Self::variable),
                ("command", Self::command),
                ("control", Self::control),
                ("title", Self::title),
                ("attributes", Self::attributes),
                ("header", Self::header),
                ("block", Self::block),
                ("content", Self::content),
                ("list", Self::list),
                ("paragraph", Self::paragraph),
            ],
        )
    }
}
