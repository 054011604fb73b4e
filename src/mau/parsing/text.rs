//! Inline text parser
//!
//!     Parses the text of paragraphs, headers, titles and list items into inline nodes.
//!     Rules, in priority order:
//!
//!         escape      `\` followed by a literal, the literal is kept as text
//!         macro       `[name](arguments)`
//!         verbatim    `` `text` ``, untouched until the next backtick or end of line
//!         literal     `$$text$$` or `%%text%%`, a text node that is not parsed
//!         style       `_text_`, `*text*`, `^text^`, `~text~`, parsed recursively
//!         word        any single token
//!
//!     Consecutive words, escapes included, are merged into one text node. A style opener
//!     without a closing marker does not match, and the marker is read as a word. A doubled
//!     marker (`__`) is a style with no content.
//!
//! Macros
//!
//!     `link`, `mailto`, `class`, `image`, `footnote`, `reference`, `header` and `if` are
//!     built in. Other names are looked up in the custom handlers of
//!     [`ParserOptions`](crate::mau::options::ParserOptions) and otherwise become generic
//!     `macro` nodes carrying their arguments. `if` only parses the selected branch.
//!
//!     The flag of `[if](flag, then, else)` holds when the variable is `true`. An undefined
//!     flag does not hold, unlike the `@if` control line where an undefined variable is
//!     fatal.

use super::arguments::Arguments;
use super::preprocess::substitute;
use super::{first_rule, run, Backtrack, Parser, TokenCursor};
use crate::mau::ast::{Ast, NodeId, NodeInfo, NodeKind, CONTENT};
use crate::mau::environment::Environment;
use crate::mau::error::{MauError, RuleError, RuleResult};
use crate::mau::lexing::TextLexer;
use crate::mau::options::{MacroCall, ParserOptions};
use crate::mau::resolution::{Collections, CollectionsCheckpoint};
use crate::mau::token::{Context, Token, TokenKind};

const STYLES: [(&str, &str); 4] = [
    ("_", "underscore"),
    ("*", "star"),
    ("^", "caret"),
    ("~", "tilde"),
];

/// Nodes produced from a piece of inline text, and what they registered
#[derive(Debug, Clone, Default)]
pub struct TextOutput {
    pub nodes: Vec<NodeId>,
    pub collections: Collections,
}

/// Substitute variables in `text`, then lex and parse it
pub fn parse_inline(
    text: &str,
    context: Context,
    ast: &mut Ast,
    options: &ParserOptions,
    environment: &Environment,
) -> Result<TextOutput, MauError> {
    let text = substitute(text, context.clone(), environment)?;
    let tokens = TextLexer::new(&text, context).tokenize()?;
    let mut parser = TextParser::new(tokens, ast, options, environment);
    parser.parse()?;
    Ok(parser.finish())
}

pub struct TextParser<'a> {
    cursor: TokenCursor,
    ast: &'a mut Ast,
    options: &'a ParserOptions,
    environment: &'a Environment,
    nodes: Vec<NodeId>,
    pending: String,
    collections: Collections,
}

pub struct TextCheckpoint {
    position: usize,
    arena: usize,
    nodes: usize,
    pending: String,
    collections: CollectionsCheckpoint,
}

impl<'a> TextParser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        ast: &'a mut Ast,
        options: &'a ParserOptions,
        environment: &'a Environment,
    ) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            ast,
            options,
            environment,
            nodes: Vec::new(),
            pending: String::new(),
            collections: Collections::default(),
        }
    }

    pub fn parse(&mut self) -> Result<(), MauError> {
        run(self)?;
        self.flush();
        Ok(())
    }

    pub fn finish(self) -> TextOutput {
        TextOutput {
            nodes: self.nodes,
            collections: self.collections,
        }
    }

    /// Turn the merged words into a text node
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            let node = self.ast.add(NodeKind::text(text));
            self.nodes.push(node);
        }
    }

    fn push(&mut self, node: NodeId) {
        self.flush();
        self.nodes.push(node);
    }

    /// Parse already lexed tokens with a nested parser sharing the arena
    fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<Vec<NodeId>, MauError> {
        let options = self.options;
        let environment = self.environment;
        let mut nested = TextParser::new(tokens, &mut *self.ast, options, environment);
        nested.parse()?;
        let output = nested.finish();
        self.collections.update(output.collections)?;
        Ok(output.nodes)
    }

    /// Parse a macro argument as inline text. Variables were already substituted.
    fn parse_text(&mut self, text: &str, context: Context) -> Result<Vec<NodeId>, MauError> {
        let tokens = TextLexer::new(text, context).tokenize()?;
        self.parse_tokens(tokens)
    }

    fn escape(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Literal, Some("\\"))?;
        let escaped = self.cursor.expect(TokenKind::Literal, None)?;
        self.pending.push_str(&escaped.value);
        Ok(())
    }

    fn macro_call(&mut self) -> RuleResult<()> {
        let open = self.cursor.expect(TokenKind::Literal, Some("["))?;
        let name = self.cursor.expect(TokenKind::Text, None)?.value;
        self.cursor.expect(TokenKind::Literal, Some("]"))?;
        self.cursor.expect(TokenKind::Literal, Some("("))?;
        let raw = self.macro_arguments()?;

        let context = open.context;
        let arguments = Arguments::parse(&raw, context.clone())?;
        self.dispatch_macro(name, arguments, context)?;
        Ok(())
    }

    /// Raw text up to the closing parenthesis. Parentheses inside quotes do not close,
    /// `\)` is a literal parenthesis.
    fn macro_arguments(&mut self) -> RuleResult<String> {
        let mut raw = String::new();
        let mut quoted = false;
        loop {
            let token = self.cursor.advance();
            match (token.kind, token.value.as_str()) {
                (TokenKind::Eof, _) => return Err(RuleError::Mismatch),
                (TokenKind::Eol, _) => raw.push(' '),
                (TokenKind::Literal, ")") if !quoted => return Ok(raw),
                (TokenKind::Literal, "\"") => {
                    quoted = !quoted;
                    raw.push('"');
                }
                (TokenKind::Literal, "\\") if self.cursor.peek_is(&Token::literal(")")) => {
                    raw.push_str(&self.cursor.advance().value);
                }
                (TokenKind::Literal, "\\") if self.cursor.peek_is(&Token::literal("\"")) => {
                    raw.push('\\');
                    raw.push_str(&self.cursor.advance().value);
                }
                _ => raw.push_str(&token.value),
            }
        }
    }

    fn dispatch_macro(
        &mut self,
        name: String,
        arguments: Arguments,
        context: Context,
    ) -> Result<(), MauError> {
        let required = |key: &str, index: usize| -> Result<String, MauError> {
            arguments.value(index, key).map(str::to_string).ok_or_else(|| {
                MauError::parser(
                    format!("Macro '{}' needs the argument '{}'", name, key),
                    context.clone(),
                )
            })
        };

        match name.as_str() {
            "link" | "mailto" => {
                let (key, prefix) = if name == "link" {
                    ("target", "")
                } else {
                    ("email", "mailto:")
                };
                let target = required(key, 0)?;
                let text = arguments
                    .value(1, "text")
                    .map(str::to_string)
                    .unwrap_or_else(|| target.clone());
                let node = self.ast.add_with(
                    NodeKind::MacroLink {
                        target: format!("{}{}", prefix, target),
                    },
                    NodeInfo {
                        tags: arguments.tags.clone(),
                        subtype: arguments.subtype.clone(),
                        ..NodeInfo::default()
                    },
                );
                let children = self.parse_text(&text, context)?;
                self.ast.add_children(node, children, "text");
                self.push(node);
            }
            "class" => {
                let text = required("text", 0)?;
                let classes = required("classes", 1)?
                    .split(',')
                    .map(|class| class.trim().to_string())
                    .filter(|class| !class.is_empty())
                    .collect();
                let node = self.ast.add(NodeKind::MacroClass { classes });
                let children = self.parse_text(&text, context)?;
                self.ast.add_children(node, children, CONTENT);
                self.push(node);
            }
            "image" => {
                let node = self.ast.add(NodeKind::MacroImage {
                    uri: required("uri", 0)?,
                    alt_text: arguments.value(1, "alt_text").map(str::to_string),
                    width: arguments.value(2, "width").map(str::to_string),
                    height: arguments.value(3, "height").map(str::to_string),
                });
                self.push(node);
            }
            "footnote" => {
                let footnote = required("name", 0)?;
                let node = self.ast.add(NodeKind::Footnote {
                    name: footnote.clone(),
                    number: None,
                    reference_anchor: None,
                    content_anchor: None,
                });
                self.collections
                    .footnotes
                    .add_mention(&footnote, node, context)?;
                self.push(node);
            }
            "reference" => {
                let content_type = required("content_type", 0)?;
                let reference = required("name", 1)?;
                let node = self.ast.add(NodeKind::Reference {
                    content_type: content_type.clone(),
                    name: reference.clone(),
                    number: None,
                    reference_anchor: None,
                    content_anchor: None,
                    category: None,
                });
                self.collections
                    .references
                    .add_mention(&content_type, &reference, node, context)?;
                self.push(node);
            }
            "header" => {
                let id = required("id", 0)?;
                let node = self.ast.add(NodeKind::MacroHeader {
                    header_id: id.clone(),
                    header_anchor: None,
                });
                if let Some(text) = arguments.value(1, "text") {
                    let children = self.parse_text(text, context.clone())?;
                    self.ast.add_children(node, children, "text");
                }
                self.collections.toc.add_mention(&id, node, context);
                self.push(node);
            }
            "if" => {
                let flag = required("flag", 0)?;
                // undefined reads as false, see the module docs
                let branch = if self.environment.flag(&flag, false) {
                    arguments.value(1, "true")
                } else {
                    arguments.value(2, "false")
                };
                if let Some(branch) = branch {
                    let children = self.parse_text(branch, context)?;
                    self.flush();
                    self.nodes.extend(children);
                }
            }
            _ => {
                let node = match self.options.macro_handler(&name) {
                    Some(handler) => {
                        let call = MacroCall {
                            name: name.clone(),
                            arguments,
                            context,
                        };
                        handler(&call, &mut *self.ast)?
                    }
                    None => self
                        .ast
                        .add_with(NodeKind::Macro { name: name.clone() }, arguments.into_info()),
                };
                self.push(node);
            }
        }
        Ok(())
    }

    fn verbatim(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Literal, Some("`"))?;
        let content = self
            .cursor
            .collect(&[Token::literal("`"), Token::kind(TokenKind::Eol)], false);
        self.cursor.expect(TokenKind::Literal, Some("`"))?;

        let value = content.iter().map(|token| token.value.as_str()).collect();
        let node = self.ast.add(NodeKind::Verbatim { value });
        self.push(node);
        Ok(())
    }

    fn literal_span(&mut self) -> RuleResult<()> {
        let marker = match self.cursor.peek().value.as_str() {
            "$" => "$",
            "%" => "%",
            _ => return Err(RuleError::Mismatch),
        };
        self.cursor.expect(TokenKind::Literal, Some(marker))?;
        self.cursor.expect(TokenKind::Literal, Some(marker))?;

        let mut value = String::new();
        loop {
            if self.cursor.peek_is(&Token::literal(marker))
                && Token::literal(marker).accepts(self.cursor.peek_at(1))
            {
                self.cursor.advance();
                self.cursor.advance();
                break;
            }
            let token = self.cursor.advance();
            match token.kind {
                TokenKind::Eof => return Err(RuleError::Mismatch),
                TokenKind::Eol => value.push(' '),
                _ => value.push_str(&token.value),
            }
        }

        let node = self.ast.add(NodeKind::text(value));
        self.push(node);
        Ok(())
    }

    fn style(&mut self) -> RuleResult<()> {
        let marker = self.cursor.peek().value.clone();
        let style = match STYLES.iter().find(|(m, _)| *m == marker) {
            Some((_, style)) => *style,
            None => return Err(RuleError::Mismatch),
        };
        self.cursor.expect(TokenKind::Literal, Some(marker.as_str()))?;

        let content = self.cursor.collect(&[Token::literal(marker.as_str())], true);
        self.cursor.expect(TokenKind::Literal, Some(marker.as_str()))?;

        let node = self.ast.add(NodeKind::Style {
            value: style.to_string(),
        });
        let children = self.parse_tokens(content)?;
        self.ast.add_children(node, children, CONTENT);
        self.push(node);
        Ok(())
    }

    fn word(&mut self) -> RuleResult<()> {
        let token = self.cursor.advance();
        match token.kind {
            TokenKind::Eol if self.cursor.at_eof() => {}
            TokenKind::Eol => self.pending.push(' '),
            TokenKind::Eof => {}
            _ => self.pending.push_str(&token.value),
        }
        Ok(())
    }
}

impl Backtrack for TextParser<'_> {
    type Checkpoint = TextCheckpoint;

    fn checkpoint(&self) -> TextCheckpoint {
        TextCheckpoint {
            position: self.cursor.position(),
            arena: self.ast.len(),
            nodes: self.nodes.len(),
            pending: self.pending.clone(),
            collections: self.collections.checkpoint(),
        }
    }

    fn restore(&mut self, checkpoint: TextCheckpoint) {
        self.cursor.set_position(checkpoint.position);
        self.ast.truncate(checkpoint.arena);
        self.nodes.truncate(checkpoint.nodes);
        self.pending = checkpoint.pending;
        self.collections.truncate(&checkpoint.collections);
    }
}

impl Parser for TextParser<'_> {
    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn step(&mut self) -> Result<&'static str, MauError> {
        first_rule(
            self,
            &[
                ("escape", Self::escape),
                ("macro", Self::macro_call),
                ("verbatim", Self::verbatim),
                ("literal", Self::literal_span),
                ("style", Self::style),
                ("word", Self::word),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mau::parsing::Rule;
    use crate::mau::reader::MemoryReader;
    use proptest::prelude::*;
    use rstest::rstest;

    fn parse_with(text: &str, environment: &Environment) -> (Ast, TextOutput) {
        let mut ast = Ast::new();
        let options = ParserOptions::new().with_reader(MemoryReader::new());
        let output = parse_inline(text, Context::default(), &mut ast, &options, environment)
            .unwrap();
        (ast, output)
    }

    fn parse(text: &str) -> (Ast, Vec<NodeId>) {
        let (ast, output) = parse_with(text, &Environment::new());
        (ast, output.nodes)
    }

    fn tags(ast: &Ast, nodes: &[NodeId]) -> Vec<&'static str> {
        nodes.iter().map(|id| ast.node(*id).tag()).collect()
    }

    #[test]
    fn test_words_are_merged() {
        let (ast, nodes) = parse("Just some  text\nover two lines");

        assert_eq!(nodes.len(), 1);
        assert_eq!(ast.plain_text(nodes[0]), "Just some text over two lines");
    }

    #[test]
    fn test_escapes_join_the_surrounding_text() {
        let (ast, nodes) = parse(r"a \_b\_ c");

        assert_eq!(tags(&ast, &nodes), vec!["text"]);
        assert_eq!(ast.plain_text(nodes[0]), "a _b_ c");
    }

    #[rstest]
    #[case("_under_", "underscore")]
    #[case("*star*", "star")]
    #[case("^caret^", "caret")]
    #[case("~tilde~", "tilde")]
    fn test_styles(#[case] text: &str, #[case] style: &str) {
        let (ast, nodes) = parse(text);

        assert_eq!(nodes.len(), 1);
        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::Style {
                value: style.to_string()
            }
        );
    }

    #[test]
    fn test_nested_styles() {
        let (ast, nodes) = parse("*bold _and italic_*");

        let inner = ast.children(nodes[0]);
        assert_eq!(tags(&ast, inner), vec!["text", "style"]);
        assert_eq!(ast.plain_text(nodes[0]), "bold and italic");
    }

    #[test]
    fn test_unmatched_style_is_text() {
        let (ast, nodes) = parse("2 * 3");

        assert_eq!(tags(&ast, &nodes), vec!["text"]);
        assert_eq!(ast.plain_text(nodes[0]), "2 * 3");
    }

    #[test]
    fn test_doubled_marker_is_an_empty_style() {
        let (ast, nodes) = parse("a __ b");

        assert_eq!(tags(&ast, &nodes), vec!["text", "style", "text"]);
        assert!(ast.children(nodes[1]).is_empty());
    }

    #[test]
    fn test_verbatim_is_untouched() {
        let (ast, nodes) = parse("run `rm *.txt` now");

        assert_eq!(tags(&ast, &nodes), vec!["text", "verbatim", "text"]);
        assert_eq!(ast.plain_text(nodes[1]), "rm *.txt");
    }

    #[test]
    fn test_literal_spans() {
        let (ast, nodes) = parse("$$a_b_c$$ and %%*x*%%");

        assert_eq!(tags(&ast, &nodes), vec!["text", "text", "text"]);
        assert_eq!(ast.plain_text(nodes[0]), "a_b_c");
        assert_eq!(ast.plain_text(nodes[2]), "*x*");
    }

    #[test]
    fn test_link_defaults_text_to_target() {
        let (ast, nodes) = parse("[link](https://mau.org)");

        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::MacroLink {
                target: "https://mau.org".to_string()
            }
        );
        assert_eq!(ast.plain_text(nodes[0]), "https://mau.org");
    }

    #[test]
    fn test_link_text_is_parsed() {
        let (ast, nodes) = parse(r#"[link](https://mau.org, "the _docs_")"#);

        let text = ast.children_at(nodes[0], "text");
        assert_eq!(tags(&ast, &text), vec!["text", "style"]);
    }

    #[test]
    fn test_mailto() {
        let (ast, nodes) = parse("[mailto](me@mau.org)");

        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::MacroLink {
                target: "mailto:me@mau.org".to_string()
            }
        );
    }

    #[test]
    fn test_class_macro() {
        let (ast, nodes) = parse(r#"[class]("text", "one, two")"#);

        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::MacroClass {
                classes: vec!["one".to_string(), "two".to_string()]
            }
        );
    }

    #[test]
    fn test_image_macro() {
        let (ast, nodes) = parse("[image](/a.png, alt_text=An image, width=100)");

        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::MacroImage {
                uri: "/a.png".to_string(),
                alt_text: Some("An image".to_string()),
                width: Some("100".to_string()),
                height: None,
            }
        );
    }

    #[test]
    fn test_footnote_and_reference_register_mentions() {
        let (ast, output) = parse_with(
            "See[footnote](note) and [reference](book, knuth)",
            &Environment::new(),
        );

        assert_eq!(tags(&ast, &output.nodes), vec!["text", "footnote", "text", "reference"]);
        assert_eq!(output.collections.footnotes.mention_count(), 1);
        assert_eq!(output.collections.references.mention_count(), 1);
    }

    #[test]
    fn test_if_parses_only_the_selected_branch() {
        let mut environment = Environment::new();
        environment.set("draft", true);

        let (ast, output) = parse_with(
            r#"[if](draft, "*draft*", "[footnote](never)")"#,
            &environment,
        );
        assert_eq!(tags(&ast, &output.nodes), vec!["style"]);
        assert_eq!(output.collections.footnotes.mention_count(), 0);

        let (ast, output) = parse_with(r#"[if](missing, true=yes, false=no)"#, &environment);
        assert_eq!(ast.plain_text(output.nodes[0]), "no");
    }

    #[test]
    fn test_if_reads_an_undefined_flag_as_false() {
        let (ast, output) = parse_with(r#"[if](ghost, "on", "off")"#, &Environment::new());
        assert_eq!(ast.plain_text(output.nodes[0]), "off");

        let (_, output) = parse_with("[if](ghost, on)", &Environment::new());
        assert!(output.nodes.is_empty());

        let mut environment = Environment::new();
        environment.set("ghost", "yes");
        let (ast, output) = parse_with(r#"[if](ghost, "on", "off")"#, &environment);
        assert_eq!(ast.plain_text(output.nodes[0]), "off");
    }

    /// Cursor, arena size, node count, pending words and collection sizes
    fn parser_state(parser: &TextParser) -> (usize, usize, usize, String, CollectionsCheckpoint) {
        (
            parser.cursor.position(),
            parser.ast.len(),
            parser.nodes.len(),
            parser.pending.clone(),
            parser.collections.checkpoint(),
        )
    }

    proptest! {
        #[test]
        fn test_failing_rules_restore_the_whole_parser(
            warmup in 0usize..3,
            consumed in 0usize..3,
            repeats in 1usize..4,
        ) {
            let mut text = String::new();
            for index in 0..warmup {
                text.push_str(&format!("w{index}[footnote](a{index}) "));
            }
            text.push_str("[footnote](inner) *open");

            let mut ast = Ast::new();
            let options = ParserOptions::new().with_reader(MemoryReader::new());
            let environment = Environment::new();
            let tokens = TextLexer::new(&text, Context::default()).tokenize().unwrap();
            let mut parser = TextParser::new(tokens, &mut ast, &options, &environment);
            for _ in 0..warmup * 3 {
                parser.step().unwrap();
            }
            let before = parser_state(&parser);

            // a footnote mention, then the space before the unmatched `*`
            let rules: [Rule<TextParser>; 2] = [TextParser::macro_call, TextParser::word];
            for _ in 0..repeats {
                let outcome = parser.attempt(|p| -> RuleResult<()> {
                    for rule in &rules[..consumed] {
                        rule(p)?;
                    }
                    TextParser::style(p)
                });
                prop_assert!(matches!(outcome, Ok(None)));
                prop_assert_eq!(parser_state(&parser), before.clone());
            }
        }
    }

    #[test]
    fn test_macro_without_adjacent_arguments_leaves_no_trace() {
        let mut ast = Ast::new();
        let options = ParserOptions::new().with_reader(MemoryReader::new());
        let environment = Environment::new();
        let tokens = TextLexer::new("[x] (y)", Context::default()).tokenize().unwrap();
        let mut parser = TextParser::new(tokens, &mut ast, &options, &environment);
        let before = parser_state(&parser);

        for _ in 0..3 {
            assert!(matches!(parser.attempt(TextParser::macro_call), Ok(None)));
            assert_eq!(parser_state(&parser), before);
        }
        parser.parse().unwrap();
        let output = parser.finish();
        assert_eq!(ast.plain_text(output.nodes[0]), "[x] (y)");
    }

    #[test]
    fn test_unknown_macro_keeps_its_arguments() {
        let (ast, nodes) = parse("[abbr](HTML, title=HyperText)");

        assert_eq!(
            ast.kind(nodes[0]),
            &NodeKind::Macro {
                name: "abbr".to_string()
            }
        );
        assert_eq!(ast.info(nodes[0]).args, vec!["HTML"]);
        assert_eq!(
            ast.info(nodes[0]).kwargs.get("title").map(String::as_str),
            Some("HyperText")
        );
    }

    #[test]
    fn test_custom_macro_handler() {
        fn shout(call: &MacroCall, ast: &mut Ast) -> Result<NodeId, MauError> {
            let text = call.arguments.positional(0).unwrap_or_default();
            Ok(ast.add(NodeKind::text(text.to_uppercase())))
        }

        let mut ast = Ast::new();
        let options = ParserOptions::new().register_macro("shout", shout);
        let output = parse_inline(
            "[shout](hey)",
            Context::default(),
            &mut ast,
            &options,
            &Environment::new(),
        )
        .unwrap();

        assert_eq!(ast.plain_text(output.nodes[0]), "HEY");
    }

    #[test]
    fn test_square_brackets_without_call_are_text() {
        let (ast, nodes) = parse("[not a macro] (really)");

        assert_eq!(tags(&ast, &nodes), vec!["text"]);
        assert_eq!(ast.plain_text(nodes[0]), "[not a macro] (really)");
    }

    #[test]
    fn test_variables_are_substituted_first() {
        let mut environment = Environment::new();
        environment.set("site", "https://mau.org");

        let (ast, output) = parse_with("[link]({site})", &environment);
        assert_eq!(ast.plain_text(output.nodes[0]), "https://mau.org");
    }

    #[test]
    fn test_missing_macro_argument_is_fatal() {
        let mut ast = Ast::new();
        let result = parse_inline(
            "[image]()",
            Context::default(),
            &mut ast,
            &ParserOptions::new(),
            &Environment::new(),
        );

        assert!(result.is_err());
    }
}
