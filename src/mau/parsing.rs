//! Parsing
//!
//!     This module provides the complete pipeline from source text to a resolved AST:
//!         1. Lexing: the block lexer turns the source into line level tokens, executing
//!            include directives on the way. See [lexing](crate::mau::lexing).
//!         2. Parsing: the main parser turns line tokens into nodes. Inline text is handed
//!            to the text parser, after variable substitution by the preprocess parser.
//!            Block contents are handed to nested main parsers. See [main].
//!         3. Resolution: footnotes, references and headers collected while parsing are
//!            numbered, anchored and turned into entry lists. See
//!            [resolution](crate::mau::resolution).
//!
//! Backtracking
//!
//!     All parsers are recursive descent parsers over a [`TokenCursor`]. A rule either
//!     matches, or fails with [`RuleError::Mismatch`], or aborts the compile with a fatal
//!     error. Rules are always run through [`Backtrack::attempt`], which snapshots the
//!     parser before the rule and restores the snapshot on a mismatch. A rule that does not
//!     match therefore leaves no trace: the cursor, the arena, the collected nodes and the
//!     footnote, reference and header registrations are all as they were before.
//!
//!     The same discipline is available directly on the cursor through
//!     [`TokenCursor::enter_scope`] and [`TokenCursor::exit_scope`], for parsers whose only
//!     state is the cursor.
//!
//! Loop Guard
//!
//!     As in the lexer, every step of a parser must consume a token. A step that leaves the
//!     cursor on the same token fails with [`MauError::LoopDetected`].

pub mod aliases;
pub mod arguments;
pub mod engines;
pub mod main;
pub mod preprocess;
pub mod source;
pub mod text;

pub use arguments::{ArgumentItem, Arguments};
pub use main::MainParser;
pub use text::TextParser;

use crate::mau::ast::{Ast, NodeId, NodeKind, CONTENT};
use crate::mau::environment::Environment;
use crate::mau::error::{MauError, RuleError, RuleResult};
use crate::mau::lexing::BlockLexer;
use crate::mau::options::ParserOptions;
use crate::mau::token::{Context, Token, TokenKind};
use log::{debug, trace};

/// Token list with a cursor and a stack of saved positions
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
    scopes: Vec<usize>,
}

impl TokenCursor {
    /// The list always ends with `EOF`, one is appended when missing
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.is(TokenKind::Eof)) {
            let context = tokens
                .last()
                .map(|token| token.context.clone())
                .unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", context));
        }
        Self {
            tokens,
            index: 0,
            scopes: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn set_position(&mut self, index: usize) {
        self.index = index.min(self.tokens.len() - 1);
    }

    pub fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Token `offset` positions ahead, `EOF` past the end
    pub fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + offset).min(last)]
    }

    pub fn peek_is(&self, pattern: &Token) -> bool {
        pattern.accepts(self.peek())
    }

    pub fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    pub fn at_eof(&self) -> bool {
        self.peek_kind(TokenKind::Eof)
    }

    /// Return the current token and move past it. The cursor never moves past `EOF`.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is(TokenKind::Eof) {
            self.index += 1;
        }
        token
    }

    /// Consume a token of the given kind (and value), or fail with a mismatch
    pub fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> RuleResult<Token> {
        let token = self.peek();
        if token.kind != kind || value.is_some_and(|value| token.value != value) {
            return Err(RuleError::Mismatch);
        }
        Ok(self.advance())
    }

    /// Like [`TokenCursor::expect`], but a failure is fatal
    pub fn force(&mut self, kind: TokenKind, value: Option<&str>, message: &str) -> RuleResult<Token> {
        match self.expect(kind, value) {
            Ok(token) => Ok(token),
            Err(_) => {
                let found = self.peek();
                Err(MauError::parser(
                    format!("{} (found {})", message, found),
                    found.context.clone(),
                )
                .into())
            }
        }
    }

    /// Consume tokens up to, and not including, the first one accepted by a stop pattern.
    ///
    /// `EOF` always stops. A `\` literal followed by a stop token escapes it: the stop
    /// token is collected, and the backslash is kept only when `preserve_escaped_stop`
    /// is set.
    pub fn collect(&mut self, stops: &[Token], preserve_escaped_stop: bool) -> Vec<Token> {
        let is_stop = |token: &Token| stops.iter().any(|stop| stop.accepts(token));
        let mut collected = Vec::new();

        loop {
            let token = self.peek();
            if token.is(TokenKind::Eof) || is_stop(token) {
                return collected;
            }
            if token.kind == TokenKind::Literal && token.value == "\\" && is_stop(self.peek_at(1))
            {
                let escape = self.advance();
                if preserve_escaped_stop {
                    collected.push(escape);
                }
            }
            collected.push(self.advance());
        }
    }

    /// [`TokenCursor::collect`] joined into a string
    pub fn collect_join(&mut self, stops: &[Token], preserve_escaped_stop: bool) -> String {
        join_tokens(&self.collect(stops, preserve_escaped_stop))
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(self.index);
    }

    /// Close the innermost scope. A mismatch rewinds the cursor to where the scope was
    /// entered and is swallowed; success and fatal errors keep the cursor where it is.
    pub fn exit_scope<T>(&mut self, outcome: RuleResult<T>) -> Result<Option<T>, MauError> {
        let start = self.scopes.pop().unwrap_or(self.index);
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(RuleError::Mismatch) => {
                self.index = start;
                Ok(None)
            }
            Err(RuleError::Fatal(err)) => Err(err),
        }
    }
}

/// Values of `tokens` concatenated, `EOL` read as a space
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token.kind {
            TokenKind::Eol => " ",
            _ => token.value.as_str(),
        })
        .collect()
}

/// Transactional rollback of a parser's state
pub trait Backtrack {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;
    fn restore(&mut self, checkpoint: Self::Checkpoint);

    /// Run `rule`. On a mismatch the state is restored and `None` is returned.
    fn attempt<T, F>(&mut self, rule: F) -> Result<Option<T>, MauError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> RuleResult<T>,
    {
        let checkpoint = self.checkpoint();
        match rule(self) {
            Ok(value) => Ok(Some(value)),
            Err(RuleError::Mismatch) => {
                self.restore(checkpoint);
                Ok(None)
            }
            Err(RuleError::Fatal(err)) => Err(err),
        }
    }
}

impl Backtrack for TokenCursor {
    type Checkpoint = usize;

    fn checkpoint(&self) -> usize {
        self.index
    }

    fn restore(&mut self, checkpoint: usize) {
        self.index = checkpoint;
    }
}

/// A grammar rule of parser `P`
pub type Rule<P> = fn(&mut P) -> RuleResult<()>;

pub trait Parser: Backtrack + Sized {
    fn cursor(&self) -> &TokenCursor;

    /// Run the first matching rule at the current position and return its name
    fn step(&mut self) -> Result<&'static str, MauError>;
}

/// Try `rules` in order and run the first one that matches. Fatal if none does.
pub fn first_rule<P: Parser>(
    parser: &mut P,
    rules: &[(&'static str, Rule<P>)],
) -> Result<&'static str, MauError> {
    for &(name, rule) in rules {
        trace!("trying {} at {}", name, parser.cursor().peek().context);
        if parser.attempt(rule)?.is_some() {
            return Ok(name);
        }
    }
    let token = parser.cursor().peek();
    Err(MauError::parser(
        format!("Cannot parse token {}", token),
        token.context.clone(),
    ))
}

/// Step the parser until the cursor reaches `EOF`
pub fn run<P: Parser>(parser: &mut P) -> Result<(), MauError> {
    while !parser.cursor().at_eof() {
        let position = parser.cursor().position();
        let token = parser.cursor().peek().clone();
        parser.step()?;
        if parser.cursor().position() == position && parser.cursor().peek().matches(&token) {
            return Err(MauError::LoopDetected {
                context: token.context,
            });
        }
    }
    Ok(())
}

/// Output of a complete compile
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ast: Ast,
    /// Root node, `document` or `container` depending on `mau.parser.wrap_document`
    pub document: NodeId,
    /// Footnote entries in mention order
    pub footnotes: Vec<NodeId>,
    /// Reference entries in mention order
    pub references: Vec<NodeId>,
    /// Top level TOC entries
    pub toc: Vec<NodeId>,
    /// Environment after parsing, document variables included
    pub environment: Environment,
}

/// Compile in-memory source text
pub fn parse_document(
    source: &str,
    environment: Environment,
    options: &ParserOptions,
) -> Result<Compilation, MauError> {
    parse_source(source, Context::default(), environment, options)
}

/// Compile source text whose positions start at `context`
pub fn parse_source(
    source: &str,
    context: Context,
    environment: Environment,
    options: &ParserOptions,
) -> Result<Compilation, MauError> {
    let tokens = BlockLexer::new(source, context, options).tokenize()?;
    parse_tokens(tokens, environment, options)
}

/// Parse block level tokens and run the resolution passes
pub fn parse_tokens(
    tokens: Vec<Token>,
    environment: Environment,
    options: &ParserOptions,
) -> Result<Compilation, MauError> {
    let mut ast = Ast::new();

    let mut parser = MainParser::new(tokens, &mut ast, options, environment)?;
    parser.parse()?;
    let output = parser.finish();

    debug!("resolving {} top level nodes", output.nodes.len());
    let resolved = output.collections.resolve(&mut ast)?;

    let root_kind = if output.environment.flag("mau.parser.wrap_document", true) {
        NodeKind::Document
    } else {
        NodeKind::Container
    };
    let document = ast.add(root_kind);
    ast.add_children(document, output.nodes, CONTENT);

    Ok(Compilation {
        ast,
        document,
        footnotes: resolved.footnotes,
        references: resolved.references,
        toc: resolved.toc,
        environment: output.environment,
    })
}
