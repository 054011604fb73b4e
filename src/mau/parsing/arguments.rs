//! Arguments parser
//!
//!     Parses comma separated argument lists, as found in attribute lines, commands, macros
//!     and attached content. Each item is one of:
//!
//!         value           unnamed argument
//!         "quoted value"  unnamed argument, `\"` escapes a quote
//!         key=value       named argument, the value may be quoted
//!         #tag            tag
//!         *subtype        subtype
//!
//!     Unquoted values are trimmed and may contain `\,` to escape a comma. Unnamed
//!     arguments must come before named ones.

use super::TokenCursor;
use crate::mau::ast::NodeInfo;
use crate::mau::error::{MauError, RuleError, RuleResult};
use crate::mau::lexing::ArgumentsLexer;
use crate::mau::token::{Context, Token, TokenKind};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentItem {
    Unnamed(String),
    Named(String, String),
    Tag(String),
    Subtype(String),
}

/// A parsed argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub args: Vec<String>,
    pub kwargs: BTreeMap<String, String>,
    pub tags: Vec<String>,
    pub subtype: Option<String>,
}

impl Arguments {
    /// Lex and parse an argument list
    pub fn parse(text: &str, context: Context) -> Result<Self, MauError> {
        let tokens = ArgumentsLexer::new(text, context.clone()).tokenize()?;
        let items = ArgumentsParser::new(tokens).parse()?;
        Self::from_items(items, &context)
    }

    pub fn from_items(items: Vec<ArgumentItem>, context: &Context) -> Result<Self, MauError> {
        let mut arguments = Arguments::default();
        for item in items {
            match item {
                ArgumentItem::Unnamed(value) => {
                    if !arguments.kwargs.is_empty() {
                        return Err(MauError::parser(
                            format!("Unnamed argument '{}' after named arguments", value),
                            context.clone(),
                        ));
                    }
                    arguments.args.push(value);
                }
                ArgumentItem::Named(key, value) => {
                    arguments.kwargs.insert(key, value);
                }
                ArgumentItem::Tag(tag) => arguments.tags.push(tag),
                ArgumentItem::Subtype(subtype) => arguments.subtype = Some(subtype),
            }
        }
        Ok(arguments)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
            && self.kwargs.is_empty()
            && self.tags.is_empty()
            && self.subtype.is_none()
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn named(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).map(String::as_str)
    }

    /// Named argument `key`, or else the unnamed argument at `index`
    pub fn value(&self, index: usize, key: &str) -> Option<&str> {
        self.named(key).or_else(|| self.positional(index))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn into_info(self) -> NodeInfo {
        NodeInfo {
            subtype: self.subtype,
            args: self.args,
            kwargs: self.kwargs,
            tags: self.tags,
        }
    }
}

pub struct ArgumentsParser {
    cursor: TokenCursor,
}

impl ArgumentsParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    pub fn parse(mut self) -> Result<Vec<ArgumentItem>, MauError> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.at_end() {
            return Ok(items);
        }

        loop {
            self.skip_whitespace();
            items.push(self.item()?);
            self.skip_whitespace();

            if self.cursor.peek_is(&Token::literal(",")) {
                self.cursor.advance();
                continue;
            }
            if self.at_end() {
                return Ok(items);
            }
            let token = self.cursor.peek();
            return Err(MauError::parser(
                format!("Unexpected {} in argument list", token),
                token.context.clone(),
            ));
        }
    }

    fn at_end(&self) -> bool {
        self.cursor.peek_kind(TokenKind::Eol) || self.cursor.peek_kind(TokenKind::Eof)
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.peek_kind(TokenKind::Whitespace) {
            self.cursor.advance();
        }
    }

    fn scoped<T>(&mut self, rule: fn(&mut Self) -> RuleResult<T>) -> Result<Option<T>, MauError> {
        self.cursor.enter_scope();
        let outcome = rule(self);
        self.cursor.exit_scope(outcome)
    }

    fn item(&mut self) -> Result<ArgumentItem, MauError> {
        if let Some(item) = self.scoped(Self::named)? {
            return Ok(item);
        }
        if let Some(value) = self.scoped(Self::quoted)? {
            return Ok(ArgumentItem::Unnamed(value));
        }

        let context = self.cursor.peek().context.clone();
        let value = self.unquoted();
        if let Some(tag) = value.strip_prefix('#').filter(|tag| !tag.is_empty()) {
            return Ok(ArgumentItem::Tag(tag.to_string()));
        }
        if let Some(subtype) = value.strip_prefix('*').filter(|s| !s.is_empty()) {
            return Ok(ArgumentItem::Subtype(subtype.to_string()));
        }
        if value.is_empty() {
            return Err(MauError::parser("Empty argument", context));
        }
        Ok(ArgumentItem::Unnamed(value))
    }

    fn named(&mut self) -> RuleResult<ArgumentItem> {
        let key = self.cursor.expect(TokenKind::Text, None)?.value;
        self.skip_whitespace();
        self.cursor.expect(TokenKind::Literal, Some("="))?;
        self.skip_whitespace();

        let value = if self.cursor.peek_is(&Token::literal("\"")) {
            self.quoted()?
        } else {
            self.unquoted()
        };
        Ok(ArgumentItem::Named(key, value))
    }

    fn quoted(&mut self) -> RuleResult<String> {
        let open = self.cursor.expect(TokenKind::Literal, Some("\""))?;
        let mut value = String::new();

        loop {
            let token = self.cursor.advance();
            match (token.kind, token.value.as_str()) {
                (TokenKind::Literal, "\"") => break,
                (TokenKind::Literal, "\\") => {
                    let escaped = self.cursor.peek();
                    if escaped.is(TokenKind::Eol) || escaped.is(TokenKind::Eof) {
                        value.push('\\');
                    } else {
                        value.push_str(&self.cursor.advance().value);
                    }
                }
                (TokenKind::Eol, _) | (TokenKind::Eof, _) => {
                    return Err(RuleError::Fatal(MauError::parser(
                        "Unterminated quoted argument",
                        open.context,
                    )))
                }
                _ => value.push_str(&token.value),
            }
        }

        // A quoted value must be the whole item
        self.skip_whitespace();
        if !(self.at_end() || self.cursor.peek_is(&Token::literal(","))) {
            return Err(RuleError::Mismatch);
        }
        Ok(value)
    }

    fn unquoted(&mut self) -> String {
        let mut value = String::new();
        loop {
            let token = self.cursor.peek();
            if self.at_end() || Token::literal(",").accepts(token) {
                break;
            }
            let token = self.cursor.advance();
            if token.kind == TokenKind::Literal && token.value == "\\" {
                let next = self.cursor.peek();
                let escapable = next.kind == TokenKind::Literal
                    && matches!(next.value.as_str(), "," | "\"" | "\\");
                if escapable {
                    value.push_str(&self.cursor.advance().value);
                    continue;
                }
            }
            value.push_str(&token.value);
        }
        value.trim().to_string()
    }
}
