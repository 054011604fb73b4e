//! Variable substitution
//!
//!     Runs once over inline text before the text lexer sees it. `{name}` is replaced by
//!     the value of `name` in the environment, everything else is copied through:
//!
//!         - `\{` and `\}` stay escaped, the text parser removes the backslash later
//!         - backtick spans are copied untouched, so verbatim text can show `{name}`
//!         - braces that do not enclose a valid variable name are plain text
//!
//!     A valid name that is not defined is a fatal error.

use super::{first_rule, run, Backtrack, Parser, TokenCursor};
use crate::mau::environment::Environment;
use crate::mau::error::{MauError, RuleError, RuleResult};
use crate::mau::lexing::PreprocessLexer;
use crate::mau::token::{Context, Token, TokenKind};

/// Replace variables in `text`
pub fn substitute(
    text: &str,
    context: Context,
    environment: &Environment,
) -> Result<String, MauError> {
    if !text.contains('{') {
        return Ok(text.to_string());
    }
    let tokens = PreprocessLexer::new(text, context).tokenize()?;
    let mut parser = PreprocessParser::new(tokens, environment);
    run(&mut parser)?;
    Ok(parser.output)
}

pub struct PreprocessParser<'a> {
    cursor: TokenCursor,
    environment: &'a Environment,
    output: String,
}

impl<'a> PreprocessParser<'a> {
    pub fn new(tokens: Vec<Token>, environment: &'a Environment) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            environment,
            output: String::new(),
        }
    }

    fn escape(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Literal, Some("\\"))?;
        let escaped = self.cursor.expect(TokenKind::Literal, None)?;
        self.output.push('\\');
        self.output.push_str(&escaped.value);
        Ok(())
    }

    fn verbatim(&mut self) -> RuleResult<()> {
        self.cursor.expect(TokenKind::Literal, Some("`"))?;
        let content = self.cursor.collect(
            &[Token::literal("`"), Token::kind(TokenKind::Eol)],
            true,
        );
        self.cursor.expect(TokenKind::Literal, Some("`"))?;

        self.output.push('`');
        content
            .iter()
            .for_each(|token| self.output.push_str(&token.value));
        self.output.push('`');
        Ok(())
    }

    fn variable(&mut self) -> RuleResult<()> {
        let open = self.cursor.expect(TokenKind::Literal, Some("{"))?;
        let name = self
            .cursor
            .collect_join(&[Token::literal("}"), Token::kind(TokenKind::Eol)], false);
        self.cursor.expect(TokenKind::Literal, Some("}"))?;

        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
        if !valid {
            return Err(RuleError::Mismatch);
        }

        let value = self.environment.get(&name).map_err(|_| {
            MauError::parser(
                format!("Variable '{}' has not been defined", name),
                open.context.clone(),
            )
        })?;
        let text = value.as_text().ok_or_else(|| {
            MauError::parser(
                format!("Variable '{}' is a namespace", name),
                open.context.clone(),
            )
        })?;
        self.output.push_str(&text);
        Ok(())
    }

    fn character(&mut self) -> RuleResult<()> {
        let token = self.cursor.advance();
        match token.kind {
            TokenKind::Eol if !self.cursor.at_eof() => self.output.push('\n'),
            TokenKind::Eol | TokenKind::Eof => {}
            _ => self.output.push_str(&token.value),
        }
        Ok(())
    }
}

impl Backtrack for PreprocessParser<'_> {
    type Checkpoint = (usize, usize);

    fn checkpoint(&self) -> Self::Checkpoint {
        (self.cursor.position(), self.output.len())
    }

    fn restore(&mut self, (position, length): Self::Checkpoint) {
        self.cursor.set_position(position);
        self.output.truncate(length);
    }
}

impl Parser for PreprocessParser<'_> {
    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn step(&mut self) -> Result<&'static str, MauError> {
        first_rule(
            self,
            &[
                ("escape", Self::escape),
                ("verbatim", Self::verbatim),
                ("variable", Self::variable),
                ("character", Self::character),
            ],
        )
    }
}
