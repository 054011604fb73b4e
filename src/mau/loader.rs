//! Document loading utilities
//!
//! This module provides `DocumentLoader` - a utility for loading Mau source from files or
//! strings and running the pipeline on it. It is used by the CLI and by tests.
//!
//! # Example
//!
//! ```text
//! // From file, includes resolved next to the file
//! let compilation = DocumentLoader::from_path("docs/index.mau")?.parse()?;
//!
//! // From string, with a configured environment
//! let compilation = DocumentLoader::from_string("= Title\n")
//!     .with_environment(config::load_defaults()?)
//!     .parse()?;
//! ```

use crate::mau::environment::Environment;
use crate::mau::error::MauError;
use crate::mau::lexing::BlockLexer;
use crate::mau::options::ParserOptions;
use crate::mau::parsing::{parse_tokens, Compilation};
use crate::mau::reader::FsReader;
use crate::mau::token::{Context, Token};
use std::fs;
use std::path::Path;

/// Source text plus everything a compile needs besides it
pub struct DocumentLoader {
    source: String,
    origin: Option<String>,
    environment: Environment,
    options: ParserOptions,
}

impl DocumentLoader {
    /// Load from a file path. Includes are read relative to the file's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MauError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| MauError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let options = match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => {
                ParserOptions::new().with_reader(FsReader::with_base(base))
            }
            _ => ParserOptions::new(),
        };
        Ok(DocumentLoader {
            source,
            origin: Some(path.display().to_string()),
            environment: Environment::new(),
            options,
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            origin: None,
            environment: Environment::new(),
            options: ParserOptions::new(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Context of the first character, carrying the file name when there is one
    fn context(&self) -> Context {
        match &self.origin {
            Some(origin) => Context::with_source(origin.clone()),
            None => Context::default(),
        }
    }

    /// Block level tokens, includes expanded
    pub fn tokenize(&self) -> Result<Vec<Token>, MauError> {
        BlockLexer::new(&self.source, self.context(), &self.options).tokenize()
    }

    /// Run the whole pipeline
    pub fn parse(&self) -> Result<Compilation, MauError> {
        let tokens = self.tokenize()?;
        parse_tokens(tokens, self.environment.clone(), &self.options)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mau::ast::{NodeKind, CONTENT};
    use crate::mau::reader::MemoryReader;
    use crate::mau::token::TokenKind;

    #[test]
    fn test_from_string_parses() {
        let compilation = DocumentLoader::from_string("= Title\n\nHello").parse().unwrap();
        let content = compilation.ast.children_at(compilation.document, CONTENT);

        assert_eq!(content.len(), 2);
        assert_eq!(compilation.toc.len(), 1);
    }

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = DocumentLoader::from_string("Hello").tokenize().unwrap();
        assert!(tokens.last().unwrap().is(TokenKind::Eof));
    }

    #[test]
    fn test_environment_is_used() {
        let mut environment = Environment::new();
        environment.set("mau.parser.wrap_document", false);
        let compilation = DocumentLoader::from_string("Hello")
            .with_environment(environment)
            .parse()
            .unwrap();

        assert_eq!(compilation.ast.kind(compilation.document), &NodeKind::Container);
    }

    #[test]
    fn test_options_are_used() {
        let options =
            ParserOptions::new().with_reader(MemoryReader::new().with_file("part.mau", "Included"));
        let compilation = DocumentLoader::from_string("::#include:part.mau")
            .with_options(options)
            .parse()
            .unwrap();

        assert_eq!(compilation.ast.plain_text(compilation.document), "Included");
    }

    #[test]
    fn test_missing_file() {
        let result = DocumentLoader::from_path("does/not/exist.mau");
        assert!(matches!(result, Err(MauError::Io { .. })));
    }
}
