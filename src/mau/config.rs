//! Configuration loader
//!
//!     `defaults/mau.default.toml` is embedded into the crate so that the documented defaults
//!     and the runtime behavior stay in sync. Callers layer their own files and `key=value`
//!     overrides on top through [`Loader`], and get back the [`Environment`] a compile starts
//!     from.
//!
//!         let environment = Loader::new()
//!             .with_optional_file("mau.toml")
//!             .set_override("mau.parser.wrap_document", false)?
//!             .build()?;

use crate::mau::environment::{Environment, Value};
use crate::mau::error::MauError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/mau.default.toml");

impl From<ConfigError> for MauError {
    fn from(err: ConfigError) -> Self {
        MauError::Config(err.to_string())
    }
}

/// Helper for layering user configuration over the built-in defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files are an error at build time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may be absent
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, mostly useful in tests
    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, MauError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply a `key=value` override as typed on a command line
    pub fn set_assignment(self, assignment: &str) -> Result<Self, MauError> {
        let (key, value) = parse_assignment(assignment)?;
        self.set_override(key, scalar(value))
    }

    /// Finalize the layers into a parser environment
    pub fn build(self) -> Result<Environment, MauError> {
        let root: BTreeMap<String, Value> = self.builder.build()?.try_deserialize()?;
        Ok(Environment::from_map(root))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment holding only the embedded defaults
pub fn load_defaults() -> Result<Environment, MauError> {
    Loader::new().build()
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str), MauError> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(MauError::Config(format!(
            "Invalid override '{}', expected key=value",
            assignment
        ))),
    }
}

/// Typed value of an override: booleans and integers are recognized, the rest is text
fn scalar(value: &str) -> ValueKind {
    match value {
        "true" => ValueKind::Boolean(true),
        "false" => ValueKind::Boolean(false),
        _ => match value.parse::<i64>() {
            Ok(number) => ValueKind::I64(number),
            Err(_) => ValueKind::String(value.to_string()),
        },
    }
}
