//! Format registry for AST serialization
//!
//! Each output format implements [`Formatter`] and is looked up by name in a
//! [`FormatRegistry`]. The CLI's `--format` flag goes through the registry.

use crate::mau::ast::{Ast, NodeId};
use crate::mau::error::MauError;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<FormatError> for MauError {
    fn from(err: FormatError) -> Self {
        MauError::Config(err.to_string())
    }
}

/// Serializes the subtree rooted at a node
pub trait Formatter: Send + Sync {
    /// The name of this format, as given to `--format`
    fn name(&self) -> &str;

    fn serialize(&self, ast: &Ast, root: NodeId) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any formatter with the same name
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize a subtree using the named format
    pub fn serialize(&self, ast: &Ast, root: NodeId, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(ast, root)
    }

    /// All available format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry.register(super::TreevizFormatter);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mau::ast::NodeKind;

    struct TestFormatter;
    impl Formatter for TestFormatter {
        fn name(&self) -> &str {
            "test"
        }
        fn serialize(&self, ast: &Ast, root: NodeId) -> Result<String, FormatError> {
            Ok(ast.node(root).tag().to_string())
        }
    }

    fn document() -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let root = ast.add(NodeKind::Document);
        (ast, root)
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormatter);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormatter);
        let (ast, root) = document();

        assert_eq!(registry.serialize(&ast, root, "test").unwrap(), "document");
    }

    #[test]
    fn test_registry_serialize_not_found() {
        let registry = FormatRegistry::new();
        let (ast, root) = document();

        match registry.serialize(&ast, root, "nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected FormatNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "treeviz", "yaml"]);
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::FormatNotFound("test".to_string());
        assert_eq!(format!("{err}"), "Format 'test' not found");

        let err = FormatError::SerializationError("error".to_string());
        assert_eq!(format!("{err}"), "Serialization error: error");
    }
}
