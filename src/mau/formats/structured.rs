//! JSON and YAML dumps
//!
//! Both serialize the [`NodeSnapshot`](crate::mau::ast::snapshot::NodeSnapshot) of the
//! root, so a renderer in another process reads the same structure the golden tests compare.

use super::registry::{FormatError, Formatter};
use crate::mau::ast::{Ast, NodeId};

pub fn to_json(ast: &Ast, root: NodeId) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&ast.snapshot(root))
        .map_err(|err| FormatError::SerializationError(err.to_string()))
}

pub fn to_yaml(ast: &Ast, root: NodeId) -> Result<String, FormatError> {
    serde_yaml::to_string(&ast.snapshot(root))
        .map_err(|err| FormatError::SerializationError(err.to_string()))
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, ast: &Ast, root: NodeId) -> Result<String, FormatError> {
        to_json(ast, root)
    }

    fn description(&self) -> &str {
        "Pretty printed JSON dump of the tree"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, ast: &Ast, root: NodeId) -> Result<String, FormatError> {
        to_yaml(ast, root)
    }

    fn description(&self) -> &str {
        "YAML dump of the tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mau::ast::snapshot::NodeSnapshot;
    use crate::mau::testing::compile_str;

    #[test]
    fn test_json_dump_loads_back() {
        let compilation = compile_str("= Title\n\nSome *bold* text");
        let json = to_json(&compilation.ast, compilation.document).unwrap();

        let snapshot: NodeSnapshot = serde_json::from_str(&json).unwrap();
        let (ast, root) = Ast::from_snapshot(&snapshot);
        assert!(ast.structurally_equal(root, &compilation.ast, compilation.document));
    }

    #[test]
    fn test_yaml_dump_loads_back() {
        let compilation = compile_str("* one\n** two");
        let yaml = to_yaml(&compilation.ast, compilation.document).unwrap();

        assert!(yaml.starts_with("type: document"));
        let snapshot: NodeSnapshot = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(snapshot, compilation.ast.snapshot(compilation.document));
    }
}
