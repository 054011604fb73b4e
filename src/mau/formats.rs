//! Output format implementations for AST serialization
//!
//! This module contains the formats a compiled tree can be written in:
//! - json and yaml, dumps of the canonical snapshot (structured)
//! - treeviz, a one line per node view for humans and snapshot tests

pub mod registry;
pub mod structured;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use structured::{to_json, to_yaml, JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz, TreevizFormatter};
