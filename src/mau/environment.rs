//! Hierarchical, dot-addressed namespace
//!
//!     The environment holds both the configuration supplied before parsing starts and the
//!     variables declared in the document with `:name:value`. Keys are dot separated paths,
//!     `set("a.b.c", v)` creates the intermediate maps, `get("a.b.c")` walks them.

use crate::mau::error::MauError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored in the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::Text(text) => match text.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Text rendering used by variable substitution. Maps have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Map(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// List items as strings. A scalar counts as a one item list.
    pub fn as_string_list(&self) -> Vec<String> {
        match self {
            Value::List(items) => items.iter().filter_map(Value::as_text).collect(),
            Value::Map(_) => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Text(text) => write!(f, "{}", text),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "{}", rendered.join(", "))
            }
            Value::Map(map) => write!(f, "<namespace with {} keys>", map.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    root: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(root: BTreeMap<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Store a value, creating intermediate namespaces. A scalar found on the way is
    /// replaced by a namespace.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let segments: Vec<&str> = key.split('.').collect();
        let (last, path) = match segments.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current = &mut self.root;
        for segment in path {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Map(BTreeMap::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(BTreeMap::new());
            }
            current = match entry {
                Value::Map(map) => map,
                _ => unreachable!("entry was just turned into a namespace"),
            };
        }
        current.insert(last.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Result<&Value, MauError> {
        self.lookup(key).ok_or_else(|| MauError::VariableNotFound {
            key: key.to_string(),
        })
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.lookup(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Boolean flag with a default for missing or non boolean values
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.lookup(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// A new environment rooted at `prefix`. Missing or scalar prefixes give an empty one.
    pub fn get_namespace(&self, prefix: &str) -> Environment {
        match self.lookup(prefix) {
            Some(Value::Map(map)) => Environment::from_map(map.clone()),
            _ => Environment::new(),
        }
    }

    /// Deep merge of `other` into `self`. Values from `other` win.
    pub fn update(&mut self, other: &Environment) {
        merge_maps(&mut self.root, &other.root);
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }
}

fn merge_maps(target: &mut BTreeMap<String, Value>, source: &BTreeMap<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => merge_maps(existing, incoming),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
