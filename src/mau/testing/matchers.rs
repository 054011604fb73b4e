//! Text matching utilities for AST assertions

use regex::Regex;

/// Text matching strategies for assertions
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Exact text match
    Exact(String),
    /// Text starts with prefix
    StartsWith(String),
    /// Text contains substring
    Contains(String),
    /// Text matches a regular expression
    Pattern(Regex),
}

impl TextMatch {
    /// Build a [`TextMatch::Pattern`]. Panics on an invalid expression, this is test code.
    pub fn pattern(expression: &str) -> Self {
        TextMatch::Pattern(Regex::new(expression).unwrap())
    }

    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix),
            TextMatch::Contains(substring) => actual.contains(substring),
            TextMatch::Pattern(pattern) => pattern.is_match(actual),
        }
    }

    fn describe(&self) -> String {
        match self {
            TextMatch::Exact(expected) => format!("to be '{}'", expected),
            TextMatch::StartsWith(prefix) => format!("to start with '{}'", prefix),
            TextMatch::Contains(substring) => format!("to contain '{}'", substring),
            TextMatch::Pattern(pattern) => format!("to match /{}/", pattern),
        }
    }

    /// Assert that the actual text matches this pattern
    pub fn assert(&self, actual: &str, context: &str) {
        assert!(
            self.matches(actual),
            "{}: Expected text {}, but got '{}'",
            context,
            self.describe(),
            actual
        );
    }
}

impl From<&str> for TextMatch {
    fn from(expected: &str) -> Self {
        TextMatch::Exact(expected.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(expected: String) -> Self {
        TextMatch::Exact(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies() {
        assert!(TextMatch::from("abc").matches("abc"));
        assert!(TextMatch::StartsWith("ab".into()).matches("abc"));
        assert!(TextMatch::Contains("b".into()).matches("abc"));
        assert!(TextMatch::pattern(r"^a.c$").matches("abc"));
        assert!(!TextMatch::from("abc").matches("abcd"));
    }

    #[test]
    #[should_panic(expected = "items[0]: Expected text to start with 'x', but got 'abc'")]
    fn test_assert_reports_context() {
        TextMatch::StartsWith("x".into()).assert("abc", "items[0]");
    }
}
