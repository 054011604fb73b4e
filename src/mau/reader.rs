//! Source readers
//!
//! Includes (`::#include:path` and `<< mau:path`) never touch the filesystem directly.
//! They go through a [`SourceReader`] injected with the
//! [`ParserOptions`](crate::mau::options::ParserOptions).

use crate::mau::error::MauError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Read the text at `path`
pub trait SourceReader {
    fn read(&self, path: &str) -> Result<String, MauError>;
}

/// Reads files, relative to an optional base directory
#[derive(Debug, Clone, Default)]
pub struct FsReader {
    base: Option<PathBuf>,
}

impl FsReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl SourceReader for FsReader {
    fn read(&self, path: &str) -> Result<String, MauError> {
        let full_path = match &self.base {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        };
        fs::read_to_string(&full_path).map_err(|err| MauError::Io {
            path: full_path.display().to_string(),
            message: err.to_string(),
        })
    }
}

/// In-memory files, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl SourceReader for MemoryReader {
    fn read(&self, path: &str) -> Result<String, MauError> {
        self.files.get(path).cloned().ok_or_else(|| MauError::Io {
            path: path.to_string(),
            message: "no such file".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reader() {
        let reader = MemoryReader::new().with_file("a.mau", "= Title");

        assert_eq!(reader.read("a.mau").unwrap(), "= Title");
        assert!(matches!(reader.read("b.mau"), Err(MauError::Io { .. })));
    }

    #[test]
    fn test_fs_reader_reports_missing_files() {
        let reader = FsReader::with_base("/definitely/not/here");
        let err = reader.read("file.mau").unwrap_err();

        assert!(err.to_string().contains("file.mau"));
    }
}
