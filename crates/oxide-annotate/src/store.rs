//! Reading and writing source files.

use std::path::Path;

use crate::error::{AnnotateError, Result};

/// Storage the annotator reads files from and writes them back to.
pub trait SourceStore {
    /// Reads the full text of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::Io`] if the file cannot be read.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replaces the content of `path`. Line endings in `content` are written
    /// as given.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::Io`] if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// [`SourceStore`] backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    /// Creates a file system store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SourceStore for FsStore {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| AnnotateError::io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content.as_bytes()).map_err(|e| AnnotateError::io(path, e))
    }
}
