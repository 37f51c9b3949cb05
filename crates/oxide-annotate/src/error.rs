//! Error types for the annotation engine.

use std::path::PathBuf;

/// Errors that can occur while annotating or deannotating files.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// A file needed rewriting while frozen mode was enabled.
    ///
    /// This aborts the whole batch; callers must not swallow it per file.
    #[error(
        "file {} needs an annotation update, but frozen mode is enabled; \
         re-run without --frozen to apply it",
        .path.display()
    )]
    Frozen {
        /// The file that would have been rewritten.
        path: PathBuf,
    },

    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file holds more than one annotation block, so there is no single
    /// region to update.
    #[error("{} contains {count} schema annotation blocks; expected at most one", .path.display())]
    MultipleRegions {
        /// The offending file.
        path: PathBuf,
        /// Number of blocks found.
        count: usize,
    },

    /// A position value could not be parsed.
    #[error("invalid position '{0}': expected before, top, after or bottom")]
    InvalidPosition(String),

    /// The region pattern could not be compiled.
    #[error("invalid annotation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file '{}': {source}", .path.display())]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl AnnotateError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error must abort the entire run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }
}

/// Result type for annotation operations.
pub type Result<T> = std::result::Result<T, AnnotateError>;
