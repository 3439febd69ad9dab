//! Error types for the structure crate.

use std::path::PathBuf;

/// Errors that can occur while building comparison inputs.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// An exclusion pattern could not be compiled.
    #[error("invalid exclude pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// A filter configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A comparison root could not be opened.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for structure results.
pub type StructureResult<T> = Result<T, StructureError>;
