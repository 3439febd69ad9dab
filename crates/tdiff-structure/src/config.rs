use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StructureError, StructureResult};
use crate::stream::DEFAULT_BUFFER_SIZE;

/// Configuration for filesystem comparison inputs.
///
/// Read from TOML, for example:
///
/// ```toml
/// exclude = [".git/", "target/", "*.class"]
/// follow_symlinks = false
/// buffer_size = 65536
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Entry names to leave out of the comparison, in gitignore syntax.
    /// Patterns are matched against the entry name only; a trailing `/`
    /// restricts a pattern to directories and `!` re-includes.
    pub exclude: Vec<String>,
    /// Whether symbolic links are followed when listing directories.
    pub follow_symlinks: bool,
    /// Bytes read per chunk when comparing file contents.
    pub buffer_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude: vec![".git/".into()],
            follow_symlinks: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FilterConfig {
    /// A configuration that excludes nothing.
    pub fn unfiltered() -> Self {
        Self {
            exclude: Vec::new(),
            ..Default::default()
        }
    }

    /// Append an exclusion pattern.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> StructureResult<Self> {
        toml::from_str(text).map_err(|e| StructureError::Config(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> StructureResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StructureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
