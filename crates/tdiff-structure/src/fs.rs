//! Filesystem comparison inputs.
//!
//! A directory is a container whose children are its entries, one level
//! deep, sorted by file name. A regular file is a leaf whose byte content is
//! the file. An unfollowed symbolic link is a leaf whose content is its
//! target path.
//!
//! When links are followed, a link that resolves to a directory enclosing
//! it is reported as an unfollowed link, so cyclic trees stay finite.

use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::config::FilterConfig;
use crate::error::{StructureError, StructureResult};
use crate::traits::{ContentSource, Named, Structured};

/// Name-based exclusion of directory entries, shared by every [`FsNode`] of
/// one comparison.
#[derive(Clone, Debug)]
pub struct FsFilter {
    matcher: Gitignore,
    follow_symlinks: bool,
}

impl FsFilter {
    /// Compile the exclusion patterns of `config`.
    pub fn new(config: &FilterConfig) -> StructureResult<Self> {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in &config.exclude {
            builder
                .add_line(None, pattern)
                .map_err(|e| StructureError::Pattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
        }
        let matcher = builder.build().map_err(|e| StructureError::Pattern {
            pattern: config.exclude.join(", "),
            reason: e.to_string(),
        })?;
        Ok(Self {
            matcher,
            follow_symlinks: config.follow_symlinks,
        })
    }

    /// A filter that excludes nothing and does not follow links.
    pub fn none() -> Self {
        Self {
            matcher: Gitignore::empty(),
            follow_symlinks: false,
        }
    }

    /// Returns `true` if an entry with this name is left out.
    pub fn is_excluded(&self, name: &str, is_dir: bool) -> bool {
        self.matcher.matched(Path::new(name), is_dir).is_ignore()
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FsKind {
    File,
    Dir,
    Symlink,
}

/// Canonical paths of a directory and every directory above it, up to the
/// comparison root.
#[derive(Debug)]
struct DirChain {
    dir: PathBuf,
    parent: Option<Arc<DirChain>>,
}

impl DirChain {
    fn new(dir: PathBuf, parent: Option<Arc<DirChain>>) -> Arc<Self> {
        Arc::new(Self { dir, parent })
    }

    fn contains(&self, dir: &Path) -> bool {
        let mut link = Some(self);
        while let Some(chain) = link {
            if chain.dir == dir {
                return true;
            }
            link = chain.parent.as_deref();
        }
        false
    }
}

/// A file, directory, or link on disk.
///
/// Equality and hashing use the entry name only, so `src/lib.rs` under the
/// left root and `src/lib.rs` under the right root are one position.
#[derive(Clone, Debug)]
pub struct FsNode {
    name: String,
    path: PathBuf,
    kind: FsKind,
    filter: Arc<FsFilter>,
    /// Set for directories only.
    chain: Option<Arc<DirChain>>,
}

impl FsNode {
    /// Open a comparison root. Links at the root are always followed.
    pub fn root(path: impl AsRef<Path>, filter: Arc<FsFilter>) -> StructureResult<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| StructureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (kind, chain) = if metadata.is_dir() {
            let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            (FsKind::Dir, Some(DirChain::new(canonical, None)))
        } else {
            (FsKind::File, None)
        };
        Ok(Self {
            name,
            path: path.to_path_buf(),
            kind,
            filter,
            chain,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FsKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == FsKind::Symlink
    }
}

impl PartialEq for FsNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FsNode {}

impl Hash for FsNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Structured for FsNode {
    fn children(&self) -> Option<Vec<Self>> {
        let parent_chain = match (&self.kind, &self.chain) {
            (FsKind::Dir, Some(chain)) => chain,
            _ => return None,
        };

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.filter.follow_symlinks)
            .sort_by_file_name();

        let mut children = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type();
            let mut chain = None;
            let kind = if file_type.is_dir() {
                let canonical = if entry.path_is_symlink() {
                    fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf())
                } else {
                    parent_chain.dir.join(&name)
                };
                if parent_chain.contains(&canonical) {
                    warn!(path = %entry.path().display(), target = %canonical.display(), "not following link back into an enclosing directory");
                    FsKind::Symlink
                } else {
                    chain = Some(DirChain::new(canonical, Some(Arc::clone(parent_chain))));
                    FsKind::Dir
                }
            } else if file_type.is_symlink() {
                FsKind::Symlink
            } else {
                FsKind::File
            };
            if self.filter.is_excluded(&name, kind == FsKind::Dir) {
                trace!(name = %name, "excluded");
                continue;
            }
            children.push(FsNode {
                name,
                path: entry.into_path(),
                kind,
                filter: Arc::clone(&self.filter),
                chain,
            });
        }
        Some(children)
    }
}

impl ContentSource for FsNode {
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        match self.kind {
            FsKind::Dir => Ok(None),
            FsKind::File => Ok(Some(Box::new(File::open(&self.path)?))),
            FsKind::Symlink => {
                let target = fs::read_link(&self.path)?;
                let bytes = target.into_os_string().into_encoded_bytes();
                Ok(Some(Box::new(Cursor::new(bytes))))
            }
        }
    }
}

impl Named for FsNode {
    fn name(&self) -> &str {
        &self.name
    }
}
