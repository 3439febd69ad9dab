//! Structure and content collaborators for tdiff.
//!
//! The differencing engine knows nothing about files, documents, or any
//! other concrete input. It asks two questions of its caller:
//!
//! - [`StructureProvider`] -- "what are the children of this input, if any?"
//! - [`ContentEquality`] -- "do these two leaves have the same content?"
//!
//! This crate defines those seams and ships the default answers.
//!
//! # Inputs
//!
//! - [`MemNode`] -- reference-counted in-memory tree for tests and embedding
//! - [`FsNode`] -- files and directories on disk, filtered by [`FsFilter`]
//! - `String`, `&str`, `Vec<u8>` -- leaves whose content is themselves
//!
//! # Defaults
//!
//! - [`DefaultStructure`] -- asks the input via [`Structured`]; inputs that
//!   expose no child list are leaves
//! - [`StreamEquality`] -- streams both sides via [`ContentSource`] and
//!   compares bytes; unreadable content counts as absent

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod stream;
pub mod traits;

pub use config::FilterConfig;
pub use error::{StructureError, StructureResult};
pub use fs::{FsFilter, FsNode};
pub use memory::MemNode;
pub use stream::{StreamEquality, DEFAULT_BUFFER_SIZE};
pub use traits::{ContentEquality, ContentSource, DefaultStructure, Named, StructureProvider, Structured};
