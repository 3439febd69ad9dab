//! Foundation types for tdiff.
//!
//! This crate provides the value types shared by the structure collaborators,
//! the differencing engine, and the CLI. Every other tdiff crate depends on
//! `tdiff-types`.
//!
//! # Key Types
//!
//! - [`ChangeCode`] -- Bitset classifying how a compared position differs
//! - [`ChangeKind`] -- The change-type field (addition, deletion, change)
//! - [`Direction`] -- The three-way direction field (left, right, conflicting)
//! - [`Side`] -- Names one of the ancestor/left/right inputs

pub mod code;
pub mod error;
pub mod side;

pub use code::{ChangeCode, ChangeKind, Direction};
pub use error::TypeError;
pub use side::Side;
