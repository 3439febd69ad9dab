//! Hierarchical two-way and three-way differencing.
//!
//! Given an optional ancestor and a left and right input, the engine
//! classifies every corresponding position of the three trees and reports
//! the positions that differ as a pruned tree.
//!
//! A run has two passes:
//!
//! 1. [`Differencer::classify`] walks the inputs post-order and builds an
//!    immutable [`Comparison`] tree. Leaves are classified by
//!    [`classify_leaf`]; a container inherits `CHANGE` and the direction
//!    bits of its changed children.
//! 2. [`emit`] walks that tree top-down, skips unchanged subtrees, and hands
//!    each changed position to a [`ResultSink`]. The default sink is
//!    [`ResultTree`].
//!
//! # Key Types
//!
//! - [`Differencer`] / [`DiffInput`] -- Engine and the triple it compares
//! - [`Comparison`] -- Fully classified internal tree
//! - [`ResultTree`] / [`ResultNode`] / [`NodeId`] -- Default pruned output
//! - [`CancellationToken`] -- Cooperative cancellation, polled per position
//! - [`ProgressObserver`] -- Per-position progress hook
//! - [`DiffReport`] / [`DiffSummary`] -- Serialisable view of a result tree

pub mod cancel;
pub mod classify;
pub mod comparison;
pub mod differencer;
pub mod emit;
pub mod error;
pub mod progress;
pub mod report;
pub mod result;

pub use cancel::CancellationToken;
pub use classify::classify_leaf;
pub use comparison::{Comparison, Descendants};
pub use differencer::{DiffInput, Differencer};
pub use emit::{emit, FnSink, ResultSink};
pub use error::{DiffError, DiffResult};
pub use progress::{NoProgress, ProgressObserver, VisitCounter};
pub use report::{DiffReport, DiffSummary, ReportEntry};
pub use result::{NodeId, ResultNode, ResultTree, Walk};
