//! Error types for the engine crate.

/// Errors that abort a differencing run.
///
/// Neither variant carries a partial result: a failed run constructs no
/// caller-visible output.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The cancellation token was observed set during traversal.
    #[error("operation cancelled")]
    Cancelled,

    /// A position had no input on any side that counts for the mode
    /// (left and right in two-way, all three in three-way). This is a
    /// caller or collaborator bug, not a recoverable condition.
    #[error("comparison position has no input on any side (three_way = {three_way})")]
    EmptyPosition { three_way: bool },
}

/// Convenience alias for engine results.
pub type DiffResult<T> = Result<T, DiffError>;
