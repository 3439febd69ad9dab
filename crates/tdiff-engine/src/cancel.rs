use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{DiffError, DiffResult};

/// Cooperative cancellation flag for a differencing run.
///
/// Clones share the same flag, so a token can be handed to another thread
/// and cancelled from there. The engine polls it once per visited position.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(DiffError::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> DiffResult<()> {
        if self.is_cancelled() {
            Err(DiffError::Cancelled)
        } else {
            Ok(())
        }
    }
}
