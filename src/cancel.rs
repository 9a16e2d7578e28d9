use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token for cooperative cancellation of a backward scan
///
/// Cloning a CancelToken creates a new handle to the same underlying
/// cancellation state. When any handle calls `cancel()`, all handles
/// will observe `is_cancelled() == true`.
#[derive(Clone, Debug)]
pub struct CancelToken {
    /// Shared cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new cancellation token
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation
    ///
    /// This is a non-blocking operation. The scan being cancelled
    /// checks `is_cancelled()` at the start of each pull and before
    /// each line extraction, and stops when true.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
