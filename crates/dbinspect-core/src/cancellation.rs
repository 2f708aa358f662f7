//! Cooperative cancellation token with parent/child propagation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can be asked to stop.
pub trait Cancellable {
    /// Check if cancellation has been requested.
    fn is_cancelled(&self) -> bool;

    /// Request cancellation.
    fn cancel(&self);
}

/// Cooperative cancellation token wrapping shared `AtomicBool`s.
///
/// A token created with [`CancellationToken::child`] observes its own flag and
/// every ancestor's flag. Cancelling a child leaves the parent untouched.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled).
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            ancestors: Vec::new(),
        }
    }

    /// Derive a token that is cancelled when either it or `self` is cancelled.
    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.cancelled));
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            ancestors,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.ancestors.iter().any(|flag| flag.load(Ordering::Relaxed))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
