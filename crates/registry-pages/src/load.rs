//! Load generations
//!
//! A controller issues a [`LoadTicket`] when a load starts and checks it before
//! applying the result. Leaving the page bumps the generation, so results of
//! loads started earlier are discarded. The page keeps its data and goes back
//! to the [`LoadState`] it had before the discarded load began.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Progress of a page's list load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded yet
    #[default]
    Idle,
    /// Load in progress
    Loading,
    /// Last load applied
    Ready,
    /// Last load failed; previous list kept
    Failed,
}

/// Generation counter of one controller
#[derive(Debug, Clone, Default)]
pub struct LoadGuard {
    generation: Arc<AtomicU64>,
}

/// Proof that a load started in a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be checked before applying a load result"]
pub struct LoadTicket {
    generation: u64,
}

impl LoadGuard {
    /// Create guard at generation zero
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load in the current generation
    pub fn begin(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Whether a ticket still belongs to the current generation
    #[inline]
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Invalidate every ticket issued so far
    pub fn leave(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(generation = previous + 1, "page left, pending loads discarded");
    }

    /// Handle that can invalidate tickets while the controller is borrowed
    #[inline]
    #[must_use]
    pub fn handle(&self) -> LeaveHandle {
        LeaveHandle {
            generation: Arc::clone(&self.generation),
        }
    }
}

/// Detached trigger for [`LoadGuard::leave`]
#[derive(Debug, Clone)]
pub struct LeaveHandle {
    generation: Arc<AtomicU64>,
}

impl LeaveHandle {
    /// Invalidate every ticket issued so far
    pub fn leave(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_invalidates_outstanding_tickets() {
        let guard = LoadGuard::new();
        let first = guard.begin();
        assert!(guard.is_current(first));

        guard.leave();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(guard.begin()));
    }

    #[test]
    fn handle_shares_generation() {
        let guard = LoadGuard::new();
        let ticket = guard.begin();
        guard.handle().leave();
        assert!(!guard.is_current(ticket));
    }
}
