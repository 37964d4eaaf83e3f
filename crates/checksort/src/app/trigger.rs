//! Coalescing of host trigger signals into a single pending flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Edge-triggered "a reorder may be needed" flag shared between host
/// callbacks and the reorder loop.
///
/// Any number of signals between two checks collapse into one pending
/// pass; consuming clears the flag atomically so at most one reorder runs
/// per trigger cycle.
#[derive(Debug, Default)]
pub struct ReorderTrigger {
    pending: AtomicBool,
}

impl ReorderTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a reorder may be needed. Idempotent.
    pub fn mark_pending(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Atomically clear the flag, returning whether it was set.
    pub fn consume_if_pending(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Peek without clearing.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let trigger = ReorderTrigger::new();
        assert!(!trigger.is_pending());
        assert!(!trigger.consume_if_pending());
    }

    #[test]
    fn multiple_marks_coalesce_into_one_consume() {
        let trigger = ReorderTrigger::new();
        trigger.mark_pending();
        trigger.mark_pending();
        trigger.mark_pending();
        assert!(trigger.consume_if_pending());
        assert!(!trigger.consume_if_pending());
    }

    #[test]
    fn mark_after_consume_sets_the_next_cycle() {
        let trigger = ReorderTrigger::new();
        trigger.mark_pending();
        assert!(trigger.consume_if_pending());
        trigger.mark_pending();
        assert!(trigger.is_pending());
        assert!(trigger.consume_if_pending());
    }
}
