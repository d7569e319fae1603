//! A single pool slot.
//!
//! # Responsibilities
//! - Hold at most one live session
//! - Count failures reported against that session
//!
//! # Design Decisions
//! - Session and counter are separate atomic cells, no lock
//! - An empty slot is dead and skipped by selection
//! - The counter is consumed with swap-to-zero, never a plain read

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

pub(crate) struct Slot<S> {
    session: ArcSwapOption<S>,
    failures: AtomicU64,
}

impl<S> Slot<S> {
    pub(crate) fn new(session: S) -> Self {
        Self {
            session: ArcSwapOption::from_pointee(session),
            failures: AtomicU64::new(0),
        }
    }

    /// Clone out the current session, if any.
    pub(crate) fn load(&self) -> Option<Arc<S>> {
        self.session.load_full()
    }

    pub(crate) fn is_live(&self) -> bool {
        self.session.load().is_some()
    }

    pub(crate) fn store(&self, session: S) {
        self.session.store(Some(Arc::new(session)));
    }

    /// Empty the slot. In-flight holders keep their `Arc` until they finish.
    pub(crate) fn mark_dead(&self) {
        self.session.store(None);
    }

    /// Empty the slot and hand back whatever it held.
    pub(crate) fn take(&self) -> Option<Arc<S>> {
        self.session.swap(None)
    }

    /// Count one failure, returning the new total.
    pub(crate) fn record_failure(&self) -> u64 {
        self.failures.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Read and reset the failure count.
    pub(crate) fn drain_failures(&self) -> u64 {
        self.failures.swap(0, Ordering::AcqRel)
    }

    pub(crate) fn failure_snapshot(&self) -> u64 {
        self.failures.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn set_failures(&self, value: u64) {
        self.failures.store(value, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_and_restore() {
        let slot = Slot::new(7u32);
        assert!(slot.is_live());
        assert_eq!(slot.load().as_deref(), Some(&7));

        slot.mark_dead();
        assert!(!slot.is_live());
        assert!(slot.load().is_none());

        slot.store(8);
        assert_eq!(slot.load().as_deref(), Some(&8));
    }

    #[test]
    fn test_holder_outlives_mark_dead() {
        let slot = Slot::new(String::from("session"));
        let held = slot.load().unwrap();
        slot.mark_dead();
        assert_eq!(held.as_str(), "session");
    }

    #[test]
    fn test_failure_counter_drains_to_zero() {
        let slot = Slot::new(());
        assert_eq!(slot.record_failure(), 1);
        assert_eq!(slot.record_failure(), 2);
        assert_eq!(slot.drain_failures(), 2);
        assert_eq!(slot.failure_snapshot(), 0);
        assert_eq!(slot.record_failure(), 1);
    }

    #[test]
    fn test_take_empties_once() {
        let slot = Slot::new(1u8);
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }
}
