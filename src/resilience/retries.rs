//! Retry classification.
//!
//! # Responsibilities
//! - Decide what the retry loop does with a failed unit of work
//!
//! # Design Decisions
//! - Only the driver's registration conflict is retried
//! - Everything else fails the call on the first occurrence
//! - Retries are bounded by attempt count, not by time

use crate::cluster::ConflictAware;

/// What the retry loop does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Report the failure against the slot, then draw a new one.
    Heal,
    /// Return the error to the caller.
    Fail,
}

pub fn classify<E: ConflictAware>(err: &E) -> Disposition {
    if err.is_transient_conflict() {
        Disposition::Heal
    } else {
        Disposition::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag(bool);

    impl ConflictAware for Flag {
        fn is_transient_conflict(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_only_conflicts_heal() {
        assert_eq!(classify(&Flag(true)), Disposition::Heal);
        assert_eq!(classify(&Flag(false)), Disposition::Fail);
    }
}
