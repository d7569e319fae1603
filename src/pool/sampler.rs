//! Random slot selection.
//!
//! Draws up to ⌈2N/3⌉ indices with replacement and takes the first live slot.
//! There is no full scan fallback: with more than about a third of the slots
//! dead, selection may fail even though live slots remain.

use std::sync::Arc;

use rand::Rng;

use crate::pool::error::AcquireError;
use crate::pool::slot::Slot;

/// A session handed out for one attempt, tagged with its slot.
pub(crate) struct Selected<S> {
    pub(crate) index: usize,
    pub(crate) session: Arc<S>,
}

/// Number of draws allowed for a table of `len` slots.
pub(crate) fn sample_budget(len: usize) -> usize {
    (2 * len).div_ceil(3)
}

pub(crate) fn pick<S>(slots: &[Slot<S>]) -> Result<Selected<S>, AcquireError> {
    let budget = sample_budget(slots.len());
    let mut rng = rand::thread_rng();

    for _ in 0..budget {
        let index = rng.gen_range(0..slots.len());
        if let Some(session) = slots[index].load() {
            return Ok(Selected { index, session });
        }
    }

    Err(AcquireError::NoSessionAvailable { sampled: budget })
}
