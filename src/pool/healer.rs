//! Failure accounting and self-healing.
//!
//! # State Transitions
//! ```text
//! ALIVE → DEAD: failure count after increment > max_failures_per_slot
//! DEAD → ALIVE: reconnection stores a fresh session
//! ```
//!
//! # Design Decisions
//! - Reconnection runs on the reporting task and suspends it until a session
//!   is obtained; there is no timeout
//! - Concurrent reports may both reconnect the same slot; the last store wins
//! - The counter is drained on every report, so a slot marked dead by one
//!   report can be drained below threshold by another. That slot then stays
//!   empty with no reconnect scheduled; it is logged and counted, not repaired

use std::fmt::Display;
use std::time::Instant;

use crate::cluster::SessionFactory;
use crate::observability::metrics;
use crate::pool::SessionPool;
use crate::resilience::backoff::calculate_backoff;

/// Failure handler bound to one slot of a pool.
pub struct FailureHandler<'a, F: SessionFactory> {
    pool: &'a SessionPool<F>,
    index: usize,
}

impl<'a, F: SessionFactory> FailureHandler<'a, F> {
    pub(crate) fn new(pool: &'a SessionPool<F>, index: usize) -> Self {
        Self { pool, index }
    }

    pub fn slot(&self) -> usize {
        self.index
    }

    /// Account one failure against the slot, reconnecting on threshold breach.
    pub async fn report<E: Display + ?Sized>(&self, err: Option<&E>) {
        let Some(err) = err else {
            return;
        };

        let slot = &self.pool.slots[self.index];
        let threshold = self.pool.config.max_failures_per_slot;

        let failures = slot.record_failure();
        let marked_dead = failures > threshold;
        if marked_dead {
            slot.mark_dead();
            metrics::record_slot_death(self.index);
            tracing::warn!(
                slot = self.index,
                failures,
                threshold,
                error = %err,
                "Slot exceeded failure threshold, marked dead"
            );
        }

        let drained = slot.drain_failures();
        if drained < threshold {
            if marked_dead {
                metrics::record_accounting_gap();
                tracing::warn!(
                    slot = self.index,
                    drained,
                    threshold,
                    "Slot marked dead but its failure count drained below threshold; it stays empty until another failure is reported"
                );
            }
            return;
        }

        self.reconnect().await;
    }

    async fn reconnect(&self) {
        let config = &self.pool.config;
        let started = Instant::now();
        let mut failed_attempts = 0u32;

        tracing::info!(slot = self.index, "Reconnecting slot");

        loop {
            match self.pool.factory.create_session().await {
                Ok(session) => {
                    self.pool.slots[self.index].store(session);
                    metrics::record_reconnect_attempt("success");
                    metrics::record_reconnect_duration(started);
                    tracing::info!(
                        slot = self.index,
                        failed_attempts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Slot reconnected"
                    );
                    return;
                }
                Err(e) => {
                    failed_attempts += 1;
                    let delay = calculate_backoff(
                        failed_attempts,
                        config.reconnect_base_delay_ms,
                        config.reconnect_max_delay_ms,
                    );
                    metrics::record_reconnect_attempt("failure");
                    tracing::warn!(
                        slot = self.index,
                        attempt = failed_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Reconnect attempt failed"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
