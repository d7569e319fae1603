//! Self-healing session pool.
//!
//! # Data Flow
//! ```text
//! caller → SessionPool::execute(work)
//!     → sampler.rs (random draw over the slot table)
//!     → work(session)
//!         - Ok → return
//!         - registration conflict → healer.rs (account, maybe reconnect) → next attempt
//!         - any other error → return
//!     → attempts exhausted → ExecuteError::Exhausted
//! ```
//!
//! # Design Decisions
//! - Fixed slot table, one session per slot, no global lock
//! - Every slot is an independent pair of atomic cells (slot.rs)
//! - Selection trades completeness for constant time (sampler.rs)
//! - Healing blocks the reporting caller, never a background task

pub mod error;
pub mod healer;
pub(crate) mod sampler;
pub(crate) mod slot;

pub use error::{AcquireError, ConnectError, ExecuteError};
pub use healer::FailureHandler;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use crate::cluster::{ConflictAware, Session, SessionFactory};
use crate::config::validation::{validate_pool, ValidationError, ValidationErrors};
use crate::config::PoolConfig;
use crate::observability::metrics;
use crate::resilience::retries::{classify, Disposition};
use slot::Slot;

/// Point-in-time view of the slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: usize,
    pub live: usize,
}

/// A fixed table of sessions shared by concurrent callers.
pub struct SessionPool<F: SessionFactory> {
    factory: F,
    slots: Box<[Slot<F::Session>]>,
    config: PoolConfig,
}

impl<F: SessionFactory> SessionPool<F> {
    /// Open one session per slot.
    ///
    /// The first failed dial aborts construction and is returned. Sessions
    /// opened before it are dropped without `close`.
    pub async fn connect(factory: F, config: PoolConfig) -> Result<Self, ConnectError<F::Error>> {
        let size = factory.slot_count();

        let mut errors = validate_pool(&config);
        if size == 0 {
            errors.push(ValidationError::NoSlots);
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors).into());
        }

        let mut slots = Vec::with_capacity(size);
        for index in 0..size {
            let session = factory.create_session().await.map_err(|source| {
                tracing::error!(slot = index, error = %source, "Failed to create session");
                ConnectError::CreateSession { slot: index, source }
            })?;
            slots.push(Slot::new(session));
        }

        tracing::info!(
            slots = size,
            max_attempts_per_call = config.max_attempts_per_call,
            max_failures_per_slot = config.max_failures_per_slot,
            "Session pool ready"
        );

        Ok(Self {
            factory,
            slots: slots.into_boxed_slice(),
            config,
        })
    }

    /// Run `work` against pooled sessions, retrying registration conflicts.
    ///
    /// Each attempt draws a fresh slot. A conflict is reported to that slot's
    /// failure handler, which may reconnect it before the next attempt. Any
    /// other error ends the call after a single invocation.
    pub async fn execute<T, E, W, Fut>(&self, mut work: W) -> Result<T, ExecuteError<E>>
    where
        W: FnMut(Arc<F::Session>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ConflictAware + Display,
    {
        for attempt in 1..=self.config.max_attempts_per_call {
            let selected = match sampler::pick(&self.slots) {
                Ok(selected) => selected,
                Err(e) => {
                    metrics::record_execution("unavailable");
                    tracing::warn!(attempt, error = %e, "No session available");
                    return Err(e.into());
                }
            };

            metrics::record_attempt();
            let err = match work(selected.session).await {
                Ok(value) => {
                    metrics::record_execution("success");
                    return Ok(value);
                }
                Err(err) => err,
            };

            match classify(&err) {
                Disposition::Heal => {
                    metrics::record_conflict(selected.index);
                    tracing::debug!(
                        slot = selected.index,
                        attempt,
                        error = %err,
                        "Registration conflict, retrying on another slot"
                    );
                    self.failure_handler(selected.index).report(Some(&err)).await;
                }
                Disposition::Fail => {
                    metrics::record_execution("error");
                    return Err(ExecuteError::Query(err));
                }
            }
        }

        metrics::record_execution("exhausted");
        tracing::warn!(
            attempts = self.config.max_attempts_per_call,
            "Retry attempts exhausted"
        );
        Err(ExecuteError::Exhausted)
    }

    /// Failure handler bound to slot `index`.
    ///
    /// # Panics
    /// Reporting through the handler panics if `index >= self.size()`.
    pub fn failure_handler(&self, index: usize) -> FailureHandler<'_, F> {
        FailureHandler::new(self, index)
    }

    /// Close every live session.
    ///
    /// Not synchronized with in-flight `execute` calls or running
    /// reconnections; a reconnect finishing afterwards refills its slot.
    pub fn close(&self) {
        let mut closed = 0usize;
        for slot in self.slots.iter() {
            if let Some(session) = slot.take() {
                session.close();
                closed += 1;
            }
        }
        tracing::info!(closed, size = self.slots.len(), "Session pool closed");
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn live_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    pub fn slot_is_live(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.is_live())
    }

    /// Failures counted against a slot and not yet drained.
    pub fn pending_failures(&self, index: usize) -> Option<u64> {
        self.slots.get(index).map(|slot| slot.failure_snapshot())
    }

    pub fn stats(&self) -> PoolStats {
        let stats = PoolStats {
            size: self.size(),
            live: self.live_slots(),
        };
        metrics::record_live_slots(stats.live);
        stats
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}
