//! In-memory cluster.
//!
//! Stands in for a real driver in tests and in the soak runner. Sessions
//! fail queries at configurable rates and dials can be made to fail, either
//! at random or a scripted number of times. Random dial failures never hit
//! the first `slots` dials, so building a pool over it always succeeds.

use std::future::{ready, Future};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::cluster::{ConflictAware, Session, SessionFactory};
use crate::config::SimulationConfig;

/// Errors surfaced by the simulated driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The transient "host already registered" condition.
    #[error("session registration conflict")]
    RegistrationConflict,

    #[error("connection refused")]
    ConnectRefused,

    #[error("{0}")]
    Fatal(String),
}

impl ConflictAware for SimError {
    fn is_transient_conflict(&self) -> bool {
        matches!(self, SimError::RegistrationConflict)
    }
}

/// Cluster-wide counters, shared with every session.
#[derive(Debug, Default)]
pub struct SimCounters {
    created: AtomicUsize,
    closed: AtomicUsize,
    connect_failures: AtomicUsize,
    queries: AtomicUsize,
}

impl SimCounters {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn connect_failures(&self) -> usize {
        self.connect_failures.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
struct Rates {
    conflict: f64,
    fatal: f64,
    connect_failure: f64,
}

/// A simulated cluster configuration.
#[derive(Debug)]
pub struct SimCluster {
    slots: usize,
    rates: Rates,
    latency: Duration,
    scripted_failures: AtomicUsize,
    dials: AtomicUsize,
    next_id: AtomicU64,
    counters: Arc<SimCounters>,
}

impl SimCluster {
    /// A well-behaved cluster: every dial and query succeeds.
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            rates: Rates {
                conflict: 0.0,
                fatal: 0.0,
                connect_failure: 0.0,
            },
            latency: Duration::ZERO,
            scripted_failures: AtomicUsize::new(0),
            dials: AtomicUsize::new(0),
            next_id: AtomicU64::new(0),
            counters: Arc::new(SimCounters::default()),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            rates: Rates {
                conflict: config.conflict_rate,
                fatal: config.fatal_rate,
                connect_failure: config.connect_failure_rate,
            },
            latency: Duration::from_millis(config.query_latency_ms),
            ..Self::new(config.slots)
        }
    }

    /// Make the next `n` dials fail regardless of the configured rate.
    pub fn fail_next_connects(&self, n: usize) {
        self.scripted_failures.store(n, Ordering::SeqCst);
    }

    pub fn counters(&self) -> Arc<SimCounters> {
        self.counters.clone()
    }

    fn dial(&self) -> Result<SimSession, SimError> {
        let scripted = self
            .scripted_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        // Random dial failures start once the initial population is done.
        let warm = self.dials.fetch_add(1, Ordering::SeqCst) >= self.slots;
        let random = warm
            && self.rates.connect_failure > 0.0
            && rand::thread_rng().gen::<f64>() < self.rates.connect_failure;

        if scripted || random {
            self.counters.connect_failures.fetch_add(1, Ordering::SeqCst);
            return Err(SimError::ConnectRefused);
        }

        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(SimSession {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            rates: self.rates,
            latency: self.latency,
            closes: AtomicUsize::new(0),
            counters: self.counters.clone(),
        })
    }
}

impl SessionFactory for SimCluster {
    type Session = SimSession;
    type Error = SimError;

    fn slot_count(&self) -> usize {
        self.slots
    }

    fn create_session(&self) -> impl Future<Output = Result<SimSession, SimError>> + Send {
        ready(self.dial())
    }
}

/// A session opened by [`SimCluster`].
#[derive(Debug)]
pub struct SimSession {
    id: u64,
    rates: Rates,
    latency: Duration,
    closes: AtomicUsize,
    counters: Arc<SimCounters>,
}

impl SimSession {
    /// Dial sequence number, unique within a cluster.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Run a statement, failing at the configured rates.
    pub async fn query(&self, statement: &str) -> Result<u64, SimError> {
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        let roll = rand::thread_rng().gen::<f64>();

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if roll < self.rates.conflict {
            Err(SimError::RegistrationConflict)
        } else if roll < self.rates.conflict + self.rates.fatal {
            Err(SimError::Fatal(format!("statement rejected: {}", statement)))
        } else {
            Ok(self.id)
        }
    }
}

impl Session for SimSession {
    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_connect_failures() {
        let cluster = SimCluster::new(1);
        cluster.fail_next_connects(2);

        assert_eq!(cluster.create_session().await.err(), Some(SimError::ConnectRefused));
        assert_eq!(cluster.create_session().await.err(), Some(SimError::ConnectRefused));
        let session = cluster.create_session().await.unwrap();

        assert_eq!(session.id(), 0);
        assert_eq!(cluster.counters().connect_failures(), 2);
        assert_eq!(cluster.counters().created(), 1);
    }

    #[tokio::test]
    async fn test_query_outcomes_follow_rates() {
        let config = SimulationConfig {
            slots: 1,
            conflict_rate: 1.0,
            connect_failure_rate: 0.0,
            query_latency_ms: 0,
            ..SimulationConfig::default()
        };
        let conflicting = SimCluster::from_config(&config).create_session().await.unwrap();
        assert_eq!(conflicting.query("SELECT 1").await, Err(SimError::RegistrationConflict));

        let healthy = SimCluster::new(1).create_session().await.unwrap();
        assert_eq!(healthy.query("SELECT 1").await, Ok(0));
    }

    #[test]
    fn test_only_conflict_is_transient() {
        assert!(SimError::RegistrationConflict.is_transient_conflict());
        assert!(!SimError::ConnectRefused.is_transient_conflict());
        assert!(!SimError::Fatal("disk full".into()).is_transient_conflict());
    }
}
