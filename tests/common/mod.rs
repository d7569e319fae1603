//! Shared fixtures for integration tests.

use std::collections::VecDeque;
use std::fmt;
use std::future::{ready, Future};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use session_pool::{ConflictAware, Session, SessionFactory};

/// Error returned by work closures in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    Conflict,
    Other(&'static str),
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkError::Conflict => write!(f, "host already exists"),
            WorkError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for WorkError {}

impl ConflictAware for WorkError {
    fn is_transient_conflict(&self) -> bool {
        matches!(self, WorkError::Conflict)
    }
}

#[derive(Debug)]
pub struct DialError;

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dial refused")
    }
}

impl std::error::Error for DialError {}

#[derive(Debug, Default)]
pub struct Counters {
    pub dials: AtomicUsize,
    pub closes: AtomicUsize,
}

#[derive(Debug)]
pub struct TestSession {
    pub id: usize,
    counters: Arc<Counters>,
}

impl Session for TestSession {
    fn close(&self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory whose dial outcomes follow a script; once the script runs out every dial succeeds.
pub struct ScriptedFactory {
    slots: usize,
    script: Mutex<VecDeque<bool>>,
    pub counters: Arc<Counters>,
}

impl ScriptedFactory {
    pub fn new(slots: usize) -> Self {
        Self::with_script(slots, [])
    }

    pub fn with_script(slots: usize, script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            slots,
            script: Mutex::new(script.into_iter().collect()),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn dials(&self) -> usize {
        self.counters.dials.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

impl SessionFactory for ScriptedFactory {
    type Session = TestSession;
    type Error = DialError;

    fn slot_count(&self) -> usize {
        self.slots
    }

    fn create_session(&self) -> impl Future<Output = Result<TestSession, DialError>> + Send {
        let id = self.counters.dials.fetch_add(1, Ordering::SeqCst);
        let succeed = self.script.lock().unwrap().pop_front().unwrap_or(true);
        let outcome = if succeed {
            Ok(TestSession {
                id,
                counters: self.counters.clone(),
            })
        } else {
            Err(DialError)
        };
        ready(outcome)
    }
}
