//! Pool error definitions.

use thiserror::Error;

use crate::config::ValidationErrors;

/// Errors from building a pool.
#[derive(Debug, Error)]
pub enum ConnectError<E> {
    /// The policy or slot count was rejected before any session was opened.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(#[from] ValidationErrors),

    /// Opening a session failed; construction stops at the first failure.
    #[error("failed to create session for slot {slot}: {source}")]
    CreateSession {
        slot: usize,
        #[source]
        source: E,
    },
}

/// Selection found no live slot within its sampling budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("no session available after sampling {sampled} slots")]
    NoSessionAvailable { sampled: usize },
}

/// Errors from `SessionPool::execute`.
#[derive(Debug, Error)]
pub enum ExecuteError<E> {
    #[error("failed to get session: {0}")]
    Acquire(#[from] AcquireError),

    /// Work failed with something other than a registration conflict.
    #[error("failed to execute query: {0}")]
    Query(#[source] E),

    /// Every attempt ended in a registration conflict.
    #[error("failed to execute query")]
    Exhausted,
}
