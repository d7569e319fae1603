//! Database client seams.
//!
//! The pool never speaks a wire protocol itself. A driver plugs in by
//! implementing [`SessionFactory`] for its cluster configuration and
//! [`Session`] for its live session type; work errors tell the retry loop
//! whether they are the driver's transient registration conflict through
//! [`ConflictAware`].

use std::future::Future;

/// A live session to the backend cluster.
pub trait Session: Send + Sync + 'static {
    /// Release the session. Called by `SessionPool::close`.
    fn close(&self);
}

/// Immutable cluster configuration able to open new sessions.
///
/// Shared read-only by every slot for the lifetime of the pool.
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Session;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of pool slots to populate.
    fn slot_count(&self) -> usize;

    /// Open one new session.
    fn create_session(&self) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send;
}

/// Classifies work errors for the retry loop.
pub trait ConflictAware {
    /// True for the driver's "session registration conflict" kind, a
    /// connection-local condition worth retrying on another slot.
    fn is_transient_conflict(&self) -> bool;
}
