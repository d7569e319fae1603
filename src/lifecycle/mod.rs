//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     deadline or signal → broadcast → workers stop → pool closed
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Workers finish their in-flight call before observing shutdown
//! - The pool is closed only after every worker has returned

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
