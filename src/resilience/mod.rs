//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Work fails inside SessionPool::execute:
//!     → retries.rs (conflict → heal and retry, anything else → fail)
//!     → healer reports the failure against the slot
//!     → backoff.rs (delay between reconnect attempts)
//! ```
//!
//! # Design Decisions
//! - Attempt caps bound the retry loop; nothing here has a wall-clock deadline
//! - Reconnect delays double from a base and stop at a cap, no jitter

pub mod backoff;
pub mod retries;
