//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pool, healer and soak runner produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Slot index travels as a structured field on every pool event
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
