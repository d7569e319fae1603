//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the soak runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionPoolConfig {
    /// Retry and self-healing policy of the pool.
    pub pool: PoolConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Simulated cluster driven by the soak runner.
    pub simulation: SimulationConfig,
}

/// Retry and self-healing policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum attempts for one `execute` call.
    pub max_attempts_per_call: u32,

    /// Failures a slot may report before its session is replaced.
    ///
    /// Every report drains the count, so values above 1 only trip when
    /// reports against the same slot overlap.
    pub max_failures_per_slot: u64,

    /// First reconnect delay in milliseconds.
    pub reconnect_base_delay_ms: u64,

    /// Upper bound on the reconnect delay in milliseconds.
    pub reconnect_max_delay_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_call: 3,
            max_failures_per_slot: 1,
            reconnect_base_delay_ms: 10,
            reconnect_max_delay_ms: 3_000,
        }
    }
}

impl PoolConfig {
    /// Build a policy with the default reconnect backoff.
    pub fn new(max_attempts_per_call: u32, max_failures_per_slot: u64) -> Self {
        Self {
            max_attempts_per_call,
            max_failures_per_slot,
            ..Self::default()
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// In-memory cluster settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of pool slots the cluster reports.
    pub slots: usize,

    /// Probability that a query fails with a registration conflict.
    pub conflict_rate: f64,

    /// Probability that a query fails with a non-retryable error.
    pub fatal_rate: f64,

    /// Probability that opening a session fails.
    pub connect_failure_rate: f64,

    /// Simulated query latency in milliseconds.
    pub query_latency_ms: u64,

    /// Concurrent workers issuing queries.
    pub workers: usize,

    /// How long the soak run lasts in seconds.
    pub duration_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            slots: 8,
            conflict_rate: 0.05,
            fatal_rate: 0.0,
            connect_failure_rate: 0.2,
            query_latency_ms: 1,
            workers: 16,
            duration_secs: 10,
        }
    }
}
