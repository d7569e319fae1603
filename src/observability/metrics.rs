//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pool_executions_total` (counter): finished `execute` calls by outcome
//! - `pool_attempts_total` (counter): units of work handed a session
//! - `pool_conflicts_total` (counter): registration conflicts by slot
//! - `pool_slot_deaths_total` (counter): slots emptied on threshold breach
//! - `pool_reconnect_attempts_total` (counter): session dials during healing by result
//! - `pool_reconnect_duration_seconds` (histogram): time a caller spent healing
//! - `pool_accounting_gap_total` (counter): slots left dead without a reconnect
//! - `pool_live_slots` (gauge): slots currently holding a session
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_execution(outcome: &'static str) {
    counter!("pool_executions_total", "outcome" => outcome).increment(1);
}

pub fn record_attempt() {
    counter!("pool_attempts_total").increment(1);
}

pub fn record_conflict(slot: usize) {
    counter!("pool_conflicts_total", "slot" => slot.to_string()).increment(1);
}

pub fn record_slot_death(slot: usize) {
    counter!("pool_slot_deaths_total", "slot" => slot.to_string()).increment(1);
}

pub fn record_reconnect_attempt(result: &'static str) {
    counter!("pool_reconnect_attempts_total", "result" => result).increment(1);
}

pub fn record_reconnect_duration(start: Instant) {
    histogram!("pool_reconnect_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_accounting_gap() {
    counter!("pool_accounting_gap_total").increment(1);
}

pub fn record_live_slots(live: usize) {
    gauge!("pool_live_slots").set(live as f64);
}
