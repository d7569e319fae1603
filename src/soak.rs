//! Soak runner.
//!
//! Drives a pool over the simulated cluster with concurrent workers until a
//! deadline or shutdown, then reports how calls ended.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast::error::TryRecvError;

use crate::lifecycle::Shutdown;
use crate::pool::{ExecuteError, PoolStats, SessionPool};
use crate::sim::{SimCluster, SimError};

/// Outcome counts of a soak run.
#[derive(Debug, Clone)]
pub struct SoakReport {
    pub succeeded: u64,
    pub failed: u64,
    pub exhausted: u64,
    pub unavailable: u64,
    pub elapsed: Duration,
    pub stats: PoolStats,
}

impl SoakReport {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.exhausted + self.unavailable
    }
}

impl fmt::Display for SoakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        let rate = if secs > 0.0 { self.total() as f64 / secs } else { 0.0 };
        writeln!(f, "calls:       {} ({:.0}/s over {:.1}s)", self.total(), rate, secs)?;
        writeln!(f, "succeeded:   {}", self.succeeded)?;
        writeln!(f, "failed:      {}", self.failed)?;
        writeln!(f, "exhausted:   {}", self.exhausted)?;
        writeln!(f, "unavailable: {}", self.unavailable)?;
        write!(f, "live slots:  {}/{}", self.stats.live, self.stats.size)
    }
}

#[derive(Default)]
struct Tally {
    succeeded: AtomicU64,
    failed: AtomicU64,
    exhausted: AtomicU64,
    unavailable: AtomicU64,
}

impl Tally {
    fn record<T>(&self, outcome: &Result<T, ExecuteError<SimError>>) {
        let counter = match outcome {
            Ok(_) => &self.succeeded,
            Err(ExecuteError::Query(_)) => &self.failed,
            Err(ExecuteError::Exhausted) => &self.exhausted,
            Err(ExecuteError::Acquire(_)) => &self.unavailable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Run `workers` query loops against `pool` for at most `duration`.
pub async fn run(
    pool: Arc<SessionPool<SimCluster>>,
    workers: usize,
    duration: Duration,
    shutdown: Shutdown,
) -> SoakReport {
    let tally = Arc::new(Tally::default());
    let started = Instant::now();

    tracing::info!(workers, duration_secs = duration.as_secs_f64(), "Soak run starting");

    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let pool = pool.clone();
        let tally = tally.clone();
        let mut stop = shutdown.subscribe();

        handles.push(tokio::spawn(async move {
            let mut sequence = 0u64;
            while matches!(stop.try_recv(), Err(TryRecvError::Empty)) {
                sequence += 1;
                let statement = format!("SELECT {} FROM worker_{}", sequence, worker);
                let statement = statement.as_str();

                let outcome = pool
                    .execute(move |session| async move { session.query(statement).await })
                    .await;
                if let Err(e) = &outcome {
                    tracing::debug!(worker, error = %e, "Call failed");
                }
                tally.record(&outcome);

                tokio::task::yield_now().await;
            }
        }));
    }

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    let mut stop = shutdown.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = &mut deadline => {
                shutdown.trigger();
                break;
            }
            _ = stop.recv() => break,
            _ = ticker.tick() => {
                let stats = pool.stats();
                tracing::debug!(live = stats.live, size = stats.size, "Pool status");
            }
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Worker task failed");
        }
    }

    let report = SoakReport {
        succeeded: tally.succeeded.load(Ordering::Relaxed),
        failed: tally.failed.load(Ordering::Relaxed),
        exhausted: tally.exhausted.load(Ordering::Relaxed),
        unavailable: tally.unavailable.load(Ordering::Relaxed),
        elapsed: started.elapsed(),
        stats: pool.stats(),
    };
    tracing::info!(
        total = report.total(),
        succeeded = report.succeeded,
        failed = report.failed,
        exhausted = report.exhausted,
        unavailable = report.unavailable,
        "Soak run finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PoolConfig, SimulationConfig};

    #[tokio::test]
    async fn test_healthy_cluster_only_succeeds() {
        let pool = Arc::new(
            SessionPool::connect(SimCluster::new(4), PoolConfig::default())
                .await
                .unwrap(),
        );

        let report = run(pool.clone(), 4, Duration::from_millis(50), Shutdown::new()).await;

        assert!(report.succeeded > 0);
        assert_eq!(report.total(), report.succeeded);
        assert_eq!(report.stats, PoolStats { size: 4, live: 4 });
        assert_eq!(pool.factory().counters().queries() as u64, report.total());
    }

    #[tokio::test]
    async fn test_fatal_errors_are_counted() {
        let config = SimulationConfig {
            slots: 2,
            conflict_rate: 0.0,
            fatal_rate: 1.0,
            query_latency_ms: 0,
            ..SimulationConfig::default()
        };
        let pool = Arc::new(
            SessionPool::connect(SimCluster::from_config(&config), PoolConfig::default())
                .await
                .unwrap(),
        );

        let report = run(pool, 2, Duration::from_millis(30), Shutdown::new()).await;

        assert!(report.failed > 0);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.exhausted, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_early() {
        let pool = Arc::new(
            SessionPool::connect(SimCluster::new(1), PoolConfig::default())
                .await
                .unwrap(),
        );
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        let report = run(pool, 1, Duration::from_secs(60), shutdown).await;
        assert!(report.elapsed < Duration::from_secs(10));
    }
}
