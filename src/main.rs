//! Session pool soak runner.
//!
//! # Architecture Overview
//!
//! ```text
//!   workers ──execute(work)──▶ ┌──────────────────────────────────────────┐
//!                              │               SessionPool                │
//!                              │  ┌─────────┐   ┌──────────────────────┐  │
//!                              │  │ sampler │──▶│ slot table (N slots) │  │
//!                              │  └─────────┘   │ session │ failures   │  │
//!                              │                └──────────┬───────────┘  │
//!                              │  ┌─────────┐              │              │
//!                              │  │ healer  │◀── conflict ─┘              │
//!                              │  │ backoff │── create_session ──┐        │
//!                              │  └─────────┘                    │        │
//!                              └─────────────────────────────────┼────────┘
//!                                                                ▼
//!                                                          SimCluster
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use session_pool::config::{load_config, validate_config, SessionPoolConfig};
use session_pool::lifecycle::{signals, Shutdown};
use session_pool::observability::{logging, metrics};
use session_pool::sim::SimCluster;
use session_pool::{soak, SessionPool};

#[derive(Parser)]
#[command(name = "session-pool")]
#[command(about = "Soak test the self-healing session pool against a simulated cluster", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override simulation.workers.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override simulation.duration_secs.
    #[arg(short, long)]
    duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SessionPoolConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.simulation.workers = workers;
    }
    if let Some(duration_secs) = cli.duration_secs {
        config.simulation.duration_secs = duration_secs;
    }
    validate_config(&config)?;

    logging::init_logging(&config.observability)?;
    tracing::info!("session-pool v0.1.0 starting");

    tracing::info!(
        slots = config.simulation.slots,
        workers = config.simulation.workers,
        conflict_rate = config.simulation.conflict_rate,
        connect_failure_rate = config.simulation.connect_failure_rate,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let cluster = SimCluster::from_config(&config.simulation);
    let counters = cluster.counters();
    let pool = Arc::new(SessionPool::connect(cluster, config.pool.clone()).await?);

    let shutdown = Shutdown::new();
    signals::install(shutdown.clone());

    let report = soak::run(
        pool.clone(),
        config.simulation.workers,
        Duration::from_secs(config.simulation.duration_secs),
        shutdown,
    )
    .await;

    pool.close();

    println!("{}", report);
    println!(
        "sessions:    {} opened, {} dial failures, {} closed",
        counters.created(),
        counters.connect_failures(),
        counters.closed()
    );

    tracing::info!("Shutdown complete");
    Ok(())
}
