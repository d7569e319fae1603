//! Self-healing session pool for clustered database drivers.

pub mod cluster;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod pool;
pub mod resilience;
pub mod sim;
pub mod soak;

pub use cluster::{ConflictAware, Session, SessionFactory};
pub use config::{PoolConfig, SessionPoolConfig};
pub use pool::{AcquireError, ConnectError, ExecuteError, PoolStats, SessionPool};
