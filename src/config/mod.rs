//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SessionPoolConfig (validated, immutable)
//!     → PoolConfig handed to SessionPool::connect
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the pool never re-reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, PoolConfig, SessionPoolConfig, SimulationConfig};
pub use validation::{validate_config, ValidationError, ValidationErrors};
