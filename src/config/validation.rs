//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts and thresholds > 0, rates in [0, 1])
//! - Check the backoff window is well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), ValidationErrors>
//! - `SessionPool::connect` runs the pool subset before dialing anything

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{PoolConfig, SessionPoolConfig, SimulationConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("pool.max_attempts_per_call must be at least 1")]
    ZeroAttempts,

    #[error("pool.max_failures_per_slot must be at least 1")]
    ZeroFailureThreshold,

    #[error("pool.reconnect_base_delay_ms must be at least 1")]
    ZeroBaseDelay,

    #[error("pool.reconnect_base_delay_ms ({base}) exceeds pool.reconnect_max_delay_ms ({max})")]
    InvertedBackoff { base: u64, max: u64 },

    #[error("slot count must be at least 1")]
    NoSlots,

    #[error("simulation.{field} must be within [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("simulation.workers must be at least 1")]
    NoWorkers,

    #[error("observability.metrics_address is not a socket address: {0}")]
    MetricsAddress(String),
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the retry and reconnect policy.
pub fn validate_pool(config: &PoolConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.max_attempts_per_call == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.max_failures_per_slot == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if config.reconnect_base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBaseDelay);
    }
    if config.reconnect_base_delay_ms > config.reconnect_max_delay_ms {
        errors.push(ValidationError::InvertedBackoff {
            base: config.reconnect_base_delay_ms,
            max: config.reconnect_max_delay_ms,
        });
    }

    errors
}

fn validate_simulation(config: &SimulationConfig, errors: &mut Vec<ValidationError>) {
    if config.slots == 0 {
        errors.push(ValidationError::NoSlots);
    }
    if config.workers == 0 {
        errors.push(ValidationError::NoWorkers);
    }

    let rates = [
        ("conflict_rate", config.conflict_rate),
        ("fatal_rate", config.fatal_rate),
        ("connect_failure_rate", config.connect_failure_rate),
    ];
    for (field, value) in rates {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::RateOutOfRange { field, value });
        }
    }
}

/// Validate a full configuration file.
pub fn validate_config(config: &SessionPoolConfig) -> Result<(), ValidationErrors> {
    let mut errors = validate_pool(&config.pool);
    validate_simulation(&config.simulation, &mut errors);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SessionPoolConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = SessionPoolConfig::default();
        config.pool.max_attempts_per_call = 0;
        config.pool.reconnect_base_delay_ms = 5_000;
        config.simulation.conflict_rate = 1.5;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err().0;
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroAttempts,
                ValidationError::InvertedBackoff { base: 5_000, max: 3_000 },
                ValidationError::RateOutOfRange { field: "conflict_rate", value: 1.5 },
                ValidationError::MetricsAddress("not-an-address".into()),
            ]
        );
    }

    #[test]
    fn test_display_joins_errors() {
        let errors = ValidationErrors(vec![ValidationError::ZeroAttempts, ValidationError::NoSlots]);
        assert_eq!(
            errors.to_string(),
            "Validation failed: pool.max_attempts_per_call must be at least 1, slot count must be at least 1"
        );
    }
}
