//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, pool sizes > 0)
//! - Check the metrics address parses when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.batch_ms must be greater than zero")]
    ZeroBatchTimeout,

    #[error("workers.{0} must be at least 1")]
    EmptyPool(&'static str),

    #[error("body.max_bytes must be greater than zero when set")]
    ZeroBodyLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    BadMetricsAddress(String),
}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.batch_ms == 0 {
        errors.push(ValidationError::ZeroBatchTimeout);
    }
    if config.workers.execution == 0 {
        errors.push(ValidationError::EmptyPool("execution"));
    }
    if config.workers.processing == 0 {
        errors.push(ValidationError::EmptyPool("processing"));
    }
    if config.body.max_bytes == Some(0) {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
