//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bulk client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the bulk client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Batch deadline configuration.
    pub timeouts: TimeoutConfig,

    /// Worker pool sizing.
    pub workers: WorkerConfig,

    /// Response body handling.
    pub body: BodyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline shared by every request of one batch, in milliseconds.
    pub batch_ms: u64,
}

impl TimeoutConfig {
    pub fn batch(&self) -> Duration {
        Duration::from_millis(self.batch_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { batch_ms: 5_000 }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of workers calling the transport.
    pub execution: usize,

    /// Number of workers buffering response bodies.
    pub processing: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            execution: 10,
            processing: 10,
        }
    }
}

/// Response body configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Maximum number of bytes buffered per response (unlimited when unset).
    pub max_bytes: Option<usize>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
