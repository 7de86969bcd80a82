//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bulk_batches_total` (counter): batches dispatched
//! - `bulk_batch_requests` (histogram): requests per batch
//! - `bulk_batch_ignored` (histogram): indices resolved as ignored per batch
//! - `bulk_batch_duration_seconds` (histogram): wall time per batch call
//! - `bulk_outcomes_total` (counter): post-processed outcomes by `outcome`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::batch::BufferedResponse;
use crate::client::types::BulkError;

/// Install the Prometheus recorder with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished batch call.
pub fn record_batch(requests: usize, ignored: usize, started: Instant) {
    metrics::counter!("bulk_batches_total").increment(1);
    metrics::histogram!("bulk_batch_requests").record(requests as f64);
    metrics::histogram!("bulk_batch_ignored").record(ignored as f64);
    metrics::histogram!("bulk_batch_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record one post-processed outcome.
pub fn record_outcome(result: &Result<BufferedResponse, BulkError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(error) => error.kind(),
    };
    metrics::counter!("bulk_outcomes_total", "outcome" => outcome).increment(1);
}
