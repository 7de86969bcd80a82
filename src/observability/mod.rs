//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and workers produce:
//!     → logging.rs (structured tracing events, batch span with batch_id)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout through tracing-subscriber
//!     → Prometheus scrape endpoint when installed by the binary
//! ```
//!
//! # Design Decisions
//! - Library code only emits; installing subscribers/recorders is the caller's job
//! - Batch id flows through every event of one batch as a span field

pub mod logging;
pub mod metrics;
