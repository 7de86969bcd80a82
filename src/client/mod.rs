//! Bulk dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RoundTrip (caller-built)
//!     → dispatcher.rs (validate, derive batch token, enqueue parcels)
//!     → pipeline (execution → post-processing)
//!     → dispatcher.rs completion listener (write by index until done or deadline)
//!     → untouched indices resolved to RequestIgnored
//! ```
//!
//! # Design Decisions
//! - One deadline per batch, shared by every request through a token
//! - Per-index failures never fail the call; only an empty batch does
//! - The listener returns the moment the deadline fires

pub mod dispatcher;
pub mod types;

pub use dispatcher::BulkClient;
pub use types::BulkError;
