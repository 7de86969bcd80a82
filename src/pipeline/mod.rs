//! Two-stage concurrent pipeline.
//!
//! # Data Flow
//! ```text
//! dispatcher
//!     → work queue (PendingParcel)
//!     → execution.rs (W1 workers call the transport)
//!     → raw queue (RawOutcome, owns the live response)
//!     → processing.rs (W2 workers classify errors, buffer bodies, drop live bodies)
//!     → per-batch reply channel (FinishedOutcome)
//!     → dispatcher's completion listener
//! ```
//!
//! # Design Decisions
//! - Pools are spawned once per client and live as long as it does
//! - Every parcel carries its index; queue order never matters
//! - Every parcel carries its batch's token and reply sender, so batches
//!   sharing one pool never see each other's outcomes

pub mod execution;
pub mod parcel;
pub mod pool;
pub mod processing;

pub use parcel::{BatchContext, FinishedOutcome, PendingParcel, RawOutcome};
pub use pool::WorkerPool;
