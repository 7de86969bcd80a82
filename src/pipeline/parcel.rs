//! Units of work and results flowing between the stages.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::batch::{BufferedResponse, RequestHead};
use crate::client::types::BulkError;
use crate::transport::{BoxError, OutboundRequest, TransportResponse};

/// Per-batch state shared by every parcel of that batch.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub id: Uuid,
    /// Fires on deadline, caller cancellation, or when the batch call returns.
    pub token: CancellationToken,
    pub reply: mpsc::UnboundedSender<FinishedOutcome>,
}

/// A request waiting for an execution worker.
#[derive(Debug)]
pub struct PendingParcel {
    pub request: OutboundRequest,
    pub index: usize,
    pub batch: BatchContext,
}

/// What the transport handed back, before any classification.
///
/// Whoever holds this owns the live response body.
pub struct RawOutcome {
    pub request: RequestHead,
    pub response: Option<TransportResponse>,
    pub error: Option<BoxError>,
    pub index: usize,
    pub batch: BatchContext,
}

/// A classified result ready to be written into the batch.
#[derive(Debug)]
pub struct FinishedOutcome {
    pub result: Result<BufferedResponse, BulkError>,
    pub index: usize,
}

/// Reported when the batch token fired while the transport call was pending.
#[derive(Debug, Error)]
#[error("operation canceled")]
pub struct Canceled;
