//! Post-processing stage: classification and body buffering.
//!
//! # Responsibilities
//! - Tell "ran out of time" apart from "the transport failed"
//! - Read the whole body and detach it from the connection
//! - Drop the live transport body exactly once, whatever the branch

use std::panic::AssertUnwindSafe;

use bytes::{Bytes, BytesMut};
use futures_util::FutureExt;
use http_body_util::BodyExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::batch::{BufferedResponse, RequestHead};
use crate::client::types::BulkError;
use crate::observability::metrics;
use crate::pipeline::parcel::{FinishedOutcome, RawOutcome};
use crate::transport::{BoxError, TransportBody, TransportResponse};

/// Main loop of one post-processing worker.
pub(crate) async fn processing_loop(
    worker_id: usize,
    raw: flume::Receiver<RawOutcome>,
    max_body_bytes: Option<usize>,
) {
    tracing::debug!(worker = worker_id, "Processing worker started");

    while let Ok(outcome) = raw.recv_async().await {
        let batch = outcome.batch.clone();
        let index = outcome.index;
        // A panicking body must not take the worker down with it.
        let finished = match AssertUnwindSafe(parse_response(outcome, max_body_bytes))
            .catch_unwind()
            .await
        {
            Ok(finished) => finished,
            Err(_) => {
                tracing::error!(worker = worker_id, batch_id = %batch.id, index, "Response body panicked");
                FinishedOutcome {
                    result: Err(BulkError::BodyRead("response body panicked".to_string())),
                    index,
                }
            }
        };

        metrics::record_outcome(&finished.result);
        if let Err(ref error) = finished.result {
            tracing::debug!(batch_id = %batch.id, index = finished.index, error = %error, "Request failed");
        }

        if batch.reply.send(finished).is_err() {
            tracing::trace!(worker = worker_id, batch_id = %batch.id, "Batch already returned, outcome dropped");
        }
    }

    tracing::debug!(worker = worker_id, "Processing worker stopped");
}

/// Turn a raw outcome into a finished one.
pub(crate) async fn parse_response(outcome: RawOutcome, max_body_bytes: Option<usize>) -> FinishedOutcome {
    let RawOutcome {
        request,
        response,
        error,
        index,
        batch,
    } = outcome;

    let result = match (response, error) {
        (response, Some(error)) => {
            drop(response);
            if batch.token.is_cancelled() {
                Err(BulkError::RequestIgnored)
            } else {
                Err(BulkError::Transport(error.to_string()))
            }
        }
        (None, None) => Err(BulkError::EmptyResponse),
        (Some(response), None) => buffer_response(response, request, &batch.token, max_body_bytes).await,
    };

    FinishedOutcome { result, index }
}

async fn buffer_response(
    response: TransportResponse,
    request: RequestHead,
    token: &CancellationToken,
    max_body_bytes: Option<usize>,
) -> Result<BufferedResponse, BulkError> {
    let (parts, body) = response.into_parts();

    // The live body is moved into the read and dropped with it on every path.
    let bytes = tokio::select! {
        biased;
        _ = token.cancelled() => return Err(BulkError::RequestIgnored),
        read = read_body(body, max_body_bytes) => {
            read.map_err(|e| BulkError::BodyRead(e.to_string()))?
        }
    };

    Ok(BufferedResponse::from_parts(parts, bytes, request))
}

/// Raised when a body grows past the configured cap.
#[derive(Debug, Error)]
#[error("body exceeds limit of {0} bytes")]
pub struct BodyTooLarge(pub usize);

/// Read every data frame into one buffer, stopping early past `limit`.
async fn read_body(mut body: TransportBody, limit: Option<usize>) -> Result<Bytes, BoxError> {
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        // Trailers carry no body bytes.
        let Ok(data) = frame?.into_data() else {
            continue;
        };
        if let Some(limit) = limit {
            if buf.len() + data.len() > limit {
                return Err(BodyTooLarge(limit).into());
            }
        }
        buf.extend_from_slice(&data);
    }
    Ok(buf.freeze())
}
