//! Execution stage: workers that call the transport.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::batch::RequestHead;
use crate::pipeline::parcel::{Canceled, PendingParcel, RawOutcome};
use crate::transport::{BoxError, Transport};

/// Main loop of one execution worker.
///
/// Runs until the work queue is closed and drained. Parcels whose batch has
/// already been cancelled are dropped without touching the transport.
pub(crate) async fn execution_loop(
    worker_id: usize,
    transport: Arc<dyn Transport>,
    work: flume::Receiver<PendingParcel>,
    raw: flume::Sender<RawOutcome>,
) {
    tracing::debug!(worker = worker_id, "Execution worker started");

    while let Ok(parcel) = work.recv_async().await {
        if parcel.batch.token.is_cancelled() {
            tracing::trace!(
                worker = worker_id,
                batch_id = %parcel.batch.id,
                index = parcel.index,
                "Skipping request of finished batch"
            );
            continue;
        }

        let outcome = execute_request(transport.as_ref(), parcel).await;
        if raw.send(outcome).is_err() {
            tracing::warn!(worker = worker_id, "Processing queue closed");
            break;
        }
    }

    tracing::debug!(worker = worker_id, "Execution worker stopped");
}

/// Fire one request and package whatever came back.
///
/// The call is abandoned as soon as the batch token fires. A panicking
/// transport yields an outcome with neither response nor error.
pub(crate) async fn execute_request(transport: &dyn Transport, parcel: PendingParcel) -> RawOutcome {
    let PendingParcel { request, index, batch } = parcel;
    let echo = RequestHead::from_request(&request);
    let call = AssertUnwindSafe(transport.round_trip(request)).catch_unwind();

    let (response, error) = tokio::select! {
        result = call => match result {
            Ok(Ok(response)) => (Some(response), None),
            Ok(Err(err)) => (None, Some(err)),
            Err(_) => {
                tracing::error!(batch_id = %batch.id, index, "Transport panicked");
                (None, None)
            }
        },
        _ = batch.token.cancelled() => (None, Some(Box::new(Canceled) as BoxError)),
    };

    RawOutcome {
        request: echo,
        response,
        error,
        index,
        batch,
    }
}
