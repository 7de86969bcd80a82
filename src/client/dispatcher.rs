//! Dispatcher and completion listener.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::batch::{BufferedResponse, RoundTrip};
use crate::client::types::BulkError;
use crate::config::{validate_config, ClientConfig, ValidationError, WorkerConfig};
use crate::observability::metrics;
use crate::pipeline::{BatchContext, FinishedOutcome, PendingParcel, WorkerPool};
use crate::transport::Transport;

/// Index-aligned views of a finished batch.
pub type BatchResults<'a> = (&'a [Option<BufferedResponse>], &'a [Option<BulkError>]);

/// Sends every request of a batch concurrently and waits for all of them or
/// the batch deadline, whichever comes first.
///
/// The worker pools are started by the constructor and stay up until
/// [`shutdown`](Self::shutdown) or drop. Must be built inside a tokio runtime.
#[derive(Debug)]
pub struct BulkClient {
    pool: WorkerPool,
    timeout: Duration,
}

impl BulkClient {
    /// Client with the default pool sizes and no body size cap.
    pub fn new<T: Transport>(transport: T, timeout: Duration) -> Self {
        Self::build(Arc::new(transport), timeout, &WorkerConfig::default(), None)
    }

    /// Client sized and limited by `config`.
    ///
    /// The configuration is validated first; no worker is spawned when it is
    /// rejected.
    pub fn from_config<T: Transport>(
        transport: T,
        config: &ClientConfig,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_config(config)?;
        Ok(Self::build(
            Arc::new(transport),
            config.timeouts.batch(),
            &config.workers,
            config.body.max_bytes,
        ))
    }

    fn build(
        transport: Arc<dyn Transport>,
        timeout: Duration,
        workers: &WorkerConfig,
        max_body_bytes: Option<usize>,
    ) -> Self {
        Self {
            pool: WorkerPool::spawn(transport, workers, max_body_bytes),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Worker tasks currently alive across both pools.
    pub fn worker_count(&self) -> usize {
        self.pool.live_workers()
    }

    /// Stop accepting work and join every worker.
    ///
    /// Requests already queued are skipped if their batch has returned.
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }

    /// Execute every request in `batch` under the client's timeout.
    ///
    /// Fails only with [`BulkError::NoRequests`]. Otherwise the returned
    /// slices have one entry per request and exactly one of them is set.
    pub async fn execute<'b>(&self, batch: &'b mut RoundTrip) -> Result<BatchResults<'b>, BulkError> {
        self.execute_with_cancellation(batch, &CancellationToken::new()).await
    }

    /// Like [`execute`](Self::execute), but `cancel` can end the batch early.
    ///
    /// Indices still pending when `cancel` fires resolve to
    /// [`BulkError::RequestIgnored`]. `cancel` itself is never cancelled here.
    pub async fn execute_with_cancellation<'b>(
        &self,
        batch: &'b mut RoundTrip,
        cancel: &CancellationToken,
    ) -> Result<BatchResults<'b>, BulkError> {
        if batch.is_empty() {
            return Err(BulkError::NoRequests);
        }

        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", batch_id = %batch_id, requests = batch.len());
        self.dispatch(batch, cancel, batch_id).instrument(span).await;

        Ok((batch.responses(), batch.errors()))
    }

    async fn dispatch(&self, batch: &mut RoundTrip, cancel: &CancellationToken, batch_id: Uuid) {
        let started = Instant::now();
        batch.reset_results();

        let token = cancel.child_token();
        // Whatever way this call ends, work still queued or in flight is abandoned.
        let _abandon = token.clone().drop_guard();
        let deadline = tokio::time::sleep(self.timeout);

        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
        let context = BatchContext {
            id: batch_id,
            token: token.clone(),
            reply: reply_tx,
        };

        let mut dispatched = 0;
        for index in 0..batch.len() {
            let mut request = batch.dispatch_copy(index);
            request.extensions_mut().insert(token.clone());

            let parcel = PendingParcel {
                request,
                index,
                batch: context.clone(),
            };
            match self.pool.submit(parcel) {
                Ok(()) => dispatched += 1,
                Err(parcel) => {
                    tracing::warn!(index = parcel.index, "Work queue closed, request not dispatched");
                }
            }
        }
        drop(context);

        tracing::debug!(dispatched, "Requests queued");

        let received = completion_listener(batch, &token, deadline, &mut reply_rx, dispatched).await;
        let ignored = batch.add_request_ignored_errors();

        metrics::record_batch(batch.len(), ignored, started);
        tracing::info!(
            received,
            ignored,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );
    }
}

/// Write finished outcomes into the batch until all `expected` arrived or
/// the batch token fires.
///
/// Cancellation is checked before every receive, so an outcome still queued
/// when the deadline fires is dropped and its index ends up ignored.
async fn completion_listener(
    batch: &mut RoundTrip,
    token: &CancellationToken,
    deadline: Sleep,
    replies: &mut mpsc::UnboundedReceiver<FinishedOutcome>,
    expected: usize,
) -> usize {
    tokio::pin!(deadline);
    let mut done = 0;

    while done < expected {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(done, expected, "Batch cancelled");
                break;
            }
            _ = &mut deadline => {
                token.cancel();
                tracing::debug!(done, expected, "Batch deadline reached");
                break;
            }
            outcome = replies.recv() => match outcome {
                Some(FinishedOutcome { result, index }) => {
                    match result {
                        Ok(response) => batch.update_response_for_index(response, index),
                        Err(error) => batch.update_error_for_index(error, index),
                    };
                    done += 1;
                }
                // Every parcel was consumed without an outcome reaching us.
                None => break,
            },
        }
    }

    done
}
