//! Worker pool ownership.
//!
//! # Responsibilities
//! - Spawn the execution and post-processing workers once
//! - Accept pending parcels from any number of concurrent batches
//! - Close the queues and join every worker on shutdown

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::WorkerConfig;
use crate::pipeline::execution::execution_loop;
use crate::pipeline::parcel::PendingParcel;
use crate::pipeline::processing::processing_loop;
use crate::transport::Transport;

/// Both worker pools plus the queue feeding them.
///
/// Dropping the pool closes the work queue; workers then drain what is left
/// and exit on their own.
pub struct WorkerPool {
    work: flume::Sender<PendingParcel>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers.execution` + `workers.processing` tasks on the current runtime.
    pub fn spawn(transport: Arc<dyn Transport>, workers: &WorkerConfig, max_body_bytes: Option<usize>) -> Self {
        let (work_tx, work_rx) = flume::unbounded();
        let (raw_tx, raw_rx) = flume::unbounded();
        let mut handles = Vec::with_capacity(workers.execution + workers.processing);

        for worker_id in 0..workers.execution {
            handles.push(tokio::spawn(execution_loop(
                worker_id,
                transport.clone(),
                work_rx.clone(),
                raw_tx.clone(),
            )));
        }
        // Processing workers stop once the last execution worker drops its sender.
        drop(raw_tx);

        for worker_id in 0..workers.processing {
            handles.push(tokio::spawn(processing_loop(
                worker_id,
                raw_rx.clone(),
                max_body_bytes,
            )));
        }

        tracing::info!(
            execution_workers = workers.execution,
            processing_workers = workers.processing,
            "Worker pools started"
        );

        Self {
            work: work_tx,
            handles,
        }
    }

    /// Queue a parcel. Never blocks; hands the parcel back if no worker is left.
    pub fn submit(&self, parcel: PendingParcel) -> Result<(), PendingParcel> {
        self.work.send(parcel).map_err(|err| err.into_inner())
    }

    /// Number of worker tasks still running.
    pub fn live_workers(&self) -> usize {
        self.handles.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Close the work queue and wait for every worker to finish.
    pub async fn shutdown(self) {
        let Self { work, handles } = self;
        drop(work);

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Worker terminated abnormally");
            }
        }

        tracing::info!("Worker pools stopped");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.handles.len())
            .field("queued", &self.work.len())
            .finish()
    }
}
