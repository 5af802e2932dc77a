//! Fixed-size worker pool draining a shared job queue.
//!
//! A dispatcher task feeds one `ScanTarget` per port into a bounded job
//! channel sized to the job count, so enqueueing never blocks and no job
//! is dropped. `workers` tasks race for jobs and push results into the
//! result channel. A supervisor joins every worker before releasing the
//! last result sender, which closes the stream.

use crate::scanner::progress::ProgressCounter;
use crate::scanner::traits::{Probe, ScanResult};
use crate::types::ScanTarget;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type JobQueue = Arc<Mutex<mpsc::Receiver<ScanTarget>>>;

/// Results of a running scan, in completion order.
///
/// Yields `None` once every worker has finished.
pub struct ResultStream {
    results: mpsc::Receiver<ScanResult>,
    total: usize,
}

impl ResultStream {
    /// Next completed result, or `None` when the scan is over.
    pub async fn next(&mut self) -> Option<ScanResult> {
        self.results.recv().await
    }

    /// Number of jobs queued for this scan.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Drain the stream into a vector.
    pub async fn collect(mut self) -> Vec<ScanResult> {
        let mut collected = Vec::with_capacity(self.total);
        while let Some(result) = self.next().await {
            collected.push(result);
        }
        collected
    }
}

pub(crate) struct WorkerPool<P> {
    pub(crate) probe: Arc<P>,
    pub(crate) workers: usize,
    pub(crate) progress: Arc<ProgressCounter>,
    pub(crate) cancel: CancellationToken,
}

impl<P: Probe + 'static> WorkerPool<P> {
    /// Start the dispatcher, the workers and their supervisor.
    pub(crate) fn spawn(self, targets: Vec<ScanTarget>) -> ResultStream {
        let total = targets.len();
        let capacity = total.max(1);
        let (job_tx, job_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let jobs: JobQueue = Arc::new(Mutex::new(job_rx));

        tokio::spawn(async move {
            for target in targets {
                if job_tx.send(target).await.is_err() {
                    // Every worker is gone.
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut set = JoinSet::new();
            for id in 0..self.workers {
                set.spawn(worker(
                    id,
                    Arc::clone(&jobs),
                    result_tx.clone(),
                    Arc::clone(&self.probe),
                    Arc::clone(&self.progress),
                    self.cancel.clone(),
                ));
            }

            while let Some(joined) = set.join_next().await {
                if let Err(e) = joined {
                    warn!(error = %e, "scan worker failed");
                }
            }
            // Closes the stream only after every worker is joined.
            drop(result_tx);

            let completed = self.progress.completed();
            if self.cancel.is_cancelled() {
                warn!(completed, total, "scan cancelled");
            } else {
                info!(completed, total, "scan finished");
            }
        });

        ResultStream {
            results: result_rx,
            total,
        }
    }
}

async fn worker<P: Probe>(
    id: usize,
    jobs: JobQueue,
    results: mpsc::Sender<ScanResult>,
    probe: Arc<P>,
    progress: Arc<ProgressCounter>,
    cancel: CancellationToken,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(target) = next else {
            break;
        };

        if cancel.is_cancelled() {
            break;
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = probe.probe(target) => result,
        };
        debug!(worker = id, port = result.port, status = %result.status, "probe complete");

        if results.send(result).await.is_err() {
            // Consumer went away.
            break;
        }
        progress.record();
    }
}
