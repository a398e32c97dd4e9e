//! Asynchronous submission worker
//!
//! The simulation never awaits the ledger. Finished rounds are queued as
//! `RoundFinished` jobs; the worker submits each one, reads the owner's latest
//! record back, and reports a `LedgerUpdate` tagged with the round generation.
//! Collaborator failures stop here and become `Reconciliation::Unavailable`.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{LedgerClient, Reconciliation};
use crate::error::LedgerError;
use crate::sim::RoundFinished;

/// Result of one submission + readback, for the round `generation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub generation: u64,
    pub reconciliation: Reconciliation,
}

/// Session side of the queue: push jobs in, drain updates out
#[derive(Debug)]
pub struct SubmissionHandle {
    jobs: UnboundedSender<RoundFinished>,
    updates: UnboundedReceiver<LedgerUpdate>,
}

impl SubmissionHandle {
    /// Queue a finished round. Returns false if the worker is gone.
    pub fn enqueue(&self, job: RoundFinished) -> bool {
        let generation = job.generation;
        match self.jobs.send(job) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Submission worker stopped; round {generation} not submitted");
                false
            }
        }
    }

    /// Next finished update, without waiting
    pub fn try_next(&mut self) -> Option<LedgerUpdate> {
        self.updates.try_recv().ok()
    }

    /// Wait for the next update (None once the worker has exited)
    pub async fn next(&mut self) -> Option<LedgerUpdate> {
        self.updates.recv().await
    }
}

/// Worker side of the queue
pub struct SubmissionWorker<L> {
    client: L,
    jobs: UnboundedReceiver<RoundFinished>,
    updates: UnboundedSender<LedgerUpdate>,
    timeout: Duration,
}

/// Wire a session handle to a worker driving `client`
pub fn submission_channel<L: LedgerClient>(
    client: L,
    timeout: Duration,
) -> (SubmissionHandle, SubmissionWorker<L>) {
    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    (
        SubmissionHandle {
            jobs: jobs_tx,
            updates: updates_rx,
        },
        SubmissionWorker {
            client,
            jobs: jobs_rx,
            updates: updates_tx,
            timeout,
        },
    )
}

impl<L: LedgerClient> SubmissionWorker<L> {
    /// Process jobs until the session drops its handle
    pub async fn run(mut self) {
        while let Some(job) = self.jobs.recv().await {
            let update = self.process(job).await;
            if self.updates.send(update).is_err() {
                log::debug!("Session gone; submission worker exiting");
                break;
            }
        }
    }

    /// Submit one round and reconcile it against the ledger
    pub async fn process(&self, job: RoundFinished) -> LedgerUpdate {
        let generation = job.generation;
        let request = &job.request;

        if let Err(err) = self.bounded(self.client.submit(request)).await {
            log::warn!("Round {generation}: submission failed: {err}");
            return LedgerUpdate {
                generation,
                reconciliation: Reconciliation::Unavailable {
                    reason: err.to_string(),
                },
            };
        }

        let reconciliation = match self
            .bounded(self.client.latest_record(&request.owner_identity))
            .await
        {
            Ok(latest) => Reconciliation::classify(request, latest),
            Err(err) => {
                log::warn!("Round {generation}: readback failed: {err}");
                Reconciliation::Unavailable {
                    reason: err.to_string(),
                }
            }
        };

        match &reconciliation {
            Reconciliation::Confirmed { .. } => {
                log::info!("Round {generation}: ledger confirmed {}", request.moves_hash)
            }
            Reconciliation::Mismatch { record, .. } => log::warn!(
                "Round {generation}: ledger latest {} differs from submitted {}",
                record.moves_hash,
                request.moves_hash
            ),
            other => log::debug!("Round {generation}: {other:?}"),
        }

        LedgerUpdate {
            generation,
            reconciliation,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, LedgerError>>,
    ) -> Result<T, LedgerError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(
                self.timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            )),
        }
    }

    // No timer driver in the browser; the JS side owns its own timeouts
    #[cfg(target_arch = "wasm32")]
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, LedgerError>>,
    ) -> Result<T, LedgerError> {
        call.await
    }
}
