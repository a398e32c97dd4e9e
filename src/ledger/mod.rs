//! External ledger collaborator
//!
//! The ledger is the system of record for finished rounds. This crate only
//! knows the shape of what it sends (`SubmissionRequest`) and what it can read
//! back (`SubmissionRecord`); everything else about the ledger is opaque.

pub mod worker;

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::fingerprint::SubmissionRequest;

pub use worker::{LedgerUpdate, SubmissionHandle, SubmissionWorker, submission_channel};

/// Opaque wallet/account identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored round result as read back from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub player: OwnerId,
    pub won: bool,
    pub moves_hash: String,
}

impl SubmissionRecord {
    /// True if this record is exactly what `request` asked to store
    pub fn matches(&self, request: &SubmissionRequest) -> bool {
        self.player == request.owner_identity
            && self.won == request.won
            && self.moves_hash == request.moves_hash
    }
}

impl From<&SubmissionRequest> for SubmissionRecord {
    fn from(request: &SubmissionRequest) -> Self {
        Self {
            player: request.owner_identity.clone(),
            won: request.won,
            moves_hash: request.moves_hash.clone(),
        }
    }
}

/// How the ledger's view of a round compares to ours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reconciliation {
    /// Nothing submitted yet for the current round
    #[default]
    Pending,
    /// Latest record equals what was submitted
    Confirmed { record: SubmissionRecord },
    /// Latest record exists but differs from what was submitted
    Mismatch {
        expected: SubmissionRequest,
        record: SubmissionRecord,
    },
    /// Ledger holds no record for this owner
    NotFound,
    /// Submission or readback failed; treated as "no result yet"
    Unavailable { reason: String },
}

impl Reconciliation {
    /// Compare a readback against what was submitted
    pub fn classify(request: &SubmissionRequest, latest: Option<SubmissionRecord>) -> Self {
        match latest {
            Some(record) if record.matches(request) => Reconciliation::Confirmed { record },
            Some(record) => Reconciliation::Mismatch {
                expected: request.clone(),
                record,
            },
            None => Reconciliation::NotFound,
        }
    }

    /// Record to display, if the ledger returned one
    pub fn record(&self) -> Option<&SubmissionRecord> {
        match self {
            Reconciliation::Confirmed { record } | Reconciliation::Mismatch { record, .. } => {
                Some(record)
            }
            _ => None,
        }
    }
}

/// The ledger collaborator
///
/// Futures are not required to be `Send`: the worker runs on a single-threaded
/// executor (a tokio `LocalSet` natively, `spawn_local` on the web).
#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// Durably record a finished round (append-only)
    async fn submit(&self, request: &SubmissionRequest) -> Result<(), LedgerError>;

    /// Most recently created record owned by `owner`, if any
    async fn latest_record(&self, owner: &OwnerId)
    -> Result<Option<SubmissionRecord>, LedgerError>;
}

impl<L: LedgerClient + ?Sized> LedgerClient for std::rc::Rc<L> {
    async fn submit(&self, request: &SubmissionRequest) -> Result<(), LedgerError> {
        (**self).submit(request).await
    }

    async fn latest_record(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<SubmissionRecord>, LedgerError> {
        (**self).latest_record(owner).await
    }
}

/// Append-only in-process ledger (native demo and tests)
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: RefCell<Vec<SubmissionRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.borrow().clone()
    }
}

impl LedgerClient for InMemoryLedger {
    async fn submit(&self, request: &SubmissionRequest) -> Result<(), LedgerError> {
        if request.moves_hash.len() != 64 {
            return Err(LedgerError::Rejected(format!(
                "moves hash must be 64 hex chars, got {}",
                request.moves_hash.len()
            )));
        }
        self.records.borrow_mut().push(SubmissionRecord::from(request));
        Ok(())
    }

    async fn latest_record(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<SubmissionRecord>, LedgerError> {
        Ok(self
            .records
            .borrow()
            .iter()
            .rev()
            .find(|record| &record.player == owner)
            .cloned())
    }
}
