//! Error types
//!
//! Only `GameError` ever reaches a player. `LedgerError` is absorbed by the
//! submission worker and turned into a `Reconciliation::Unavailable`.

/// Rejections surfaced to whoever drives the session
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no wallet identity connected; connect before starting a round")]
    MissingIdentity,
    #[error("a round is already running (generation {generation})")]
    RoundInProgress { generation: u64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures reported by (or while talking to) the ledger collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger rejected submission: {0}")]
    Rejected(String),
    #[error("ledger call timed out after {0} ms")]
    Timeout(u64),
    #[error("ledger transport failure: {0}")]
    Transport(String),
    #[error("ledger returned malformed data: {0}")]
    Malformed(String),
}

/// Invalid or unreadable tunables
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} dwell range must satisfy 0 < min <= max (got {min}..{max})")]
    InvalidDwell { name: &'static str, min: f64, max: f64 },
    #[error("{name} must be a finite number (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error("player speed must be positive (got {0})")]
    NonPositiveSpeed(f64),
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
}
