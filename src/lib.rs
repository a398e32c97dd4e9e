//! Red Light / Green Light - reflex game core
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (phase scheduler, movement, judging)
//! - `fingerprint`: Canonical move serialization and SHA-256 fingerprint
//! - `ledger`: External ledger collaborator and the async submission worker
//! - `session`: Identity-gated game session exposed to renderers
//! - `platform`: Clock/randomness capabilities and web bindings
//! - `settings`: Data-driven game tunables

pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError, LedgerError};
pub use fingerprint::{Fingerprint, SubmissionRequest, finalize};
pub use ledger::{InMemoryLedger, LedgerClient, Reconciliation, SubmissionRecord};
pub use session::{GameSession, Snapshot};
pub use settings::{DwellRange, GameConfig};

/// Game configuration constants (defaults for [`GameConfig`])
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;

    /// Player spawn point (top-left of the sprite)
    pub const PLAYER_START_X: f64 = 100.0;
    pub const PLAYER_START_Y: f64 = 500.0;
    pub const PLAYER_WIDTH: f64 = 40.0;
    pub const PLAYER_HEIGHT: f64 = 60.0;
    /// Units moved per active direction per tick
    pub const PLAYER_SPEED: f64 = 3.0;

    /// Reaching this row (y <= goal) wins the round
    pub const GOAL_LINE_Y: f64 = 0.0;
    /// Height of the painted finish band at the top of the arena
    pub const FINISH_LINE_HEIGHT: f64 = 10.0;

    /// Mid-round phase dwell, in clock milliseconds
    pub const FLIP_DWELL_MIN_MS: f64 = 1000.0;
    pub const FLIP_DWELL_MAX_MS: f64 = 5000.0;
    /// Dwell drawn on round start/restart
    pub const RESET_DWELL_MIN_MS: f64 = 2000.0;
    pub const RESET_DWELL_MAX_MS: f64 = 6000.0;

    /// Upper bound on a single ledger call (native builds)
    pub const LEDGER_TIMEOUT_MS: u64 = 10_000;
}
