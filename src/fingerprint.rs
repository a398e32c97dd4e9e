//! Move fingerprints
//!
//! A round's move history is serialized to a canonical JSON form and hashed
//! with SHA-256. Two implementations agree on the digest iff they agree on:
//!
//! - compact JSON, no whitespace
//! - one object per move, keys in the order `x`, `y`, `t`, `phase`
//! - `x`/`y` written as integer literals when integral (`497`, never
//!   `497.0`), otherwise as the shortest round-trip decimal
//! - `t` as unsigned integer milliseconds
//! - `phase` as `"GO"` or `"FREEZE"`
//!
//! The digest is reported as 64 lowercase hex characters.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::ledger::OwnerId;
use crate::sim::{MoveEvent, Phase, RoundOutcome};

/// Largest magnitude for which every integer is exactly representable in f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Coordinate formatted the way `JSON.stringify` formats integral numbers
#[derive(Clone, Copy)]
struct CanonicalNumber(f64);

impl Serialize for CanonicalNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        debug_assert!(v.is_finite(), "non-finite coordinate {v} in move history");
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

#[derive(Serialize)]
struct CanonicalMove {
    x: CanonicalNumber,
    y: CanonicalNumber,
    t: u64,
    phase: Phase,
}

impl From<&MoveEvent> for CanonicalMove {
    fn from(event: &MoveEvent) -> Self {
        Self {
            x: CanonicalNumber(event.x),
            y: CanonicalNumber(event.y),
            t: event.timestamp,
            phase: event.phase,
        }
    }
}

/// Canonical JSON text of a move sequence
pub fn canonical_json(moves: &[MoveEvent]) -> String {
    let canonical: Vec<CanonicalMove> = moves.iter().map(CanonicalMove::from).collect();
    serde_json::to_string(&canonical).expect("numbers and strings always serialize")
}

/// SHA-256 digest of a canonical move sequence
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(moves: &[MoveEvent]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical_json(moves).as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

/// What gets recorded on the ledger for one finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub owner_identity: OwnerId,
    pub won: bool,
    pub moves_hash: String,
}

/// Build the ledger submission for a finished round
pub fn finalize(outcome: RoundOutcome, moves: &[MoveEvent], owner: &OwnerId) -> SubmissionRequest {
    debug_assert!(outcome.is_terminal(), "finalize called on an unfinished round");
    SubmissionRequest {
        owner_identity: owner.clone(),
        won: outcome == RoundOutcome::Victory,
        moves_hash: Fingerprint::of(moves).to_hex(),
    }
}
