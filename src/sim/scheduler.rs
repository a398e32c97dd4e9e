//! Signal phase scheduler
//!
//! Flips GO <-> FREEZE once the current dwell has strictly elapsed, then
//! draws a fresh dwell. Pure with respect to the injected clock value and
//! random source.

use serde::{Deserialize, Serialize};

use super::state::Phase;
use crate::platform::RandomSource;
use crate::settings::DwellRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseScheduler {
    phase: Phase,
    last_switch_ms: u64,
    dwell_ms: f64,
    flip_dwell: DwellRange,
    /// Number of flips since the last reset
    flips: u32,
}

impl PhaseScheduler {
    /// Start in GO at `now`, with a dwell drawn from `reset_dwell`.
    ///
    /// Start/restart deliberately use a different range than mid-round
    /// flips; see `reset_uses_reset_range` in the tests.
    pub fn new(
        now: u64,
        flip_dwell: DwellRange,
        reset_dwell: DwellRange,
        rng: &mut impl RandomSource,
    ) -> Self {
        Self {
            phase: Phase::Go,
            last_switch_ms: now,
            dwell_ms: reset_dwell.sample(rng.next_unit()),
            flip_dwell,
            flips: 0,
        }
    }

    /// Advance to `now` and return the phase in force for this tick
    pub fn tick(&mut self, now: u64, rng: &mut impl RandomSource) -> Phase {
        let elapsed = now.saturating_sub(self.last_switch_ms) as f64;
        if elapsed > self.dwell_ms {
            self.phase = self.phase.flipped();
            self.last_switch_ms = now;
            self.dwell_ms = self.flip_dwell.sample(rng.next_unit());
            self.flips += 1;
            log::debug!(
                "Phase -> {:?} at {} ms (next dwell {:.0} ms)",
                self.phase,
                now,
                self.dwell_ms
            );
        }
        self.phase
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dwell_ms(&self) -> f64 {
        self.dwell_ms
    }

    pub fn last_switch_ms(&self) -> u64 {
        self.last_switch_ms
    }

    pub fn flips(&self) -> u32 {
        self.flips
    }
}
