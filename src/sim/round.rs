//! Round lifecycle controller
//!
//! `Idle -> Running -> {Violation | Victory} -> (restart) -> Running`.
//! Idle and the terminal states ignore ticks; only `start`/`restart` leave them.

use serde::{Deserialize, Serialize};

use super::movement::DirectionInput;
use super::state::{Phase, PlayerState, RoundOutcome, RoundStatus};
use super::tick::{RoundState, TickReport, tick};
use crate::error::GameError;
use crate::fingerprint::{SubmissionRequest, finalize};
use crate::ledger::OwnerId;
use crate::platform::RandomSource;
use crate::settings::GameConfig;

/// Emitted exactly once per round, on the tick the outcome became terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFinished {
    pub generation: u64,
    pub outcome: RoundOutcome,
    pub request: SubmissionRequest,
}

#[derive(Debug, Clone)]
pub struct RoundController {
    config: GameConfig,
    status: RoundStatus,
    generation: u64,
    round: Option<RoundState>,
}

impl RoundController {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            status: RoundStatus::Idle,
            generation: 0,
            round: None,
        })
    }

    /// `Idle -> Running`. Also the restart path from a terminal state.
    ///
    /// Rejected without touching any state if no identity is connected or a
    /// round is already running. Returns the new round generation.
    pub fn start(
        &mut self,
        owner: Option<&OwnerId>,
        now: u64,
        rng: &mut impl RandomSource,
    ) -> Result<u64, GameError> {
        let owner = owner.ok_or(GameError::MissingIdentity)?;
        if self.status == RoundStatus::Running {
            return Err(GameError::RoundInProgress {
                generation: self.generation,
            });
        }

        self.generation += 1;
        // Replace the round wholesale so nothing leaks across generations
        self.round = Some(RoundState::new(
            self.generation,
            owner.clone(),
            now,
            &self.config,
            rng,
        ));
        self.status = RoundStatus::Running;

        log::info!("Round {} started for {}", self.generation, owner);
        Ok(self.generation)
    }

    /// `{Violation | Victory} -> Running`
    pub fn restart(
        &mut self,
        owner: Option<&OwnerId>,
        now: u64,
        rng: &mut impl RandomSource,
    ) -> Result<u64, GameError> {
        self.start(owner, now, rng)
    }

    /// Process one tick. Returns the finished-round event on the terminal tick.
    pub fn tick(
        &mut self,
        input: DirectionInput,
        now: u64,
        rng: &mut impl RandomSource,
    ) -> Option<RoundFinished> {
        if self.status != RoundStatus::Running {
            return None;
        }
        let round = self.round.as_mut()?;

        let TickReport { outcome, .. } = tick(round, input, now, rng);
        let status = match outcome {
            RoundOutcome::None => return None,
            RoundOutcome::Violation => RoundStatus::Violation,
            RoundOutcome::Victory => RoundStatus::Victory,
        };
        self.status = status;

        let request = finalize(outcome, round.history.snapshot(), &round.owner);
        log::info!(
            "Round {} ended: {:?} after {} ticks, {} moves, hash {}",
            round.generation,
            outcome,
            round.ticks,
            round.history.len(),
            request.moves_hash
        );

        Some(RoundFinished {
            generation: round.generation,
            outcome,
            request,
        })
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.status.outcome()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Phase on display (GO before the first round)
    pub fn phase(&self) -> Phase {
        self.round.as_ref().map_or(Phase::Go, RoundState::phase)
    }

    /// Player on display (spawn position before the first round)
    pub fn player(&self) -> PlayerState {
        self.round
            .as_ref()
            .map_or_else(|| PlayerState::spawn(&self.config), |r| r.player)
    }

    pub fn can_restart(&self) -> bool {
        self.status.is_terminal()
    }
}
