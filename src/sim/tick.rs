//! Single simulation tick
//!
//! Order within a tick is fixed: scheduler, movement, history, judge. The judge
//! always sees the phase the scheduler produced for this same tick.

use serde::{Deserialize, Serialize};

use super::history::MoveHistory;
use super::judge::evaluate;
use super::movement::{DirectionInput, step};
use super::scheduler::PhaseScheduler;
use super::state::{MoveEvent, Phase, PlayerState, RoundOutcome};
use crate::ledger::OwnerId;
use crate::platform::RandomSource;
use crate::settings::GameConfig;

/// Everything one round owns. Built fresh by every start/restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub generation: u64,
    pub owner: OwnerId,
    pub started_at_ms: u64,
    pub player: PlayerState,
    pub history: MoveHistory,
    pub scheduler: PhaseScheduler,
    pub outcome: RoundOutcome,
    pub goal_line_y: f64,
    /// Ticks processed this round
    pub ticks: u64,
}

impl RoundState {
    pub fn new(
        generation: u64,
        owner: OwnerId,
        now: u64,
        config: &GameConfig,
        rng: &mut impl RandomSource,
    ) -> Self {
        Self {
            generation,
            owner,
            started_at_ms: now,
            player: PlayerState::spawn(config),
            history: MoveHistory::new(),
            scheduler: PhaseScheduler::new(now, config.flip_dwell, config.reset_dwell, rng),
            outcome: RoundOutcome::None,
            goal_line_y: config.goal_line_y,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }
}

/// What happened on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub phase: Phase,
    pub displaced: bool,
    pub outcome: RoundOutcome,
}

/// Advance a running round by one tick.
///
/// Panics in debug builds if the round already has a terminal outcome.
pub fn tick(
    round: &mut RoundState,
    input: DirectionInput,
    now: u64,
    rng: &mut impl RandomSource,
) -> TickReport {
    debug_assert!(
        !round.outcome.is_terminal(),
        "tick on a finished round (generation {}, outcome {:?})",
        round.generation,
        round.outcome
    );

    round.ticks += 1;

    let phase = round.scheduler.tick(now, rng);

    let (player, displaced) = step(round.player, input);
    round.player = player;

    if displaced {
        round.history.record(MoveEvent {
            x: player.pos.x,
            y: player.pos.y,
            timestamp: now,
            phase,
        });
    }

    let outcome = evaluate(phase, displaced, &round.player, round.goal_line_y);
    round.outcome = outcome;

    TickReport {
        phase,
        displaced,
        outcome,
    }
}
