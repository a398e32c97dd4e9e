//! Game session
//!
//! Glue between the outside world and the round controller: holds the
//! connected identity, feeds clock/random capabilities into each tick, hands
//! finished rounds to the submission worker, and applies ledger updates that
//! still belong to the current round. Renderers only ever see [`Snapshot`]s.

use serde::Serialize;

use crate::error::GameError;
use crate::ledger::{LedgerUpdate, OwnerId, Reconciliation, SubmissionHandle, SubmissionRecord};
use crate::platform::{Clock, RandomSource};
use crate::settings::GameConfig;
use crate::sim::{DirectionInput, Phase, PlayerState, RoundController, RoundOutcome, RoundStatus};

/// Read-only view for a rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub status: RoundStatus,
    pub outcome: RoundOutcome,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub phase_color: &'static str,
    pub banner: Option<&'static str>,
    pub can_restart: bool,
    pub player: PlayerState,
    pub moves: usize,
    pub arena: (f64, f64),
    pub finish_line_height: f64,
    pub connected: bool,
    pub reconciliation: Reconciliation,
    pub latest_record: Option<SubmissionRecord>,
}

pub struct GameSession<C, R> {
    controller: RoundController,
    clock: C,
    rng: R,
    identity: Option<OwnerId>,
    submissions: SubmissionHandle,
    reconciliation: Reconciliation,
}

impl<C: Clock, R: RandomSource> GameSession<C, R> {
    pub fn new(
        config: GameConfig,
        clock: C,
        rng: R,
        submissions: SubmissionHandle,
    ) -> Result<Self, GameError> {
        Ok(Self {
            controller: RoundController::new(config)?,
            clock,
            rng,
            identity: None,
            submissions,
            reconciliation: Reconciliation::Pending,
        })
    }

    /// Wallet connected
    pub fn connect(&mut self, owner: OwnerId) {
        log::info!("Identity connected: {owner}");
        self.identity = Some(owner);
    }

    /// Wallet disconnected. A running round keeps the identity it started with.
    pub fn disconnect(&mut self) {
        if let Some(owner) = self.identity.take() {
            log::info!("Identity disconnected: {owner}");
        }
    }

    pub fn identity(&self) -> Option<&OwnerId> {
        self.identity.as_ref()
    }

    /// Start a round (from idle) or restart one (from a finished round)
    pub fn start(&mut self) -> Result<u64, GameError> {
        let now = self.clock.now_ms();
        let generation = self
            .controller
            .start(self.identity.as_ref(), now, &mut self.rng)?;
        self.reconciliation = Reconciliation::Pending;
        Ok(generation)
    }

    pub fn restart(&mut self) -> Result<u64, GameError> {
        self.start()
    }

    /// Run one frame: drain ledger results, then advance the simulation
    pub fn tick(&mut self, input: DirectionInput) -> RoundStatus {
        self.poll_ledger();

        let now = self.clock.now_ms();
        if let Some(finished) = self.controller.tick(input, now, &mut self.rng) {
            if !self.submissions.enqueue(finished) {
                self.reconciliation = Reconciliation::Unavailable {
                    reason: "submission worker stopped".into(),
                };
            }
        }
        self.controller.status()
    }

    /// Apply every ledger update that has arrived. Returns how many applied.
    pub fn poll_ledger(&mut self) -> usize {
        let mut applied = 0;
        while let Some(update) = self.submissions.try_next() {
            if self.apply_update(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one update; results from an older round generation are dropped
    pub fn apply_update(&mut self, update: LedgerUpdate) -> bool {
        let current = self.controller.generation();
        if update.generation != current {
            log::debug!(
                "Dropping stale ledger result for round {} (current {})",
                update.generation,
                current
            );
            return false;
        }
        self.reconciliation = update.reconciliation;
        true
    }

    /// Wait for the worker's next result and apply it (false if stale or closed)
    pub async fn await_ledger(&mut self) -> bool {
        match self.submissions.next().await {
            Some(update) => self.apply_update(update),
            None => false,
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.controller.status()
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.controller.outcome()
    }

    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    /// Ledger record for the current round, if one has been read back
    pub fn latest_record(&self) -> Option<&SubmissionRecord> {
        self.reconciliation.record()
    }

    pub fn snapshot(&self) -> Snapshot {
        let controller = &self.controller;
        let config = controller.config();
        let phase = controller.phase();
        let outcome = controller.outcome();
        Snapshot {
            generation: controller.generation(),
            status: controller.status(),
            outcome,
            phase,
            phase_label: phase.label(),
            phase_color: phase.color(),
            banner: outcome.banner(),
            can_restart: controller.can_restart(),
            player: controller.player(),
            moves: controller.round().map_or(0, |r| r.history.len()),
            arena: (config.arena_width, config.arena_height),
            finish_line_height: config.finish_line_height,
            connected: self.identity.is_some(),
            reconciliation: self.reconciliation.clone(),
            latest_record: self.latest_record().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InMemoryLedger, SubmissionWorker, submission_channel};
    use crate::platform::{ManualClock, ScriptedRandom};
    use std::rc::Rc;
    use std::time::Duration;

    type Session = GameSession<Rc<ManualClock>, ScriptedRandom>;

    fn session() -> (Session, Rc<ManualClock>, SubmissionWorker<InMemoryLedger>) {
        let clock = Rc::new(ManualClock::new(0));
        let (handle, worker) = submission_channel(InMemoryLedger::new(), Duration::from_secs(1));
        let session = GameSession::new(
            GameConfig::default(),
            clock.clone(),
            ScriptedRandom::constant(0.0),
            handle,
        )
        .unwrap();
        (session, clock, worker)
    }

    #[test]
    fn start_without_identity_is_blocked() {
        let (mut s, _, _) = session();
        assert!(matches!(s.start(), Err(GameError::MissingIdentity)));
        assert_eq!(s.status(), RoundStatus::Idle);
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn stale_update_is_dropped() {
        let (mut s, clock, _) = session();
        s.connect(OwnerId::new("0xabc"));
        s.start().unwrap();
        clock.set(2001);
        assert_eq!(s.tick(DirectionInput::UP), RoundStatus::Violation);
        s.restart().unwrap();

        let stale = LedgerUpdate {
            generation: 1,
            reconciliation: Reconciliation::NotFound,
        };
        assert!(!s.apply_update(stale));
        assert_eq!(s.reconciliation(), &Reconciliation::Pending);

        let fresh = LedgerUpdate {
            generation: 2,
            reconciliation: Reconciliation::NotFound,
        };
        assert!(s.apply_update(fresh));
        assert_eq!(s.reconciliation(), &Reconciliation::NotFound);
    }

    #[test]
    fn snapshot_reflects_round() {
        let (mut s, clock, _) = session();
        let idle = s.snapshot();
        assert_eq!(idle.status, RoundStatus::Idle);
        assert_eq!(idle.phase_label, "Green Light");
        assert!(!idle.connected);

        s.connect(OwnerId::new("0xabc"));
        s.start().unwrap();
        clock.advance(16);
        s.tick(DirectionInput::UP);
        let snap = s.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.player.pos.y, 497.0);
        assert_eq!(snap.moves, 1);
        assert!(!snap.can_restart);
        assert!(snap.latest_record.is_none());
    }

    #[test]
    fn stopped_worker_marks_round_unavailable() {
        let (mut s, clock, worker) = session();
        drop(worker);
        s.connect(OwnerId::new("0xabc"));
        s.start().unwrap();
        clock.set(2001);
        assert_eq!(s.tick(DirectionInput::UP), RoundStatus::Violation);
        assert!(matches!(
            s.reconciliation(),
            Reconciliation::Unavailable { reason } if reason.contains("worker stopped")
        ));
        assert!(s.latest_record().is_none());
    }

    #[tokio::test]
    async fn finished_round_reconciles() {
        let (mut s, clock, worker) = session();
        s.connect(OwnerId::new("0xabc"));
        s.start().unwrap();
        clock.set(2001);
        s.tick(DirectionInput::UP);
        assert_eq!(s.status(), RoundStatus::Violation);

        let worker = worker.run();
        tokio::pin!(worker);
        let applied = tokio::select! {
            applied = s.await_ledger() => applied,
            _ = &mut worker => false,
        };
        assert!(applied);
        let record = s.latest_record().expect("record");
        assert!(!record.won);
        assert_eq!(s.snapshot().banner, Some("You were caught moving!"));
    }
}
