//! End-to-end round scenarios driven through `GameSession`

use std::rc::Rc;
use std::time::Duration;

use redlight::error::LedgerError;
use redlight::fingerprint::{Fingerprint, SubmissionRequest, finalize};
use redlight::ledger::{
    InMemoryLedger, LedgerClient, OwnerId, Reconciliation, SubmissionRecord, submission_channel,
};
use redlight::platform::{Clock, ManualClock, ScriptedRandom};
use redlight::sim::{DirectionInput, MoveEvent, Phase, RoundController, RoundOutcome, RoundStatus};
use redlight::{GameConfig, GameSession};

const FRAME_MS: u64 = 16;

type Session = GameSession<Rc<ManualClock>, ScriptedRandom>;

fn owner() -> OwnerId {
    OwnerId::new("0x5eed")
}

fn session_with<L: LedgerClient>(
    ledger: L,
    timeout: Duration,
) -> (Session, Rc<ManualClock>, redlight::ledger::SubmissionWorker<L>) {
    let clock = Rc::new(ManualClock::new(0));
    let (handle, worker) = submission_channel(ledger, timeout);
    let mut session = GameSession::new(
        GameConfig::default(),
        clock.clone(),
        ScriptedRandom::constant(0.0),
        handle,
    )
    .unwrap();
    session.connect(owner());
    (session, clock, worker)
}

/// True if holding a key on the tick at `now` cannot be judged a violation
fn safe_to_move(session: &Session, now: u64) -> bool {
    let Some(round) = session.controller().round() else {
        return false;
    };
    let scheduler = &round.scheduler;
    let elapsed = now.saturating_sub(scheduler.last_switch_ms()) as f64;
    let flips_now = elapsed > scheduler.dwell_ms();
    let phase_now = if flips_now {
        scheduler.phase().flipped()
    } else {
        scheduler.phase()
    };
    phase_now == Phase::Go
}

/// Hold UP only on GO ticks until the round ends
fn play_carefully(session: &mut Session, clock: &ManualClock) -> RoundStatus {
    for _ in 0..10_000 {
        clock.advance(FRAME_MS);
        let input = if safe_to_move(session, clock.now_ms()) {
            DirectionInput::UP
        } else {
            DirectionInput::NONE
        };
        let status = session.tick(input);
        if status.is_terminal() {
            return status;
        }
    }
    session.status()
}

struct FailingLedger;

impl LedgerClient for FailingLedger {
    async fn submit(&self, _: &SubmissionRequest) -> Result<(), LedgerError> {
        Err(LedgerError::Transport("ledger offline".into()))
    }

    async fn latest_record(
        &self,
        _: &OwnerId,
    ) -> Result<Option<SubmissionRecord>, LedgerError> {
        Err(LedgerError::Transport("ledger offline".into()))
    }
}

#[test]
fn scenario_a_standing_still_never_loses() {
    let ledger = InMemoryLedger::new();
    let (mut session, clock, _worker) = session_with(ledger, Duration::from_secs(1));
    session.start().unwrap();

    for _ in 0..(20_000 / FRAME_MS) {
        clock.advance(FRAME_MS);
        assert_eq!(session.tick(DirectionInput::NONE), RoundStatus::Running);
    }

    let round = session.controller().round().unwrap();
    let flips = round.scheduler.flips();
    assert!(flips >= 5, "flips: {flips}");
    assert!(round.history.is_empty());
    assert_eq!(session.outcome(), RoundOutcome::None);
}

#[test]
fn scenario_b_moving_on_red_loses_that_tick() {
    let (mut session, clock, _worker) =
        session_with(InMemoryLedger::new(), Duration::from_secs(1));
    session.start().unwrap();

    // Reset dwell is 2000 ms with a zero sample
    clock.set(2001);
    assert_eq!(session.tick(DirectionInput::NONE), RoundStatus::Running);
    assert_eq!(session.snapshot().phase, Phase::Freeze);

    clock.advance(FRAME_MS);
    assert_eq!(session.tick(DirectionInput::UP), RoundStatus::Violation);

    let snap = session.snapshot();
    assert_eq!(snap.outcome, RoundOutcome::Violation);
    assert_eq!(snap.banner, Some("You were caught moving!"));
    assert!(snap.can_restart);

    let history = session.controller().round().unwrap().history.snapshot();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].phase, Phase::Freeze);
}

#[tokio::test]
async fn scenario_c_careful_player_wins_and_submits_won() {
    let ledger = Rc::new(InMemoryLedger::new());
    let (mut session, clock, worker) = session_with(ledger.clone(), Duration::from_secs(1));
    session.start().unwrap();

    assert_eq!(play_carefully(&mut session, &clock), RoundStatus::Victory);
    assert!(session.snapshot().player.pos.y <= 0.0);

    let history = session.controller().round().unwrap().history.snapshot().to_vec();
    assert!(history.iter().all(|m| m.phase == Phase::Go));

    let worker = worker.run();
    tokio::pin!(worker);
    let applied = tokio::select! {
        applied = session.await_ledger() => applied,
        _ = &mut worker => false,
    };
    assert!(applied);

    let record = session.latest_record().expect("ledger record");
    assert!(record.won);
    assert_eq!(record.player, owner());
    assert_eq!(record.moves_hash, Fingerprint::of(&history).to_hex());
    assert!(matches!(session.reconciliation(), Reconciliation::Confirmed { .. }));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn scenario_d_identical_sequences_identical_hash() {
    let seq = [MoveEvent {
        x: 100.0,
        y: 497.0,
        timestamp: 1,
        phase: Phase::Go,
    }];
    let a = finalize(RoundOutcome::Victory, &seq, &owner());
    let copy = seq;
    let b = finalize(RoundOutcome::Victory, &copy, &owner());
    assert_eq!(a.moves_hash, b.moves_hash);
    assert_eq!(
        a.moves_hash,
        "d38c060d7231ed5dc5653ae2770a0f6709877b098fc8fbe4ffbb5e76cd5039a2"
    );

    let changed = [MoveEvent { y: 494.0, ..seq[0] }];
    let changed_hash = finalize(RoundOutcome::Victory, &changed, &owner()).moves_hash;
    assert_ne!(changed_hash, a.moves_hash);

    // Two independent controllers fed the same inputs agree on the fingerprint
    let play = || {
        let mut rng = ScriptedRandom::constant(0.999);
        let mut controller = RoundController::new(GameConfig::default()).unwrap();
        controller.start(Some(&owner()), 0, &mut rng).unwrap();
        (1..=1000u64)
            .find_map(|t| controller.tick(DirectionInput::UP, t, &mut rng))
            .expect("round finishes")
    };
    let first = play();
    let second = play();
    assert_eq!(first.outcome, RoundOutcome::Victory);
    assert_eq!(first.request, second.request);
}

#[tokio::test]
async fn scenario_e_ledger_failure_keeps_victory_and_allows_restart() {
    let (mut session, clock, worker) = session_with(FailingLedger, Duration::from_secs(1));
    session.start().unwrap();
    assert_eq!(play_carefully(&mut session, &clock), RoundStatus::Victory);

    let worker = worker.run();
    tokio::pin!(worker);
    let applied = tokio::select! {
        applied = session.await_ledger() => applied,
        _ = &mut worker => false,
    };
    assert!(applied);

    assert_eq!(session.status(), RoundStatus::Victory);
    assert!(matches!(session.reconciliation(), Reconciliation::Unavailable { .. }));
    assert!(session.latest_record().is_none());

    assert_eq!(session.restart().unwrap(), 2);
    assert_eq!(session.status(), RoundStatus::Running);
    assert!(session.controller().round().unwrap().history.is_empty());
    assert_eq!(session.reconciliation(), &Reconciliation::Pending);
}

#[tokio::test]
async fn late_result_from_previous_round_is_ignored() {
    let (mut session, clock, worker) =
        session_with(InMemoryLedger::new(), Duration::from_secs(1));
    session.start().unwrap();
    clock.set(2001);
    session.tick(DirectionInput::UP);
    assert_eq!(session.status(), RoundStatus::Violation);

    // Restart before the worker has had a chance to run
    assert_eq!(session.restart().unwrap(), 2);

    let worker = worker.run();
    tokio::pin!(worker);
    let applied = tokio::select! {
        applied = session.await_ledger() => applied,
        _ = &mut worker => true,
    };
    assert!(!applied);
    assert_eq!(session.reconciliation(), &Reconciliation::Pending);
    assert!(session.snapshot().latest_record.is_none());
}

#[test]
fn start_without_wallet_is_refused() {
    let (mut session, _clock, _worker) =
        session_with(InMemoryLedger::new(), Duration::from_secs(1));
    session.disconnect();
    let err = session.start().unwrap_err();
    assert!(matches!(err, redlight::GameError::MissingIdentity));
    assert_eq!(session.status(), RoundStatus::Idle);
}
