//! Red Light / Green Light native entry point
//!
//! Headless: plays scripted rounds against an in-memory ledger and logs what
//! happened. The browser build is driven from JS through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::rc::Rc;
    use std::time::Duration;

    use redlight::ledger::{InMemoryLedger, OwnerId, submission_channel};
    use redlight::platform::{Clock, ManualClock, PcgRandom};
    use redlight::sim::{DirectionInput, Phase, RoundStatus};
    use redlight::{GameConfig, GameError, GameSession};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: u64 = 16;
    /// Give up on a round after this many frames
    const MAX_FRAMES: u32 = 20_000;

    type Session = GameSession<Rc<ManualClock>, PcgRandom>;

    /// How the scripted player behaves
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Style {
        /// Moves only on ticks it knows will be green
        Careful,
        /// Holds UP no matter what
        Reckless,
    }

    /// Peek at the scheduler to tell whether the tick at `now` will be green
    fn green_at(session: &Session, now: u64) -> bool {
        let Some(round) = session.controller().round() else {
            return false;
        };
        let scheduler = &round.scheduler;
        let elapsed = now.saturating_sub(scheduler.last_switch_ms()) as f64;
        let phase = if elapsed > scheduler.dwell_ms() {
            scheduler.phase().flipped()
        } else {
            scheduler.phase()
        };
        phase == Phase::Go
    }

    fn play_round(session: &mut Session, clock: &ManualClock, style: Style) -> RoundStatus {
        for _ in 0..MAX_FRAMES {
            clock.advance(FRAME_MS);
            let move_now = match style {
                Style::Careful => green_at(session, clock.now_ms()),
                Style::Reckless => true,
            };
            let input = if move_now {
                DirectionInput::UP
            } else {
                DirectionInput::NONE
            };
            let status = session.tick(input);
            if status.is_terminal() {
                return status;
            }
        }
        log::warn!("Round did not finish within {MAX_FRAMES} frames");
        session.status()
    }

    fn load_config() -> Result<GameConfig, GameError> {
        match std::env::var("REDLIGHT_CONFIG") {
            Ok(path) => Ok(GameConfig::load_from(path)?),
            Err(_) => Ok(GameConfig::default()),
        }
    }

    async fn play(config: GameConfig, seed: u64) -> Result<(), GameError> {
        let ledger = Rc::new(InMemoryLedger::new());
        let timeout = Duration::from_millis(config.ledger_timeout_ms);
        let (handle, worker) = submission_channel(ledger.clone(), timeout);
        tokio::task::spawn_local(worker.run());

        let clock = Rc::new(ManualClock::new(0));
        let mut session = GameSession::new(config, clock.clone(), PcgRandom::new(seed), handle)?;
        session.connect(OwnerId::new("0xdemo"));

        for style in [Style::Careful, Style::Reckless] {
            session.start()?;
            let status = play_round(&mut session, &clock, style);
            log::info!("{style:?} round finished: {status:?}");

            if status.is_terminal() && !session.await_ledger().await {
                log::warn!("No ledger result for round {}", session.generation());
            }

            let snapshot = session.snapshot();
            log::info!(
                "Round {}: {} | on-ledger: {:?}",
                snapshot.generation,
                snapshot.banner.unwrap_or("in progress"),
                snapshot.latest_record
            );
        }

        log::info!("Ledger holds {} records", ledger.len());
        Ok(())
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse::<u64>().ok())
            .unwrap_or(12345);
        let config = load_config()?;
        log::info!("Red Light / Green Light (native) seed {seed}");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, play(config, seed))?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
