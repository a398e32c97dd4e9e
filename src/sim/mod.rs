//! Deterministic round simulation
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Time arrives as an argument, never read ambiently
//! - Randomness comes from an injected `RandomSource`
//! - One tick is processed to completion before the next
//! - No rendering, input capture or network dependencies

pub mod history;
pub mod judge;
pub mod movement;
pub mod round;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use history::MoveHistory;
pub use judge::evaluate;
pub use movement::{DirectionInput, step};
pub use round::{RoundController, RoundFinished};
pub use scheduler::PhaseScheduler;
pub use state::{MoveEvent, Phase, PlayerState, RoundOutcome, RoundStatus};
pub use tick::{RoundState, TickReport, tick};
