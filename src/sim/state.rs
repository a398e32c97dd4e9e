//! Round state and core simulation types
//!
//! Everything a round owns lives here. A new round builds these from scratch;
//! nothing is carried over from the previous generation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::settings::GameConfig;

/// Signal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Green light: movement permitted
    #[default]
    Go,
    /// Red light: any movement loses
    Freeze,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Go => Phase::Freeze,
            Phase::Freeze => Phase::Go,
        }
    }

    /// Status text shown to the player
    pub fn label(self) -> &'static str {
        match self {
            Phase::Go => "Green Light",
            Phase::Freeze => "Red Light",
        }
    }

    /// CSS color name for the status text
    pub fn color(self) -> &'static str {
        match self {
            Phase::Go => "green",
            Phase::Freeze => "red",
        }
    }
}

/// The player's sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner, arena origin at top-left, y grows downward
    pub pos: DVec2,
    /// Bounding box (width, height)
    pub size: DVec2,
    /// Units per active direction per tick
    pub speed: f64,
}

impl PlayerState {
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            pos: DVec2::new(config.start_x, config.start_y),
            size: DVec2::new(config.player_width, config.player_height),
            speed: config.player_speed,
        }
    }
}

/// One tick that carried movement intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// Position after the move
    pub x: f64,
    pub y: f64,
    /// Clock milliseconds of the tick
    pub timestamp: u64,
    /// Phase in force on that tick
    pub phase: Phase,
}

/// How a round ended (or that it has not)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    #[default]
    None,
    /// Moved during a freeze
    Violation,
    /// Reached the goal line
    Victory,
}

impl RoundOutcome {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != RoundOutcome::None
    }

    /// End-of-round message, if any
    pub fn banner(self) -> Option<&'static str> {
        match self {
            RoundOutcome::None => None,
            RoundOutcome::Violation => Some("You were caught moving!"),
            RoundOutcome::Victory => Some("You Win!"),
        }
    }
}

/// Lifecycle state of the round controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[default]
    Idle,
    Running,
    Violation,
    Victory,
}

impl RoundStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundStatus::Violation | RoundStatus::Victory)
    }

    pub fn outcome(self) -> RoundOutcome {
        match self {
            RoundStatus::Violation => RoundOutcome::Violation,
            RoundStatus::Victory => RoundOutcome::Victory,
            RoundStatus::Idle | RoundStatus::Running => RoundOutcome::None,
        }
    }
}
