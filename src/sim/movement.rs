//! Movement evaluator
//!
//! Each held direction moves the player `speed` units along its axis. Axes are
//! independent, so a diagonal covers `speed` on both x and y (no
//! normalization). There is no arena clamping.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::PlayerState;

/// Directional input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionInput {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const UP: Self = Self {
        up: true,
        ..Self::NONE
    };

    /// True if any direction is held
    #[inline]
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Apply one tick of input.
///
/// `displaced` reports intent: it is true whenever a key is held, even if
/// opposing keys cancel out and the position ends up unchanged.
pub fn step(player: PlayerState, input: DirectionInput) -> (PlayerState, bool) {
    let mut delta = DVec2::ZERO;
    if input.up {
        delta.y -= player.speed;
    }
    if input.down {
        delta.y += player.speed;
    }
    if input.left {
        delta.x -= player.speed;
    }
    if input.right {
        delta.x += player.speed;
    }

    let moved = PlayerState {
        pos: player.pos + delta,
        ..player
    };
    (moved, input.any())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;

    fn player() -> PlayerState {
        PlayerState::spawn(&GameConfig::default())
    }

    #[test]
    fn idle_input_does_not_move() {
        let (p, displaced) = step(player(), DirectionInput::NONE);
        assert_eq!(p.pos, DVec2::new(100.0, 500.0));
        assert!(!displaced);
    }

    #[test]
    fn up_decreases_y() {
        let (p, displaced) = step(player(), DirectionInput::UP);
        assert_eq!(p.pos, DVec2::new(100.0, 497.0));
        assert!(displaced);
    }

    #[test]
    fn diagonal_is_not_normalized() {
        let input = DirectionInput {
            up: true,
            left: true,
            ..Default::default()
        };
        let (p, _) = step(player(), input);
        assert_eq!(p.pos, DVec2::new(97.0, 497.0));
    }

    #[test]
    fn opposing_keys_still_count_as_displaced() {
        let input = DirectionInput {
            left: true,
            right: true,
            ..Default::default()
        };
        let (p, displaced) = step(player(), input);
        assert_eq!(p.pos, player().pos);
        assert!(displaced);
    }

    #[test]
    fn no_clamping_at_arena_edge() {
        let mut start = player();
        start.pos = DVec2::new(1.0, 1.0);
        let input = DirectionInput {
            up: true,
            left: true,
            ..Default::default()
        };
        let (p, _) = step(start, input);
        assert_eq!(p.pos, DVec2::new(-2.0, -2.0));
    }
}
