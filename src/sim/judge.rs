//! Violation & victory detector

use super::state::{Phase, PlayerState, RoundOutcome};

/// Classify a tick. Violation is checked before victory, so moving across the
/// goal line during a freeze still loses.
///
/// Must not be called once a round is terminal; the round controller gates that.
pub fn evaluate(
    phase: Phase,
    displaced: bool,
    player: &PlayerState,
    goal_line_y: f64,
) -> RoundOutcome {
    if phase == Phase::Freeze && displaced {
        RoundOutcome::Violation
    } else if player.pos.y <= goal_line_y {
        RoundOutcome::Victory
    } else {
        RoundOutcome::None
    }
}
