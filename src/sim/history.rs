//! Append-only move history for the current round

use serde::{Deserialize, Serialize};

use super::state::MoveEvent;

/// Ordered record of every tick that carried movement intent.
/// Append order is temporal order; entries are never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    events: Vec<MoveEvent>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, event: MoveEvent) {
        debug_assert!(
            self.events
                .last()
                .is_none_or(|last| last.timestamp <= event.timestamp),
            "move history must be appended in time order"
        );
        self.events.push(event);
    }

    /// Read-only view of the full sequence
    pub fn snapshot(&self) -> &[MoveEvent] {
        &self.events
    }

    /// Drop every entry (round start only)
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
