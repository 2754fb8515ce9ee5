//! Turn observer that reports campaign notifications through tracing.

use tracing::{debug, warn};

use electorate_core::TurnObserver;

/// Logs every turn completion and the game-ended notification.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    turns_seen: u32,
}

impl LoggingObserver {
    /// Create an observer with no turns seen.
    pub const fn new() -> Self {
        Self { turns_seen: 0 }
    }
}

impl TurnObserver for LoggingObserver {
    fn on_turn_completed(&mut self, turn: u32) {
        self.turns_seen = self.turns_seen.saturating_add(1);
        debug!(turn, turns_seen = self.turns_seen, "Turn completed");
    }

    fn on_game_ended(&mut self, reason: &str, detail: &str) {
        warn!(reason, detail, turns_seen = self.turns_seen, "Game over");
    }
}
