//! Turn notifications.
//!
//! The orchestrator reports two things to the outside world: a turn
//! finished, and the campaign ended. Observers receive them synchronously
//! at the end of the turn that caused them.

/// Receives turn and game-end notifications.
pub trait TurnObserver: Send {
    /// A turn finished (or a snapshot was restored at this turn).
    fn on_turn_completed(&mut self, turn: u32);

    /// The campaign ended. Called at most once per campaign.
    fn on_game_ended(&mut self, reason: &str, detail: &str);
}

/// An observer that ignores everything.
pub struct NoOpObserver;

impl TurnObserver for NoOpObserver {
    fn on_turn_completed(&mut self, _turn: u32) {}

    fn on_game_ended(&mut self, _reason: &str, _detail: &str) {}
}
