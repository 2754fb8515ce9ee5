//! Timed campaign loop.
//!
//! [`run_campaign`] drives a [`SimulationOrchestrator`] from a tokio
//! interval until one of the following happens:
//!
//! - **Game over**: a lose condition or a lost election ended the campaign
//! - **Turn limit**: `max_turns` turns ran in this session
//! - **Shutdown**: the shutdown future resolved (Ctrl-C in the binary)
//!
//! The orchestrator itself is synchronous; the loop only decides when the
//! next turn runs.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use electorate_core::{ActionRejected, SimulationOrchestrator, TurnSummary};

/// Why the campaign loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignEndReason {
    /// The campaign ended in-game.
    GameOver {
        /// Short reason, e.g. "Bankruptcy".
        reason: String,
    },
    /// The configured number of turns ran.
    MaxTurnsReached,
    /// A shutdown was requested.
    Interrupted,
}

/// Result of one engine session.
#[derive(Debug)]
pub struct CampaignResult {
    /// Why the loop stopped.
    pub end_reason: CampaignEndReason,
    /// The last turn that completed, if any.
    pub final_summary: Option<TurnSummary>,
    /// Turns run in this session.
    pub total_turns: u32,
}

fn game_over_reason(sim: &SimulationOrchestrator) -> CampaignEndReason {
    CampaignEndReason::GameOver {
        reason: sim
            .game_over()
            .map_or_else(|| "Unknown".to_owned(), |over| over.reason.clone()),
    }
}

/// Run turns every `turn_interval` until the campaign ends, `max_turns`
/// turns have run (0 = no limit), or `shutdown` resolves.
///
/// A campaign that has not started is started on the first turn.
pub async fn run_campaign(
    sim: &mut SimulationOrchestrator,
    turn_interval: Duration,
    max_turns: u32,
    shutdown: impl Future<Output = ()>,
) -> CampaignResult {
    let mut final_summary: Option<TurnSummary> = None;
    let mut total_turns: u32 = 0;

    let mut ticker = (!turn_interval.is_zero()).then(|| {
        let mut interval = tokio::time::interval(turn_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    tokio::pin!(shutdown);

    info!(
        turn = sim.turn(),
        max_turns,
        turn_interval_ms = turn_interval.as_millis(),
        "Campaign loop starting"
    );

    loop {
        // --- Check game over (before turn) ---
        if sim.is_game_over() {
            return CampaignResult {
                end_reason: game_over_reason(sim),
                final_summary,
                total_turns,
            };
        }

        // --- Check turn limit ---
        if max_turns > 0 && total_turns >= max_turns {
            info!(total_turns, max_turns, "Turn limit reached");
            return CampaignResult {
                end_reason: CampaignEndReason::MaxTurnsReached,
                final_summary,
                total_turns,
            };
        }

        // --- Wait for the next turn or a shutdown ---
        let interrupted = match ticker.as_mut() {
            Some(interval) => {
                tokio::select! {
                    biased;
                    () = &mut shutdown => true,
                    _ = interval.tick() => false,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = &mut shutdown => true,
                    () = tokio::task::yield_now() => false,
                }
            }
        };
        if interrupted {
            info!(turn = sim.turn(), "Shutdown requested");
            return CampaignResult {
                end_reason: CampaignEndReason::Interrupted,
                final_summary,
                total_turns,
            };
        }

        // --- Run the turn ---
        let outcome = if sim.has_started() {
            sim.run_turn()
        } else {
            sim.begin_game()
        };
        match outcome {
            Ok(summary) => {
                total_turns = total_turns.saturating_add(1);
                if let Some(party) = &summary.spawned_party {
                    info!(turn = summary.turn, party = %party, "Party entered the race");
                }
                final_summary = Some(summary);
            }
            Err(ActionRejected::GameOver) => {}
            Err(rejection) => {
                warn!(error = %rejection, "Turn refused");
                return CampaignResult {
                    end_reason: game_over_reason(sim),
                    final_summary,
                    total_turns,
                };
            }
        }
    }
}

/// Log how the session ended.
pub fn log_campaign_end(result: &CampaignResult, sim: &SimulationOrchestrator) {
    info!(
        reason = ?result.end_reason,
        total_turns = result.total_turns,
        final_turn = result.final_summary.as_ref().map(|s| s.turn),
        "Campaign loop ended"
    );

    if let Some(summary) = &result.final_summary {
        info!(
            turn = summary.turn,
            stability = summary.stability,
            turnout = summary.turnout,
            government = %sim.government_party(),
            treasury = sim.treasury(),
            digest = %summary.digest,
            "Final turn summary"
        );
    } else {
        warn!("Campaign loop ended with no turns executed");
    }

    if let Some(over) = sim.game_over() {
        info!(reason = %over.reason, detail = %over.detail, "Campaign outcome");
    }
}
