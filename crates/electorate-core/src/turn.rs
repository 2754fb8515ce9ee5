//! The turn pipeline.
//!
//! [`SimulationOrchestrator::run_turn`] advances the campaign by exactly one
//! turn. The phases run in a fixed order:
//!
//! 1. tag expiry and policy tag mirroring
//! 2. policy ramps
//! 3. the event card
//! 4. neighbor diffusion and media pull
//! 5. tile simulation and national aggregation
//! 6. treasury and capital ticks, including debt stress
//! 7. faction approval and pressure
//! 8. party drift, polls and party spawning
//! 9. the scheduled election
//! 10. history, lose conditions, temporary effects and the digest
//!
//! # Invariants
//!
//! - A turn never runs once the campaign has ended, and a refused turn
//!   leaves no trace (no notification, no randomness consumed).
//! - Every random draw in a turn comes from the orchestrator's generator,
//!   in phase order.

use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use electorate_politics::election::resolve_election;
use electorate_politics::events::{EventConditions, EventOutcome, roll_event};
use electorate_politics::factions;
use electorate_politics::party::{SpawnParams, try_spawn_party};
use electorate_politics::polls::{ProjectionParams, compute_poll_shares, project_polls};
use electorate_politics::{CampaignContext, ElectionOutcome, scaled_policy_shift};
use electorate_types::IdeologyVector;
use electorate_types::math::{clamp_range, clamp_unit, lerp};
use electorate_types::policy::{CAPITAL_PER_TICK, STABILITY_OFFSET, TREASURY_PER_TICK, TURNOUT_OFFSET};
use electorate_world::{DiffusionParams, PolicyTurnEffects, apply_neighbor_diffusion};

use crate::actions::ActionRejected;
use crate::history::{HistoryPoint, turn_digest};
use crate::orchestrator::{NO_EVENT_DESCRIPTION, NO_EVENT_TITLE, SimulationOrchestrator, player_party_ref};

/// Fraction of the stability shock that survives a quiet turn.
const QUIET_SHOCK_DECAY: f64 = 0.5;
/// Fraction of the stability shock removed after tiles are simulated.
const SIMULATION_SHOCK_DECAY: f64 = 0.30;
/// How far the government moves toward a new winner's platform.
const MANDATE_BLEND: f64 = 0.12;
/// Capital left to a player who lost government with actions locked.
const OUT_OF_POWER_CAPITAL: f64 = 2.0;

/// Title and description of a faction crisis turn.
const PROTEST_TITLE: &str = "Faction Protests";
const PROTEST_DESCRIPTION: &str =
    "Disaffected groups organized disruptions, reducing confidence and productivity.";

/// What one turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSummary {
    /// The turn just completed.
    pub turn: u32,
    /// National stability after the turn.
    pub stability: f64,
    /// National unrest after the turn.
    pub unrest: f64,
    /// National turnout after the turn.
    pub turnout: f64,
    /// Title of the turn's event (or "None").
    pub event_title: String,
    /// How the event deck resolved.
    pub event: EventOutcome,
    /// The election held this turn, if any.
    pub election: Option<ElectionOutcome>,
    /// Name of a party formed this turn, if any.
    pub spawned_party: Option<String>,
    /// Movement summary for the turn.
    pub digest: String,
}

impl fmt::Display for TurnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turn {} | Stability {:.1} | Unrest {:.1} | Turnout {:.1}% | Event: {}",
            self.turn,
            self.stability,
            self.unrest,
            self.turnout * 100.0,
            self.event_title
        )
    }
}

impl SimulationOrchestrator {
    /// Start the campaign and run its first turn.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRejected::AlreadyStarted`] on a second call.
    pub fn begin_game(&mut self) -> Result<TurnSummary, ActionRejected> {
        if self.started {
            return Err(ActionRejected::AlreadyStarted);
        }
        self.started = true;
        info!(candidate = %self.candidate.name, party = %self.player_party, "Campaign started");
        self.run_turn()
    }

    /// Advance the campaign by one turn.
    ///
    /// # Errors
    ///
    /// Refuses once the campaign has ended or before it has started.
    pub fn run_turn(&mut self) -> Result<TurnSummary, ActionRejected> {
        if self.game_over.is_some() {
            return Err(ActionRejected::GameOver);
        }
        if !self.started {
            return Err(ActionRejected::NotStarted);
        }

        let before = self.history_point();
        self.turn = self.turn.saturating_add(1);

        self.tags.advance_turn();
        self.sync_policy_tags();
        self.policies.advance_ramps();

        let event = self.resolve_event_card();
        self.apply_diffusion();
        self.simulate_tiles();
        self.apply_economy_tick();
        self.update_factions();
        self.update_party_drift();
        self.update_polls();
        let spawned_party = self.spawn_party();

        let interval = self.config.turn.election_interval;
        let election = if interval > 0 && self.turn.checked_rem(interval) == Some(0) {
            self.hold_election()
        } else {
            None
        };

        let summary_line = TurnSummary {
            turn: self.turn,
            stability: self.stability,
            unrest: self.unrest,
            turnout: self.turnout,
            event_title: self.last_event_title.clone(),
            event,
            election,
            spawned_party,
            digest: String::new(),
        };
        info!(
            turn = self.turn,
            stability = self.stability,
            unrest = self.unrest,
            turnout = self.turnout,
            treasury = self.treasury,
            capital = self.capital,
            event = %self.last_event_title,
            "{summary_line}"
        );

        let after = self.history_point();
        self.history.record(after);
        self.evaluate_lose_conditions();
        self.advance_temporary_effects();

        self.last_digest = turn_digest(&before, &after, self.top_demand.as_deref());
        self.observer.on_turn_completed(self.turn);

        Ok(TurnSummary {
            digest: self.last_digest.clone(),
            ..summary_line
        })
    }

    pub(crate) const fn history_point(&self) -> HistoryPoint {
        HistoryPoint {
            stability: self.stability,
            turnout: self.turnout,
            treasury: self.treasury,
            capital: self.capital,
        }
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    fn resolve_event_card(&mut self) -> EventOutcome {
        NO_EVENT_TITLE.clone_into(&mut self.last_event_title);
        NO_EVENT_DESCRIPTION.clone_into(&mut self.last_event_description);

        let conditions = EventConditions {
            unrest: self.unrest,
            stability: self.stability,
        };
        let outcome = roll_event(
            &self.catalog.events,
            self.config.turn.event_chance,
            &conditions,
            &self.tags,
            &mut self.rng,
        );

        match outcome {
            EventOutcome::EmptyDeck | EventOutcome::ChanceMiss => {
                self.shock = lerp(self.shock, 0.0, QUIET_SHOCK_DECAY);
            }
            EventOutcome::NoEligibleEvent => {
                debug!(turn = self.turn, "No eligible event");
            }
            EventOutcome::Fired(index) => {
                if let Some(event) = self.catalog.events.get(index) {
                    event.title.clone_into(&mut self.last_event_title);
                    event.description.clone_into(&mut self.last_event_description);
                    self.shock = event
                        .stability_impact
                        .mul_add(self.candidate.event_shock_multiplier, self.shock);

                    for bloc in self.grid.blocs_mut() {
                        let strength = self.rng.random_range(0.45..=0.90);
                        bloc.apply_global_shift(&event.voter_shift, strength);
                    }
                    for effect in &event.tag_effects {
                        if !effect.tag.trim().is_empty() {
                            self.tags.set_tag(&effect.tag, effect.duration_turns);
                        }
                    }
                    info!(turn = self.turn, event = %event.title, shock = self.shock, "Event fired");
                }
            }
        }
        outcome
    }

    fn apply_diffusion(&mut self) {
        let params = DiffusionParams {
            ideology_rate: self.config.diffusion.ideology_rate,
            stability_spillover: self.config.diffusion.stability_spillover,
            media_power: self.effective_media_power(),
            media_target: self
                .national_center
                .blend_toward(&self.government_policy, self.config.media.government_bias),
        };
        apply_neighbor_diffusion(&mut self.grid, &params);
    }

    /// Process every tile and aggregate the national readings, weighting
    /// each tile by its population (at least 1). The shock decays only
    /// after a successful aggregation.
    fn simulate_tiles(&mut self) {
        let scaled = self.budget.scale_effects(&self.policies.combined_effects());
        let effective_policy = self.government_policy + scaled_policy_shift(&scaled);
        let turn_effects = PolicyTurnEffects::from_effects(scaled.iter().map(|(k, v)| (k.as_str(), *v)));

        let mut weighted_stability = 0.0;
        let mut weighted_turnout = 0.0;
        let mut total_weight = 0.0;
        for tile in self.grid.tiles_mut() {
            tile.process_turn(&effective_policy, Some(&turn_effects));
            let weight = tile.weight_population();
            weighted_stability = tile.stability.mul_add(weight, weighted_stability);
            weighted_turnout = tile.turnout.mul_add(weight, weighted_turnout);
            total_weight += weight;
        }

        // Unpopulated tiles still weigh 1, so only a tileless grid lands here.
        if total_weight <= 0.0 {
            self.stability = 50.0;
            self.turnout = 0.5;
            self.unrest = 50.0;
            self.national_center = IdeologyVector::ZERO;
            return;
        }

        let stability_offset = scaled.get(STABILITY_OFFSET).copied().unwrap_or(0.0);
        let turnout_offset = scaled.get(TURNOUT_OFFSET).copied().unwrap_or(0.0);
        self.stability = clamp_range(
            weighted_stability / total_weight + self.shock + stability_offset,
            0.0,
            100.0,
        );
        self.turnout = clamp_unit(weighted_turnout / total_weight + turnout_offset);
        self.unrest = 100.0 - self.stability;
        self.national_center = self.grid.weighted_center();

        self.shock = lerp(self.shock, 0.0, SIMULATION_SHOCK_DECAY);
    }

    fn apply_economy_tick(&mut self) {
        let scaled = self.budget.scale_effects(&self.policies.combined_effects());
        self.treasury += scaled.get(TREASURY_PER_TICK).copied().unwrap_or(0.0);

        if self.treasury < 0.0 {
            let stress = clamp_range(-self.treasury / 1500.0, 0.0, 2.5)
                * (1.0 - self.candidate.debt_stress_mitigation);
            self.shock -= stress.mul_add(4.0, 1.5);
            self.capital = (self.capital - stress.mul_add(0.75, 0.25)).max(0.0);
            debug!(treasury = self.treasury, stress, "Debt stress");
        }

        let capital_gain = scaled.get(CAPITAL_PER_TICK).copied().unwrap_or(0.0);
        self.capital = clamp_range(
            capital_gain.mul_add(self.candidate.capital_gain_multiplier, self.capital),
            0.0,
            100.0,
        );
    }

    fn update_factions(&mut self) {
        let climate = self.faction_climate();
        let pressure = factions::update_approval(&mut self.factions, &climate);

        if pressure.low_average {
            self.shock -= 1.4;
            self.capital = (self.capital - 0.35).max(0.0);
        }
        if pressure.crisis {
            self.treasury -= 40.0;
            self.crisis_streak = self.crisis_streak.saturating_add(1);
            PROTEST_TITLE.clone_into(&mut self.last_event_title);
            PROTEST_DESCRIPTION.clone_into(&mut self.last_event_description);
            warn!(turn = self.turn, streak = self.crisis_streak, "Faction crisis");
        } else {
            self.crisis_streak = 0;
        }

        self.top_demand = factions::top_demand(&self.factions);
    }

    fn update_party_drift(&mut self) {
        let drift = self.config.parties.drift_per_turn;
        let center = self.national_center;
        for party in &mut self.parties {
            party.drift_toward(&center, drift);
        }
    }

    fn update_polls(&mut self) {
        let shares = compute_poll_shares(&self.parties, &self.grid);
        let params = ProjectionParams {
            stability: self.stability,
            player_party: player_party_ref(&self.player_party),
            polling_bonus: self.candidate.polling_bonus,
        };
        self.polls = project_polls(shares, &params, &mut self.rng);
    }

    fn spawn_party(&mut self) -> Option<String> {
        let params = SpawnParams {
            distance_threshold: self.config.parties.spawn_distance_threshold,
            population_share: self.config.parties.spawn_population_share,
            max_parties: self.config.parties.max_parties,
        };
        let party = try_spawn_party(&self.parties, &self.grid, &params, &mut self.rng)?;
        let name = party.name.clone();
        self.parties.push(party);
        Some(name)
    }

    fn hold_election(&mut self) -> Option<ElectionOutcome> {
        let context = CampaignContext {
            player_party: player_party_ref(&self.player_party),
            campaign_multiplier: self.candidate.campaign_strength_multiplier,
        };
        let outcome = resolve_election(
            &self.parties,
            &self.grid,
            self.config.turn.parliament_seats,
            &context,
        )?;

        outcome.winner.clone_into(&mut self.government_party);
        self.player_in_power = self.is_player_party(&outcome.winner);
        if let Some(winner) = self.parties.iter().find(|p| p.name == outcome.winner) {
            self.government_policy = self.government_policy.blend_toward(&winner.platform, MANDATE_BLEND);
        }
        self.last_seats.clone_from(&outcome.seats);

        info!(
            turn = self.turn,
            winner = %outcome.winner,
            player_in_power = self.player_in_power,
            "Election held"
        );

        if !self.player_in_power {
            if self.config.player.lock_when_out_of_power {
                self.capital = self.capital.min(OUT_OF_POWER_CAPITAL);
            }
            if self.config.player.end_game_on_election_loss {
                let detail = format!(
                    "Your party ({}) lost control to {}. The mandate has shifted.",
                    self.player_party, outcome.winner
                );
                self.end_game("Election Lost", detail);
            }
        }
        Some(outcome)
    }

    fn evaluate_lose_conditions(&mut self) {
        if self.game_over.is_some() {
            return;
        }
        let rules = self.config.lose_conditions.clone();

        if self.unrest >= rules.revolution_unrest_threshold {
            self.high_unrest_streak = self.high_unrest_streak.saturating_add(1);
        } else {
            self.high_unrest_streak = 0;
        }

        let revolution_turns = rules.revolution_unrest_turns.max(1);
        if self.high_unrest_streak >= revolution_turns {
            let detail = format!(
                "Unrest remained above {:.0} for {revolution_turns} turns.",
                rules.revolution_unrest_threshold
            );
            self.end_game("Revolution", detail);
            return;
        }

        if self.treasury <= rules.bankruptcy_treasury_threshold {
            let detail = format!(
                "Treasury collapsed to {:.0} (threshold {:.0}). IMF intervention triggered.",
                self.treasury, rules.bankruptcy_treasury_threshold
            );
            self.end_game("Bankruptcy", detail);
            return;
        }

        if self.crisis_streak >= rules.faction_crisis_turns.max(1) {
            self.end_game(
                "Factional Collapse",
                String::from(
                    "One or more factions remained in extreme disapproval long enough to trigger nationwide paralysis.",
                ),
            );
        }
    }

    fn advance_temporary_effects(&mut self) {
        self.propaganda_turns = self.propaganda_turns.saturating_sub(1);
        self.cooldowns.advance();
    }
}
