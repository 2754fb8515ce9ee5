//! Player actions and their rejections.
//!
//! Every action entry point validates before it mutates campaign state; a
//! rejected action leaves the readings, budgets and registries exactly as
//! they were. The `Display` form of each rejection is the status line shown
//! to the player, and each successful action returns its own status line.

use tracing::{debug, info};

use electorate_politics::factions::{self, BudgetLine};
use electorate_politics::{BudgetAllocation, CandidateProfile, PoliticsError};
use electorate_types::math::clamp_unit;

use crate::orchestrator::SimulationOrchestrator;

/// Display name of the propaganda action.
pub const PROPAGANDA_CAMPAIGN: &str = "Propaganda Campaign";

/// Why a player action was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionRejected {
    /// The campaign has ended.
    #[error("Action blocked: game is already over.")]
    GameOver,

    /// Turns cannot run before the campaign begins.
    #[error("Turn blocked: the campaign has not started.")]
    NotStarted,

    /// The campaign was already started.
    #[error("Campaign blocked: the campaign has already started.")]
    AlreadyStarted,

    /// The player lost power and actions are locked.
    #[error("Action blocked: you are currently out of power.")]
    OutOfPower,

    /// No policy with this name is registered.
    #[error("Policy blocked: unknown policy {name}.")]
    UnknownPolicy {
        /// The requested policy name.
        name: String,
    },

    /// No faction action with this id exists.
    #[error("Action blocked: unknown faction action.")]
    UnknownFactionAction,

    /// The faction action was used too recently.
    #[error("{action} is on cooldown ({turns} turns left).")]
    OnCooldown {
        /// Display name of the action.
        action: String,
        /// Turns until it can be used again.
        turns: u32,
    },

    /// Not enough money.
    #[error("{action} blocked: insufficient treasury ({required:.0} required).")]
    InsufficientTreasury {
        /// Display name of the action.
        action: String,
        /// Treasury needed.
        required: f64,
    },

    /// Not enough political capital.
    #[error("{action} blocked: insufficient political capital ({required:.0} required).")]
    InsufficientCapital {
        /// Display name of the action.
        action: String,
        /// Capital needed.
        required: f64,
    },
}

impl From<PoliticsError> for ActionRejected {
    fn from(err: PoliticsError) -> Self {
        match err {
            PoliticsError::UnknownPolicy { name } => Self::UnknownPolicy { name },
        }
    }
}

impl SimulationOrchestrator {
    /// Refuse when the campaign is over or the player is locked out.
    fn ensure_can_act(&self) -> Result<(), ActionRejected> {
        if self.game_over.is_some() {
            return Err(ActionRejected::GameOver);
        }
        if self.config.player.lock_when_out_of_power && !self.player_in_power {
            return Err(ActionRejected::OutOfPower);
        }
        Ok(())
    }

    /// Enact or repeal a policy.
    ///
    /// A ramp length is drawn for every accepted request. Repeals are free;
    /// enacting an already active policy is a no-op; otherwise the policy's
    /// capital cost, scaled by the candidate, is charged up front. Rejected
    /// requests leave the generator untouched.
    ///
    /// # Errors
    ///
    /// Rejects when the campaign is over, the player is out of power with
    /// actions locked, the policy is unknown, or capital is short.
    pub fn set_policy_active(&mut self, name: &str, active: bool) -> Result<String, ActionRejected> {
        self.ensure_can_act()?;
        let base_cost = self
            .policies
            .get(name)
            .map(|policy| policy.capital_cost)
            .ok_or_else(|| ActionRejected::UnknownPolicy {
                name: name.to_owned(),
            })?;

        if !active {
            let ramp_turns = self.ramp_turns();
            self.policies.set_policy_active(name, false, ramp_turns)?;
            self.sync_policy_tags();
            debug!(policy = name, ramp_turns, "Policy repeal scheduled");
            return Ok(format!("{name} repeal scheduled over {ramp_turns} turns."));
        }

        if self.policies.is_active(name) {
            // Accepted no-ops still consume a ramp draw.
            self.ramp_turns();
            return Ok(format!("{name} is already active."));
        }

        let cost = base_cost * self.candidate.policy_cost_multiplier;
        if self.capital < cost {
            return Err(ActionRejected::InsufficientCapital {
                action: name.to_owned(),
                required: cost,
            });
        }

        let ramp_turns = self.ramp_turns();
        self.policies.set_policy_active(name, true, ramp_turns)?;
        self.capital -= cost;
        self.sync_policy_tags();
        info!(policy = name, cost, ramp_turns, capital = self.capital, "Policy enacted");
        Ok(format!("{name} enacted (-{cost:.1} capital, ramp {ramp_turns} turns)."))
    }

    /// Execute a faction action by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Rejects when the campaign is over, the player is locked out, the id
    /// is unknown, the action is cooling down, or treasury or capital is
    /// short.
    pub fn enact_faction_action(&mut self, id: &str) -> Result<String, ActionRejected> {
        self.ensure_can_act()?;
        let action = factions::find_action(id).ok_or(ActionRejected::UnknownFactionAction)?;

        let remaining = self.cooldowns.remaining(action.id);
        if remaining > 0 {
            return Err(ActionRejected::OnCooldown {
                action: action.name.to_owned(),
                turns: remaining,
            });
        }

        let cost_multiplier = self.config.factions.cost_multiplier;
        let treasury_cost = action.treasury_cost * cost_multiplier;
        let capital_cost = action.capital_cost * cost_multiplier;
        if self.treasury < treasury_cost {
            return Err(ActionRejected::InsufficientTreasury {
                action: action.name.to_owned(),
                required: treasury_cost,
            });
        }
        if self.capital < capital_cost {
            return Err(ActionRejected::InsufficientCapital {
                action: action.name.to_owned(),
                required: capital_cost,
            });
        }

        self.treasury -= treasury_cost;
        self.capital = (self.capital - capital_cost).max(0.0);

        let approval_multiplier = self.config.factions.approval_multiplier;
        for (faction_id, delta) in action.approval_deltas {
            factions::apply_approval_delta(&mut self.factions, faction_id, delta * approval_multiplier);
        }

        if let Some((line, amount)) = action.budget_nudge {
            let budget = self.budget;
            self.budget = match line {
                BudgetLine::Services => {
                    BudgetAllocation::new(budget.services + amount, budget.military, budget.infrastructure)
                }
                BudgetLine::Military => {
                    BudgetAllocation::new(budget.services, budget.military + amount, budget.infrastructure)
                }
            };
        }

        self.shock += action.stability_gain;
        self.turnout = clamp_unit(self.turnout + action.turnout_gain);
        self.crisis_streak = 0;
        self.cooldowns.start(action.id, self.config.factions.cooldown_turns.max(1));
        self.refresh_faction_demands();

        action.name.clone_into(&mut self.last_event_title);
        action.description.clone_into(&mut self.last_event_description);

        let status = format!(
            "{} executed. Treasury -{treasury_cost:.0}, Capital -{capital_cost:.0}.",
            action.name
        );
        self.action_log.push(self.turn, &status);
        info!(
            action = action.id,
            treasury_cost,
            capital_cost,
            treasury = self.treasury,
            capital = self.capital,
            "Faction action executed"
        );
        Ok(status)
    }

    /// Launch (or extend) a state media campaign.
    ///
    /// # Errors
    ///
    /// Rejects when the campaign is over, the player is locked out, or
    /// capital is short.
    pub fn launch_propaganda_campaign(&mut self) -> Result<String, ActionRejected> {
        self.ensure_can_act()?;
        let cost = self.config.media.propaganda_cost.max(0.0) * self.candidate.propaganda_cost_multiplier;
        if self.capital < cost {
            return Err(ActionRejected::InsufficientCapital {
                action: PROPAGANDA_CAMPAIGN.to_owned(),
                required: cost,
            });
        }

        self.capital -= cost;
        let duration = self.config.media.propaganda_duration.max(1);
        self.propaganda_turns = self.propaganda_turns.max(duration);

        PROPAGANDA_CAMPAIGN.clone_into(&mut self.last_event_title);
        self.last_event_description = format!(
            "State information campaign active for {} turns.",
            self.propaganda_turns
        );

        let status = format!("{PROPAGANDA_CAMPAIGN} launched (-{cost:.1} capital).");
        self.action_log.push(self.turn, &status);
        info!(cost, turns = self.propaganda_turns, "Propaganda campaign launched");
        Ok(status)
    }

    /// Set the three budget shares, each clamped to `[0, 1]`.
    pub fn set_budget_allocations(&mut self, services: f64, military: f64, infrastructure: f64) -> BudgetAllocation {
        self.budget = BudgetAllocation::new(services, military, infrastructure);
        debug!(
            services = self.budget.services,
            military = self.budget.military,
            infrastructure = self.budget.infrastructure,
            "Budget updated"
        );
        self.budget
    }

    /// Rebuild the player's candidate from catalog ids.
    pub fn set_player_candidate<S: AsRef<str>>(
        &mut self,
        name: &str,
        background_id: &str,
        trait_ids: &[S],
    ) -> &CandidateProfile {
        self.candidate = CandidateProfile::build(
            name,
            background_id,
            trait_ids,
            &self.catalog.backgrounds,
            &self.catalog.traits,
        );
        info!(
            candidate = %self.candidate.name,
            background = %self.candidate.background_id,
            traits = ?self.candidate.trait_ids,
            "Candidate updated"
        );
        &self.candidate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::ScenarioCatalog;
    use crate::config::SimulationConfig;
    use electorate_politics::factions::{LABOR, MILITARY};

    const EPS: f64 = 1e-9;

    fn sim() -> SimulationOrchestrator {
        let mut config = SimulationConfig::default();
        config.world.grid_width = 4;
        config.world.grid_height = 4;
        SimulationOrchestrator::new(config, ScenarioCatalog::default()).unwrap()
    }

    fn approval(sim: &SimulationOrchestrator, id: &str) -> f64 {
        sim.factions()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.approval)
            .unwrap()
    }

    #[test]
    fn enacting_a_policy_charges_capital_once() {
        let mut sim = sim();
        let status = sim.set_policy_active("Strict Policing", true).unwrap();
        assert!(status.starts_with("Strict Policing enacted"));
        let after_first = sim.political_capital();
        assert!(after_first < 25.0);
        assert!(sim.policies().is_active("Strict Policing"));
        assert!(sim.world_tags().has_tag("policy_strict_policing_active"));

        sim.set_policy_active("Strict Policing", true).unwrap();
        assert!((sim.political_capital() - after_first).abs() < EPS);

        sim.set_policy_active("Strict Policing", false).unwrap();
        assert!(!sim.policies().is_active("Strict Policing"));
        assert!(!sim.world_tags().has_tag("policy_strict_policing_active"));
        assert!((sim.political_capital() - after_first).abs() < EPS);
    }

    #[test]
    fn unknown_policy_and_short_capital_are_rejected() {
        let mut sim = sim();
        assert_eq!(
            sim.set_policy_active("Moon Base", true),
            Err(ActionRejected::UnknownPolicy {
                name: String::from("Moon Base"),
            })
        );
        sim.capital = 1.0;
        let err = sim.set_policy_active("Universal Healthcare", true).unwrap_err();
        assert!(matches!(err, ActionRejected::InsufficientCapital { .. }));
        assert!(!sim.policies().is_active("Universal Healthcare"));
        assert!((sim.political_capital() - 1.0).abs() < EPS);
    }

    #[test]
    fn faction_action_spends_and_cools_down() {
        let mut sim = sim();
        sim.treasury = 500.0;
        sim.capital = 50.0;
        let labor_before = approval(&sim, LABOR);

        let status = sim.enact_faction_action("Union_Strike_Deal").unwrap();
        assert!(status.starts_with("Union Strike Deal executed."));
        assert!(approval(&sim, LABOR) > labor_before);
        assert!(sim.treasury() < 500.0);
        assert_eq!(sim.faction_action_cooldown("union_strike_deal"), 6);
        assert_eq!(sim.last_event_title(), "Union Strike Deal");
        assert_eq!(sim.action_log().count(), 1);

        let treasury = sim.treasury();
        let err = sim.enact_faction_action("union_strike_deal").unwrap_err();
        assert_eq!(
            err,
            ActionRejected::OnCooldown {
                action: String::from("Union Strike Deal"),
                turns: 6,
            }
        );
        assert!((sim.treasury() - treasury).abs() < EPS);
    }

    #[test]
    fn faction_action_checks_treasury_before_capital() {
        let mut sim = sim();
        sim.treasury = 0.0;
        sim.capital = 0.0;
        let military_before = approval(&sim, MILITARY);
        let err = sim.enact_faction_action("military_appeasement").unwrap_err();
        assert!(matches!(err, ActionRejected::InsufficientTreasury { .. }));
        assert!((approval(&sim, MILITARY) - military_before).abs() < EPS);
        assert_eq!(
            sim.enact_faction_action("bribe_everyone"),
            Err(ActionRejected::UnknownFactionAction)
        );
    }

    #[test]
    fn propaganda_extends_but_never_shortens() {
        let mut sim = sim();
        let status = sim.launch_propaganda_campaign().unwrap();
        assert_eq!(status, "Propaganda Campaign launched (-8.0 capital).");
        assert_eq!(sim.propaganda_turns_remaining(), 6);
        sim.propaganda_turns = 9;
        sim.launch_propaganda_campaign().unwrap();
        assert_eq!(sim.propaganda_turns_remaining(), 9);
        assert_eq!(
            sim.last_event_description(),
            "State information campaign active for 9 turns."
        );
    }

    #[test]
    fn locked_out_player_cannot_act() {
        let mut sim = sim();
        sim.player_in_power = false;
        assert_eq!(sim.launch_propaganda_campaign(), Err(ActionRejected::OutOfPower));
        assert_eq!(
            sim.set_policy_active("Strict Policing", true),
            Err(ActionRejected::OutOfPower)
        );
        sim.config.player.lock_when_out_of_power = false;
        assert!(sim.launch_propaganda_campaign().is_ok());
    }

    #[test]
    fn budget_is_clamped() {
        let mut sim = sim();
        let budget = sim.set_budget_allocations(1.4, -0.2, 0.3);
        assert!((budget.services - 1.0).abs() < EPS);
        assert!(budget.military.abs() < EPS);
        assert!((budget.infrastructure - 0.3).abs() < EPS);
    }

    #[test]
    fn candidate_can_be_rebuilt() {
        let mut sim = sim();
        let candidate = sim.set_player_candidate("Jo Park", "activist", &["grassroots"]);
        assert_eq!(candidate.name, "Jo Park");
        assert_eq!(candidate.trait_ids, vec!["grassroots"]);
    }

    #[test]
    fn display_is_the_status_line() {
        assert_eq!(ActionRejected::GameOver.to_string(), "Action blocked: game is already over.");
        assert_eq!(
            ActionRejected::OnCooldown {
                action: String::from("Union Strike Deal"),
                turns: 4,
            }
            .to_string(),
            "Union Strike Deal is on cooldown (4 turns left)."
        );
        assert_eq!(
            ActionRejected::InsufficientTreasury {
                action: String::from("Military Appeasement"),
                required: 220.0,
            }
            .to_string(),
            "Military Appeasement blocked: insufficient treasury (220 required)."
        );
    }
}
