//! Factions: organised interest groups whose approval drifts with the
//! budget, key policies and national mood, plus the deals the player can
//! strike with them.
//!
//! # Architecture
//!
//! Faction state lives in plain [`FactionState`] records so it can be
//! snapshotted directly. Everything that depends on the rest of the
//! simulation is passed in as a [`FactionClimate`], and the consequences
//! of low approval are reported back as a [`FactionPressure`] for the
//! orchestrator to apply.
//!
//! # Invariants
//!
//! - Approval is clamped to `[0, 100]` after every change.
//! - The top demand comes from the lowest-approval faction; the first one
//!   listed wins ties.

use std::collections::BTreeMap;

use electorate_types::math::{clamp_range, lerp};
use electorate_types::{CooldownRecord, FactionState};

use crate::budget::BudgetAllocation;

/// Approval every faction starts with.
pub const INITIAL_APPROVAL: f64 = 55.0;
/// Average approval below which the government loses momentum.
pub const LOW_AVERAGE_APPROVAL: f64 = 40.0;
/// Approval below which a faction takes to the streets.
pub const CRISIS_APPROVAL: f64 = 20.0;
/// Default turns before a faction action can be repeated.
pub const DEFAULT_ACTION_COOLDOWN: u32 = 6;

/// Military faction id.
pub const MILITARY: &str = "military";
/// Labor faction id.
pub const LABOR: &str = "labor";
/// Clergy faction id.
pub const CLERGY: &str = "clergy";
/// Industrial faction id.
pub const INDUSTRIAL: &str = "industrial";
/// Youth faction id.
pub const YOUTH: &str = "youth";

/// Policies the factions react to by name.
pub const STRICT_POLICING: &str = "Strict Policing";
/// See [`STRICT_POLICING`].
pub const UNIVERSAL_HEALTHCARE: &str = "Universal Healthcare";
/// See [`STRICT_POLICING`].
pub const OPEN_BORDERS: &str = "Open Borders";

/// The starting faction roster.
pub fn default_factions() -> Vec<FactionState> {
    [
        (MILITARY, "Militarists"),
        (LABOR, "Trade Unions"),
        (CLERGY, "Clergy"),
        (INDUSTRIAL, "Industrialists"),
        (YOUTH, "Youth Movement"),
    ]
    .into_iter()
    .map(|(id, name)| FactionState {
        id: id.to_owned(),
        name: name.to_owned(),
        approval: INITIAL_APPROVAL,
        current_demand: String::new(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Approval drift
// ---------------------------------------------------------------------------

/// Everything faction approval reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionClimate {
    /// Current budget allocation.
    pub budget: BudgetAllocation,
    /// Whether Strict Policing is active.
    pub strict_policing: bool,
    /// Whether Universal Healthcare is active.
    pub universal_healthcare: bool,
    /// Whether Open Borders is active.
    pub open_borders: bool,
    /// Treasury balance.
    pub treasury: f64,
    /// National stability.
    pub stability: f64,
    /// National unrest.
    pub unrest: f64,
}

/// Consequences of the approval update for the orchestrator to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FactionPressure {
    /// Average approval fell below [`LOW_AVERAGE_APPROVAL`].
    pub low_average: bool,
    /// Some faction fell below [`CRISIS_APPROVAL`].
    pub crisis: bool,
}

const fn pick(condition: bool, yes: f64, no: f64) -> f64 {
    if condition { yes } else { no }
}

/// Per-turn approval drift of the faction `id`.
pub fn approval_drift(id: &str, climate: &FactionClimate) -> f64 {
    let specific = match id {
        MILITARY => {
            lerp(-1.1, 1.1, climate.budget.military) + pick(climate.strict_policing, 0.35, -0.35)
        }
        LABOR => {
            lerp(-1.0, 1.0, climate.budget.services) + pick(climate.universal_healthcare, 0.45, -0.25)
        }
        CLERGY => pick(climate.strict_policing, 0.25, -0.15) + pick(climate.open_borders, -0.20, 0.10),
        INDUSTRIAL => {
            lerp(-0.9, 1.2, climate.budget.infrastructure) + pick(climate.treasury >= 0.0, 0.20, -0.25)
        }
        YOUTH => pick(climate.open_borders, 0.40, -0.15) + pick(climate.unrest > 65.0, -0.40, 0.15),
        _ => 0.0,
    };
    (climate.stability - 50.0).mul_add(0.008, specific)
}

/// Apply one turn of drift to every faction, refresh demands, and report
/// whether the government is under pressure.
pub fn update_approval(factions: &mut [FactionState], climate: &FactionClimate) -> FactionPressure {
    if factions.is_empty() {
        return FactionPressure::default();
    }

    for faction in factions.iter_mut() {
        faction.approval = clamp_approval(faction.approval + approval_drift(&faction.id, climate));
    }

    let count = f64::from(u32::try_from(factions.len()).unwrap_or(u32::MAX));
    let average = factions.iter().map(|f| f.approval).sum::<f64>() / count;
    let minimum = factions.iter().map(|f| f.approval).fold(100.0, f64::min);

    update_demands(factions, climate);
    FactionPressure {
        low_average: average < LOW_AVERAGE_APPROVAL,
        crisis: minimum < CRISIS_APPROVAL,
    }
}

fn clamp_approval(value: f64) -> f64 {
    clamp_range(value, 0.0, 100.0)
}

/// Add `delta` to the faction matching `id` (case-insensitive).
pub fn apply_approval_delta(factions: &mut [FactionState], id: &str, delta: f64) {
    if id.trim().is_empty() {
        return;
    }
    if let Some(faction) = factions.iter_mut().find(|f| f.id.eq_ignore_ascii_case(id)) {
        faction.approval = clamp_approval(faction.approval + delta);
    }
}

// ---------------------------------------------------------------------------
// Demands
// ---------------------------------------------------------------------------

/// What the faction `id` currently asks for.
pub fn demand_for(id: &str, climate: &FactionClimate) -> &'static str {
    match id {
        MILITARY if climate.budget.military < 0.5 => {
            "Increase military spending and strengthen policing posture."
        }
        MILITARY => "Maintain security funding and command authority.",
        LABOR if climate.budget.services < 0.5 => "Boost services funding and worker protections.",
        LABOR => "Preserve social programs and wage confidence.",
        CLERGY if climate.open_borders => "Prioritize social cohesion and tighter migration controls.",
        CLERGY => "Support community order and moral institutions.",
        INDUSTRIAL if climate.budget.infrastructure < 0.5 => {
            "Increase infrastructure and investor confidence measures."
        }
        INDUSTRIAL => "Keep business climate predictable and growth-focused.",
        YOUTH if !climate.open_borders => "Expand civic freedoms and openness reforms.",
        YOUTH => "Deliver jobs, housing, and anti-corruption reforms.",
        _ => "Demand clearer governance direction.",
    }
}

/// Recompute every faction's current demand.
pub fn update_demands(factions: &mut [FactionState], climate: &FactionClimate) {
    for faction in factions.iter_mut() {
        demand_for(&faction.id, climate).clone_into(&mut faction.current_demand);
    }
}

/// `{name}: {demand}` of the lowest-approval faction.
pub fn top_demand(factions: &[FactionState]) -> Option<String> {
    factions
        .iter()
        .fold(None::<&FactionState>, |lowest, f| match lowest {
            Some(l) if f.approval >= l.approval => lowest,
            _ => Some(f),
        })
        .map(|f| format!("{}: {}", f.name, f.current_demand))
}

/// Restore factions from records, skipping blank ids and clamping
/// approval. A blank name falls back to the id.
pub fn restore_factions(records: &[FactionState]) -> Vec<FactionState> {
    records
        .iter()
        .filter(|r| !r.id.trim().is_empty())
        .map(|r| FactionState {
            id: r.id.clone(),
            name: if r.name.trim().is_empty() {
                r.id.clone()
            } else {
                r.name.clone()
            },
            approval: clamp_approval(r.approval),
            current_demand: r.current_demand.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Faction actions
// ---------------------------------------------------------------------------

/// Which budget line an action nudges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLine {
    /// Services.
    Services,
    /// Military.
    Military,
}

/// A deal the player can strike with the factions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionAction {
    /// Normalized id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Event text shown once enacted.
    pub description: &'static str,
    /// Treasury cost before the cost multiplier.
    pub treasury_cost: f64,
    /// Capital cost before the cost multiplier.
    pub capital_cost: f64,
    /// Stability added to the shock.
    pub stability_gain: f64,
    /// Turnout added nationally.
    pub turnout_gain: f64,
    /// Approval changes before the approval multiplier.
    pub approval_deltas: &'static [(&'static str, f64)],
    /// Budget line nudged upward, and by how much.
    pub budget_nudge: Option<(BudgetLine, f64)>,
}

/// Every faction action, in display order.
pub static FACTION_ACTIONS: [FactionAction; 3] = [
    FactionAction {
        id: "union_strike_deal",
        name: "Union Strike Deal",
        description: "Government brokered a strike deal, easing labor tensions while unsettling hardline business groups.",
        treasury_cost: 260.0,
        capital_cost: 5.0,
        stability_gain: 2.5,
        turnout_gain: 0.01,
        approval_deltas: &[(LABOR, 18.0), (YOUTH, 6.0), (INDUSTRIAL, -9.0), (CLERGY, -2.0)],
        budget_nudge: None,
    },
    FactionAction {
        id: "military_appeasement",
        name: "Military Appeasement",
        description: "Additional security procurement and command concessions strengthened military loyalty.",
        treasury_cost: 220.0,
        capital_cost: 6.0,
        stability_gain: 2.0,
        turnout_gain: 0.0,
        approval_deltas: &[(MILITARY, 20.0), (CLERGY, 8.0), (YOUTH, -10.0), (LABOR, -5.0)],
        budget_nudge: Some((BudgetLine::Military, 0.08)),
    },
    FactionAction {
        id: "youth_reform_package",
        name: "Youth Reform Package",
        description: "A reform package for youth expanded civic programs and restored confidence among younger blocs.",
        treasury_cost: 240.0,
        capital_cost: 7.0,
        stability_gain: 1.5,
        turnout_gain: 0.02,
        approval_deltas: &[(YOUTH, 20.0), (LABOR, 6.0), (CLERGY, -7.0), (INDUSTRIAL, -5.0)],
        budget_nudge: Some((BudgetLine::Services, 0.06)),
    },
];

/// Trimmed lowercase action id.
pub fn normalize_action_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Look up an action by id (trimmed, case-insensitive).
pub fn find_action(id: &str) -> Option<&'static FactionAction> {
    let normalized = normalize_action_id(id);
    FACTION_ACTIONS.iter().find(|a| a.id == normalized)
}

/// Display name of an action id, or "Faction Action" when unknown.
pub fn action_name(id: &str) -> &'static str {
    find_action(id).map_or("Faction Action", |a| a.name)
}

// ---------------------------------------------------------------------------
// Cooldowns
// ---------------------------------------------------------------------------

/// Remaining cooldown per action id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCooldowns {
    remaining: BTreeMap<String, u32>,
}

impl ActionCooldowns {
    /// No cooldowns.
    pub const fn new() -> Self {
        Self {
            remaining: BTreeMap::new(),
        }
    }

    /// Turns left for `id` (0 when ready).
    pub fn remaining(&self, id: &str) -> u32 {
        self.remaining.get(&normalize_action_id(id)).copied().unwrap_or(0)
    }

    /// Start (or restart) the cooldown of `id`.
    pub fn start(&mut self, id: &str, turns: u32) {
        let key = normalize_action_id(id);
        if key.is_empty() {
            return;
        }
        if turns == 0 {
            self.remaining.remove(&key);
        } else {
            self.remaining.insert(key, turns);
        }
    }

    /// Count every cooldown down by one turn.
    pub fn advance(&mut self) {
        self.remaining.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    /// Persistent form, in id order.
    pub fn export(&self) -> Vec<CooldownRecord> {
        self.remaining
            .iter()
            .map(|(action_id, remaining_turns)| CooldownRecord {
                action_id: action_id.clone(),
                remaining_turns: *remaining_turns,
            })
            .collect()
    }

    /// Replace from records, skipping blank ids and expired entries.
    pub fn import(&mut self, records: &[CooldownRecord]) {
        self.remaining.clear();
        for record in records {
            if record.remaining_turns > 0 {
                self.start(&record.action_id, record.remaining_turns);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn climate() -> FactionClimate {
        FactionClimate {
            budget: BudgetAllocation::default(),
            strict_policing: false,
            universal_healthcare: false,
            open_borders: false,
            treasury: 0.0,
            stability: 50.0,
            unrest: 50.0,
        }
    }

    #[test]
    fn roster_starts_at_fifty_five() {
        let factions = default_factions();
        assert_eq!(factions.len(), 5);
        assert!(factions.iter().all(|f| (f.approval - INITIAL_APPROVAL).abs() < EPS));
        assert_eq!(factions.first().unwrap().name, "Militarists");
    }

    #[test]
    fn drift_formulas() {
        let c = climate();
        assert!((approval_drift(MILITARY, &c) + 0.35).abs() < EPS);
        assert!((approval_drift(LABOR, &c) + 0.25).abs() < EPS);
        assert!((approval_drift(CLERGY, &c) + 0.05).abs() < EPS);
        assert!((approval_drift(INDUSTRIAL, &c) - 0.35).abs() < EPS);
        assert!(approval_drift(YOUTH, &c).abs() < EPS);
        assert!(approval_drift("unknown", &c).abs() < EPS);

        let unstable = FactionClimate {
            stability: 25.0,
            unrest: 75.0,
            open_borders: true,
            ..c
        };
        // 0.40 - 0.40 + (25 - 50) * 0.008
        assert!((approval_drift(YOUTH, &unstable) + 0.2).abs() < EPS);
    }

    #[test]
    fn crisis_and_low_average_are_reported() {
        let mut factions = default_factions();
        for f in &mut factions {
            f.approval = 30.0;
        }
        factions.last_mut().unwrap().approval = 10.0;
        let pressure = update_approval(&mut factions, &climate());
        assert!(pressure.low_average);
        assert!(pressure.crisis);

        let mut content = default_factions();
        let calm = update_approval(&mut content, &climate());
        assert_eq!(calm, FactionPressure::default());
    }

    #[test]
    fn top_demand_uses_lowest_and_first_on_ties() {
        let mut factions = default_factions();
        update_demands(&mut factions, &climate());
        assert_eq!(
            top_demand(&factions).unwrap(),
            "Militarists: Maintain security funding and command authority."
        );
        factions.get_mut(2).unwrap().approval = 10.0;
        assert_eq!(
            top_demand(&factions).unwrap(),
            "Clergy: Support community order and moral institutions."
        );
        assert!(top_demand(&[]).is_none());
    }

    #[test]
    fn approval_delta_is_case_insensitive_and_clamped() {
        let mut factions = default_factions();
        apply_approval_delta(&mut factions, "LABOR", 60.0);
        assert!((factions.get(1).unwrap().approval - 100.0).abs() < EPS);
        apply_approval_delta(&mut factions, "nobody", 5.0);
    }

    #[test]
    fn actions_resolve_by_normalized_id() {
        let deal = find_action("  Union_Strike_Deal ").unwrap();
        assert_eq!(deal.id, "union_strike_deal");
        assert!((deal.capital_cost - 5.0).abs() < EPS);
        assert_eq!(action_name("military_appeasement"), "Military Appeasement");
        assert_eq!(action_name("bribe"), "Faction Action");
    }

    #[test]
    fn cooldowns_count_down_and_expire() {
        let mut cooldowns = ActionCooldowns::new();
        cooldowns.start("Union_Strike_Deal", 2);
        assert_eq!(cooldowns.remaining("union_strike_deal"), 2);
        cooldowns.advance();
        assert_eq!(cooldowns.remaining("union_strike_deal"), 1);
        cooldowns.advance();
        assert_eq!(cooldowns.remaining("union_strike_deal"), 0);
        assert!(cooldowns.export().is_empty());
    }

    #[test]
    fn restore_skips_blank_ids() {
        let records = vec![
            FactionState {
                id: String::from("labor"),
                name: String::new(),
                approval: 140.0,
                current_demand: String::new(),
            },
            FactionState {
                id: String::from(" "),
                name: String::from("Ghosts"),
                approval: 50.0,
                current_demand: String::new(),
            },
        ];
        let restored = restore_factions(&records);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.first().unwrap().name, "labor");
        assert!((restored.first().unwrap().approval - 100.0).abs() < EPS);
    }
}
