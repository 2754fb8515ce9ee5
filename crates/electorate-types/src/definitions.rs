//! Configuration records supplied by the external data loader, plus the
//! faction state record shared between the politics layer and snapshots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ideology::IdeologyVector;

/// A party as described in scenario data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartyDefinition {
    /// Unique party name.
    pub name: String,
    /// Display color as `#rrggbb`.
    #[serde(default = "default_party_color")]
    pub color: String,
    /// Starting platform.
    #[serde(default)]
    pub platform: IdeologyVector,
    /// Drift speed toward the national center, `[0, 1]`.
    #[serde(default)]
    pub opportunism: f64,
}

fn default_party_color() -> String {
    String::from("#ffffff")
}

/// Additive modifiers contributed by a candidate trait or background.
///
/// Stat deltas adjust the base 0.5 candidate stats; multiplier deltas adjust
/// the base 1.0 multipliers; the polling bonus and debt mitigation start
/// from zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct CandidateTraitDefinition {
    /// Lookup id (case-insensitive).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Charisma delta.
    pub charisma_delta: f64,
    /// Competence delta.
    pub competence_delta: f64,
    /// Integrity delta.
    pub integrity_delta: f64,
    /// Populism delta.
    pub populism_delta: f64,
    /// Policy capital-cost multiplier delta.
    pub policy_cost_multiplier_delta: f64,
    /// Propaganda capital-cost multiplier delta.
    pub propaganda_cost_multiplier_delta: f64,
    /// Campaign strength multiplier delta.
    pub campaign_strength_multiplier_delta: f64,
    /// Projected polling bonus delta.
    pub polling_bonus_delta: f64,
    /// Capital gain multiplier delta.
    pub capital_gain_multiplier_delta: f64,
    /// Debt stress mitigation delta.
    pub debt_stress_mitigation_delta: f64,
    /// Event shock multiplier delta.
    pub event_shock_multiplier_delta: f64,
}

/// Backgrounds carry exactly the same modifier set as traits.
pub type CandidateBackgroundDefinition = CandidateTraitDefinition;

/// Approval state of one interest-group faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FactionState {
    /// Stable identifier (`military`, `labor`, `clergy`, `industrial`, `youth`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Approval of the government, `[0, 100]`.
    pub approval: f64,
    /// Current demand text, derived from budget and policy state.
    #[serde(default)]
    pub current_demand: String,
}
