//! Static policy definitions and the namespaced effect keys they carry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::BlocCategory;

// ---------------------------------------------------------------------------
// Effect keys
// ---------------------------------------------------------------------------

/// Per-turn shift of the effective policy on the economic axis.
pub const SHIFT_ECONOMIC: &str = "policy.shift.economic";
/// Per-turn shift of the effective policy on the societal axis.
pub const SHIFT_SOCIETAL: &str = "policy.shift.societal";
/// Per-turn shift of the effective policy on the authority axis.
pub const SHIFT_AUTHORITY: &str = "policy.shift.authority";
/// Per-turn shift of the effective policy on the diplomatic axis.
pub const SHIFT_DIPLOMATIC: &str = "policy.shift.diplomatic";
/// Additive offset to national stability.
pub const STABILITY_OFFSET: &str = "national.stability.offset";
/// Additive offset to national turnout.
pub const TURNOUT_OFFSET: &str = "national.turnout.offset";
/// Treasury delta applied each turn.
pub const TREASURY_PER_TICK: &str = "economy.treasury.per_tick";
/// Political capital delta applied each turn.
pub const CAPITAL_PER_TICK: &str = "state.capital.per_tick";
/// Prefix of per-category happiness offsets (`bloc.happiness.{Category}`).
pub const BLOC_HAPPINESS_PREFIX: &str = "bloc.happiness.";
/// Prefix of per-category turnout offsets (`bloc.turnout.{Category}`).
pub const BLOC_TURNOUT_PREFIX: &str = "bloc.turnout.";

/// Effect key for a category happiness offset.
pub fn happiness_key(category: BlocCategory) -> String {
    format!("{BLOC_HAPPINESS_PREFIX}{}", category.as_str())
}

/// Effect key for a category turnout offset.
pub fn turnout_key(category: BlocCategory) -> String {
    format!("{BLOC_TURNOUT_PREFIX}{}", category.as_str())
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// A toggleable government policy with a static effect table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Policy {
    /// Unique policy name.
    pub name: String,
    /// Political capital spent to activate the policy.
    #[serde(default)]
    pub capital_cost: f64,
    /// Effect magnitudes keyed by namespaced effect key.
    #[serde(default)]
    pub effects: BTreeMap<String, f64>,
}

impl Policy {
    /// Build a policy, normalising a blank name and a negative cost.
    pub fn new(name: &str, capital_cost: f64, effects: BTreeMap<String, f64>) -> Self {
        let trimmed = name.trim();
        Self {
            name: if trimmed.is_empty() {
                String::from("Unnamed Policy")
            } else {
                trimmed.to_owned()
            },
            capital_cost: if capital_cost.is_nan() { 0.0 } else { capital_cost.max(0.0) },
            effects,
        }
    }

    /// Effect magnitude for `key`, or zero when absent.
    pub fn effect(&self, key: &str) -> f64 {
        self.effects.get(key).copied().unwrap_or(0.0)
    }
}
