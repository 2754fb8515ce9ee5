//! Policy registry and ramped activation.
//!
//! A policy is "active" as soon as the player enacts it, but its effects
//! phase in over several turns: every enactment or repeal creates or
//! retargets a [`PolicyRampState`] whose strength walks toward 1.0 (or 0.0)
//! by a fixed step per turn. Effects are always scaled by the current
//! strength, so a freshly repealed policy keeps fading out until its ramp
//! reaches zero and is dropped.
//!
//! # Invariants
//!
//! - Strength is always within `[0.0, 1.0]`.
//! - Step per turn is always within `[MIN_STRENGTH, 1.0]`.
//! - A ramp that is deactivating and has reached `MIN_STRENGTH` is removed.
//! - Iteration order is the lexical order of policy names, so effect sums
//!   and exported states are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use electorate_types::math::{clamp_range, clamp_unit, move_toward};
use electorate_types::policy::{
    BLOC_HAPPINESS_PREFIX, BLOC_TURNOUT_PREFIX, SHIFT_AUTHORITY, SHIFT_DIPLOMATIC,
    SHIFT_ECONOMIC, SHIFT_SOCIETAL, happiness_key, turnout_key,
};
use electorate_types::{BlocCategory, IdeologyVector, Policy, PolicyStateRecord};

use crate::error::PoliticsError;

/// Strength (and minimum step) below which a ramp counts as inert.
pub const MIN_STRENGTH: f64 = 0.0001;

// ---------------------------------------------------------------------------
// PolicyRampState
// ---------------------------------------------------------------------------

/// Phase-in state of one policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyRampState {
    /// Whether the ramp is heading toward full strength.
    pub target_active: bool,
    /// Current effect strength, `[0, 1]`.
    pub current_strength: f64,
    /// Strength change per turn, `[MIN_STRENGTH, 1]`.
    pub step_per_turn: f64,
}

impl PolicyRampState {
    fn advance(&mut self) {
        let target = if self.target_active { 1.0 } else { 0.0 };
        let step = clamp_range(self.step_per_turn, MIN_STRENGTH, 1.0);
        self.current_strength = clamp_unit(move_toward(self.current_strength, target, step));
    }

    fn is_spent(&self) -> bool {
        !self.target_active && self.current_strength <= MIN_STRENGTH
    }
}

/// One policy's strength-scaled contribution to a bloc offset.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyContribution {
    /// Policy name.
    pub policy: String,
    /// Scaled offset the policy contributes this turn.
    pub value: f64,
}

// ---------------------------------------------------------------------------
// PolicyManager
// ---------------------------------------------------------------------------

/// Registry of known policies plus the active set and ramp states.
#[derive(Debug, Clone, Default)]
pub struct PolicyManager {
    policies: BTreeMap<String, Policy>,
    active: BTreeSet<String>,
    ramps: BTreeMap<String, PolicyRampState>,
}

impl PolicyManager {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            policies: BTreeMap::new(),
            active: BTreeSet::new(),
            ramps: BTreeMap::new(),
        }
    }

    /// Register or replace a policy definition by name.
    pub fn register(&mut self, policy: Policy) {
        self.policies.insert(policy.name.clone(), policy);
    }

    /// Forget every policy, activation and ramp.
    pub fn clear(&mut self) {
        self.policies.clear();
        self.active.clear();
        self.ramps.clear();
    }

    /// Registered policy names in lexical order.
    pub fn policy_names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    /// Registered policies in name order.
    pub fn policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies.values()
    }

    /// Look up a policy definition.
    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Whether `name` is in the active set, regardless of ramp strength.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Names in the active set.
    pub fn active_policies(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Current ramp of `name`, if one exists.
    pub fn ramp_state(&self, name: &str) -> Option<PolicyRampState> {
        self.ramps.get(name).copied()
    }

    /// Current effect strength of `name` (0 without a ramp).
    pub fn strength(&self, name: &str) -> f64 {
        self.ramps.get(name).map_or(0.0, |r| r.current_strength)
    }

    /// Enact or repeal `name`, ramping over `ramp_turns` turns.
    ///
    /// A new ramp starts at strength 0; an existing ramp keeps its strength
    /// and only changes direction and step.
    pub fn set_policy_active(
        &mut self,
        name: &str,
        active: bool,
        ramp_turns: u32,
    ) -> Result<(), PoliticsError> {
        if !self.policies.contains_key(name) {
            return Err(PoliticsError::UnknownPolicy {
                name: name.to_owned(),
            });
        }

        let step = 1.0 / f64::from(ramp_turns.max(1));
        self.ramps
            .entry(name.to_owned())
            .and_modify(|ramp| {
                ramp.target_active = active;
                ramp.step_per_turn = step;
            })
            .or_insert(PolicyRampState {
                target_active: active,
                current_strength: 0.0,
                step_per_turn: step,
            });

        if active {
            self.active.insert(name.to_owned());
        } else {
            self.active.remove(name);
        }

        debug!(policy = name, active, ramp_turns, "Policy ramp set");
        Ok(())
    }

    /// Step every ramp once and drop the ones that finished fading out.
    pub fn advance_ramps(&mut self) {
        for ramp in self.ramps.values_mut() {
            ramp.advance();
        }
        self.ramps.retain(|_, ramp| !ramp.is_spent());
    }

    /// Iterate `(policy, strength)` over ramps above [`MIN_STRENGTH`].
    fn live(&self) -> impl Iterator<Item = (&Policy, f64)> {
        self.ramps.iter().filter_map(|(name, ramp)| {
            let strength = clamp_unit(ramp.current_strength);
            if strength <= MIN_STRENGTH {
                return None;
            }
            self.policies.get(name).map(|p| (p, strength))
        })
    }

    /// Every effect key summed over live ramps, scaled by strength.
    pub fn combined_effects(&self) -> BTreeMap<String, f64> {
        let mut combined = BTreeMap::new();
        for (policy, strength) in self.live() {
            for (key, value) in &policy.effects {
                *combined.entry(key.clone()).or_insert(0.0) += value * strength;
            }
        }
        combined
    }

    /// One effect key summed over live ramps, scaled by strength.
    pub fn combined_effect(&self, key: &str) -> f64 {
        self.live().map(|(p, strength)| p.effect(key) * strength).sum()
    }

    /// The four `policy.shift.*` effects as a vector.
    pub fn policy_shift(&self) -> IdeologyVector {
        IdeologyVector::new(
            self.combined_effect(SHIFT_ECONOMIC),
            self.combined_effect(SHIFT_SOCIETAL),
            self.combined_effect(SHIFT_AUTHORITY),
            self.combined_effect(SHIFT_DIPLOMATIC),
        )
    }

    /// Per-policy happiness (or turnout) contribution for a bloc category:
    /// the general plus category-specific effect, scaled by strength.
    /// Negligible contributions are omitted.
    pub fn contributions_for_bloc(&self, category: BlocCategory, turnout: bool) -> Vec<PolicyContribution> {
        let (general, specific) = if turnout {
            (turnout_key(BlocCategory::General), turnout_key(category))
        } else {
            (happiness_key(BlocCategory::General), happiness_key(category))
        };
        let prefix = if turnout { BLOC_TURNOUT_PREFIX } else { BLOC_HAPPINESS_PREFIX };

        self.live()
            .filter_map(|(policy, strength)| {
                let mut raw = sum_case_insensitive(policy, prefix, &general);
                if category != BlocCategory::General {
                    raw += sum_case_insensitive(policy, prefix, &specific);
                }
                let value = raw * strength;
                (value.abs() > MIN_STRENGTH).then(|| PolicyContribution {
                    policy: policy.name.clone(),
                    value,
                })
            })
            .collect()
    }

    /// Persistent form of every ramp, in name order.
    pub fn export_states(&self) -> Vec<PolicyStateRecord> {
        self.ramps
            .iter()
            .map(|(name, ramp)| PolicyStateRecord {
                name: name.clone(),
                target_active: ramp.target_active,
                current_strength: ramp.current_strength,
                step_per_turn: ramp.step_per_turn,
            })
            .collect()
    }

    /// Replace the active set and ramps from persisted records.
    ///
    /// Strength and step are re-clamped, unknown names are skipped, and
    /// every target-active record re-enters the active set.
    pub fn import_states(&mut self, records: &[PolicyStateRecord]) {
        self.active.clear();
        self.ramps.clear();
        for record in records {
            if !self.policies.contains_key(&record.name) {
                debug!(policy = %record.name, "Skipping ramp for unknown policy");
                continue;
            }
            self.ramps.insert(
                record.name.clone(),
                PolicyRampState {
                    target_active: record.target_active,
                    current_strength: clamp_unit(record.current_strength),
                    step_per_turn: clamp_range(record.step_per_turn, MIN_STRENGTH, 1.0),
                },
            );
            if record.target_active {
                self.active.insert(record.name.clone());
            }
        }
    }
}

/// Sum of a policy's bloc effects whose key matches `key` ignoring case in
/// the category suffix.
fn sum_case_insensitive(policy: &Policy, prefix: &str, key: &str) -> f64 {
    let wanted = key.strip_prefix(prefix).unwrap_or(key);
    policy
        .effects
        .iter()
        .filter_map(|(k, v)| {
            let token = k.strip_prefix(prefix)?;
            token.trim().eq_ignore_ascii_case(wanted).then_some(*v)
        })
        .sum()
}
