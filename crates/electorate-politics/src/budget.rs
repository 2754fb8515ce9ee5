//! Budget allocation and the per-effect multipliers it drives.
//!
//! Each budget line scales the policy effects it funds: every multiplier is
//! `lerp(0.3, 1.7, allocation)`, so an allocation of 0.5 leaves effects
//! unchanged.

use std::collections::BTreeMap;

use electorate_types::math::{clamp_unit, lerp};
use electorate_types::policy::{
    BLOC_HAPPINESS_PREFIX, BLOC_TURNOUT_PREFIX, CAPITAL_PER_TICK, SHIFT_AUTHORITY,
    SHIFT_DIPLOMATIC, SHIFT_ECONOMIC, SHIFT_SOCIETAL, STABILITY_OFFSET, TREASURY_PER_TICK,
    TURNOUT_OFFSET,
};
use electorate_types::IdeologyVector;

/// Default share for every budget line.
pub const DEFAULT_ALLOCATION: f64 = 0.5;

/// Share of spending on each budget line, each `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetAllocation {
    /// Public services.
    pub services: f64,
    /// Military and policing.
    pub military: f64,
    /// Infrastructure.
    pub infrastructure: f64,
}

impl Default for BudgetAllocation {
    fn default() -> Self {
        Self {
            services: DEFAULT_ALLOCATION,
            military: DEFAULT_ALLOCATION,
            infrastructure: DEFAULT_ALLOCATION,
        }
    }
}

impl BudgetAllocation {
    /// Allocation with every line clamped to `[0, 1]`.
    pub fn new(services: f64, military: f64, infrastructure: f64) -> Self {
        Self {
            services: clamp_unit(services),
            military: clamp_unit(military),
            infrastructure: clamp_unit(infrastructure),
        }
    }

    /// Multiplier applied to the policy effect `key`.
    pub fn multiplier_for(&self, key: &str) -> f64 {
        let share = if key == SHIFT_AUTHORITY {
            self.military
        } else if key == STABILITY_OFFSET
            || key == TURNOUT_OFFSET
            || key.starts_with(BLOC_HAPPINESS_PREFIX)
            || key.starts_with(BLOC_TURNOUT_PREFIX)
        {
            self.services
        } else if key == TREASURY_PER_TICK || key == CAPITAL_PER_TICK || key == SHIFT_DIPLOMATIC {
            self.infrastructure
        } else if key == SHIFT_ECONOMIC || key == SHIFT_SOCIETAL {
            (self.services + self.infrastructure) * 0.5
        } else {
            return 1.0;
        };
        lerp(0.3, 1.7, share)
    }

    /// Scale every effect in `effects` by its budget multiplier.
    pub fn scale_effects(&self, effects: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        effects
            .iter()
            .map(|(key, value)| (key.clone(), value * self.multiplier_for(key)))
            .collect()
    }
}

/// Budget-scaled policy shift read from already-scaled effects.
pub fn scaled_policy_shift(scaled: &BTreeMap<String, f64>) -> IdeologyVector {
    let get = |key: &str| scaled.get(key).copied().unwrap_or(0.0);
    IdeologyVector::new(
        get(SHIFT_ECONOMIC),
        get(SHIFT_SOCIETAL),
        get(SHIFT_AUTHORITY),
        get(SHIFT_DIPLOMATIC),
    )
}
