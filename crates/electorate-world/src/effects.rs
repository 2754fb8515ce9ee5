//! Per-turn bloc offsets composed from the active policy set.

use std::collections::BTreeMap;

use electorate_types::BlocCategory;
use electorate_types::policy::{BLOC_HAPPINESS_PREFIX, BLOC_TURNOUT_PREFIX};

/// Happiness and turnout offsets by bloc category for a single turn.
///
/// Offsets registered under [`BlocCategory::General`] apply to every bloc;
/// category-specific offsets are added on top for matching blocs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTurnEffects {
    happiness: BTreeMap<BlocCategory, f64>,
    turnout: BTreeMap<BlocCategory, f64>,
}

impl PolicyTurnEffects {
    /// Empty effect set (every offset is zero).
    pub const fn new() -> Self {
        Self {
            happiness: BTreeMap::new(),
            turnout: BTreeMap::new(),
        }
    }

    /// Build from `(effect key, already-scaled value)` pairs.
    ///
    /// Only `bloc.happiness.*` and `bloc.turnout.*` keys are consumed; the
    /// category suffix is matched case-insensitively and unknown categories
    /// are ignored.
    pub fn from_effects<'a>(effects: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut result = Self::new();
        for (key, value) in effects {
            if let Some(token) = key.strip_prefix(BLOC_HAPPINESS_PREFIX) {
                if let Some(category) = BlocCategory::parse(token) {
                    result.add_happiness_offset(category, value);
                }
            } else if let Some(token) = key.strip_prefix(BLOC_TURNOUT_PREFIX) {
                if let Some(category) = BlocCategory::parse(token) {
                    result.add_turnout_offset(category, value);
                }
            }
        }
        result
    }

    /// Accumulate a happiness offset for `category`.
    pub fn add_happiness_offset(&mut self, category: BlocCategory, value: f64) {
        *self.happiness.entry(category).or_insert(0.0) += value;
    }

    /// Accumulate a turnout offset for `category`.
    pub fn add_turnout_offset(&mut self, category: BlocCategory, value: f64) {
        *self.turnout.entry(category).or_insert(0.0) += value;
    }

    /// General plus category-specific happiness offset.
    pub fn happiness_offset(&self, category: BlocCategory) -> f64 {
        offset(&self.happiness, category)
    }

    /// General plus category-specific turnout offset.
    pub fn turnout_offset(&self, category: BlocCategory) -> f64 {
        offset(&self.turnout, category)
    }
}

fn offset(source: &BTreeMap<BlocCategory, f64>, category: BlocCategory) -> f64 {
    let general = source.get(&BlocCategory::General).copied().unwrap_or(0.0);
    if category == BlocCategory::General {
        return general;
    }
    general + source.get(&category).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn general_offsets_apply_to_every_category() {
        let effects = PolicyTurnEffects::from_effects([
            ("bloc.happiness.General", 0.05),
            ("bloc.happiness.workers", 0.10),
            ("bloc.turnout.Students", -0.02),
        ]);
        assert!((effects.happiness_offset(BlocCategory::General) - 0.05).abs() < EPS);
        assert!((effects.happiness_offset(BlocCategory::Workers) - 0.15).abs() < EPS);
        assert!((effects.happiness_offset(BlocCategory::Farmers) - 0.05).abs() < EPS);
        assert!((effects.turnout_offset(BlocCategory::Students) + 0.02).abs() < EPS);
        assert!(effects.turnout_offset(BlocCategory::Workers).abs() < EPS);
    }

    #[test]
    fn unrelated_and_unknown_keys_are_ignored() {
        let effects = PolicyTurnEffects::from_effects([
            ("national.stability.offset", 3.0),
            ("bloc.happiness.Aliens", 0.5),
        ]);
        assert_eq!(effects, PolicyTurnEffects::new());
    }

    #[test]
    fn offsets_accumulate() {
        let mut effects = PolicyTurnEffects::new();
        effects.add_happiness_offset(BlocCategory::Retirees, 0.10);
        effects.add_happiness_offset(BlocCategory::Retirees, 0.05);
        assert!((effects.happiness_offset(BlocCategory::Retirees) - 0.15).abs() < EPS);
    }
}
