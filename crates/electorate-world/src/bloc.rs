//! Voter blocs: the unit of public opinion inside a district tile.

use electorate_types::math::{clamp_range, clamp_unit};
use electorate_types::{BlocCategory, BlocRecord, CompassAxis, IdeologyVector};

use crate::effects::PolicyTurnEffects;

/// Weight of the normalized ideology distance in the happiness penalty.
const IDEOLOGY_PENALTY_WEIGHT: f64 = 0.75;
/// Weight of the local-issue distance in the happiness penalty.
const ISSUE_PENALTY_WEIGHT: f64 = 0.45;

/// A named population segment with a shared ideology and sentiment.
#[derive(Debug, Clone, PartialEq)]
pub struct VoterBloc {
    /// Display name; also the source of the category.
    pub name: String,
    /// Head count.
    pub population: u32,
    /// Category inferred from the name.
    pub category: BlocCategory,
    /// Current ideology.
    pub ideology: IdeologyVector,
    /// Satisfaction with government, `[0, 1]`.
    pub happiness: f64,
    /// Probability of voting, `[0, 1]`.
    pub turnout_chance: f64,
    /// Anger, `[0, 1]`.
    pub anger: f64,
    /// Hope, `[0, 1]`.
    pub hope: f64,
    /// Ideology-distance penalty applied on the last turn.
    pub last_ideology_happiness_penalty: f64,
    /// Local-issue penalty applied on the last turn.
    pub last_issue_happiness_penalty: f64,
    /// Policy happiness offset applied on the last turn.
    pub last_policy_happiness_modifier: f64,
    /// Policy turnout offset applied on the last turn.
    pub last_policy_turnout_modifier: f64,
}

impl VoterBloc {
    /// Create a bloc with neutral starting sentiment.
    pub fn new(name: &str, population: u32, ideology: IdeologyVector) -> Self {
        Self {
            name: name.to_owned(),
            population,
            category: BlocCategory::infer_from_name(name),
            ideology,
            happiness: 0.5,
            turnout_chance: 0.6,
            anger: 0.4,
            hope: 0.5,
            last_ideology_happiness_penalty: 0.0,
            last_issue_happiness_penalty: 0.0,
            last_policy_happiness_modifier: 0.0,
            last_policy_turnout_modifier: 0.0,
        }
    }

    /// Recompute sentiment against the effective government policy.
    pub fn process_turn(
        &mut self,
        policy: &IdeologyVector,
        local_issue: CompassAxis,
        effects: Option<&PolicyTurnEffects>,
    ) {
        let normalized_distance = self.ideology.normalized_distance_to(policy);
        let issue_distance = (self.ideology.axis(local_issue) - policy.axis(local_issue)).abs() * 0.5;
        self.last_ideology_happiness_penalty = normalized_distance * IDEOLOGY_PENALTY_WEIGHT;
        self.last_issue_happiness_penalty = issue_distance * ISSUE_PENALTY_WEIGHT;

        self.happiness = clamp_unit(
            1.0 - (self.last_ideology_happiness_penalty + self.last_issue_happiness_penalty),
        );
        self.last_policy_happiness_modifier = effects.map_or(0.0, |e| e.happiness_offset(self.category));
        self.happiness = clamp_unit(self.happiness + self.last_policy_happiness_modifier);

        self.anger = clamp_unit(issue_distance.mul_add(0.2, 1.0 - self.happiness));
        self.hope = clamp_unit(self.happiness.mul_add(0.8, (1.0 - issue_distance) * 0.2));
        self.turnout_chance = clamp_unit(self.hope.mul_add(0.45, self.anger.mul_add(0.35, 0.2)));

        self.last_policy_turnout_modifier = effects.map_or(0.0, |e| e.turnout_offset(self.category));
        self.turnout_chance = clamp_unit(self.turnout_chance + self.last_policy_turnout_modifier);
    }

    /// Shift ideology by `shift * strength`; strength is clamped into `[0, 1]`.
    pub fn apply_global_shift(&mut self, shift: &IdeologyVector, strength: f64) {
        self.ideology = self.ideology + *shift * clamp_unit(strength);
    }

    /// Blend ideology toward `target`; amount is clamped into `[0, 1]`.
    pub fn nudge_toward(&mut self, target: &IdeologyVector, amount: f64) {
        self.ideology = self.ideology.blend_toward(target, clamp_unit(amount));
    }

    /// Persistent form of this bloc.
    pub fn to_record(&self) -> BlocRecord {
        BlocRecord {
            name: self.name.clone(),
            population: self.population,
            category: self.category,
            ideology: self.ideology,
            happiness: self.happiness,
            turnout_chance: self.turnout_chance,
            anger: self.anger,
            hope: self.hope,
            last_ideology_happiness_penalty: self.last_ideology_happiness_penalty,
            last_issue_happiness_penalty: self.last_issue_happiness_penalty,
            last_policy_happiness_modifier: self.last_policy_happiness_modifier,
            last_policy_turnout_modifier: self.last_policy_turnout_modifier,
        }
    }

    /// Rebuild a bloc from a record, re-clamping every field.
    ///
    /// Returns `None` for records with a blank name.
    pub fn from_record(record: &BlocRecord) -> Option<Self> {
        let name = record.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            population: record.population,
            category: record.category,
            ideology: record.ideology,
            happiness: clamp_unit(record.happiness),
            turnout_chance: clamp_unit(record.turnout_chance),
            anger: clamp_unit(record.anger),
            hope: clamp_unit(record.hope),
            last_ideology_happiness_penalty: clamp_unit(record.last_ideology_happiness_penalty),
            last_issue_happiness_penalty: clamp_unit(record.last_issue_happiness_penalty),
            last_policy_happiness_modifier: clamp_range(record.last_policy_happiness_modifier, -1.0, 1.0),
            last_policy_turnout_modifier: clamp_range(record.last_policy_turnout_modifier, -1.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn in_unit(v: f64) -> bool {
        (0.0..=1.0).contains(&v)
    }

    #[test]
    fn new_bloc_starts_neutral() {
        let bloc = VoterBloc::new("Industrial Workers", 2600, IdeologyVector::ZERO);
        assert_eq!(bloc.category, BlocCategory::Workers);
        assert!((bloc.happiness - 0.5).abs() < EPS);
        assert!((bloc.turnout_chance - 0.6).abs() < EPS);
        assert!((bloc.anger - 0.4).abs() < EPS);
        assert!((bloc.hope - 0.5).abs() < EPS);
    }

    #[test]
    fn aligned_bloc_is_fully_happy() {
        let policy = IdeologyVector::new(0.2, -0.1, 0.3, 0.0);
        let mut bloc = VoterBloc::new("Residents", 1000, policy);
        bloc.process_turn(&policy, CompassAxis::Economic, None);
        assert!((bloc.happiness - 1.0).abs() < EPS);
        assert!(bloc.anger.abs() < EPS);
        assert!((bloc.hope - 1.0).abs() < EPS);
        assert!((bloc.turnout_chance - 0.65).abs() < EPS);
    }

    #[test]
    fn opposite_bloc_is_penalised_on_both_terms() {
        let policy = IdeologyVector::new(1.0, 1.0, 1.0, 1.0);
        let mut bloc = VoterBloc::new("Farmers", 2200, IdeologyVector::new(-1.0, -1.0, -1.0, -1.0));
        bloc.process_turn(&policy, CompassAxis::Societal, None);
        // distance 4 -> 0.75 penalty; issue |(-1) - 1| * 0.5 = 1 -> 0.45 penalty.
        assert!((bloc.last_ideology_happiness_penalty - 0.75).abs() < EPS);
        assert!((bloc.last_issue_happiness_penalty - 0.45).abs() < EPS);
        assert!(bloc.happiness.abs() < EPS);
        assert!((bloc.anger - 1.0).abs() < EPS);
        assert!(bloc.hope.abs() < EPS);
        assert!((bloc.turnout_chance - 0.55).abs() < EPS);
    }

    #[test]
    fn policy_offsets_are_recorded_and_clamped() {
        let policy = IdeologyVector::ZERO;
        let mut effects = PolicyTurnEffects::new();
        effects.add_happiness_offset(BlocCategory::Retirees, 0.5);
        effects.add_turnout_offset(BlocCategory::General, 0.8);
        let mut bloc = VoterBloc::new("Retirees", 1800, policy);
        bloc.process_turn(&policy, CompassAxis::Economic, Some(&effects));
        assert!((bloc.last_policy_happiness_modifier - 0.5).abs() < EPS);
        assert!((bloc.last_policy_turnout_modifier - 0.8).abs() < EPS);
        assert!((bloc.happiness - 1.0).abs() < EPS);
        assert!((bloc.turnout_chance - 1.0).abs() < EPS);
    }

    #[test]
    fn sentiment_stays_in_unit_range() {
        let mut effects = PolicyTurnEffects::new();
        effects.add_happiness_offset(BlocCategory::General, -3.0);
        effects.add_turnout_offset(BlocCategory::General, -3.0);
        let mut bloc = VoterBloc::new("Students", 2500, IdeologyVector::new(-0.9, 0.9, -0.5, 0.4));
        for axis in CompassAxis::ALL {
            bloc.process_turn(&IdeologyVector::new(0.7, -0.6, 0.8, -0.9), axis, Some(&effects));
            assert!(in_unit(bloc.happiness));
            assert!(in_unit(bloc.turnout_chance));
            assert!(in_unit(bloc.anger));
            assert!(in_unit(bloc.hope));
        }
    }

    #[test]
    fn global_shift_strength_is_clamped() {
        let mut bloc = VoterBloc::new("Managers", 1800, IdeologyVector::ZERO);
        bloc.apply_global_shift(&IdeologyVector::new(0.2, 0.0, 0.0, 0.0), 5.0);
        assert!((bloc.ideology.economic() - 0.2).abs() < EPS);
        bloc.apply_global_shift(&IdeologyVector::new(0.2, 0.0, 0.0, 0.0), -1.0);
        assert!((bloc.ideology.economic() - 0.2).abs() < EPS);
    }

    #[test]
    fn nudge_blends_toward_target() {
        let mut bloc = VoterBloc::new("Managers", 1800, IdeologyVector::ZERO);
        bloc.nudge_toward(&IdeologyVector::new(1.0, 0.0, 0.0, 0.0), 0.25);
        assert!((bloc.ideology.economic() - 0.25).abs() < EPS);
    }

    #[test]
    fn record_rejects_blank_names_and_clamps() {
        let mut record = VoterBloc::new("Retirees", 1800, IdeologyVector::ZERO).to_record();
        record.happiness = 4.0;
        record.last_policy_turnout_modifier = -7.0;
        let restored = VoterBloc::from_record(&record);
        assert!(restored.is_some());
        let restored = restored.unwrap_or_else(|| VoterBloc::new("x", 1, IdeologyVector::ZERO));
        assert!((restored.happiness - 1.0).abs() < EPS);
        assert!((restored.last_policy_turnout_modifier + 1.0).abs() < EPS);

        record.name = String::from("   ");
        assert!(VoterBloc::from_record(&record).is_none());
    }
}
