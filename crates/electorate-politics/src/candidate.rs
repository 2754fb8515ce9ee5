//! The player's candidate: base stats shaped by a background and traits,
//! and the campaign multipliers derived from them.

use std::collections::{BTreeMap, BTreeSet};

use electorate_types::math::{clamp_range, clamp_unit};
use electorate_types::{CandidateBackgroundDefinition, CandidateRecord, CandidateTraitDefinition};

/// Name used when a candidate is built with a blank name.
pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

/// A fully resolved candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    /// Display name.
    pub name: String,
    /// Background id (may be unknown to the catalog).
    pub background_id: String,
    /// Trait ids in selection order, de-duplicated.
    pub trait_ids: Vec<String>,
    /// Charisma, `[0, 1]`.
    pub charisma: f64,
    /// Competence, `[0, 1]`.
    pub competence: f64,
    /// Integrity, `[0, 1]`.
    pub integrity: f64,
    /// Populism, `[0, 1]`.
    pub populism: f64,
    /// Scales policy enactment cost, `[0.7, 1.35]`.
    pub policy_cost_multiplier: f64,
    /// Scales propaganda cost, `[0.7, 1.35]`.
    pub propaganda_cost_multiplier: f64,
    /// Scales the player's campaign buff, `[0.75, 1.5]`.
    pub campaign_strength_multiplier: f64,
    /// Added to the player's projected poll share, `[-0.08, 0.08]`.
    pub polling_bonus: f64,
    /// Scales per-turn capital gain, `[0.7, 1.4]`.
    pub capital_gain_multiplier: f64,
    /// Fraction of debt stress absorbed, `[0, 0.6]`.
    pub debt_stress_mitigation: f64,
    /// Scales event stability impact, `[0.7, 1.3]`.
    pub event_shock_multiplier: f64,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_CANDIDATE_NAME),
            background_id: String::new(),
            trait_ids: Vec::new(),
            charisma: 0.5,
            competence: 0.5,
            integrity: 0.5,
            populism: 0.5,
            policy_cost_multiplier: 1.0,
            propaganda_cost_multiplier: 1.0,
            campaign_strength_multiplier: 1.0,
            polling_bonus: 0.0,
            capital_gain_multiplier: 1.0,
            debt_stress_mitigation: 0.0,
            event_shock_multiplier: 1.0,
        }
    }
}

impl CandidateProfile {
    /// Resolve a candidate from a background and an ordered trait list.
    ///
    /// Catalogs are keyed by lowercase id. Trait ids are trimmed and
    /// de-duplicated case-insensitively; unknown ids stay in the list but
    /// contribute nothing. Every stat and
    /// multiplier is clamped to its range after all deltas apply.
    pub fn build<S: AsRef<str>>(
        name: &str,
        background_id: &str,
        trait_ids: &[S],
        backgrounds: &BTreeMap<String, CandidateBackgroundDefinition>,
        traits: &BTreeMap<String, CandidateTraitDefinition>,
    ) -> Self {
        let trimmed = name.trim();
        let mut profile = Self {
            name: if trimmed.is_empty() {
                String::from(DEFAULT_CANDIDATE_NAME)
            } else {
                trimmed.to_owned()
            },
            background_id: background_id.to_owned(),
            ..Self::default()
        };

        if let Some(background) = backgrounds.get(&background_id.trim().to_lowercase()) {
            profile.apply(background);
        }

        let mut seen = BTreeSet::new();
        for raw in trait_ids {
            let id = raw.as_ref().trim();
            if id.is_empty() || !seen.insert(id.to_lowercase()) {
                continue;
            }
            profile.trait_ids.push(id.to_owned());
            if let Some(definition) = traits.get(&id.to_lowercase()) {
                profile.apply(definition);
            }
        }

        profile.clamp();
        profile
    }

    fn apply(&mut self, d: &CandidateTraitDefinition) {
        self.charisma += d.charisma_delta;
        self.competence += d.competence_delta;
        self.integrity += d.integrity_delta;
        self.populism += d.populism_delta;
        self.policy_cost_multiplier += d.policy_cost_multiplier_delta;
        self.propaganda_cost_multiplier += d.propaganda_cost_multiplier_delta;
        self.campaign_strength_multiplier += d.campaign_strength_multiplier_delta;
        self.polling_bonus += d.polling_bonus_delta;
        self.capital_gain_multiplier += d.capital_gain_multiplier_delta;
        self.debt_stress_mitigation += d.debt_stress_mitigation_delta;
        self.event_shock_multiplier += d.event_shock_multiplier_delta;
    }

    fn clamp(&mut self) {
        self.charisma = clamp_unit(self.charisma);
        self.competence = clamp_unit(self.competence);
        self.integrity = clamp_unit(self.integrity);
        self.populism = clamp_unit(self.populism);
        self.policy_cost_multiplier = clamp_range(self.policy_cost_multiplier, 0.7, 1.35);
        self.propaganda_cost_multiplier = clamp_range(self.propaganda_cost_multiplier, 0.7, 1.35);
        self.campaign_strength_multiplier = clamp_range(self.campaign_strength_multiplier, 0.75, 1.5);
        self.polling_bonus = clamp_range(self.polling_bonus, -0.08, 0.08);
        self.capital_gain_multiplier = clamp_range(self.capital_gain_multiplier, 0.7, 1.4);
        self.debt_stress_mitigation = clamp_range(self.debt_stress_mitigation, 0.0, 0.6);
        self.event_shock_multiplier = clamp_range(self.event_shock_multiplier, 0.7, 1.3);
    }

    /// Persistent form: identity plus the four base stats.
    pub fn to_record(&self) -> CandidateRecord {
        CandidateRecord {
            name: self.name.clone(),
            background_id: self.background_id.clone(),
            trait_ids: self.trait_ids.clone(),
            charisma: self.charisma,
            competence: self.competence,
            integrity: self.integrity,
            populism: self.populism,
        }
    }

    /// Rebuild from a record: multipliers come from the catalogs, base
    /// stats are taken from the record and clamped.
    pub fn from_record(
        record: &CandidateRecord,
        backgrounds: &BTreeMap<String, CandidateBackgroundDefinition>,
        traits: &BTreeMap<String, CandidateTraitDefinition>,
    ) -> Self {
        let mut profile = Self::build(&record.name, &record.background_id, record.trait_ids.as_slice(), backgrounds, traits);
        profile.charisma = clamp_unit(record.charisma);
        profile.competence = clamp_unit(record.competence);
        profile.integrity = clamp_unit(record.integrity);
        profile.populism = clamp_unit(record.populism);
        profile
    }
}

/// Split a comma-separated id list, trimming and dropping empty entries.
pub fn parse_trait_ids(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
