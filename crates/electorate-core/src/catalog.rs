//! Scenario catalog: policies, events, parties, candidate traits and
//! backgrounds.
//!
//! Data files are loaded outside the core and handed in as plain records.
//! [`ScenarioCatalog::from_records`] applies the loader rules (blank names
//! skipped, non-positive event weights raised to a minimum) and falls back
//! to the built-in scenario for any collection that ends up empty.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use electorate_types::policy::{
    SHIFT_AUTHORITY, SHIFT_DIPLOMATIC, SHIFT_ECONOMIC, SHIFT_SOCIETAL, STABILITY_OFFSET,
    TREASURY_PER_TICK, TURNOUT_OFFSET, happiness_key, turnout_key,
};
use electorate_types::{
    BlocCategory, CandidateBackgroundDefinition, CandidateTraitDefinition, IdeologyVector,
    PartyDefinition, Policy, SimulationEvent,
};

/// Weight given to loaded events whose weight is not positive.
pub const MIN_LOADED_EVENT_WEIGHT: f64 = 0.01;

/// Every configuration record the orchestrator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    /// Policies in registration order.
    pub policies: Vec<Policy>,
    /// The event deck.
    pub events: Vec<SimulationEvent>,
    /// Parties at the start of a campaign.
    pub parties: Vec<PartyDefinition>,
    /// Candidate traits keyed by lowercase id.
    pub traits: BTreeMap<String, CandidateTraitDefinition>,
    /// Candidate backgrounds keyed by lowercase id.
    pub backgrounds: BTreeMap<String, CandidateBackgroundDefinition>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            policies: default_policies(),
            events: default_events(),
            parties: default_parties(),
            traits: index_by_id(default_traits()),
            backgrounds: index_by_id(default_backgrounds()),
        }
    }
}

impl ScenarioCatalog {
    /// Build a catalog from loaded records, falling back per collection.
    pub fn from_records(
        policies: Vec<Policy>,
        events: Vec<SimulationEvent>,
        parties: Vec<PartyDefinition>,
        traits: Vec<CandidateTraitDefinition>,
        backgrounds: Vec<CandidateBackgroundDefinition>,
    ) -> Self {
        let policies: Vec<Policy> = policies
            .into_iter()
            .filter(|p| !p.name.trim().is_empty())
            .collect();
        let events = normalize_events(events);
        let parties: Vec<PartyDefinition> = parties
            .into_iter()
            .filter(|p| !p.name.trim().is_empty())
            .collect();
        let traits = index_by_id(traits);
        let backgrounds = index_by_id(backgrounds);

        debug!(
            policies = policies.len(),
            events = events.len(),
            parties = parties.len(),
            traits = traits.len(),
            backgrounds = backgrounds.len(),
            "Scenario records received"
        );

        Self {
            policies: or_fallback(policies, "policies", default_policies),
            events: or_fallback(events, "events", default_events),
            parties: or_fallback(parties, "parties", default_parties),
            traits: if traits.is_empty() {
                warn!(collection = "traits", "No records loaded, using built-in defaults");
                index_by_id(default_traits())
            } else {
                traits
            },
            backgrounds: if backgrounds.is_empty() {
                warn!(collection = "backgrounds", "No records loaded, using built-in defaults");
                index_by_id(default_backgrounds())
            } else {
                backgrounds
            },
        }
    }

    /// Traits sorted by display name, case-insensitively.
    pub fn sorted_traits(&self) -> Vec<&CandidateTraitDefinition> {
        sorted_by_name(&self.traits)
    }

    /// Backgrounds sorted by display name, case-insensitively.
    pub fn sorted_backgrounds(&self) -> Vec<&CandidateBackgroundDefinition> {
        sorted_by_name(&self.backgrounds)
    }
}

fn or_fallback<T>(records: Vec<T>, collection: &str, fallback: fn() -> Vec<T>) -> Vec<T> {
    if records.is_empty() {
        warn!(collection, "No records loaded, using built-in defaults");
        fallback()
    } else {
        records
    }
}

fn normalize_events(events: Vec<SimulationEvent>) -> Vec<SimulationEvent> {
    events
        .into_iter()
        .filter(|e| !e.title.trim().is_empty())
        .map(|mut e| {
            if e.weight.is_nan() || e.weight <= 0.0 {
                e.weight = MIN_LOADED_EVENT_WEIGHT;
            }
            e.tag_effects.retain(|t| !t.tag.trim().is_empty());
            e
        })
        .collect()
}

fn index_by_id(definitions: Vec<CandidateTraitDefinition>) -> BTreeMap<String, CandidateTraitDefinition> {
    definitions
        .into_iter()
        .filter_map(|d| {
            let key = d.id.trim().to_lowercase();
            (!key.is_empty()).then_some((key, d))
        })
        .collect()
}

fn sorted_by_name(map: &BTreeMap<String, CandidateTraitDefinition>) -> Vec<&CandidateTraitDefinition> {
    let mut items: Vec<&CandidateTraitDefinition> = map.values().collect();
    items.sort_by_cached_key(|d| d.name.to_lowercase());
    items
}

// ---------------------------------------------------------------------------
// Built-in scenario
// ---------------------------------------------------------------------------

fn effects(entries: &[(String, f64)]) -> BTreeMap<String, f64> {
    entries.iter().cloned().collect()
}

/// Universal Healthcare, Strict Policing and Open Borders.
pub fn default_policies() -> Vec<Policy> {
    use BlocCategory::{Business, Farmers, Professionals, Retirees, Students, Workers};

    vec![
        Policy::new(
            "Universal Healthcare",
            6.0,
            effects(&[
                (SHIFT_ECONOMIC.to_owned(), -0.08),
                (STABILITY_OFFSET.to_owned(), 2.0),
                (TREASURY_PER_TICK.to_owned(), -55.0),
                (happiness_key(Workers), 0.08),
                (happiness_key(Retirees), 0.10),
                (happiness_key(Students), 0.03),
                (happiness_key(Business), -0.02),
                (turnout_key(Workers), 0.02),
                (turnout_key(Retirees), 0.01),
            ]),
        ),
        Policy::new(
            "Strict Policing",
            5.0,
            effects(&[
                (SHIFT_AUTHORITY.to_owned(), 0.10),
                (STABILITY_OFFSET.to_owned(), 2.5),
                (TURNOUT_OFFSET.to_owned(), -0.02),
                (TREASURY_PER_TICK.to_owned(), -35.0),
                (happiness_key(Retirees), 0.05),
                (happiness_key(Business), 0.03),
                (happiness_key(Students), -0.10),
                (happiness_key(Workers), -0.03),
                (turnout_key(Students), -0.05),
            ]),
        ),
        Policy::new(
            "Open Borders",
            4.0,
            effects(&[
                (SHIFT_DIPLOMATIC.to_owned(), 0.12),
                (SHIFT_SOCIETAL.to_owned(), 0.04),
                (STABILITY_OFFSET.to_owned(), -1.5),
                (TREASURY_PER_TICK.to_owned(), 22.0),
                (happiness_key(Professionals), 0.08),
                (happiness_key(Students), 0.06),
                (happiness_key(Business), 0.03),
                (happiness_key(Farmers), -0.04),
                (happiness_key(Retirees), -0.05),
                (turnout_key(Professionals), 0.02),
                (turnout_key(Farmers), -0.01),
            ]),
        ),
    ]
}

/// The six built-in events.
pub fn default_events() -> Vec<SimulationEvent> {
    vec![
        SimulationEvent::new(
            "Market Crash",
            "A sudden downturn increases demand for intervention and political certainty.",
            IdeologyVector::new(-0.20, -0.03, 0.08, -0.02),
            -12.0,
            1.0,
        ),
        SimulationEvent::new(
            "Corruption Scandal",
            "Leaked documents trigger broad anger and distrust in institutions.",
            IdeologyVector::new(-0.05, 0.06, -0.12, 0.00),
            -10.0,
            0.8,
        ),
        SimulationEvent::new(
            "Tech Boom",
            "High-growth sectors expand and urban optimism rises.",
            IdeologyVector::new(0.14, 0.07, -0.05, 0.10),
            7.0,
            0.7,
        ),
        SimulationEvent::new(
            "Border Crisis",
            "Tensions around migration and security dominate public debate.",
            IdeologyVector::new(-0.02, -0.06, 0.14, -0.18),
            -8.0,
            0.9,
        ),
        SimulationEvent::new(
            "Civil Rights Wave",
            "Grassroots organizing boosts social mobilization and progressive demands.",
            IdeologyVector::new(-0.04, 0.18, -0.10, 0.06),
            4.0,
            0.6,
        ),
        SimulationEvent::new(
            "Energy Shock",
            "Rising prices trigger concern about sovereignty and cost of living.",
            IdeologyVector::new(-0.10, -0.02, 0.06, -0.12),
            -6.0,
            0.75,
        ),
    ]
}

fn party(name: &str, color: &str, platform: IdeologyVector, opportunism: f64) -> PartyDefinition {
    PartyDefinition {
        name: name.to_owned(),
        color: color.to_owned(),
        platform,
        opportunism,
    }
}

/// SocDem, Conservative and Liberal.
pub fn default_parties() -> Vec<PartyDefinition> {
    vec![
        party("SocDem", "#d94747", IdeologyVector::new(-0.60, 0.35, -0.25, 0.35), 0.60),
        party("Conservative", "#3861cc", IdeologyVector::new(0.40, -0.55, 0.40, -0.30), 0.45),
        party("Liberal", "#f2cc38", IdeologyVector::new(0.25, 0.55, -0.35, 0.55), 0.70),
    ]
}

/// Grassroots Organizer and Policy Wonk.
pub fn default_traits() -> Vec<CandidateTraitDefinition> {
    vec![
        CandidateTraitDefinition {
            id: String::from("grassroots"),
            name: String::from("Grassroots Organizer"),
            campaign_strength_multiplier_delta: 0.10,
            polling_bonus_delta: 0.01,
            charisma_delta: 0.08,
            ..CandidateTraitDefinition::default()
        },
        CandidateTraitDefinition {
            id: String::from("policy_wonk"),
            name: String::from("Policy Wonk"),
            competence_delta: 0.12,
            policy_cost_multiplier_delta: -0.07,
            capital_gain_multiplier_delta: 0.07,
            debt_stress_mitigation_delta: 0.05,
            ..CandidateTraitDefinition::default()
        },
    ]
}

/// Street Activist and Business Executive.
pub fn default_backgrounds() -> Vec<CandidateBackgroundDefinition> {
    vec![
        CandidateBackgroundDefinition {
            id: String::from("activist"),
            name: String::from("Street Activist"),
            charisma_delta: 0.10,
            populism_delta: 0.08,
            campaign_strength_multiplier_delta: 0.10,
            ..CandidateBackgroundDefinition::default()
        },
        CandidateBackgroundDefinition {
            id: String::from("business_exec"),
            name: String::from("Business Executive"),
            competence_delta: 0.10,
            debt_stress_mitigation_delta: 0.10,
            event_shock_multiplier_delta: -0.03,
            ..CandidateBackgroundDefinition::default()
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electorate_types::EventTagEffect;

    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn default_scenario_is_complete() {
        let catalog = ScenarioCatalog::default();
        assert_eq!(catalog.policies.len(), 3);
        assert_eq!(catalog.events.len(), 6);
        assert_eq!(catalog.parties.len(), 3);
        assert!(catalog.traits.contains_key("policy_wonk"));
        assert!(catalog.backgrounds.contains_key("business_exec"));

        let healthcare = catalog.policies.first().unwrap();
        assert!((healthcare.effect(TREASURY_PER_TICK) + 55.0).abs() < EPS);
        assert!((healthcare.effect(&happiness_key(BlocCategory::Retirees)) - 0.10).abs() < EPS);
    }

    #[test]
    fn empty_collections_fall_back_individually() {
        let custom = Policy::new("Land Reform", 3.0, BTreeMap::new());
        let catalog = ScenarioCatalog::from_records(vec![custom], Vec::new(), Vec::new(), Vec::new(), Vec::new());
        assert_eq!(catalog.policies.len(), 1);
        assert_eq!(catalog.policies.first().unwrap().name, "Land Reform");
        assert_eq!(catalog.events, default_events());
        assert_eq!(catalog.parties, default_parties());
        assert_eq!(catalog.traits.len(), 2);
    }

    #[test]
    fn loader_rules_apply_to_events() {
        let mut zero = SimulationEvent::new("General Strike", "", IdeologyVector::ZERO, -5.0, 0.0);
        zero.tag_effects.push(EventTagEffect {
            tag: String::from("  "),
            duration_turns: 2,
        });
        zero.tag_effects.push(EventTagEffect {
            tag: String::from("strike_wave"),
            duration_turns: 2,
        });
        let blank = SimulationEvent::new(" ", "", IdeologyVector::ZERO, 0.0, 1.0);

        let catalog = ScenarioCatalog::from_records(Vec::new(), vec![zero, blank], Vec::new(), Vec::new(), Vec::new());
        assert_eq!(catalog.events.len(), 1);
        let event = catalog.events.first().unwrap();
        assert!((event.weight - MIN_LOADED_EVENT_WEIGHT).abs() < EPS);
        assert_eq!(event.tag_effects.len(), 1);
    }

    #[test]
    fn traits_are_keyed_by_lowercase_id_and_sorted_by_name() {
        let traits = vec![
            CandidateTraitDefinition {
                id: String::from("Orator"),
                name: String::from("orator"),
                ..CandidateTraitDefinition::default()
            },
            CandidateTraitDefinition {
                id: String::from("fixer"),
                name: String::from("Backroom Fixer"),
                ..CandidateTraitDefinition::default()
            },
            CandidateTraitDefinition::default(),
        ];
        let catalog = ScenarioCatalog::from_records(Vec::new(), Vec::new(), Vec::new(), traits, Vec::new());
        assert_eq!(catalog.traits.len(), 2);
        assert!(catalog.traits.contains_key("orator"));
        let names: Vec<&str> = catalog.sorted_traits().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Backroom Fixer", "orator"]);
    }
}
