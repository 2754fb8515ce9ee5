//! Event templates for the stochastic event deck.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ideology::IdeologyVector;

/// A conditional adjustment applied to an event's weight when all of its
/// conditions hold. Absent bounds are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventWeightRule {
    /// Tag that must be present.
    #[serde(default)]
    pub require_tag: Option<String>,
    /// Tag that must be absent.
    #[serde(default)]
    pub forbid_tag: Option<String>,
    /// Minimum national unrest (inclusive).
    #[serde(default)]
    pub min_unrest: Option<f64>,
    /// Maximum national unrest (inclusive).
    #[serde(default)]
    pub max_unrest: Option<f64>,
    /// Minimum national stability (inclusive).
    #[serde(default)]
    pub min_stability: Option<f64>,
    /// Maximum national stability (inclusive).
    #[serde(default)]
    pub max_stability: Option<f64>,
    /// Weight multiplier; non-positive values are treated as 1.
    #[serde(default = "default_weight_multiplier")]
    pub weight_multiplier: f64,
    /// Additive weight term applied after the multiplier.
    #[serde(default)]
    pub weight_add: f64,
}

impl Default for EventWeightRule {
    fn default() -> Self {
        Self {
            require_tag: None,
            forbid_tag: None,
            min_unrest: None,
            max_unrest: None,
            min_stability: None,
            max_stability: None,
            weight_multiplier: default_weight_multiplier(),
            weight_add: 0.0,
        }
    }
}

const fn default_weight_multiplier() -> f64 {
    1.0
}

/// A world tag set when the event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventTagEffect {
    /// Tag name.
    pub tag: String,
    /// Duration in turns; zero or negative makes the tag permanent.
    #[serde(default)]
    pub duration_turns: i32,
}

/// A weighted event template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationEvent {
    /// Headline shown when the event fires.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Ideology shift applied to every bloc.
    #[serde(default)]
    pub voter_shift: IdeologyVector,
    /// Added to the national stability shock.
    #[serde(default)]
    pub stability_impact: f64,
    /// Base draw weight.
    #[serde(default = "default_event_weight")]
    pub weight: f64,
    /// Conditional weight adjustments, applied in order.
    #[serde(default)]
    pub weight_rules: Vec<EventWeightRule>,
    /// Tags set when the event fires.
    #[serde(default)]
    pub tag_effects: Vec<EventTagEffect>,
}

const fn default_event_weight() -> f64 {
    1.0
}

impl SimulationEvent {
    /// An unconditional event with no tag effects.
    pub fn new(
        title: &str,
        description: &str,
        voter_shift: IdeologyVector,
        stability_impact: f64,
        weight: f64,
    ) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            voter_shift,
            stability_impact,
            weight,
            weight_rules: Vec::new(),
            tag_effects: Vec::new(),
        }
    }
}
