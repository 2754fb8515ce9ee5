//! Weighted event selection.
//!
//! Each turn the deck is consulted once: a chance roll decides whether an
//! event happens at all, then one event is drawn with probability
//! proportional to its conditional weight. Weight rules let the current
//! world tags and national unrest or stability scale an event's weight.

use rand::Rng;

use electorate_types::{EventWeightRule, SimulationEvent};

use crate::tags::WorldTagManager;

/// Default probability that an event fires on a given turn.
pub const DEFAULT_EVENT_CHANCE: f64 = 0.33;

/// National readings that weight rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventConditions {
    /// National unrest, `[0, 100]`.
    pub unrest: f64,
    /// National stability, `[0, 100]`.
    pub stability: f64,
}

/// What happened when the deck was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The chance roll missed; no event this turn.
    ChanceMiss,
    /// The deck holds no events.
    EmptyDeck,
    /// Every event's conditional weight was zero.
    NoEligibleEvent,
    /// The event at this deck index was drawn.
    Fired(usize),
}

/// Conditional weight of `event` under the current conditions and tags.
pub fn compute_event_weight(
    event: &SimulationEvent,
    conditions: &EventConditions,
    tags: &WorldTagManager,
) -> f64 {
    let mut weight = non_negative(event.weight);
    for rule in &event.weight_rules {
        if !rule_satisfied(rule, conditions, tags) {
            continue;
        }
        let multiplier = if rule.weight_multiplier <= 0.0 || rule.weight_multiplier.is_nan() {
            1.0
        } else {
            rule.weight_multiplier
        };
        weight = non_negative(weight.mul_add(multiplier, rule.weight_add));
    }
    weight
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

fn rule_satisfied(rule: &EventWeightRule, conditions: &EventConditions, tags: &WorldTagManager) -> bool {
    if let Some(tag) = rule.require_tag.as_deref() {
        if !tag.trim().is_empty() && !tags.has_tag(tag) {
            return false;
        }
    }
    if let Some(tag) = rule.forbid_tag.as_deref() {
        if !tag.trim().is_empty() && tags.has_tag(tag) {
            return false;
        }
    }
    within(conditions.unrest, rule.min_unrest, rule.max_unrest)
        && within(conditions.stability, rule.min_stability, rule.max_stability)
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    let above = min.is_none_or(|m| m.is_nan() || value >= m);
    let below = max.is_none_or(|m| m.is_nan() || value <= m);
    above && below
}

/// Draw one event index with probability proportional to its weight.
///
/// Returns `None` when the total weight is zero. Zero-weight events are
/// never selected.
pub fn draw_weighted_event(
    deck: &[SimulationEvent],
    conditions: &EventConditions,
    tags: &WorldTagManager,
    rng: &mut impl Rng,
) -> Option<usize> {
    let weights: Vec<f64> = deck
        .iter()
        .map(|e| compute_event_weight(e, conditions, tags))
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let roll = rng.random_range(0.0..=total);
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll <= cumulative {
            return Some(index);
        }
    }
    weights.iter().rposition(|w| *w > 0.0)
}

/// Roll the per-turn chance and, on a hit, draw from the deck.
///
/// An empty deck is reported without consuming randomness.
pub fn roll_event(
    deck: &[SimulationEvent],
    chance: f64,
    conditions: &EventConditions,
    tags: &WorldTagManager,
    rng: &mut impl Rng,
) -> EventOutcome {
    if deck.is_empty() {
        return EventOutcome::EmptyDeck;
    }
    if rng.random::<f64>() > chance {
        return EventOutcome::ChanceMiss;
    }
    draw_weighted_event(deck, conditions, tags, rng).map_or(EventOutcome::NoEligibleEvent, EventOutcome::Fired)
}
