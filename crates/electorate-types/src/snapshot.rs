//! Persistent snapshot schema.
//!
//! A [`SaveGame`] captures everything needed to resume a campaign: global
//! scalars, every tile with its blocs, parties, policy ramps, factions,
//! cooldowns, world tags, the rolling histories and the last election
//! result. Every record defaults its missing fields so older or partial
//! files still load; range checks happen on restore, not here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::definitions::{FactionState, PartyDefinition};
use crate::enums::{BlocCategory, IndustryType, PopulationDensity};
use crate::ideology::{CompassAxis, IdeologyVector};

/// Schema version written by this build. Snapshots with a greater version
/// are rejected on restore.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// A complete campaign snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct SaveGame {
    /// Schema version.
    pub version: u32,
    /// Global scalars.
    pub global: GlobalRecord,
    /// Tiles in storage (row-major) order.
    pub tiles: Vec<TileRecord>,
    /// Parties in registration order.
    pub parties: Vec<PartyDefinition>,
    /// Policy ramp states.
    pub policy_states: Vec<PolicyStateRecord>,
    /// Faction approval states.
    pub factions: Vec<FactionState>,
    /// Remaining faction action cooldowns.
    pub faction_action_cooldowns: Vec<CooldownRecord>,
    /// Active world tags.
    pub world_tags: Vec<WorldTagRecord>,
    /// Rolling national stability history.
    pub stability_history: Vec<f64>,
    /// Rolling national turnout history.
    pub turnout_history: Vec<f64>,
    /// Rolling treasury history.
    pub treasury_history: Vec<f64>,
    /// Rolling political capital history.
    pub capital_history: Vec<f64>,
    /// Most recent player actions, oldest first.
    pub action_history: Vec<String>,
    /// Seats won by each party at the last election, in party order.
    pub last_election_seats: Vec<SeatRecord>,
}

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

/// Scalar campaign state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct GlobalRecord {
    /// Grid width in tiles.
    pub grid_width: u32,
    /// Grid height in tiles.
    pub grid_height: u32,
    /// World seed.
    pub seed: u64,
    /// Turns resolved so far.
    pub turn_counter: u32,
    /// National stability, `[0, 100]`.
    pub national_stability: f64,
    /// National unrest, `[0, 100]`.
    pub national_unrest: f64,
    /// National turnout, `[0, 1]`.
    pub national_turnout: f64,
    /// Treasury balance (may be negative).
    pub treasury: f64,
    /// Political capital, `[0, 100]`.
    pub political_capital: f64,
    /// Transient stability shock.
    pub stability_shock: f64,
    /// Consecutive turns above the revolution threshold.
    pub high_unrest_turn_streak: u32,
    /// Consecutive turns with a faction in extreme disapproval.
    pub faction_crisis_streak: u32,
    /// Title of the last resolved event or action.
    pub last_event_title: String,
    /// Description of the last resolved event or action.
    pub last_event_description: String,
    /// Party currently in government.
    pub current_government_party: String,
    /// Party the player leads.
    pub player_party_name: String,
    /// Whether the player's party holds government.
    pub player_in_power: bool,
    /// Whether the campaign has ended.
    pub is_game_over: bool,
    /// Short game-over reason.
    pub game_over_reason: String,
    /// Long game-over explanation.
    pub game_over_detail: String,
    /// Current projected-poll margin of error.
    pub poll_margin_of_error: f64,
    /// Remaining propaganda turns.
    pub propaganda_turns_remaining: u32,
    /// Services budget share, `[0, 1]`.
    pub budget_services: f64,
    /// Military budget share, `[0, 1]`.
    pub budget_military: f64,
    /// Infrastructure budget share, `[0, 1]`.
    pub budget_infrastructure: f64,
    /// Human-readable summary of the last turn.
    pub last_turn_digest: String,
    /// Player candidate.
    pub candidate: CandidateRecord,
    /// Government policy position.
    pub government_policy: IdeologyVector,
    /// Population-weighted national ideology center.
    pub national_voter_center: IdeologyVector,
}

/// Player candidate identity and resolved base stats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct CandidateRecord {
    /// Candidate name.
    pub name: String,
    /// Background id.
    pub background_id: String,
    /// Trait ids in selection order.
    pub trait_ids: Vec<String>,
    /// Charisma, `[0, 1]`.
    pub charisma: f64,
    /// Competence, `[0, 1]`.
    pub competence: f64,
    /// Integrity, `[0, 1]`.
    pub integrity: f64,
    /// Populism, `[0, 1]`.
    pub populism: f64,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// One district tile with its blocs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct TileRecord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Density tier.
    pub density: PopulationDensity,
    /// Dominant industry.
    pub dominant_industry: IndustryType,
    /// Tile stability, `[0, 100]`.
    pub stability: f64,
    /// Tile turnout, `[0, 1]`.
    pub turnout: f64,
    /// Neighbor stability pressure carried into the next turn.
    pub external_stability_pressure: f64,
    /// Media access, `[0, 1]`.
    pub media_access: f64,
    /// Dominant local issue axis.
    pub local_issue: CompassAxis,
    /// Population-weighted average bloc ideology.
    pub average_ideology: IdeologyVector,
    /// Blocs in order.
    pub blocs: Vec<BlocRecord>,
}

/// One voter bloc.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct BlocRecord {
    /// Display name.
    pub name: String,
    /// Head count.
    pub population: u32,
    /// Category inferred from the name at creation.
    pub category: BlocCategory,
    /// Current ideology.
    pub ideology: IdeologyVector,
    /// Happiness, `[0, 1]`.
    pub happiness: f64,
    /// Turnout chance, `[0, 1]`.
    pub turnout_chance: f64,
    /// Anger, `[0, 1]`.
    pub anger: f64,
    /// Hope, `[0, 1]`.
    pub hope: f64,
    /// Last applied ideology-distance penalty.
    pub last_ideology_happiness_penalty: f64,
    /// Last applied local-issue penalty.
    pub last_issue_happiness_penalty: f64,
    /// Last applied policy happiness modifier.
    pub last_policy_happiness_modifier: f64,
    /// Last applied policy turnout modifier.
    pub last_policy_turnout_modifier: f64,
}

// ---------------------------------------------------------------------------
// Politics
// ---------------------------------------------------------------------------

/// Ramp state of one policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct PolicyStateRecord {
    /// Policy name.
    pub name: String,
    /// Whether the ramp is heading toward full strength.
    pub target_active: bool,
    /// Current strength, `[0, 1]`.
    pub current_strength: f64,
    /// Strength change per turn.
    pub step_per_turn: f64,
}

/// Remaining cooldown of one faction action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct CooldownRecord {
    /// Action id.
    pub action_id: String,
    /// Turns until the action is available again.
    pub remaining_turns: u32,
}

/// An active world tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct WorldTagRecord {
    /// Normalised tag name.
    pub tag: String,
    /// Remaining turns, `-1` for permanent.
    pub remaining_turns: i32,
}

/// Seats won by one party.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct SeatRecord {
    /// Party name.
    pub party: String,
    /// Seats won.
    pub seats: u32,
}
