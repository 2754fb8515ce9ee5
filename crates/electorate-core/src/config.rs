//! Configuration loading and typed config structures for the Electorate
//! simulation.
//!
//! The canonical configuration lives in `electorate-config.yaml` at the
//! project root. Every field carries a default, so a partial file (or an
//! empty one) yields a playable campaign. This crate only parses text;
//! reading the file is left to the binary.

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `electorate-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Turn cadence, elections, and bookkeeping.
    #[serde(default)]
    pub turn: TurnConfig,

    /// Policy ramp bounds.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Party drift and spawning.
    #[serde(default)]
    pub parties: PartyConfig,

    /// Media influence and propaganda.
    #[serde(default)]
    pub media: MediaConfig,

    /// Faction action tuning.
    #[serde(default)]
    pub factions: FactionConfig,

    /// Neighbor diffusion.
    #[serde(default)]
    pub diffusion: DiffusionConfig,

    /// The player's party, candidate and starting position.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Thresholds that end the campaign.
    #[serde(default)]
    pub lose_conditions: LoseConditionsConfig,

    /// Initial budget allocation.
    #[serde(default)]
    pub budget: BudgetConfig,
}

impl SimulationConfig {
    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Grid dimensions and seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Tiles per row.
    #[serde(default = "default_grid_size")]
    pub grid_width: u32,

    /// Tiles per column.
    #[serde(default = "default_grid_size")]
    pub grid_height: u32,

    /// Seed for grid noise and the turn PRNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_width: default_grid_size(),
            grid_height: default_grid_size(),
            seed: default_seed(),
        }
    }
}

/// Turn cadence and bookkeeping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurnConfig {
    /// Turns between elections; 0 disables elections.
    #[serde(default = "default_election_interval")]
    pub election_interval: u32,

    /// Rolling history length (at least 10 is kept).
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Maximum entries in the action log.
    #[serde(default = "default_action_log_size")]
    pub action_log_size: usize,

    /// Probability that an event is drawn each turn.
    #[serde(default = "default_event_chance")]
    pub event_chance: f64,

    /// Seats apportioned at each election.
    #[serde(default = "default_parliament_seats")]
    pub parliament_seats: u32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            election_interval: default_election_interval(),
            history_window: default_history_window(),
            action_log_size: default_action_log_size(),
            event_chance: default_event_chance(),
            parliament_seats: default_parliament_seats(),
        }
    }
}

/// Policy ramp bounds, in turns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyConfig {
    /// Fewest turns a ramp may take.
    #[serde(default = "default_min_ramp_turns")]
    pub min_ramp_turns: u32,

    /// Most turns a ramp may take.
    #[serde(default = "default_max_ramp_turns")]
    pub max_ramp_turns: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_ramp_turns: default_min_ramp_turns(),
            max_ramp_turns: default_max_ramp_turns(),
        }
    }
}

/// Party drift and spawning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartyConfig {
    /// Base platform drift toward the national center per turn.
    #[serde(default = "default_drift_per_turn")]
    pub drift_per_turn: f64,

    /// Normalized distance at which a bloc counts as disaffected.
    #[serde(default = "default_spawn_distance_threshold")]
    pub spawn_distance_threshold: f64,

    /// Disaffected population share needed to form a party.
    #[serde(default = "default_spawn_population_share")]
    pub spawn_population_share: f64,

    /// No party forms once this many exist.
    #[serde(default = "default_max_parties")]
    pub max_parties: usize,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            drift_per_turn: default_drift_per_turn(),
            spawn_distance_threshold: default_spawn_distance_threshold(),
            spawn_population_share: default_spawn_population_share(),
            max_parties: default_max_parties(),
        }
    }
}

/// Media influence and propaganda.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaConfig {
    /// Baseline media power, `[0, 1]`.
    #[serde(default = "default_global_media_power")]
    pub global_power: f64,

    /// How far the media target leans from the voter center toward the
    /// government's policy, `[0, 1]`.
    #[serde(default = "default_government_bias")]
    pub government_bias: f64,

    /// Extra media power while propaganda runs.
    #[serde(default = "default_propaganda_boost")]
    pub propaganda_boost: f64,

    /// Turns a propaganda campaign lasts.
    #[serde(default = "default_propaganda_duration")]
    pub propaganda_duration: u32,

    /// Political capital a campaign costs before the candidate multiplier.
    #[serde(default = "default_propaganda_cost")]
    pub propaganda_cost: f64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            global_power: default_global_media_power(),
            government_bias: default_government_bias(),
            propaganda_boost: default_propaganda_boost(),
            propaganda_duration: default_propaganda_duration(),
            propaganda_cost: default_propaganda_cost(),
        }
    }
}

/// Faction action tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactionConfig {
    /// Scales the treasury and capital cost of faction actions.
    #[serde(default = "default_one")]
    pub cost_multiplier: f64,

    /// Scales the approval changes of faction actions.
    #[serde(default = "default_one")]
    pub approval_multiplier: f64,

    /// Turns before the same action can be repeated.
    #[serde(default = "default_cooldown_turns")]
    pub cooldown_turns: u32,
}

impl Default for FactionConfig {
    fn default() -> Self {
        Self {
            cost_multiplier: 1.0,
            approval_multiplier: 1.0,
            cooldown_turns: default_cooldown_turns(),
        }
    }
}

/// Neighbor diffusion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiffusionConfig {
    /// Fraction of the gap to the neighbor ideology closed per turn.
    #[serde(default = "default_ideology_rate")]
    pub ideology_rate: f64,

    /// Scale of the neighbor stability spillover.
    #[serde(default = "default_stability_spillover")]
    pub stability_spillover: f64,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            ideology_rate: default_ideology_rate(),
            stability_spillover: default_stability_spillover(),
        }
    }
}

/// The player's party, candidate and starting position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerConfig {
    /// The party the player leads. Blank means the player is always in
    /// power.
    #[serde(default = "default_party_name")]
    pub party_name: String,

    /// Default candidate name.
    #[serde(default = "default_candidate_name")]
    pub candidate_name: String,

    /// Default candidate background id.
    #[serde(default = "default_candidate_background")]
    pub candidate_background: String,

    /// Default candidate traits, comma-separated.
    #[serde(default = "default_candidate_traits")]
    pub candidate_traits: String,

    /// Treasury at the start of the campaign.
    #[serde(default)]
    pub starting_treasury: f64,

    /// Political capital at the start of the campaign.
    #[serde(default = "default_starting_capital")]
    pub starting_capital: f64,

    /// Government in office before the first election.
    #[serde(default = "default_starting_government")]
    pub starting_government: String,

    /// Losing an election ends the campaign.
    #[serde(default = "default_true")]
    pub end_game_on_election_loss: bool,

    /// Policies, propaganda and faction actions are blocked out of power.
    #[serde(default = "default_true")]
    pub lock_when_out_of_power: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            party_name: default_party_name(),
            candidate_name: default_candidate_name(),
            candidate_background: default_candidate_background(),
            candidate_traits: default_candidate_traits(),
            starting_treasury: 0.0,
            starting_capital: default_starting_capital(),
            starting_government: default_starting_government(),
            end_game_on_election_loss: true,
            lock_when_out_of_power: true,
        }
    }
}

/// Thresholds that end the campaign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoseConditionsConfig {
    /// Unrest at or above which the revolution streak grows.
    #[serde(default = "default_revolution_unrest_threshold")]
    pub revolution_unrest_threshold: f64,

    /// Consecutive high-unrest turns that trigger a revolution.
    #[serde(default = "default_revolution_unrest_turns")]
    pub revolution_unrest_turns: u32,

    /// Treasury at or below which the state goes bankrupt.
    #[serde(default = "default_bankruptcy_threshold")]
    pub bankruptcy_treasury_threshold: f64,

    /// Consecutive faction-crisis turns that collapse the government.
    #[serde(default = "default_faction_crisis_turns")]
    pub faction_crisis_turns: u32,
}

impl Default for LoseConditionsConfig {
    fn default() -> Self {
        Self {
            revolution_unrest_threshold: default_revolution_unrest_threshold(),
            revolution_unrest_turns: default_revolution_unrest_turns(),
            bankruptcy_treasury_threshold: default_bankruptcy_threshold(),
            faction_crisis_turns: default_faction_crisis_turns(),
        }
    }
}

/// Initial budget allocation, each line `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BudgetConfig {
    /// Public services.
    #[serde(default = "default_allocation")]
    pub services: f64,

    /// Military and policing.
    #[serde(default = "default_allocation")]
    pub military: f64,

    /// Infrastructure.
    #[serde(default = "default_allocation")]
    pub infrastructure: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            services: default_allocation(),
            military: default_allocation(),
            infrastructure: default_allocation(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_grid_size() -> u32 {
    30
}

const fn default_seed() -> u64 {
    1337
}

const fn default_election_interval() -> u32 {
    48
}

const fn default_history_window() -> usize {
    50
}

const fn default_action_log_size() -> usize {
    12
}

const fn default_event_chance() -> f64 {
    electorate_politics::events::DEFAULT_EVENT_CHANCE
}

const fn default_parliament_seats() -> u32 {
    electorate_politics::election::DEFAULT_PARLIAMENT_SEATS
}

const fn default_min_ramp_turns() -> u32 {
    3
}

const fn default_max_ramp_turns() -> u32 {
    6
}

const fn default_drift_per_turn() -> f64 {
    electorate_politics::party::DEFAULT_DRIFT_PER_TURN
}

const fn default_spawn_distance_threshold() -> f64 {
    0.58
}

const fn default_spawn_population_share() -> f64 {
    0.08
}

const fn default_max_parties() -> usize {
    8
}

const fn default_global_media_power() -> f64 {
    0.05
}

const fn default_government_bias() -> f64 {
    0.35
}

const fn default_propaganda_boost() -> f64 {
    0.18
}

const fn default_propaganda_duration() -> u32 {
    6
}

const fn default_propaganda_cost() -> f64 {
    8.0
}

const fn default_one() -> f64 {
    1.0
}

const fn default_cooldown_turns() -> u32 {
    electorate_politics::factions::DEFAULT_ACTION_COOLDOWN
}

const fn default_ideology_rate() -> f64 {
    0.010
}

const fn default_stability_spillover() -> f64 {
    3.0
}

fn default_party_name() -> String {
    "SocDem".to_owned()
}

fn default_candidate_name() -> String {
    "Alex Mercer".to_owned()
}

fn default_candidate_background() -> String {
    "activist".to_owned()
}

fn default_candidate_traits() -> String {
    "grassroots,policy_wonk".to_owned()
}

const fn default_starting_capital() -> f64 {
    25.0
}

fn default_starting_government() -> String {
    "Caretaker Coalition".to_owned()
}

const fn default_revolution_unrest_threshold() -> f64 {
    90.0
}

const fn default_revolution_unrest_turns() -> u32 {
    4
}

const fn default_bankruptcy_threshold() -> f64 {
    -5000.0
}

const fn default_faction_crisis_turns() -> u32 {
    4
}

const fn default_allocation() -> f64 {
    electorate_politics::budget::DEFAULT_ALLOCATION
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn default_config_matches_campaign_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.grid_width, 30);
        assert_eq!(config.world.seed, 1337);
        assert_eq!(config.turn.election_interval, 48);
        assert_eq!(config.turn.parliament_seats, 120);
        assert!((config.turn.event_chance - 0.33).abs() < EPS);
        assert_eq!(config.policy.max_ramp_turns, 6);
        assert_eq!(config.player.party_name, "SocDem");
        assert!(config.player.lock_when_out_of_power);
        assert!((config.lose_conditions.bankruptcy_treasury_threshold + 5000.0).abs() < EPS);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  grid_width: 12
  grid_height: 8
  seed: 99

turn:
  election_interval: 10
  history_window: 20
  action_log_size: 6
  event_chance: 0.5
  parliament_seats: 60

policy:
  min_ramp_turns: 2
  max_ramp_turns: 4

parties:
  drift_per_turn: 0.05
  spawn_distance_threshold: 0.5
  spawn_population_share: 0.1
  max_parties: 5

media:
  global_power: 0.1
  government_bias: 0.5
  propaganda_boost: 0.2
  propaganda_duration: 3
  propaganda_cost: 10.0

factions:
  cost_multiplier: 1.5
  approval_multiplier: 0.5
  cooldown_turns: 4

diffusion:
  ideology_rate: 0.02
  stability_spillover: 1.0

player:
  party_name: "Liberal"
  candidate_name: "Jordan Vale"
  candidate_background: "business_exec"
  candidate_traits: "policy_wonk"
  starting_treasury: 500.0
  starting_capital: 40.0
  starting_government: "Interim Council"
  end_game_on_election_loss: false
  lock_when_out_of_power: false

lose_conditions:
  revolution_unrest_threshold: 85.0
  revolution_unrest_turns: 3
  bankruptcy_treasury_threshold: -2000.0
  faction_crisis_turns: 2

budget:
  services: 0.7
  military: 0.3
  infrastructure: 0.5
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.grid_width, 12);
        assert_eq!(config.turn.parliament_seats, 60);
        assert_eq!(config.parties.max_parties, 5);
        assert_eq!(config.media.propaganda_duration, 3);
        assert_eq!(config.factions.cooldown_turns, 4);
        assert_eq!(config.player.party_name, "Liberal");
        assert!(!config.player.end_game_on_election_loss);
        assert_eq!(config.lose_conditions.faction_crisis_turns, 2);
        assert!((config.budget.services - 0.7).abs() < EPS);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 7\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.grid_width, 30);
        assert_eq!(config.turn.election_interval, 48);
        assert_eq!(config.player.candidate_name, "Alex Mercer");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert!(config.is_ok());
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn project_config_matches_defaults() {
        let config = SimulationConfig::parse(include_str!("../../../electorate-config.yaml"));
        assert!(config.is_ok(), "Failed to parse project config: {config:?}");
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }
}
