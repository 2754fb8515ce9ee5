//! The simulation orchestrator: owns every piece of campaign state.
//!
//! [`SimulationOrchestrator`] is the single owner of the grid, the policy
//! registry, world tags, parties, factions, the candidate and the national
//! readings. The turn pipeline lives in [`crate::turn`], player actions in
//! [`crate::actions`], and snapshot capture and restore in
//! [`crate::snapshot`]; each adds an `impl` block here.
//!
//! # Invariants
//!
//! - National stability and unrest stay in `[0, 100]`, turnout in `[0, 1]`,
//!   political capital in `[0, 100]` after every turn.
//! - All randomness comes from one `ChaCha8Rng` seeded from `max(1, seed)`;
//!   read accessors never consume it.
//! - The game-ended notification fires at most once.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use electorate_politics::candidate::parse_trait_ids;
use electorate_politics::factions::{
    self, OPEN_BORDERS, STRICT_POLICING, UNIVERSAL_HEALTHCARE, default_factions,
};
use electorate_politics::tags::{PERMANENT, policy_active_tag};
use electorate_politics::{
    ActionCooldowns, BudgetAllocation, CandidateProfile, FactionClimate, Party, PolicyManager,
    PollSnapshot, WorldTagManager,
};
use electorate_types::math::clamp_unit;
use electorate_types::{
    CandidateBackgroundDefinition, CandidateTraitDefinition, FactionState, IdeologyVector,
    SeatRecord, SimulationEvent,
};
use electorate_world::{DistrictGrid, WorldError, generate_grid};

use crate::catalog::ScenarioCatalog;
use crate::config::SimulationConfig;
use crate::history::{self, ActionLog, History};
use crate::observer::{NoOpObserver, TurnObserver};

/// Why and how the campaign ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    /// Short reason, e.g. "Revolution".
    pub reason: String,
    /// Sentence explaining what happened.
    pub detail: String,
}

/// Title shown when no event fired this turn.
pub const NO_EVENT_TITLE: &str = "None";
/// Description shown when no event fired this turn.
pub const NO_EVENT_DESCRIPTION: &str = "No event this turn.";

/// Owns and advances one campaign.
pub struct SimulationOrchestrator {
    pub(crate) config: SimulationConfig,
    pub(crate) catalog: ScenarioCatalog,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) grid: DistrictGrid,
    pub(crate) policies: PolicyManager,
    pub(crate) tags: WorldTagManager,
    pub(crate) parties: Vec<Party>,
    pub(crate) factions: Vec<FactionState>,
    pub(crate) cooldowns: ActionCooldowns,
    pub(crate) candidate: CandidateProfile,
    pub(crate) budget: BudgetAllocation,
    pub(crate) government_policy: IdeologyVector,
    pub(crate) national_center: IdeologyVector,
    pub(crate) turn: u32,
    pub(crate) stability: f64,
    pub(crate) unrest: f64,
    pub(crate) turnout: f64,
    pub(crate) treasury: f64,
    pub(crate) capital: f64,
    pub(crate) shock: f64,
    pub(crate) high_unrest_streak: u32,
    pub(crate) crisis_streak: u32,
    pub(crate) last_event_title: String,
    pub(crate) last_event_description: String,
    pub(crate) government_party: String,
    pub(crate) player_party: String,
    pub(crate) player_in_power: bool,
    pub(crate) started: bool,
    pub(crate) game_over: Option<GameOver>,
    pub(crate) polls: PollSnapshot,
    pub(crate) propaganda_turns: u32,
    pub(crate) history: History,
    pub(crate) action_log: ActionLog,
    pub(crate) last_seats: Vec<SeatRecord>,
    pub(crate) top_demand: Option<String>,
    pub(crate) last_digest: String,
    pub(crate) observer: Box<dyn TurnObserver>,
}

impl SimulationOrchestrator {
    /// Set up a fresh, not-yet-started campaign.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] when a grid dimension is zero and
    /// [`WorldError::GridTooLarge`] when the grid exceeds the cell limit.
    pub fn new(config: SimulationConfig, catalog: ScenarioCatalog) -> Result<Self, WorldError> {
        let seed = config.world.seed;
        let mut rng = ChaCha8Rng::seed_from_u64(seed.max(1));
        let grid = generate_grid(config.world.grid_width, config.world.grid_height, seed, &mut rng)?;

        let mut policies = PolicyManager::new();
        for policy in &catalog.policies {
            policies.register(policy.clone());
        }

        let parties: Vec<Party> = catalog.parties.iter().filter_map(Party::from_definition).collect();
        let candidate = default_candidate(&config, &catalog);
        let budget = BudgetAllocation::new(
            config.budget.services,
            config.budget.military,
            config.budget.infrastructure,
        );

        let mut orchestrator = Self {
            seed,
            rng,
            grid,
            policies,
            tags: WorldTagManager::new(),
            parties,
            factions: default_factions(),
            cooldowns: ActionCooldowns::new(),
            candidate,
            budget,
            government_policy: IdeologyVector::ZERO,
            national_center: IdeologyVector::ZERO,
            turn: 0,
            stability: 50.0,
            unrest: 50.0,
            turnout: 0.5,
            treasury: config.player.starting_treasury,
            capital: config.player.starting_capital.clamp(0.0, 100.0),
            shock: 0.0,
            high_unrest_streak: 0,
            crisis_streak: 0,
            last_event_title: NO_EVENT_TITLE.to_owned(),
            last_event_description: NO_EVENT_DESCRIPTION.to_owned(),
            government_party: config.player.starting_government.clone(),
            player_party: config.player.party_name.clone(),
            player_in_power: true,
            started: false,
            game_over: None,
            polls: PollSnapshot {
                margin_of_error: electorate_politics::polls::NO_POLL_MARGIN,
                ..PollSnapshot::default()
            },
            propaganda_turns: 0,
            history: History::new(config.turn.history_window),
            action_log: ActionLog::new(config.turn.action_log_size),
            last_seats: Vec::new(),
            top_demand: None,
            last_digest: String::new(),
            observer: Box::new(NoOpObserver),
            config,
            catalog,
        };
        orchestrator.refresh_faction_demands();

        info!(
            width = orchestrator.grid.width(),
            height = orchestrator.grid.height(),
            seed,
            parties = orchestrator.parties.len(),
            policies = orchestrator.catalog.policies.len(),
            events = orchestrator.catalog.events.len(),
            "Campaign initialised"
        );
        Ok(orchestrator)
    }

    /// Register the observer that receives turn notifications.
    pub fn set_observer(&mut self, observer: Box<dyn TurnObserver>) {
        self.observer = observer;
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// The configuration this campaign runs with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The event deck.
    pub fn event_deck(&self) -> &[SimulationEvent] {
        &self.catalog.events
    }

    /// Seed the campaign was generated from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Turns completed so far.
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Whether the first turn has been run (or a snapshot restored).
    pub const fn has_started(&self) -> bool {
        self.started
    }

    /// The district grid.
    pub const fn grid(&self) -> &DistrictGrid {
        &self.grid
    }

    /// National stability, `[0, 100]`.
    pub const fn national_stability(&self) -> f64 {
        self.stability
    }

    /// National unrest, `100 - stability`.
    pub const fn national_unrest(&self) -> f64 {
        self.unrest
    }

    /// National turnout, `[0, 1]`.
    pub const fn national_turnout(&self) -> f64 {
        self.turnout
    }

    /// Treasury balance.
    pub const fn treasury(&self) -> f64 {
        self.treasury
    }

    /// Political capital, `[0, 100]`.
    pub const fn political_capital(&self) -> f64 {
        self.capital
    }

    /// Pending stability shock from events and debt.
    pub const fn stability_shock(&self) -> f64 {
        self.shock
    }

    /// Population-weighted mean voter ideology after the last turn.
    pub const fn national_voter_center(&self) -> IdeologyVector {
        self.national_center
    }

    /// The government's policy position.
    pub const fn government_policy(&self) -> IdeologyVector {
        self.government_policy
    }

    /// Title of the last event.
    pub fn last_event_title(&self) -> &str {
        &self.last_event_title
    }

    /// Description of the last event.
    pub fn last_event_description(&self) -> &str {
        &self.last_event_description
    }

    /// The governing party.
    pub fn government_party(&self) -> &str {
        &self.government_party
    }

    /// The player's party.
    pub fn player_party(&self) -> &str {
        &self.player_party
    }

    /// Whether the player's party governs.
    pub const fn player_in_power(&self) -> bool {
        self.player_in_power
    }

    /// Whether the campaign has ended.
    pub const fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// How the campaign ended, if it has.
    pub const fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    /// Parties in standing order.
    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// Factions in standing order.
    pub fn factions(&self) -> &[FactionState] {
        &self.factions
    }

    /// The policy registry with ramps.
    pub const fn policies(&self) -> &PolicyManager {
        &self.policies
    }

    /// Active world tags.
    pub const fn world_tags(&self) -> &WorldTagManager {
        &self.tags
    }

    /// Latest true and projected polls.
    pub const fn polls(&self) -> &PollSnapshot {
        &self.polls
    }

    /// Seats from the most recent election.
    pub fn last_election_seats(&self) -> &[SeatRecord] {
        &self.last_seats
    }

    /// Rolling national history.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Recent player actions, oldest first.
    pub fn action_log(&self) -> impl Iterator<Item = &str> {
        self.action_log.entries()
    }

    /// `{faction}: {demand}` of the least satisfied faction.
    pub fn top_faction_demand(&self) -> Option<&str> {
        self.top_demand.as_deref()
    }

    /// Summary of the last turn's movement.
    pub fn last_turn_digest(&self) -> &str {
        &self.last_digest
    }

    /// The player's candidate.
    pub const fn candidate(&self) -> &CandidateProfile {
        &self.candidate
    }

    /// Current budget allocation.
    pub const fn budget(&self) -> BudgetAllocation {
        self.budget
    }

    /// Turns of propaganda left.
    pub const fn propaganda_turns_remaining(&self) -> u32 {
        self.propaganda_turns
    }

    /// Media power including any running propaganda boost.
    pub fn effective_media_power(&self) -> f64 {
        let boost = if self.propaganda_turns > 0 {
            self.config.media.propaganda_boost
        } else {
            0.0
        };
        clamp_unit(self.config.media.global_power + boost)
    }

    /// Turns until the next election; 0 when elections are disabled.
    pub const fn ticks_until_election(&self) -> u32 {
        history::ticks_until_election(self.turn, self.config.turn.election_interval)
    }

    /// Turns before a faction action can be used again.
    pub fn faction_action_cooldown(&self, id: &str) -> u32 {
        self.cooldowns.remaining(id)
    }

    /// Candidate traits on offer, sorted by name.
    pub fn available_traits(&self) -> Vec<&CandidateTraitDefinition> {
        self.catalog.sorted_traits()
    }

    /// Candidate backgrounds on offer, sorted by name.
    pub fn available_backgrounds(&self) -> Vec<&CandidateBackgroundDefinition> {
        self.catalog.sorted_backgrounds()
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    pub(crate) fn faction_climate(&self) -> FactionClimate {
        FactionClimate {
            budget: self.budget,
            strict_policing: self.policies.is_active(STRICT_POLICING),
            universal_healthcare: self.policies.is_active(UNIVERSAL_HEALTHCARE),
            open_borders: self.policies.is_active(OPEN_BORDERS),
            treasury: self.treasury,
            stability: self.stability,
            unrest: self.unrest,
        }
    }

    pub(crate) fn refresh_faction_demands(&mut self) {
        let climate = self.faction_climate();
        factions::update_demands(&mut self.factions, &climate);
        self.top_demand = factions::top_demand(&self.factions);
    }

    /// Mirror every policy's active flag into a permanent world tag.
    pub(crate) fn sync_policy_tags(&mut self) {
        for name in self.policies.policy_names() {
            let tag = policy_active_tag(name);
            if self.policies.is_active(name) {
                self.tags.set_tag(&tag, PERMANENT);
            } else {
                self.tags.remove_tag(&tag);
            }
        }
    }

    pub(crate) fn ramp_turns(&mut self) -> u32 {
        let min = self.config.policy.min_ramp_turns.max(1);
        let max = self.config.policy.max_ramp_turns.max(min);
        self.rng.random_range(min..=max)
    }

    pub(crate) fn end_game(&mut self, reason: &str, detail: String) {
        if self.game_over.is_some() {
            return;
        }
        info!(reason, detail = %detail, turn = self.turn, "Campaign ended");
        self.observer.on_game_ended(reason, &detail);
        self.game_over = Some(GameOver {
            reason: reason.to_owned(),
            detail,
        });
    }

    pub(crate) fn is_player_party(&self, name: &str) -> bool {
        self.player_party.trim().is_empty() || self.player_party == name
    }

}

/// The player's party name, or `None` when the player is always in power.
pub(crate) fn player_party_ref(player_party: &str) -> Option<&str> {
    (!player_party.trim().is_empty()).then_some(player_party)
}

/// The configured candidate; with no configured traits the first two in
/// the catalog are used.
pub(crate) fn default_candidate(config: &SimulationConfig, catalog: &ScenarioCatalog) -> CandidateProfile {
    let mut trait_ids = parse_trait_ids(&config.player.candidate_traits);
    if trait_ids.is_empty() {
        trait_ids = catalog.traits.keys().take(2).cloned().collect();
    }
    debug!(traits = ?trait_ids, "Building default candidate");
    CandidateProfile::build(
        &config.player.candidate_name,
        &config.player.candidate_background,
        trait_ids.as_slice(),
        &catalog.backgrounds,
        &catalog.traits,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.grid_width = 6;
        config.world.grid_height = 5;
        config.world.seed = 42;
        config
    }

    #[test]
    fn fresh_campaign_defaults() {
        let sim = SimulationOrchestrator::new(small_config(), ScenarioCatalog::default()).unwrap();
        assert_eq!(sim.turn(), 0);
        assert!(!sim.has_started());
        assert_eq!(sim.grid().len(), 30);
        assert_eq!(sim.parties().len(), 3);
        assert_eq!(sim.factions().len(), 5);
        assert_eq!(sim.government_party(), "Caretaker Coalition");
        assert_eq!(sim.last_event_title(), NO_EVENT_TITLE);
        assert!((sim.political_capital() - 25.0).abs() < 1e-12);
        assert_eq!(sim.candidate().name, "Alex Mercer");
        assert_eq!(sim.candidate().trait_ids, vec!["grassroots", "policy_wonk"]);
        assert!(sim.top_faction_demand().is_some());
        assert_eq!(sim.ticks_until_election(), 48);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let mut config = small_config();
        config.world.grid_width = 0;
        assert!(SimulationOrchestrator::new(config, ScenarioCatalog::default()).is_err());
    }

    #[test]
    fn same_seed_same_world() {
        let a = SimulationOrchestrator::new(small_config(), ScenarioCatalog::default()).unwrap();
        let b = SimulationOrchestrator::new(small_config(), ScenarioCatalog::default()).unwrap();
        let pops_a: Vec<u32> = a.grid().blocs().map(|bloc| bloc.population).collect();
        let pops_b: Vec<u32> = b.grid().blocs().map(|bloc| bloc.population).collect();
        assert_eq!(pops_a, pops_b);
    }

    #[test]
    fn media_power_includes_propaganda() {
        let mut sim = SimulationOrchestrator::new(small_config(), ScenarioCatalog::default()).unwrap();
        assert!((sim.effective_media_power() - 0.05).abs() < 1e-12);
        sim.propaganda_turns = 2;
        assert!((sim.effective_media_power() - 0.23).abs() < 1e-12);
    }

    #[test]
    fn blank_trait_list_uses_catalog_traits() {
        let mut config = small_config();
        config.player.candidate_traits = String::from(" , ");
        let candidate = default_candidate(&config, &ScenarioCatalog::default());
        assert_eq!(candidate.trait_ids.len(), 2);
    }
}
