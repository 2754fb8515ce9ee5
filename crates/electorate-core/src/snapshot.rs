//! Capture and restore of the complete campaign state.
//!
//! [`SimulationOrchestrator::capture`] never fails and never consumes
//! randomness. [`SimulationOrchestrator::restore`] validates the version,
//! rebuilds every component into locals, and only then replaces the live
//! state, so a failed restore leaves the running campaign untouched.
//!
//! # Invariants
//!
//! - `capture -> restore -> capture` yields an identical snapshot.
//! - After a restore the generator is reseeded from the snapshot seed and
//!   turn, so two restores of the same snapshot continue identically.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use electorate_politics::factions::{self, default_factions};
use electorate_politics::polls::{ProjectionParams, compute_poll_shares, project_polls};
use electorate_politics::{ActionCooldowns, BudgetAllocation, CandidateProfile, Party, PolicyManager, WorldTagManager};
use electorate_types::math::{clamp_range, clamp_unit};
use electorate_types::{
    CURRENT_SNAPSHOT_VERSION, GlobalRecord, IdeologyVector, IndustryType, PopulationDensity, SaveGame,
};
use electorate_world::{DistrictGrid, DistrictTile, WorldError};

use crate::history::{ActionLog, History};
use crate::orchestrator::{GameOver, SimulationOrchestrator, default_candidate, player_party_ref};

/// Golden-ratio constant mixed into the restore seed.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Population of the placeholder bloc in tiles missing from a snapshot.
const PLACEHOLDER_POPULATION: u32 = 1000;

/// Errors raised while restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot was written by a newer build.
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the snapshot.
        found: u32,
        /// Newest version this build reads.
        supported: u32,
    },

    /// The grid could not be rebuilt.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Seed for the generator after restoring at `turn`.
pub fn restore_seed(seed: u64, turn: u32) -> u64 {
    seed.max(1) ^ u64::from(turn).wrapping_mul(SEED_MIX)
}

const fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

impl SimulationOrchestrator {
    /// Snapshot the complete campaign state.
    pub fn capture(&self) -> SaveGame {
        let (is_game_over, game_over_reason, game_over_detail) = self
            .game_over
            .as_ref()
            .map_or((false, String::new(), String::new()), |over| {
                (true, over.reason.clone(), over.detail.clone())
            });

        let global = GlobalRecord {
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            seed: self.seed,
            turn_counter: self.turn,
            national_stability: self.stability,
            national_unrest: self.unrest,
            national_turnout: self.turnout,
            treasury: self.treasury,
            political_capital: self.capital,
            stability_shock: self.shock,
            high_unrest_turn_streak: self.high_unrest_streak,
            faction_crisis_streak: self.crisis_streak,
            last_event_title: self.last_event_title.clone(),
            last_event_description: self.last_event_description.clone(),
            current_government_party: self.government_party.clone(),
            player_party_name: self.player_party.clone(),
            player_in_power: self.player_in_power,
            is_game_over,
            game_over_reason,
            game_over_detail,
            poll_margin_of_error: self.polls.margin_of_error,
            propaganda_turns_remaining: self.propaganda_turns,
            budget_services: self.budget.services,
            budget_military: self.budget.military,
            budget_infrastructure: self.budget.infrastructure,
            last_turn_digest: self.last_digest.clone(),
            candidate: self.candidate.to_record(),
            government_policy: self.government_policy,
            national_voter_center: self.national_center,
        };

        SaveGame {
            version: CURRENT_SNAPSHOT_VERSION,
            global,
            tiles: self.grid.tiles().map(DistrictTile::to_record).collect(),
            parties: self.parties.iter().map(Party::to_definition).collect(),
            policy_states: self.policies.export_states(),
            factions: self.factions.clone(),
            faction_action_cooldowns: self.cooldowns.export(),
            world_tags: self.tags.export(),
            stability_history: self.history.stability().collect(),
            turnout_history: self.history.turnout().collect(),
            treasury_history: self.history.treasury().collect(),
            capital_history: self.history.capital().collect(),
            action_history: self.action_log.entries().map(str::to_owned).collect(),
            last_election_seats: self.last_seats.clone(),
        }
    }

    /// Replace the campaign with a snapshot.
    ///
    /// Out-of-range values are clamped, blank records skipped, empty
    /// collections fall back to the catalog defaults, and grid cells the
    /// snapshot does not cover get a single placeholder bloc. The restored
    /// campaign counts as started and observers are told the turn.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedVersion`] for snapshots from a
    /// newer build; the running campaign is left unchanged.
    pub fn restore(&mut self, save: &SaveGame) -> Result<(), SnapshotError> {
        if save.version > CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: save.version,
                supported: CURRENT_SNAPSHOT_VERSION,
            });
        }
        let global = &save.global;

        let grid = restore_grid(save)?;

        let candidate = if global.candidate.name.trim().is_empty()
            && global.candidate.background_id.trim().is_empty()
            && global.candidate.trait_ids.is_empty()
        {
            default_candidate(&self.config, &self.catalog)
        } else {
            CandidateProfile::from_record(&global.candidate, &self.catalog.backgrounds, &self.catalog.traits)
        };

        let mut faction_states = factions::restore_factions(&save.factions);
        let default_roster = faction_states.is_empty();
        if default_roster {
            faction_states = default_factions();
        }

        let mut cooldowns = ActionCooldowns::new();
        cooldowns.import(&save.faction_action_cooldowns);

        let mut parties: Vec<Party> = save.parties.iter().filter_map(Party::from_definition).collect();
        if parties.is_empty() {
            parties = self.catalog.parties.iter().filter_map(Party::from_definition).collect();
        }

        let mut policies = PolicyManager::new();
        for policy in &self.catalog.policies {
            policies.register(policy.clone());
        }
        policies.import_states(&save.policy_states);

        let mut tags = WorldTagManager::new();
        tags.import(&save.world_tags);

        let mut history = History::new(self.config.turn.history_window);
        history.restore(
            &save.stability_history,
            &save.turnout_history,
            &save.treasury_history,
            &save.capital_history,
        );
        let mut action_log = ActionLog::new(self.config.turn.action_log_size);
        action_log.restore(&save.action_history);

        // Everything is rebuilt; commit.
        self.seed = global.seed;
        self.grid = grid;
        self.candidate = candidate;
        self.factions = faction_states;
        self.cooldowns = cooldowns;
        self.parties = parties;
        self.policies = policies;
        self.tags = tags;
        self.history = history;
        self.action_log = action_log;
        self.last_seats.clone_from(&save.last_election_seats);

        self.turn = global.turn_counter;
        self.stability = clamp_range(global.national_stability, 0.0, 100.0);
        self.unrest = clamp_range(global.national_unrest, 0.0, 100.0);
        self.turnout = clamp_unit(global.national_turnout);
        self.treasury = finite_or(global.treasury, 0.0);
        self.capital = clamp_range(global.political_capital, 0.0, 100.0);
        self.shock = finite_or(global.stability_shock, 0.0);
        self.high_unrest_streak = global.high_unrest_turn_streak;
        self.crisis_streak = global.faction_crisis_streak;
        self.last_event_title.clone_from(&global.last_event_title);
        self.last_event_description.clone_from(&global.last_event_description);
        self.government_party.clone_from(&global.current_government_party);
        if !global.player_party_name.trim().is_empty() {
            self.player_party.clone_from(&global.player_party_name);
        }
        self.player_in_power = global.player_in_power;
        self.game_over = global.is_game_over.then(|| GameOver {
            reason: global.game_over_reason.clone(),
            detail: global.game_over_detail.clone(),
        });
        self.propaganda_turns = global.propaganda_turns_remaining;
        self.budget = BudgetAllocation::new(
            global.budget_services,
            global.budget_military,
            global.budget_infrastructure,
        );
        self.last_digest.clone_from(&global.last_turn_digest);
        self.government_policy = global.government_policy;
        self.national_center = global.national_voter_center;

        self.sync_policy_tags();
        if default_roster {
            self.refresh_faction_demands();
        } else {
            self.top_demand = factions::top_demand(&self.factions);
        }

        self.rng = ChaCha8Rng::seed_from_u64(restore_seed(self.seed, self.turn));
        let shares = compute_poll_shares(&self.parties, &self.grid);
        let params = ProjectionParams {
            stability: self.stability,
            player_party: player_party_ref(&self.player_party),
            polling_bonus: self.candidate.polling_bonus,
        };
        self.polls = project_polls(shares, &params, &mut self.rng);
        self.polls.margin_of_error = clamp_range(global.poll_margin_of_error, 0.0, 1.0);

        self.started = true;
        info!(
            turn = self.turn,
            seed = self.seed,
            tiles = self.grid.len(),
            parties = self.parties.len(),
            game_over = self.game_over.is_some(),
            "Snapshot restored"
        );
        self.observer.on_turn_completed(self.turn);
        Ok(())
    }
}

/// Rebuild the grid from tile records; cells without a record get one
/// placeholder bloc. Dimensions beyond [`electorate_world::MAX_GRID_CELLS`]
/// are rejected before anything is allocated.
fn restore_grid(save: &SaveGame) -> Result<DistrictGrid, WorldError> {
    let width = save.global.grid_width.max(1);
    let height = save.global.grid_height.max(1);
    let mut grid = DistrictGrid::build(width, height, |x, y| {
        let mut tile = DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services);
        tile.add_bloc("Residents", PLACEHOLDER_POPULATION, IdeologyVector::ZERO);
        tile
    })?;

    for record in &save.tiles {
        if grid.index_of(record.x, record.y).is_none() {
            warn!(x = record.x, y = record.y, width, height, "Skipping out-of-range tile");
            continue;
        }
        grid.replace(DistrictTile::from_record(record))?;
    }
    Ok(grid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::ScenarioCatalog;
    use crate::config::SimulationConfig;

    fn sim() -> SimulationOrchestrator {
        let mut config = SimulationConfig::default();
        config.world.grid_width = 5;
        config.world.grid_height = 4;
        config.world.seed = 77;
        SimulationOrchestrator::new(config, ScenarioCatalog::default()).unwrap()
    }

    #[test]
    fn restore_seed_mixes_turn() {
        assert_eq!(restore_seed(0, 0), 1);
        assert_eq!(restore_seed(5, 0), 5);
        assert_ne!(restore_seed(5, 1), restore_seed(5, 2));
    }

    #[test]
    fn newer_versions_are_rejected_without_changes() {
        let mut sim = sim();
        let before = sim.capture();
        let mut save = before.clone();
        save.version = CURRENT_SNAPSHOT_VERSION + 1;
        save.global.turn_counter = 99;
        let err = sim.restore(&save).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 2, supported: 1 }));
        assert_eq!(sim.capture(), before);
        assert!(!sim.has_started());
    }

    #[test]
    fn oversized_grid_is_rejected_without_changes() {
        let mut sim = sim();
        let before = sim.capture();
        let mut save = before.clone();
        save.global.grid_width = u32::MAX;
        save.global.grid_height = u32::MAX;
        let err = sim.restore(&save).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::World {
                source: WorldError::GridTooLarge { .. }
            }
        ));
        assert_eq!(sim.capture(), before);
        assert!(!sim.has_started());
    }

    #[test]
    fn missing_tiles_get_placeholders() {
        let mut sim = sim();
        let mut save = sim.capture();
        save.tiles.retain(|t| t.x != 0 || t.y != 0);
        sim.restore(&save).unwrap();
        let tile = sim.grid().get(0, 0).unwrap();
        assert_eq!(tile.blocs.len(), 1);
        assert_eq!(tile.blocs.first().unwrap().name, "Residents");
        assert_eq!(tile.blocs.first().unwrap().population, 1000);
        assert!(sim.has_started());
    }

    #[test]
    fn empty_collections_fall_back() {
        let mut sim = sim();
        let mut save = sim.capture();
        save.parties.clear();
        save.factions.clear();
        save.global.candidate = electorate_types::CandidateRecord::default();
        save.global.player_party_name = String::from("  ");
        save.global.political_capital = 250.0;
        sim.restore(&save).unwrap();
        assert_eq!(sim.parties().len(), 3);
        assert_eq!(sim.factions().len(), 5);
        assert_eq!(sim.candidate().name, "Alex Mercer");
        assert_eq!(sim.player_party(), "SocDem");
        assert!((sim.political_capital() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn round_trip_is_identical() {
        let mut sim = sim();
        sim.begin_game().unwrap();
        sim.launch_propaganda_campaign().unwrap();
        for _ in 0..4 {
            sim.run_turn().unwrap();
        }
        let first = sim.capture();

        let mut other = SimulationOrchestrator::new(SimulationConfig::default(), ScenarioCatalog::default()).unwrap();
        other.restore(&first).unwrap();
        assert_eq!(other.capture(), first);
    }
}
