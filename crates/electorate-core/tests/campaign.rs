//! End-to-end campaign tests for `electorate-core`.
//!
//! Each test builds a small seeded campaign from the built-in scenario and
//! drives it through the public API only.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::sync::{Arc, Mutex};

use electorate_core::{
    ActionRejected, ScenarioCatalog, SimulationConfig, SimulationOrchestrator, TurnObserver,
};

// =============================================================================
// Helpers
// =============================================================================

fn config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.grid_width = 8;
    config.world.grid_height = 6;
    config.world.seed = seed;
    config
}

fn campaign(seed: u64) -> SimulationOrchestrator {
    SimulationOrchestrator::new(config(seed), ScenarioCatalog::default()).unwrap()
}

#[derive(Default)]
struct Recorded {
    turns: Vec<u32>,
    endings: Vec<String>,
}

struct RecordingObserver(Arc<Mutex<Recorded>>);

impl TurnObserver for RecordingObserver {
    fn on_turn_completed(&mut self, turn: u32) {
        self.0.lock().unwrap().turns.push(turn);
    }

    fn on_game_ended(&mut self, reason: &str, _detail: &str) {
        self.0.lock().unwrap().endings.push(reason.to_owned());
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn same_seed_same_campaign() {
    let mut a = campaign(2024);
    let mut b = campaign(2024);
    a.begin_game().unwrap();
    b.begin_game().unwrap();
    for _ in 0..20 {
        let left = a.run_turn();
        let right = b.run_turn();
        assert_eq!(left, right);
        if left.is_err() {
            break;
        }
    }
    assert_eq!(a.capture(), b.capture());
}

#[test]
fn restored_campaigns_continue_identically() {
    let mut source = campaign(31);
    source.begin_game().unwrap();
    for _ in 0..5 {
        source.run_turn().unwrap();
    }
    let save = source.capture();

    let mut a = campaign(1);
    let mut b = campaign(2);
    a.restore(&save).unwrap();
    b.restore(&save).unwrap();
    for _ in 0..5 {
        assert_eq!(a.run_turn(), b.run_turn());
    }
    assert_eq!(a.capture(), b.capture());
}

#[test]
fn snapshot_survives_json_text() {
    let mut source = campaign(64);
    source.begin_game().unwrap();
    source.set_policy_active("Open Borders", true).unwrap();
    for _ in 0..3 {
        source.run_turn().unwrap();
    }
    let save = source.capture();

    let text = serde_json::to_string(&save).unwrap();
    let parsed: electorate_types::SaveGame = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, save);

    let mut restored = campaign(1);
    restored.restore(&parsed).unwrap();
    assert_eq!(restored.capture(), save);
    assert!(restored.world_tags().has_tag("policy_open_borders_active"));
}

// =============================================================================
// Bounds and lifecycle
// =============================================================================

#[test]
fn national_readings_stay_bounded() {
    let mut sim = campaign(99);
    sim.begin_game().unwrap();
    sim.set_policy_active("Universal Healthcare", true).unwrap();
    sim.launch_propaganda_campaign().unwrap();
    for _ in 0..60 {
        if sim.run_turn().is_err() {
            break;
        }
        assert!((0.0..=100.0).contains(&sim.national_stability()));
        assert!((0.0..=100.0).contains(&sim.national_unrest()));
        assert!((0.0..=1.0).contains(&sim.national_turnout()));
        assert!((0.0..=100.0).contains(&sim.political_capital()));
        for faction in sim.factions() {
            assert!((0.0..=100.0).contains(&faction.approval));
        }
        for tile in sim.grid().tiles() {
            assert!((0.0..=100.0).contains(&tile.stability));
            assert!((0.0..=1.0).contains(&tile.turnout));
        }
    }
    assert!(sim.history().stability().count() <= 50);
}

#[test]
fn game_over_freezes_the_campaign() {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let mut cfg = config(5);
    cfg.player.starting_treasury = -10_000.0;
    let mut sim = SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap();
    sim.set_observer(Box::new(RecordingObserver(Arc::clone(&recorded))));

    sim.begin_game().unwrap();
    assert!(sim.is_game_over());
    assert_eq!(sim.game_over().unwrap().reason, "Bankruptcy");

    let before = sim.capture();
    assert_eq!(sim.run_turn(), Err(ActionRejected::GameOver));
    assert_eq!(sim.launch_propaganda_campaign(), Err(ActionRejected::GameOver));
    assert_eq!(
        sim.set_policy_active("Open Borders", true),
        Err(ActionRejected::GameOver)
    );
    assert_eq!(sim.capture(), before);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.turns, vec![1]);
    assert_eq!(recorded.endings, vec!["Bankruptcy"]);
}

#[test]
fn elections_follow_the_interval() {
    let mut cfg = config(12);
    cfg.turn.election_interval = 3;
    cfg.player.end_game_on_election_loss = false;
    let mut sim = SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap();
    sim.begin_game().unwrap();
    assert_eq!(sim.ticks_until_election(), 2);

    let mut elections = Vec::new();
    for _ in 0..8 {
        let summary = sim.run_turn().unwrap();
        if summary.election.is_some() {
            elections.push(summary.turn);
        }
    }
    assert_eq!(elections, vec![3, 6, 9]);
}

#[test]
fn elections_disabled_at_zero_interval() {
    let mut cfg = config(12);
    cfg.turn.election_interval = 0;
    let mut sim = SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap();
    sim.begin_game().unwrap();
    for _ in 0..10 {
        assert!(sim.run_turn().unwrap().election.is_none());
    }
    assert_eq!(sim.ticks_until_election(), 0);
    assert!(sim.last_election_seats().is_empty());
}

// =============================================================================
// Actions
// =============================================================================

#[test]
fn faction_action_cooldown_counts_down_with_turns() {
    let mut cfg = config(8);
    cfg.player.starting_treasury = 2_000.0;
    cfg.player.starting_capital = 60.0;
    let mut sim = SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap();
    sim.begin_game().unwrap();

    sim.enact_faction_action("youth_reform_package").unwrap();
    assert_eq!(sim.faction_action_cooldown("youth_reform_package"), 6);
    assert!(sim.action_log().any(|entry| entry.starts_with("T1: Youth Reform Package executed.")));

    for _ in 0..5 {
        sim.run_turn().unwrap();
    }
    assert_eq!(sim.faction_action_cooldown("youth_reform_package"), 1);
    assert!(matches!(
        sim.enact_faction_action("youth_reform_package"),
        Err(ActionRejected::OnCooldown { turns: 1, .. })
    ));
    sim.run_turn().unwrap();
    assert_eq!(sim.faction_action_cooldown("youth_reform_package"), 0);
}

#[test]
fn rejected_actions_change_nothing() {
    let mut cfg = config(3);
    cfg.player.starting_capital = 0.0;
    let mut sim = SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap();
    let before = sim.capture();

    assert!(matches!(
        sim.launch_propaganda_campaign(),
        Err(ActionRejected::InsufficientCapital { .. })
    ));
    assert!(matches!(
        sim.enact_faction_action("union_strike_deal"),
        Err(ActionRejected::InsufficientTreasury { .. })
    ));
    assert!(matches!(
        sim.set_policy_active("Universal Healthcare", true),
        Err(ActionRejected::InsufficientCapital { .. })
    ));
    assert_eq!(sim.capture(), before);
}

#[test]
fn rejected_enactment_leaves_the_generator_alone() {
    let broke = || {
        let mut cfg = config(41);
        cfg.player.starting_capital = 0.0;
        SimulationOrchestrator::new(cfg, ScenarioCatalog::default()).unwrap()
    };
    let mut control = broke();
    let mut rejected = broke();

    for name in ["Universal Healthcare", "Strict Policing", "Open Borders"] {
        assert!(matches!(
            rejected.set_policy_active(name, true),
            Err(ActionRejected::InsufficientCapital { .. })
        ));
    }

    assert_eq!(rejected.begin_game(), control.begin_game());
    for _ in 0..5 {
        assert_eq!(rejected.run_turn(), control.run_turn());
    }
    assert_eq!(rejected.capture(), control.capture());
}

#[test]
fn policy_effects_reach_the_treasury() {
    let mut sim = campaign(17);
    sim.begin_game().unwrap();
    let status = sim.set_policy_active("Universal Healthcare", true).unwrap();
    assert!(status.contains("enacted"));
    let treasury = sim.treasury();
    for _ in 0..6 {
        sim.run_turn().unwrap();
    }
    assert!(sim.treasury() < treasury);
}
