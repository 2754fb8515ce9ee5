//! Campaign orchestration for the Electorate simulation.
//!
//! This crate ties the district grid and the politics registries together
//! into a turn-based campaign. A [`SimulationOrchestrator`] owns all state,
//! advances it one turn at a time, validates player actions, and captures
//! or restores complete snapshots.
//!
//! # Modules
//!
//! - [`actions`] -- Player actions and the reasons they are refused
//! - [`catalog`] -- Policies, events, parties and candidate options
//! - [`config`] -- Simulation configuration loaded from YAML
//! - [`history`] -- Rolling history, action log and the turn digest
//! - [`observer`] -- Turn and game-end notifications
//! - [`orchestrator`] -- The campaign state owner and its accessors
//! - [`snapshot`] -- Capture and restore of complete campaign state
//! - [`turn`] -- The per-turn pipeline

pub mod actions;
pub mod catalog;
pub mod config;
pub mod history;
pub mod observer;
pub mod orchestrator;
pub mod snapshot;
pub mod turn;

pub use actions::ActionRejected;
pub use catalog::ScenarioCatalog;
pub use config::{ConfigError, SimulationConfig};
pub use history::{ActionLog, History, HistoryPoint};
pub use observer::{NoOpObserver, TurnObserver};
pub use orchestrator::{GameOver, SimulationOrchestrator};
pub use snapshot::SnapshotError;
pub use turn::TurnSummary;

pub use electorate_world::WorldError;
