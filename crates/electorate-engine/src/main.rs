//! Campaign engine binary for the Electorate simulation.
//!
//! This is the entry point that wires the simulation core to the outside
//! world: it loads configuration and scenario data, optionally resumes a
//! saved campaign, runs turns on a timer, and writes a snapshot when the
//! session ends.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `electorate-config.yaml`
//! 3. Load scenario data from the data directory
//! 4. Create the orchestrator and its district grid
//! 5. Resume from a snapshot when a load path is configured
//! 6. Run the timed campaign loop until it ends or Ctrl-C
//! 7. Log the result and save the final snapshot

mod data;
mod engine_config;
mod error;
mod logging_observer;
mod persistence;
mod runner;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use electorate_core::{ScenarioCatalog, SimulationConfig, SimulationOrchestrator};

use crate::engine_config::EngineConfig;
use crate::error::EngineError;
use crate::logging_observer::LoggingObserver;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "electorate-config.yaml";

/// Application entry point for the campaign engine.
///
/// # Errors
///
/// Returns an error if the grid cannot be built or the final snapshot
/// cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("electorate-engine starting");

    // 2. Load configuration.
    let (config, engine) = load_config();
    info!(
        grid_width = config.world.grid_width,
        grid_height = config.world.grid_height,
        seed = config.world.seed,
        election_interval = config.turn.election_interval,
        turn_interval_ms = engine.turn_interval_ms,
        max_turns = engine.max_turns,
        "Configuration loaded"
    );

    // 3. Load scenario data.
    let catalog = data::load_catalog(Path::new(&engine.data_dir));
    info!(
        policies = catalog.policies.len(),
        events = catalog.events.len(),
        parties = catalog.parties.len(),
        traits = catalog.traits.len(),
        backgrounds = catalog.backgrounds.len(),
        "Scenario catalog ready"
    );

    // 4. Create the orchestrator.
    let mut sim = build_orchestrator(config, catalog)?;
    sim.set_observer(Box::new(LoggingObserver::new()));

    // 5. Resume a saved campaign.
    if let Some(load_path) = engine.load_path() {
        match resume(&mut sim, Path::new(load_path)) {
            Ok(()) => info!(path = load_path, turn = sim.turn(), "Campaign resumed"),
            Err(e) => warn!(error = %e, "Could not resume campaign, starting a new one"),
        }
    }

    // 6. Run the campaign.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    let result = runner::run_campaign(
        &mut sim,
        Duration::from_millis(engine.turn_interval_ms),
        engine.max_turns,
        shutdown,
    )
    .await;

    // 7. Log results and save.
    runner::log_campaign_end(&result, &sim);
    if engine.autosave {
        persistence::save_snapshot(Path::new(&engine.save_path), &sim.capture())?;
    }

    info!(
        end_reason = ?result.end_reason,
        total_turns = result.total_turns,
        "electorate-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation and engine configuration from
/// `electorate-config.yaml`.
///
/// A missing or malformed file falls back to the defaults.
fn load_config() -> (SimulationConfig, EngineConfig) {
    let config_path = Path::new(CONFIG_PATH);
    if !config_path.exists() {
        info!("Config file not found, using defaults");
        return (SimulationConfig::default(), EngineConfig::default());
    }

    let contents = match engine_config::read_config_text(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(error = %e, "Config file unreadable, using defaults");
            return (SimulationConfig::default(), EngineConfig::default());
        }
    };

    let simulation = SimulationConfig::parse(&contents).unwrap_or_else(|e| {
        warn!(error = %e, "Simulation config unreadable, using defaults");
        SimulationConfig::default()
    });

    let engine = EngineConfig::from_yaml(&contents).unwrap_or_else(|e| {
        warn!(error = %e, "Engine config unreadable, using defaults");
        EngineConfig::default()
    });

    (simulation, engine)
}

fn build_orchestrator(
    config: SimulationConfig,
    catalog: ScenarioCatalog,
) -> Result<SimulationOrchestrator, EngineError> {
    Ok(SimulationOrchestrator::new(config, catalog)?)
}

fn resume(sim: &mut SimulationOrchestrator, path: &Path) -> Result<(), EngineError> {
    let save = persistence::load_snapshot(path)?;
    sim.restore(&save)?;
    Ok(())
}
