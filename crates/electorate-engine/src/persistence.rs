//! JSON save files.
//!
//! Snapshots are written to a sibling temporary file first and renamed
//! into place, so an interrupted save never leaves a truncated file where
//! the last good one used to be.

use std::path::Path;

use tracing::info;

use electorate_types::SaveGame;

use crate::data::read_json;
use crate::error::EngineError;

fn io_error(path: &Path, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `save` as pretty-printed JSON, creating parent directories.
pub fn save_snapshot(path: &Path, save: &SaveGame) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(save).map_err(|source| EngineError::Json {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }

    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json).map_err(|e| io_error(&staging, e))?;
    std::fs::rename(&staging, path).map_err(|e| io_error(path, e))?;

    info!(
        path = %path.display(),
        turn = save.global.turn_counter,
        tiles = save.tiles.len(),
        "Snapshot saved"
    );
    Ok(())
}

/// Read a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<SaveGame, EngineError> {
    let save: SaveGame = read_json(path)?;
    info!(
        path = %path.display(),
        version = save.version,
        turn = save.global.turn_counter,
        "Snapshot loaded"
    );
    Ok(save)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electorate_core::{ScenarioCatalog, SimulationConfig, SimulationOrchestrator};

    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("electorate-persist-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn saved_campaign_restores_identically() {
        let mut config = SimulationConfig::default();
        config.world.grid_width = 4;
        config.world.grid_height = 3;
        let mut sim = SimulationOrchestrator::new(config, ScenarioCatalog::default()).unwrap();
        sim.begin_game().unwrap();
        sim.run_turn().unwrap();
        let save = sim.capture();

        let path = scratch_path("round-trip.json");
        save_snapshot(&path, &save).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, save);

        let mut other = SimulationOrchestrator::new(SimulationConfig::default(), ScenarioCatalog::default()).unwrap();
        other.restore(&loaded).unwrap();
        assert_eq!(other.capture(), save);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_snapshot(&scratch_path("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let path = scratch_path("garbage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not a save").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));
        std::fs::remove_file(&path).unwrap();
    }
}
