//! The `engine` section of `electorate-config.yaml`.
//!
//! The simulation sections are parsed by
//! [`electorate_core::SimulationConfig`]; this module reads the file once
//! and parses only the keys that control how the binary drives a campaign.

use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;

/// Settings for the campaign engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Milliseconds between turns. 0 runs turns back to back.
    #[serde(default = "default_turn_interval_ms")]
    pub turn_interval_ms: u64,

    /// Stop after this many turns. 0 runs until the campaign ends.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Directory holding the scenario JSON files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Where the final snapshot is written.
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Snapshot to resume from; blank starts a new campaign.
    #[serde(default)]
    pub load_path: String,

    /// Write a snapshot to `save_path` when the run ends.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_interval_ms: default_turn_interval_ms(),
            max_turns: default_max_turns(),
            data_dir: default_data_dir(),
            save_path: default_save_path(),
            load_path: String::new(),
            autosave: default_autosave(),
        }
    }
}

const fn default_turn_interval_ms() -> u64 {
    250
}

const fn default_max_turns() -> u32 {
    200
}

fn default_data_dir() -> String {
    "data".to_owned()
}

fn default_save_path() -> String {
    "saves/electorate-save.json".to_owned()
}

const fn default_autosave() -> bool {
    true
}

impl EngineConfig {
    /// Extract the `engine` section from a full YAML document. A missing
    /// section yields the defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, EngineError> {
        let raw: serde_yml::Value = serde_yml::from_str(contents).map_err(|e| EngineError::EngineConfig {
            message: format!("failed to parse config YAML: {e}"),
        })?;

        raw.get("engine").map_or_else(
            || Ok(Self::default()),
            |section| {
                serde_yml::from_value(section.clone()).map_err(|e| EngineError::EngineConfig {
                    message: format!("failed to parse engine config: {e}"),
                })
            },
        )
    }

    /// The snapshot path to resume from, if one is configured.
    pub fn load_path(&self) -> Option<&str> {
        let trimmed = self.load_path.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Read the whole configuration file as text.
pub fn read_config_text(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })
}
