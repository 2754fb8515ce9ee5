//! Scenario data loading from the `data/` directory.
//!
//! Each collection lives in its own JSON file with a single root key:
//!
//! | File | Root key |
//! |---|---|
//! | `policies.json` | `policies` |
//! | `events.json` | `events` |
//! | `parties_defaults.json` | `parties` |
//! | `candidate_traits.json` | `traits` |
//! | `backgrounds.json` | `backgrounds` |
//!
//! A file that is missing or fails to parse is logged and treated as
//! empty, and the catalog then falls back to its built-in collection.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use electorate_core::ScenarioCatalog;
use electorate_types::{
    CandidateBackgroundDefinition, CandidateTraitDefinition, PartyDefinition, Policy, SimulationEvent,
};

use crate::error::EngineError;

#[derive(Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policies: Vec<Policy>,
}

#[derive(Deserialize)]
struct EventFile {
    #[serde(default)]
    events: Vec<SimulationEvent>,
}

#[derive(Deserialize)]
struct PartyFile {
    #[serde(default)]
    parties: Vec<PartyDefinition>,
}

#[derive(Deserialize)]
struct TraitFile {
    #[serde(default)]
    traits: Vec<CandidateTraitDefinition>,
}

#[derive(Deserialize)]
struct BackgroundFile {
    #[serde(default)]
    backgrounds: Vec<CandidateBackgroundDefinition>,
}

/// Read and decode one JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| EngineError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Load one collection, logging and returning an empty list on failure.
fn load_collection<F, T>(dir: &Path, file: &str, extract: impl FnOnce(F) -> Vec<T>) -> Vec<T>
where
    F: DeserializeOwned,
{
    let path = dir.join(file);
    if !path.exists() {
        warn!(path = %path.display(), "Scenario file not found, using built-in defaults");
        return Vec::new();
    }
    match read_json::<F>(&path) {
        Ok(parsed) => {
            let records = extract(parsed);
            info!(path = %path.display(), count = records.len(), "Scenario file loaded");
            records
        }
        Err(e) => {
            warn!(error = %e, "Scenario file unreadable, using built-in defaults");
            Vec::new()
        }
    }
}

/// Build the scenario catalog from the JSON files in `dir`.
pub fn load_catalog(dir: &Path) -> ScenarioCatalog {
    let policies = load_collection(dir, "policies.json", |f: PolicyFile| f.policies);
    let events = load_collection(dir, "events.json", |f: EventFile| f.events);
    let parties = load_collection(dir, "parties_defaults.json", |f: PartyFile| f.parties);
    let traits = load_collection(dir, "candidate_traits.json", |f: TraitFile| f.traits);
    let backgrounds = load_collection(dir, "backgrounds.json", |f: BackgroundFile| f.backgrounds);
    ScenarioCatalog::from_records(policies, events, parties, traits, backgrounds)
}
