//! Shared type definitions for the Electorate simulation.
//!
//! This crate is the leaf of the workspace: value types used by every
//! simulation layer, the configuration records handed in by the data
//! loader, and the persistent snapshot schema. Types flow downstream to
//! `TypeScript` via `ts-rs` for UI collaborators.
//!
//! # Modules
//!
//! - [`math`] -- Clamping and interpolation helpers
//! - [`ideology`] -- Four-axis ideology vector and compass axes
//! - [`enums`] -- Bloc categories, density tiers, industries
//! - [`policy`] -- Policy definitions and effect keys
//! - [`event`] -- Weighted event templates, weight rules, tag effects
//! - [`definitions`] -- Party and candidate definitions, faction state
//! - [`snapshot`] -- Versioned save-game records

pub mod definitions;
pub mod enums;
pub mod event;
pub mod ideology;
pub mod math;
pub mod policy;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use definitions::{
    CandidateBackgroundDefinition, CandidateTraitDefinition, FactionState, PartyDefinition,
};
pub use enums::{BlocCategory, IndustryType, PopulationDensity};
pub use event::{EventTagEffect, EventWeightRule, SimulationEvent};
pub use ideology::{CompassAxis, IdeologyVector, MAX_DISTANCE};
pub use policy::Policy;
pub use snapshot::{
    BlocRecord, CURRENT_SNAPSHOT_VERSION, CandidateRecord, CooldownRecord, GlobalRecord,
    PolicyStateRecord, SaveGame, SeatRecord, TileRecord, WorldTagRecord,
};
