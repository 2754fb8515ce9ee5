//! Political machinery for the Electorate simulation: policies and their
//! ramps, world tags, weighted events, parties, polls, elections, factions,
//! the player's candidate and the budget.
//!
//! Everything here operates on plain values and the district grid from
//! `electorate-world`. Randomness is always injected as `&mut impl Rng`, so
//! callers own the generator and replay stays deterministic.
//!
//! # Modules
//!
//! - [`policy_manager`] -- Policy registry, activation ramps, combined
//!   effects.
//! - [`tags`] -- Expiring and permanent world tags.
//! - [`events`] -- Event weighting against conditions and tags, weighted
//!   draw.
//! - [`party`] -- Parties, platform drift, splinter spawning.
//! - [`polls`] -- True poll shares and the noisy projection.
//! - [`election`] -- Vote tally and largest-remainder seat apportionment.
//! - [`factions`] -- Faction approval, demands, actions, cooldowns.
//! - [`candidate`] -- Candidate stats and campaign multipliers.
//! - [`budget`] -- Budget allocation and effect multipliers.
//! - [`error`] -- Error types.

pub mod budget;
pub mod candidate;
pub mod election;
pub mod error;
pub mod events;
pub mod factions;
pub mod party;
pub mod policy_manager;
pub mod polls;
pub mod tags;

pub use budget::{BudgetAllocation, scaled_policy_shift};
pub use candidate::CandidateProfile;
pub use election::{CampaignContext, ElectionOutcome, resolve_election};
pub use error::PoliticsError;
pub use events::{EventConditions, EventOutcome, roll_event};
pub use factions::{ActionCooldowns, FactionAction, FactionClimate, FactionPressure};
pub use party::{Party, SpawnParams, try_spawn_party};
pub use policy_manager::{PolicyContribution, PolicyManager, PolicyRampState};
pub use polls::{PollShare, PollSnapshot, ProjectionParams, compute_poll_shares, project_polls};
pub use tags::WorldTagManager;
