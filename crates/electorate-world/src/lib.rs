//! District grid, voter blocs, and spatial dynamics for the Electorate
//! simulation.
//!
//! This crate models the electorate itself: a rectangular grid of district
//! tiles, each holding an ordered list of voter blocs whose sentiment is
//! recomputed every turn against the effective government policy.
//!
//! # Modules
//!
//! - [`bloc`] -- [`VoterBloc`] sentiment model and ideology nudges.
//! - [`effects`] -- [`PolicyTurnEffects`], per-category happiness and
//!   turnout offsets composed from active policies.
//! - [`tile`] -- [`DistrictTile`] local issue, aggregation, and stability.
//! - [`grid`] -- [`DistrictGrid`] row-major storage and neighbor queries.
//! - [`noise`] -- Seeded fractal value noise.
//! - [`generation`] -- Noise-classified grid generation with template blocs.
//! - [`diffusion`] -- Neighbor ideology and stability diffusion plus media
//!   influence.
//! - [`error`] -- Error types for grid construction and lookup.

pub mod bloc;
pub mod diffusion;
pub mod effects;
pub mod error;
pub mod generation;
pub mod grid;
pub mod noise;
pub mod tile;

// Re-export primary types at crate root.
pub use bloc::VoterBloc;
pub use diffusion::{DiffusionParams, apply_neighbor_diffusion};
pub use effects::PolicyTurnEffects;
pub use error::WorldError;
pub use generation::{generate_grid, seed_blocs};
pub use grid::{DistrictGrid, MAX_GRID_CELLS};
pub use noise::ValueNoise;
pub use tile::DistrictTile;
