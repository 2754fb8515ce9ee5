//! District tiles: one grid cell holding an ordered list of voter blocs.

use electorate_types::math::{clamp_range, clamp_unit};
use electorate_types::{CompassAxis, IdeologyVector, IndustryType, PopulationDensity, TileRecord};

use crate::bloc::VoterBloc;
use crate::effects::PolicyTurnEffects;

/// A single district.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictTile {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Density tier.
    pub density: PopulationDensity,
    /// Dominant industry.
    pub dominant_industry: IndustryType,
    /// Blocs in insertion order.
    pub blocs: Vec<VoterBloc>,
    /// Stability, `[0, 100]`.
    pub stability: f64,
    /// Turnout, `[0, 1]`.
    pub turnout: f64,
    /// Neighbor stability pressure, applied on the next simulation pass.
    pub external_stability_pressure: f64,
    /// Media access, `[0, 1]`.
    pub media_access: f64,
    /// Axis with the greatest population-weighted disagreement.
    pub local_issue: CompassAxis,
    /// Population-weighted mean bloc ideology.
    pub average_ideology: IdeologyVector,
}

impl DistrictTile {
    /// An empty tile with default stats for its density.
    pub const fn new(x: u32, y: u32, density: PopulationDensity, dominant_industry: IndustryType) -> Self {
        Self {
            x,
            y,
            density,
            dominant_industry,
            blocs: Vec::new(),
            stability: 50.0,
            turnout: 0.5,
            external_stability_pressure: 0.0,
            media_access: density.media_access(),
            local_issue: CompassAxis::Economic,
            average_ideology: IdeologyVector::ZERO,
        }
    }

    /// Append a bloc.
    pub fn add_bloc(&mut self, name: &str, population: u32, ideology: IdeologyVector) {
        self.blocs.push(VoterBloc::new(name, population, ideology));
    }

    /// Sum of bloc populations.
    pub fn total_population(&self) -> u64 {
        self.blocs
            .iter()
            .fold(0_u64, |acc, b| acc.saturating_add(u64::from(b.population)))
    }

    /// Population used as a weighting denominator; an empty tile counts as 1.
    pub fn weight_population(&self) -> f64 {
        self.blocs
            .iter()
            .map(|b| f64::from(b.population))
            .sum::<f64>()
            .max(1.0)
    }

    /// Axis with the greatest population-weighted `|bloc - policy|`.
    ///
    /// Ties resolve in axis declaration order.
    pub fn determine_local_issue(&self, policy: &IdeologyVector) -> CompassAxis {
        let total = self.weight_population();
        let mut pressure = [0.0_f64; 4];
        for bloc in &self.blocs {
            let weight = f64::from(bloc.population) / total;
            for (slot, axis) in pressure.iter_mut().zip(CompassAxis::ALL) {
                *slot += (bloc.ideology.axis(axis) - policy.axis(axis)).abs() * weight;
            }
        }

        let mut issue = CompassAxis::Economic;
        let mut max = f64::NEG_INFINITY;
        for (value, axis) in pressure.into_iter().zip(CompassAxis::ALL) {
            if value > max {
                max = value;
                issue = axis;
            }
        }
        issue
    }

    /// Resolve one turn for every bloc and recompute tile aggregates.
    pub fn process_turn(&mut self, policy: &IdeologyVector, effects: Option<&PolicyTurnEffects>) {
        self.local_issue = self.determine_local_issue(policy);
        let total = self.weight_population();
        let local_issue = self.local_issue;

        let mut weighted_happiness = 0.0;
        let mut weighted_turnout = 0.0;
        let mut axes = [0.0_f64; 4];
        for bloc in &mut self.blocs {
            bloc.process_turn(policy, local_issue, effects);
            let weight = f64::from(bloc.population) / total;
            weighted_happiness += bloc.happiness * weight;
            weighted_turnout += bloc.turnout_chance * weight;
            for (slot, axis) in axes.iter_mut().zip(CompassAxis::ALL) {
                *slot += bloc.ideology.axis(axis) * weight;
            }
        }

        self.turnout = clamp_unit(weighted_turnout);
        self.stability = clamp_range(
            weighted_happiness.mul_add(100.0, -(1.0 - weighted_happiness) * 10.0)
                + self.external_stability_pressure,
            0.0,
            100.0,
        );
        let [economic, societal, authority, diplomatic] = axes;
        self.average_ideology = IdeologyVector::new(economic, societal, authority, diplomatic);
    }

    /// Persistent form of this tile.
    pub fn to_record(&self) -> TileRecord {
        TileRecord {
            x: self.x,
            y: self.y,
            density: self.density,
            dominant_industry: self.dominant_industry,
            stability: self.stability,
            turnout: self.turnout,
            external_stability_pressure: self.external_stability_pressure,
            media_access: self.media_access,
            local_issue: self.local_issue,
            average_ideology: self.average_ideology,
            blocs: self.blocs.iter().map(VoterBloc::to_record).collect(),
        }
    }

    /// Rebuild a tile from a record, re-clamping stats and skipping blocs
    /// with blank names.
    pub fn from_record(record: &TileRecord) -> Self {
        let mut tile = Self::new(record.x, record.y, record.density, record.dominant_industry);
        tile.stability = clamp_range(record.stability, 0.0, 100.0);
        tile.turnout = clamp_unit(record.turnout);
        tile.external_stability_pressure = if record.external_stability_pressure.is_finite() {
            record.external_stability_pressure
        } else {
            0.0
        };
        tile.media_access = clamp_unit(record.media_access);
        tile.local_issue = record.local_issue;
        tile.average_ideology = record.average_ideology;
        tile.blocs = record.blocs.iter().filter_map(VoterBloc::from_record).collect();
        tile
    }
}
