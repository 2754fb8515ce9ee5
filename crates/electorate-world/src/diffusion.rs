//! Spatial diffusion of ideology and stability between neighboring tiles.
//!
//! Diffusion reads a snapshot of every tile's average ideology and stability
//! taken before any mutation, so the result does not depend on iteration
//! order. Each bloc is nudged toward its tile's neighbor ideology and then
//! toward the media target; each tile receives an external stability
//! pressure that feeds its next stability computation.

use electorate_types::IdeologyVector;
use electorate_types::math::clamp_unit;

use crate::grid::DistrictGrid;

/// Per-turn diffusion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// Fraction of the gap to the neighbor ideology closed per turn, `[0, 1]`.
    pub ideology_rate: f64,
    /// Scale of the neighbor stability spillover (non-negative).
    pub stability_spillover: f64,
    /// Effective media power, `[0, 1]`.
    pub media_power: f64,
    /// Ideology the media pushes blocs toward.
    pub media_target: IdeologyVector,
}

/// Apply one diffusion pass to the whole grid.
pub fn apply_neighbor_diffusion(grid: &mut DistrictGrid, params: &DiffusionParams) {
    let rate = clamp_unit(params.ideology_rate);
    let spillover = if params.stability_spillover.is_nan() {
        0.0
    } else {
        params.stability_spillover.max(0.0)
    };
    let media_power = clamp_unit(params.media_power);

    if rate <= 0.0 && spillover <= 0.0 && media_power <= 0.0 {
        return;
    }

    let fields: Vec<(IdeologyVector, f64)> = grid
        .tiles()
        .map(|t| (t.average_ideology, t.stability))
        .collect();
    let targets: Vec<(IdeologyVector, f64)> = grid
        .tiles()
        .map(|t| neighbor_average(grid, &fields, t.x, t.y))
        .collect();

    for (tile, (neighbor_ideology, neighbor_stability)) in grid.tiles_mut().zip(targets) {
        let media_strength = clamp_unit(tile.media_access * media_power);
        for bloc in &mut tile.blocs {
            if rate > 0.0 {
                bloc.nudge_toward(&neighbor_ideology, rate);
            }
            if media_power > 0.0 {
                bloc.nudge_toward(&params.media_target, media_strength);
            }
        }
        tile.external_stability_pressure = (neighbor_stability - tile.stability) * 0.01 * spillover;
    }
}

/// Unweighted mean ideology and stability of the cells around `(x, y)`;
/// a cell without neighbors uses its own values.
fn neighbor_average(
    grid: &DistrictGrid,
    fields: &[(IdeologyVector, f64)],
    x: u32,
    y: u32,
) -> (IdeologyVector, f64) {
    let mut axes = [0.0_f64; 4];
    let mut stability = 0.0;
    let mut count = 0_u32;
    for (nx, ny) in grid.neighbor_coords(x, y) {
        let Some((ideology, tile_stability)) = grid.index_of(nx, ny).and_then(|i| fields.get(i)) else {
            continue;
        };
        for (slot, axis) in axes.iter_mut().zip(electorate_types::CompassAxis::ALL) {
            *slot += ideology.axis(axis);
        }
        stability += tile_stability;
        count = count.saturating_add(1);
    }

    if count == 0 {
        return grid
            .index_of(x, y)
            .and_then(|i| fields.get(i))
            .copied()
            .unwrap_or((IdeologyVector::ZERO, 50.0));
    }

    let n = f64::from(count);
    let [e, s, a, d] = axes;
    (IdeologyVector::new(e / n, s / n, a / n, d / n), stability / n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electorate_types::{IndustryType, PopulationDensity};

    use super::*;
    use crate::tile::DistrictTile;

    const EPS: f64 = 1e-9;

    fn uniform_grid(ideology: IdeologyVector) -> DistrictGrid {
        DistrictGrid::build(4, 3, |x, y| {
            let mut tile = DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services);
            tile.add_bloc("Residents", 1000, ideology);
            tile.average_ideology = ideology;
            tile.stability = 60.0;
            tile
        })
        .unwrap()
    }

    fn params(target: IdeologyVector) -> DiffusionParams {
        DiffusionParams {
            ideology_rate: 0.01,
            stability_spillover: 3.0,
            media_power: 0.05,
            media_target: target,
        }
    }

    #[test]
    fn uniform_grid_is_unchanged() {
        let ideology = IdeologyVector::new(0.25, -0.5, 0.125, 0.75);
        let mut grid = uniform_grid(ideology);
        let before = grid.clone();
        apply_neighbor_diffusion(&mut grid, &params(ideology));
        assert_eq!(grid, before);
        for tile in grid.tiles() {
            assert!(tile.external_stability_pressure.abs() < EPS);
        }
    }

    #[test]
    fn stability_gap_creates_pressure() {
        let mut grid = uniform_grid(IdeologyVector::ZERO);
        grid.get_mut(0, 0).unwrap().stability = 30.0;
        apply_neighbor_diffusion(&mut grid, &params(IdeologyVector::ZERO));
        // Corner (0,0) has 3 neighbors at 60: (60 - 30) * 0.01 * 3 = 0.9.
        let corner = grid.get(0, 0).unwrap();
        assert!((corner.external_stability_pressure - 0.9).abs() < EPS);
        // (1,1) sees the low corner among 8 neighbors: mean 56.25, own 60.
        let inner = grid.get(1, 1).unwrap();
        assert!((inner.external_stability_pressure - (56.25 - 60.0) * 0.03).abs() < EPS);
    }

    #[test]
    fn blocs_move_toward_neighbors_and_media() {
        let mut grid = uniform_grid(IdeologyVector::ZERO);
        let outlier = IdeologyVector::new(1.0, 0.0, 0.0, 0.0);
        {
            let tile = grid.get_mut(0, 0).unwrap();
            tile.average_ideology = outlier;
            tile.blocs.first_mut().unwrap().ideology = outlier;
        }
        let p = DiffusionParams {
            ideology_rate: 0.5,
            stability_spillover: 0.0,
            media_power: 0.0,
            media_target: IdeologyVector::ZERO,
        };
        apply_neighbor_diffusion(&mut grid, &p);
        let corner = grid.get(0, 0).unwrap().blocs.first().unwrap().ideology;
        assert!((corner.economic() - 0.5).abs() < EPS);
        // (1,0) has 5 neighbors, one at 1.0 -> mean 0.2, nudged halfway to 0.1.
        let edge = grid.get(1, 0).unwrap().blocs.first().unwrap().ideology;
        assert!((edge.economic() - 0.1).abs() < EPS);
    }

    #[test]
    fn media_strength_scales_with_access() {
        let mut grid = uniform_grid(IdeologyVector::ZERO);
        let target = IdeologyVector::new(0.0, 1.0, 0.0, 0.0);
        let p = DiffusionParams {
            ideology_rate: 0.0,
            stability_spillover: 0.0,
            media_power: 0.5,
            media_target: target,
        };
        apply_neighbor_diffusion(&mut grid, &p);
        // Urban access 0.6 * power 0.5 = 0.3 of the way.
        let bloc = grid.get(2, 2).unwrap().blocs.first().unwrap().ideology;
        assert!((bloc.societal() - 0.3).abs() < EPS);
    }

    #[test]
    fn single_tile_uses_itself() {
        let mut grid = DistrictGrid::build(1, 1, |x, y| {
            let mut tile = DistrictTile::new(x, y, PopulationDensity::Rural, IndustryType::Agriculture);
            tile.add_bloc("Farmers", 500, IdeologyVector::new(0.5, 0.0, 0.0, 0.0));
            tile.average_ideology = IdeologyVector::new(0.5, 0.0, 0.0, 0.0);
            tile
        })
        .unwrap();
        apply_neighbor_diffusion(&mut grid, &params(IdeologyVector::new(0.5, 0.0, 0.0, 0.0)));
        let tile = grid.get(0, 0).unwrap();
        assert!(tile.external_stability_pressure.abs() < EPS);
        assert!((tile.blocs.first().unwrap().ideology.economic() - 0.5).abs() < EPS);
    }
}
