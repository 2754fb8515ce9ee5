//! The district grid: a fixed-size, row-major array of tiles.

use electorate_types::IdeologyVector;

use crate::bloc::VoterBloc;
use crate::error::WorldError;
use crate::tile::DistrictTile;

/// Offsets of the eight surrounding cells.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Upper bound on `width * height` accepted by [`DistrictGrid::build`].
pub const MAX_GRID_CELLS: u64 = 1_000_000;

/// A `width x height` grid of district tiles stored row-major.
///
/// Every cell always holds a tile; the tile at index `y * width + x` has
/// coordinates `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictGrid {
    width: u32,
    height: u32,
    tiles: Vec<DistrictTile>,
}

impl DistrictGrid {
    /// Build a grid, calling `make_tile(x, y)` for every cell in row-major
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] when either dimension is zero and
    /// [`WorldError::GridTooLarge`] when the cell count exceeds
    /// [`MAX_GRID_CELLS`].
    pub fn build(
        width: u32,
        height: u32,
        mut make_tile: impl FnMut(u32, u32) -> DistrictTile,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        let cells = u64::from(width).saturating_mul(u64::from(height));
        if cells > MAX_GRID_CELLS {
            return Err(WorldError::GridTooLarge {
                width,
                height,
                max_cells: MAX_GRID_CELLS,
            });
        }
        let mut tiles = Vec::with_capacity(usize::try_from(cells).unwrap_or(0));
        for y in 0..height {
            for x in 0..width {
                let mut tile = make_tile(x, y);
                tile.x = x;
                tile.y = y;
                tiles.push(tile);
            }
        }
        Ok(Self { width, height, tiles })
    }

    /// Grid width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Storage index of `(x, y)`, or `None` when out of range.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = u64::from(y)
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(x))?;
        usize::try_from(index).ok()
    }

    /// Tile at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Option<&DistrictTile> {
        self.index_of(x, y).and_then(|i| self.tiles.get(i))
    }

    /// Mutable tile at `(x, y)`.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut DistrictTile> {
        self.index_of(x, y).and_then(|i| self.tiles.get_mut(i))
    }

    /// Tile at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOutOfRange`] for coordinates outside the grid.
    pub fn tile(&self, x: u32, y: u32) -> Result<&DistrictTile, WorldError> {
        self.get(x, y).ok_or(WorldError::TileOutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Replace the tile at its own coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOutOfRange`] when the tile's coordinates
    /// fall outside the grid.
    pub fn replace(&mut self, tile: DistrictTile) -> Result<(), WorldError> {
        let (x, y) = (tile.x, tile.y);
        let (width, height) = (self.width, self.height);
        let slot = self
            .get_mut(x, y)
            .ok_or(WorldError::TileOutOfRange { x, y, width, height })?;
        *slot = tile;
        Ok(())
    }

    /// Tiles in storage order.
    pub fn tiles(&self) -> impl Iterator<Item = &DistrictTile> {
        self.tiles.iter()
    }

    /// Mutable tiles in storage order.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut DistrictTile> {
        self.tiles.iter_mut()
    }

    /// Every bloc of every tile in storage order.
    pub fn blocs(&self) -> impl Iterator<Item = &VoterBloc> {
        self.tiles.iter().flat_map(|t| t.blocs.iter())
    }

    /// Mutable blocs of every tile in storage order.
    pub fn blocs_mut(&mut self) -> impl Iterator<Item = &mut VoterBloc> {
        self.tiles.iter_mut().flat_map(|t| t.blocs.iter_mut())
    }

    /// Coordinates of the up-to-eight cells surrounding `(x, y)`.
    pub fn neighbor_coords(&self, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = u32::try_from(i64::from(x).checked_add(dx)?).ok()?;
            let ny = u32::try_from(i64::from(y).checked_add(dy)?).ok()?;
            (nx < self.width && ny < self.height).then_some((nx, ny))
        })
    }

    /// Sum of all bloc populations.
    pub fn total_population(&self) -> u64 {
        self.tiles
            .iter()
            .fold(0_u64, |acc, t| acc.saturating_add(t.total_population()))
    }

    /// Population-weighted mean of tile ideologies, or the origin for an
    /// unpopulated grid. Each tile weighs at least 1.
    pub fn weighted_center(&self) -> IdeologyVector {
        let mut total = 0.0;
        let mut axes = [0.0_f64; 4];
        for tile in &self.tiles {
            let weight = tile.weight_population();
            total += weight;
            for (slot, axis) in axes.iter_mut().zip(electorate_types::CompassAxis::ALL) {
                *slot += tile.average_ideology.axis(axis) * weight;
            }
        }
        if total <= 0.0 {
            return IdeologyVector::ZERO;
        }
        let [e, s, a, d] = axes;
        IdeologyVector::new(e / total, s / total, a / total, d / total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electorate_types::{IndustryType, PopulationDensity};

    use super::*;

    fn blank(width: u32, height: u32) -> DistrictGrid {
        DistrictGrid::build(width, height, |x, y| {
            DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services)
        })
        .unwrap()
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let result = DistrictGrid::build(0, 5, |x, y| {
            DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services)
        });
        assert!(matches!(result, Err(WorldError::EmptyGrid { width: 0, height: 5 })));
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_allocating() {
        let mut calls = 0_u32;
        let result = DistrictGrid::build(u32::MAX, u32::MAX, |x, y| {
            calls = calls.saturating_add(1);
            DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services)
        });
        assert!(matches!(result, Err(WorldError::GridTooLarge { .. })));
        assert_eq!(calls, 0);

        let too_wide = DistrictGrid::build(1_000_001, 1, |x, y| {
            DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services)
        });
        assert!(matches!(too_wide, Err(WorldError::GridTooLarge { .. })));
    }

    #[test]
    fn storage_is_row_major() {
        let grid = blank(3, 2);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.index_of(2, 1), Some(5));
        let coords: Vec<(u32, u32)> = grid.tiles().map(|t| (t.x, t.y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn out_of_range_lookups_fail() {
        let grid = blank(3, 2);
        assert!(grid.get(3, 0).is_none());
        assert!(grid.get(0, 2).is_none());
        assert!(matches!(grid.tile(9, 9), Err(WorldError::TileOutOfRange { .. })));
    }

    #[test]
    fn neighbor_counts_at_corner_edge_and_center() {
        let grid = blank(3, 3);
        assert_eq!(grid.neighbor_coords(0, 0).count(), 3);
        assert_eq!(grid.neighbor_coords(1, 0).count(), 5);
        assert_eq!(grid.neighbor_coords(1, 1).count(), 8);
        assert_eq!(blank(1, 1).neighbor_coords(0, 0).count(), 0);
    }

    #[test]
    fn replace_writes_at_tile_coordinates() {
        let mut grid = blank(2, 2);
        let tile = DistrictTile::new(1, 1, PopulationDensity::Metro, IndustryType::Tech);
        grid.replace(tile).unwrap();
        assert_eq!(grid.get(1, 1).unwrap().density, PopulationDensity::Metro);

        let outside = DistrictTile::new(5, 0, PopulationDensity::Metro, IndustryType::Tech);
        assert!(grid.replace(outside).is_err());
    }

    #[test]
    fn weighted_center_of_blank_grid_is_origin() {
        let grid = blank(2, 2);
        assert_eq!(grid.weighted_center(), IdeologyVector::ZERO);
        assert_eq!(grid.total_population(), 0);
    }
}
