//! Error types for the `electorate-world` crate.

/// Errors that can occur while building or querying the district grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid must have at least one row and one column.
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The grid would hold more cells than the world supports.
    #[error("grid {width}x{height} exceeds the {max_cells}-cell limit")]
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest accepted `width * height`.
        max_cells: u64,
    },

    /// The requested coordinates fall outside the grid.
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    TileOutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}
