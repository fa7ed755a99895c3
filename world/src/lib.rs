#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative occupancy grid for hulkgen layouts.
//!
//! The grid is monotonically filled: cells only ever move from
//! [`CellState::Empty`] to [`CellState::Filled`]. Every write is clipped to
//! the board, so callers may pass rectangles that hang off any edge.

use std::ops::Range;

use hulkgen_core::{CellCoord, Footprint};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary occupancy of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Background cell.
    #[default]
    Empty,
    /// Cell claimed by a room, entrance, exit or corridor.
    Filled,
}

/// Fixed-size dense occupancy grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot", into = "GridSnapshot")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

/// Largest number of cells a single grid may hold.
pub const MAX_CELLS: u64 = 1 << 24;

impl Grid {
    /// Creates an empty grid with `width` columns and `height` rows.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }

        let cells = u64::from(width) * u64::from(height);
        if cells > MAX_CELLS {
            return Err(GridError::TooLarge { width, height });
        }
        let capacity =
            usize::try_from(cells).map_err(|_| GridError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![CellState::Empty; capacity],
        })
    }

    /// Rebuilds a grid from the list of filled cells.
    pub fn from_filled_cells<I>(width: u32, height: u32, filled: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut grid = Self::new(width, height)?;
        for cell in filled {
            let index = grid.index(cell).ok_or(GridError::CellOutOfBounds {
                column: cell.column(),
                row: cell.row(),
            })?;
            grid.cells[index] = CellState::Filled;
        }
        Ok(grid)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reports whether the rectangle of `length` columns by `width` rows
    /// anchored at `(anchor_x, anchor_y)` is free of filled cells.
    ///
    /// Only the in-bounds portion is inspected. A rectangle lying entirely
    /// off the board is therefore reported as placeable; callers must not use
    /// this check to reject off-board placements.
    #[must_use]
    pub fn can_place(&self, anchor_x: i32, anchor_y: i32, length: u32, width: u32) -> bool {
        let columns = clip(anchor_x, length, self.width);
        clip(anchor_y, width, self.height).all(|row| {
            columns
                .clone()
                .all(|column| self.state_at(column, row) == CellState::Empty)
        })
    }

    /// Marks every in-bounds cell of the rectangle as filled.
    pub fn fill_rect(&mut self, anchor_x: i32, anchor_y: i32, length: u32, width: u32) {
        let columns = clip(anchor_x, length, self.width);
        for row in clip(anchor_y, width, self.height) {
            for column in columns.clone() {
                if let Some(index) = self.index(CellCoord::new(column, row)) {
                    self.cells[index] = CellState::Filled;
                }
            }
        }
    }

    /// [`Grid::can_place`] expressed with a [`Footprint`].
    #[must_use]
    pub fn can_place_footprint(&self, footprint: &Footprint) -> bool {
        let anchor = footprint.anchor();
        let size = footprint.size();
        self.can_place(anchor.x(), anchor.y(), size.length(), size.width())
    }

    /// [`Grid::fill_rect`] expressed with a [`Footprint`].
    pub fn fill_footprint(&mut self, footprint: &Footprint) {
        let anchor = footprint.anchor();
        let size = footprint.size();
        self.fill_rect(anchor.x(), anchor.y(), size.length(), size.width());
    }

    /// Occupancy of the provided cell, or `None` when it lies off the board.
    #[must_use]
    pub fn cell_state(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether the provided in-bounds cell is filled.
    #[must_use]
    pub fn is_filled(&self, cell: CellCoord) -> bool {
        self.cell_state(cell) == Some(CellState::Filled)
    }

    fn state_at(&self, column: u32, row: u32) -> CellState {
        self.cell_state(CellCoord::new(column, row))
            .unwrap_or(CellState::Empty)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Read-only helpers for presenters and tests.
pub mod query {
    use super::{CellState, Grid};
    use hulkgen_core::CellCoord;

    /// Iterates the rows of the grid from top to bottom.
    pub fn rows(grid: &Grid) -> impl Iterator<Item = &[CellState]> + '_ {
        let width = usize::try_from(grid.width).unwrap_or(usize::MAX).max(1);
        grid.cells.chunks(width)
    }

    /// Collects every filled cell in row-major order.
    #[must_use]
    pub fn filled_cells(grid: &Grid) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        for (row, states) in (0..grid.height).zip(rows(grid)) {
            for (column, state) in (0..grid.width).zip(states) {
                if *state == CellState::Filled {
                    cells.push(CellCoord::new(column, row));
                }
            }
        }
        cells
    }

    /// Counts the filled cells.
    #[must_use]
    pub fn filled_count(grid: &Grid) -> usize {
        grid.cells
            .iter()
            .filter(|state| **state == CellState::Filled)
            .count()
    }
}

/// Reasons a grid cannot be constructed or restored.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Both dimensions must be positive.
    #[error("grid of {width}x{height} cells has no area")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// The board would exceed [`MAX_CELLS`].
    #[error("grid of {width}x{height} cells exceeds the cell limit")]
    TooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A restored cell lies outside the declared dimensions.
    #[error("cell ({column}, {row}) lies outside the grid")]
    CellOutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// A restored snapshot carried the wrong number of cells.
    #[error("expected {expected} cells but snapshot holds {actual}")]
    CellCountMismatch {
        /// Cells implied by the dimensions.
        expected: usize,
        /// Cells present in the snapshot.
        actual: usize,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GridSnapshot {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl From<Grid> for GridSnapshot {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            cells: grid.cells,
        }
    }
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = GridError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(snapshot.width, snapshot.height)?;
        if grid.cells.len() != snapshot.cells.len() {
            return Err(GridError::CellCountMismatch {
                expected: grid.cells.len(),
                actual: snapshot.cells.len(),
            });
        }
        grid.cells = snapshot.cells;
        Ok(grid)
    }
}

fn clip(anchor: i32, extent: u32, bound: u32) -> Range<u32> {
    let start = i64::from(anchor).max(0);
    let end = (i64::from(anchor) + i64::from(extent)).min(i64::from(bound));
    if end <= start {
        return 0..0;
    }
    // Both ends lie within 0..=bound here.
    let start = u32::try_from(start).unwrap_or(bound);
    let end = u32::try_from(end).unwrap_or(bound);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use hulkgen_core::{FootprintSize, Position};

    fn grid(width: u32, height: u32) -> Grid {
        Grid::new(width, height).expect("valid dimensions")
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = grid(6, 4);
        assert_eq!(grid.dimensions(), (6, 4));
        assert_eq!(query::filled_count(&grid), 0);
        assert_eq!(query::rows(&grid).count(), 4);
    }

    #[test]
    fn new_rejects_boards_over_the_cell_limit() {
        assert_eq!(
            Grid::new(200_000, 200_000),
            Err(GridError::TooLarge {
                width: 200_000,
                height: 200_000
            })
        );
        assert_eq!(
            Grid::new(u32::MAX, 2),
            Err(GridError::TooLarge {
                width: u32::MAX,
                height: 2
            })
        );
        assert!(Grid::new(4_096, 4_096).is_ok());
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::ZeroDimension {
                width: 0,
                height: 5
            })
        );
    }

    #[test]
    fn fill_rect_marks_rows_by_width_and_columns_by_length() {
        let mut grid = grid(8, 8);
        grid.fill_rect(2, 3, 3, 2);

        let filled = query::filled_cells(&grid);
        assert_eq!(filled.len(), 6);
        assert!(grid.is_filled(CellCoord::new(2, 3)));
        assert!(grid.is_filled(CellCoord::new(4, 4)));
        assert!(!grid.is_filled(CellCoord::new(5, 3)));
        assert!(!grid.is_filled(CellCoord::new(2, 5)));
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut grid = grid(4, 4);
        grid.fill_rect(-2, 3, 4, 3);

        assert_eq!(
            query::filled_cells(&grid),
            vec![CellCoord::new(0, 3), CellCoord::new(1, 3)]
        );
    }

    #[test]
    fn fill_rect_entirely_off_board_is_ignored() {
        let mut grid = grid(4, 4);
        grid.fill_rect(10, 10, 3, 3);
        grid.fill_rect(-5, 0, 2, 2);
        assert_eq!(query::filled_count(&grid), 0);
    }

    #[test]
    fn can_place_detects_overlap_in_bounds_only() {
        let mut grid = grid(10, 10);
        grid.fill_rect(7, 5, 1, 1);

        assert!(!grid.can_place(6, 5, 4, 1));
        assert!(grid.can_place(5, 6, 1, 4));
        assert!(grid.can_place(8, 5, 4, 1));
    }

    #[test]
    fn can_place_accepts_rectangles_off_the_board() {
        let mut grid = grid(5, 5);
        grid.fill_rect(0, 0, 5, 5);

        assert!(grid.can_place(5, 0, 4, 1));
        assert!(grid.can_place(0, -4, 1, 4));
        assert!(!grid.can_place(4, -3, 1, 4));
    }

    #[test]
    fn can_place_is_idempotent_and_pure() {
        let mut grid = grid(6, 6);
        grid.fill_rect(1, 1, 2, 2);
        let before = grid.clone();

        let first = grid.can_place(0, 0, 3, 3);
        let second = grid.can_place(0, 0, 3, 3);

        assert_eq!(first, second);
        assert_eq!(grid, before);
    }

    #[test]
    fn footprint_helpers_delegate_to_primitives() {
        let mut grid = grid(6, 6);
        let footprint =
            Footprint::from_anchor_and_size(Position::new(1, 2), FootprintSize::new(2, 1));
        assert!(grid.can_place_footprint(&footprint));

        grid.fill_footprint(&footprint);
        assert!(!grid.can_place_footprint(&footprint));
        assert_eq!(
            query::filled_cells(&grid),
            vec![CellCoord::new(1, 2), CellCoord::new(2, 2)]
        );
    }

    #[test]
    fn from_filled_cells_rejects_out_of_bounds_cells() {
        let error = Grid::from_filled_cells(3, 3, [CellCoord::new(3, 0)])
            .expect_err("cell outside grid must be rejected");
        assert_eq!(error, GridError::CellOutOfBounds { column: 3, row: 0 });
    }

    #[test]
    fn snapshot_with_wrong_cell_count_is_rejected() {
        let snapshot = GridSnapshot {
            width: 2,
            height: 2,
            cells: vec![CellState::Filled; 3],
        };
        assert_eq!(
            Grid::try_from(snapshot),
            Err(GridError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn grid_survives_bincode_snapshot() {
        let mut grid = grid(5, 3);
        grid.fill_rect(1, 1, 3, 1);

        let bytes = bincode::serialize(&grid).expect("serialize");
        let restored: Grid = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, grid);
    }
}
