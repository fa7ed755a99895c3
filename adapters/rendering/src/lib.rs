#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for hulkgen adapters.
//!
//! Rendering is stateless: callers build a [`RenderContext`] once and pass it,
//! together with a finished [`Grid`], to [`render`]. The resulting [`Frame`]
//! lists every primitive a backend must draw, so backends never inspect the
//! grid or the generator directly.

use anyhow::Result as AnyResult;
use glam::Vec2;
use hulkgen_core::CellCoord;
use hulkgen_world::{query, Grid};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Caller-owned presentation settings passed to [`render`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    cell_size: f32,
    tile_color: Color,
    background_color: Color,
    grid_line_color: Color,
    draw_grid_lines: bool,
}

impl RenderContext {
    /// Default edge length of a cell in pixels.
    pub const DEFAULT_CELL_SIZE: f32 = 20.0;

    /// Creates a context with explicit colors.
    ///
    /// Returns an error when `cell_size` is not a positive finite number.
    pub fn new(
        cell_size: f32,
        tile_color: Color,
        background_color: Color,
        grid_line_color: Color,
    ) -> Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            cell_size,
            tile_color,
            background_color,
            grid_line_color,
            draw_grid_lines: true,
        })
    }

    /// Returns the context with gridlines enabled or disabled.
    #[must_use]
    pub const fn with_grid_lines(mut self, enabled: bool) -> Self {
        self.draw_grid_lines = enabled;
        self
    }

    /// Edge length of a single cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Color applied to filled cells.
    #[must_use]
    pub const fn tile_color(&self) -> Color {
        self.tile_color
    }

    /// Color used to clear the frame.
    #[must_use]
    pub const fn background_color(&self) -> Color {
        self.background_color
    }

    /// Color used for gridlines.
    #[must_use]
    pub const fn grid_line_color(&self) -> Color {
        self.grid_line_color
    }

    /// Reports whether gridlines are drawn.
    #[must_use]
    pub const fn draws_grid_lines(&self) -> bool {
        self.draw_grid_lines
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        let background = Color::from_rgb_u8(0x10, 0x12, 0x16);
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            tile_color: Color::from_rgb_u8(0x8a, 0x93, 0x9b),
            background_color: background,
            grid_line_color: background.lighten(0.15),
            draw_grid_lines: true,
        }
    }
}

/// Filled cell drawn as an axis-aligned quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileQuad {
    /// Grid cell the quad represents.
    pub cell: CellCoord,
    /// Upper-left corner in pixels.
    pub origin: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Single gridline segment in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    /// Segment start in pixels.
    pub from: Vec2,
    /// Segment end in pixels.
    pub to: Vec2,
    /// Stroke color.
    pub color: Color,
}

/// Everything a backend needs to draw one finished layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Number of grid columns represented.
    pub columns: u32,
    /// Number of grid rows represented.
    pub rows: u32,
    /// Total frame extent in pixels.
    pub size: Vec2,
    /// Solid color used to clear the frame.
    pub clear_color: Color,
    /// One quad per filled cell, in row-major order.
    pub tiles: Vec<TileQuad>,
    /// Column boundaries followed by row boundaries.
    pub grid_lines: Vec<GridLine>,
}

impl Frame {
    /// Looks up the quad drawn for the provided cell, if it is filled.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<&TileQuad> {
        self.tiles.iter().find(|tile| tile.cell == cell)
    }
}

/// Maps a finished grid onto drawing primitives.
///
/// Filled cells become tiles, empty cells are left to the clear color, and
/// gridlines are overlaid on every column and row boundary when enabled.
#[must_use]
pub fn render(grid: &Grid, context: &RenderContext) -> Frame {
    let (columns, rows) = grid.dimensions();
    let cell = context.cell_size();
    let size = Vec2::new(columns as f32 * cell, rows as f32 * cell);

    let tiles = query::filled_cells(grid)
        .into_iter()
        .map(|coord| TileQuad {
            cell: coord,
            origin: Vec2::new(coord.column() as f32 * cell, coord.row() as f32 * cell),
            size: Vec2::splat(cell),
            color: context.tile_color(),
        })
        .collect();

    let mut grid_lines = Vec::new();
    if context.draws_grid_lines() {
        let color = context.grid_line_color();
        for column in 0..=columns {
            let x = column as f32 * cell;
            grid_lines.push(GridLine {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, size.y),
                color,
            });
        }
        for row in 0..=rows {
            let y = row as f32 * cell;
            grid_lines.push(GridLine {
                from: Vec2::new(0.0, y),
                to: Vec2::new(size.x, y),
                color,
            });
        }
    }

    Frame {
        columns,
        rows,
        size,
        clear_color: context.background_color(),
        tiles,
        grid_lines,
    }
}

/// Rendering backend capable of presenting finished layouts.
pub trait RenderingBackend {
    /// Draws the provided frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive, finite pixel size.
    #[error("cell_size must be positive and finite (received {cell_size})")]
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(cell_size: f32) -> RenderContext {
        RenderContext::new(
            cell_size,
            Color::from_rgb_u8(255, 255, 255),
            Color::from_rgb_u8(0, 0, 0),
            Color::from_rgb_u8(64, 64, 64),
        )
        .expect("valid context")
    }

    #[test]
    fn context_rejects_non_positive_cell_size() {
        let black = Color::from_rgb_u8(0, 0, 0);
        assert_eq!(
            RenderContext::new(0.0, black, black, black),
            Err(RenderingError::InvalidCellSize { cell_size: 0.0 })
        );
        assert!(RenderContext::new(f32::NAN, black, black, black).is_err());
    }

    #[test]
    fn empty_grid_renders_only_grid_lines() {
        let grid = Grid::new(4, 3).expect("valid grid");
        let frame = render(&grid, &context(10.0));

        assert!(frame.tiles.is_empty());
        assert_eq!(frame.grid_lines.len(), 5 + 4);
        assert_eq!(frame.size, Vec2::new(40.0, 30.0));
        assert_eq!(frame.clear_color, Color::from_rgb_u8(0, 0, 0));
    }

    #[test]
    fn filled_cells_map_to_scaled_quads() {
        let mut grid = Grid::new(4, 3).expect("valid grid");
        grid.fill_rect(1, 2, 2, 1);
        let frame = render(&grid, &context(8.0));

        assert_eq!(frame.tiles.len(), 2);
        let tile = frame
            .tile_at(CellCoord::new(2, 2))
            .expect("filled cell should be drawn");
        assert_eq!(tile.origin, Vec2::new(16.0, 16.0));
        assert_eq!(tile.size, Vec2::splat(8.0));
        assert_eq!(tile.color, Color::from_rgb_u8(255, 255, 255));
        assert!(frame.tile_at(CellCoord::new(0, 0)).is_none());
    }

    #[test]
    fn grid_lines_span_the_whole_frame() {
        let grid = Grid::new(2, 2).expect("valid grid");
        let frame = render(&grid, &context(5.0));

        let last_column = frame.grid_lines[2];
        assert_eq!(last_column.from, Vec2::new(10.0, 0.0));
        assert_eq!(last_column.to, Vec2::new(10.0, 10.0));
        let first_row = frame.grid_lines[3];
        assert_eq!(first_row.from, Vec2::new(0.0, 0.0));
        assert_eq!(first_row.to, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn grid_lines_can_be_disabled() {
        let grid = Grid::new(3, 3).expect("valid grid");
        let frame = render(&grid, &context(4.0).with_grid_lines(false));
        assert!(frame.grid_lines.is_empty());
    }

    #[test]
    fn default_context_derives_grid_line_color_from_background() {
        let context = RenderContext::default();
        assert_eq!(
            context.grid_line_color(),
            context.background_color().lighten(0.15)
        );
        assert!(context.draws_grid_lines());
        assert_eq!(context.cell_size(), RenderContext::DEFAULT_CELL_SIZE);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
    }
}
