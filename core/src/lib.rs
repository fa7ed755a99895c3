#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hulkgen layout engine.
//!
//! This crate defines the vocabulary that connects the authoritative grid,
//! the generator system and the presentation adapters. The generator consumes
//! a [`GeneratorConfig`] and a [`RandomSource`], proposes
//! [`PlacementCandidate`] values while carving corridors, and reports every
//! placement through [`GenerationEvent`] values so adapters can replay or
//! summarise a run deterministically.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells spanned by a single corridor segment.
pub const DEFAULT_CORRIDOR_LENGTH: u32 = 4;

/// Upper bound on generator steps applied unless a run opts out explicitly.
pub const DEFAULT_MAX_STEPS: u32 = 10_000;

/// Small room footprint measured as length by width.
pub const SMALL_ROOM: FootprintSize = FootprintSize::new(3, 3);

/// Large room footprint measured as length by width.
pub const LARGE_ROOM: FootprintSize = FootprintSize::new(5, 5);

/// Axis along which the next room or corridor segment extends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Extends toward increasing column indices.
    Horizontal,
    /// Extends toward increasing row indices.
    Vertical,
}

/// Direction of a corridor relative to the cursor's current orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    /// Continues along the current orientation.
    Straight,
    /// Turns onto the perpendicular axis on the negative side.
    Left,
    /// Turns onto the perpendicular axis on the positive side.
    Right,
}

impl TurnKind {
    /// Every turn kind in candidate enumeration order.
    pub const ALL: [TurnKind; 3] = [TurnKind::Straight, TurnKind::Left, TurnKind::Right];
}

/// Alternation flag selecting the next placement kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The last tile was a room, so a corridor is due.
    AwaitingRoom,
    /// The last tile was a corridor, so a room is due.
    AwaitingCorridor,
}

impl Phase {
    /// Phase that follows this one after a single step.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::AwaitingRoom => Self::AwaitingCorridor,
            Self::AwaitingCorridor => Self::AwaitingRoom,
        }
    }
}

/// Signed anchor used by the cursor and by placement footprints.
///
/// Anchors are allowed to leave the board; only grid writes are clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from column (`x`) and row (`y`) offsets.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column offset of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row offset of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the position moved `distance` cells along `orientation`.
    #[must_use]
    pub fn advanced(self, orientation: Orientation, distance: u32) -> Self {
        let distance = i32::try_from(distance).unwrap_or(i32::MAX);
        match orientation {
            Orientation::Horizontal => self.offset(distance, 0),
            Orientation::Vertical => self.offset(0, distance),
        }
    }
}

/// Location of a single in-bounds grid cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Size of a [`Footprint`] measured in whole cells.
///
/// `length` spans columns and `width` spans rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootprintSize {
    length: u32,
    width: u32,
}

impl FootprintSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(length: u32, width: u32) -> Self {
        Self { length, width }
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Extent of the footprint along the provided axis.
    #[must_use]
    pub const fn extent_along(&self, orientation: Orientation) -> u32 {
        match orientation {
            Orientation::Horizontal => self.length,
            Orientation::Vertical => self.width,
        }
    }

    /// Reports whether either dimension is zero.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.length == 0 || self.width == 0
    }
}

/// Axis-aligned rectangle anchored at a possibly off-board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    anchor: Position,
    size: FootprintSize,
}

impl Footprint {
    /// Constructs a footprint from its upper-left anchor and size.
    #[must_use]
    pub const fn from_anchor_and_size(anchor: Position, size: FootprintSize) -> Self {
        Self { anchor, size }
    }

    /// Single-cell footprint used for room entrances and exits.
    #[must_use]
    pub const fn single_cell(anchor: Position) -> Self {
        Self::from_anchor_and_size(anchor, FootprintSize::new(1, 1))
    }

    /// Upper-left corner of the footprint.
    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    /// Dimensions of the footprint.
    #[must_use]
    pub const fn size(&self) -> FootprintSize {
        self.size
    }

    /// Reports whether the footprint covers the provided position.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        let dx = i64::from(position.x()) - i64::from(self.anchor.x());
        let dy = i64::from(position.y()) - i64::from(self.anchor.y());
        (0..i64::from(self.size.length())).contains(&dx)
            && (0..i64::from(self.size.width())).contains(&dy)
    }
}

/// Proposed corridor rectangle evaluated before random selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementCandidate {
    turn: TurnKind,
    footprint: Footprint,
    orientation: Orientation,
}

impl PlacementCandidate {
    /// Creates a new candidate descriptor.
    #[must_use]
    pub const fn new(turn: TurnKind, footprint: Footprint, orientation: Orientation) -> Self {
        Self {
            turn,
            footprint,
            orientation,
        }
    }

    /// Turn taken relative to the cursor's orientation.
    #[must_use]
    pub const fn turn(&self) -> TurnKind {
        self.turn
    }

    /// Rectangle the corridor would occupy.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Orientation the cursor adopts once the corridor is placed.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cursor position after placement: the anchor advanced by the corridor
    /// length along the candidate's own orientation.
    #[must_use]
    pub fn exit_position(&self) -> Position {
        let extent = self.footprint.size().extent_along(self.orientation);
        self.footprint.anchor().advanced(self.orientation, extent)
    }
}

/// Notifications describing each step taken by the generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationEvent {
    /// Confirms that a room, its entrance and its exit were written.
    RoomPlaced {
        /// Size preset drawn from the room catalog.
        preset: FootprintSize,
        /// Single cell written before the room body.
        entrance: Position,
        /// Single cell written after the room body.
        exit: Position,
        /// Rectangle occupied by the room body.
        body: Footprint,
        /// Orientation the room was laid out along.
        orientation: Orientation,
    },
    /// Confirms that a corridor candidate was chosen and written.
    CorridorPlaced {
        /// Candidate that was selected.
        candidate: PlacementCandidate,
        /// Number of candidates that passed the overlap check.
        options: usize,
    },
    /// Reports that no corridor candidate passed the overlap check.
    CorridorSkipped {
        /// Cursor position at the time of the failed step.
        at: Position,
        /// Cursor orientation at the time of the failed step.
        orientation: Orientation,
    },
}

/// Behaviour applied when a corridor step finds no valid candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallPolicy {
    /// Leaves the cursor in place and still hands over to room placement.
    #[default]
    Advance,
    /// Ends the run at the stalled cursor.
    Terminate,
}

/// Tuning surface for a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of cells spanned by every corridor.
    pub corridor_length: u32,
    /// Catalog of room sizes drawn uniformly for each room.
    pub room_presets: Vec<FootprintSize>,
    /// Optional ceiling on the number of steps; `None` runs until the cursor
    /// leaves the board.
    pub max_steps: Option<u32>,
    /// Behaviour applied when a corridor step stalls.
    pub stall_policy: StallPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            corridor_length: DEFAULT_CORRIDOR_LENGTH,
            room_presets: vec![SMALL_ROOM, LARGE_ROOM],
            max_steps: Some(DEFAULT_MAX_STEPS),
            stall_policy: StallPolicy::Advance,
        }
    }
}

impl GeneratorConfig {
    /// Checks that the configuration describes a runnable generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corridor_length == 0 {
            return Err(ConfigError::ZeroCorridorLength);
        }
        if self.room_presets.is_empty() {
            return Err(ConfigError::EmptyRoomCatalog);
        }
        if let Some(preset) = self.room_presets.iter().find(|size| size.is_degenerate()) {
            return Err(ConfigError::DegenerateRoomPreset {
                length: preset.length(),
                width: preset.width(),
            });
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::ZeroStepLimit);
        }
        Ok(())
    }
}

/// Reasons a [`GeneratorConfig`] may be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Corridors must span at least one cell.
    #[error("corridor length must be positive")]
    ZeroCorridorLength,
    /// At least one room preset is required.
    #[error("room catalog must contain at least one preset")]
    EmptyRoomCatalog,
    /// Room presets must cover at least one cell.
    #[error("room preset {length}x{width} has no area")]
    DegenerateRoomPreset {
        /// Length of the offending preset.
        length: u32,
        /// Width of the offending preset.
        width: u32,
    },
    /// A step ceiling of zero would never place anything.
    #[error("step ceiling must be positive when set")]
    ZeroStepLimit,
}

/// Capability object supplying every random draw made by the generator.
///
/// Implementations must be deterministic for a fixed seed so that runs can be
/// replayed; tests may substitute scripted sources.
pub trait RandomSource {
    /// Draws an integer uniformly from `low..high`, returning `low` when the
    /// range is empty.
    fn draw_range(&mut self, low: u32, high: u32) -> u32;

    /// Draws a float uniformly from `[0, 1)`.
    fn draw_unit(&mut self) -> f64;

    /// Picks an index uniformly among `options`, or `None` when there is
    /// nothing to choose from.
    fn pick(&mut self, options: usize) -> Option<usize> {
        if options == 0 {
            return None;
        }
        let upper = u32::try_from(options).unwrap_or(u32::MAX);
        usize::try_from(self.draw_range(0, upper)).ok()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn draw_range(&mut self, low: u32, high: u32) -> u32 {
        (**self).draw_range(low, high)
    }

    fn draw_unit(&mut self) -> f64 {
        (**self).draw_unit()
    }

    fn pick(&mut self, options: usize) -> Option<usize> {
        (**self).pick(options)
    }
}
