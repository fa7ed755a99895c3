#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic room-and-corridor layout generation system.
//!
//! The generator walks a single [`Cursor`] across the board, alternating
//! between room and corridor placements. Rooms are written without any
//! overlap check; corridors are chosen among the straight, left and right
//! candidates that pass [`Grid::can_place`]. A run ends once the cursor
//! reaches the last column or row, or earlier when the configured step
//! ceiling or stall policy says so.

pub mod candidates;
mod cursor;
mod rng;

pub use cursor::Cursor;
pub use rng::SeededRandom;

use hulkgen_core::{
    ConfigError, Footprint, GenerationEvent, GeneratorConfig, Phase, RandomSource, StallPolicy,
};
use hulkgen_world::{query, Grid, GridError};
use log::{debug, info, warn};
use thiserror::Error;

/// Reasons a [`Generator`] cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The configuration failed validation.
    #[error("invalid generator configuration")]
    Config(#[from] ConfigError),
    /// The board dimensions were rejected.
    #[error("board of {width}x{height} cells was rejected")]
    InvalidGrid {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
        /// Underlying grid failure.
        #[source]
        source: GridError,
    },
}

/// Reason a generation run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationOutcome {
    /// The cursor reached the last column or row of the board.
    Completed,
    /// The configured step ceiling was reached first.
    StepLimitReached,
    /// A corridor step found no candidate under [`StallPolicy::Terminate`].
    Stalled,
}

/// Aggregate counters describing a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GenerationStats {
    /// Rooms written, including their entrance and exit cells.
    pub rooms_placed: u32,
    /// Corridors written.
    pub corridors_placed: u32,
    /// Corridor steps that found no valid candidate.
    pub corridors_skipped: u32,
    /// Filled cells in the finished grid.
    pub filled_cells: usize,
}

/// Everything produced by a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Finished occupancy grid, ready for presentation.
    pub grid: Grid,
    /// Cursor state when the run stopped.
    pub cursor: Cursor,
    /// Reason the run stopped.
    pub outcome: GenerationOutcome,
    /// Number of placement steps taken.
    pub steps: u32,
    /// Ordered log of every step.
    pub events: Vec<GenerationEvent>,
    /// Aggregate counters.
    pub stats: GenerationStats,
}

/// Layout generator owning the grid and cursor for a single run.
#[derive(Clone, Debug)]
pub struct Generator {
    config: GeneratorConfig,
    grid: Grid,
    cursor: Cursor,
    steps: u32,
    events: Vec<GenerationEvent>,
    stats: GenerationStats,
}

impl Generator {
    /// Creates a generator for an empty `width` by `height` board.
    pub fn new(width: u32, height: u32, config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let grid = Grid::new(width, height).map_err(|source| GeneratorError::InvalidGrid {
            width,
            height,
            source,
        })?;
        Self::from_parts(grid, Cursor::initial(height), config)
    }

    /// Creates a generator that resumes from an existing grid and cursor.
    pub fn from_parts(
        grid: Grid,
        cursor: Cursor,
        config: GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            config,
            grid,
            cursor,
            steps: 0,
            events: Vec::new(),
            stats: GenerationStats::default(),
        })
    }

    /// Grid in its current state.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cursor in its current state.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[GenerationEvent] {
        &self.events
    }

    /// Reports whether the cursor has reached the board's last column or row.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        let (width, height) = self.grid.dimensions();
        self.cursor.reached_board_edge(width, height)
    }

    /// Performs exactly one placement step and returns its event.
    ///
    /// The terminal predicate is not checked here; [`Generator::run`] does
    /// that before every step.
    pub fn step<R>(&mut self, rng: &mut R) -> GenerationEvent
    where
        R: RandomSource + ?Sized,
    {
        let event = match self.cursor.phase() {
            Phase::AwaitingCorridor => self.place_room(rng),
            Phase::AwaitingRoom => self.place_corridor(rng),
        };
        self.steps = self.steps.saturating_add(1);
        debug!("step {}: {:?}", self.steps, event);
        self.events.push(event.clone());
        event
    }

    /// Steps until the cursor leaves the board, the step ceiling is hit, or a
    /// stall ends the run under [`StallPolicy::Terminate`].
    pub fn run<R>(mut self, rng: &mut R) -> GenerationReport
    where
        R: RandomSource + ?Sized,
    {
        let outcome = loop {
            if self.is_finished() {
                break GenerationOutcome::Completed;
            }
            if let Some(limit) = self.config.max_steps {
                if self.steps >= limit {
                    warn!("step ceiling of {limit} reached before the cursor left the board");
                    break GenerationOutcome::StepLimitReached;
                }
            }

            let event = self.step(rng);
            if matches!(event, GenerationEvent::CorridorSkipped { .. })
                && self.config.stall_policy == StallPolicy::Terminate
            {
                break GenerationOutcome::Stalled;
            }
        };

        self.stats.filled_cells = query::filled_count(&self.grid);
        info!(
            "generation finished ({:?}) after {} steps: {} rooms, {} corridors, {} skipped, {} filled cells",
            outcome,
            self.steps,
            self.stats.rooms_placed,
            self.stats.corridors_placed,
            self.stats.corridors_skipped,
            self.stats.filled_cells
        );

        GenerationReport {
            grid: self.grid,
            cursor: self.cursor,
            outcome,
            steps: self.steps,
            events: self.events,
            stats: self.stats,
        }
    }

    fn place_room<R>(&mut self, rng: &mut R) -> GenerationEvent
    where
        R: RandomSource + ?Sized,
    {
        let presets = &self.config.room_presets;
        // The catalog is non-empty once the config has been validated.
        let last = presets.len().saturating_sub(1);
        let index = rng.pick(presets.len()).map_or(0, |index| index.min(last));
        let preset = presets[index];

        let origin = self.cursor.position();
        let orientation = self.cursor.orientation();
        let extent = preset.extent_along(orientation);
        let exit = origin.advanced(orientation, extent.saturating_add(1));
        let body = Footprint::from_anchor_and_size(origin.advanced(orientation, 1), preset);

        // Rooms are written unconditionally, even over existing cells.
        self.grid.fill_footprint(&Footprint::single_cell(origin));
        self.grid.fill_footprint(&Footprint::single_cell(exit));
        self.grid.fill_footprint(&body);

        self.cursor
            .move_to(origin.advanced(orientation, extent.saturating_add(2)), orientation);
        self.cursor.hand_over();
        self.stats.rooms_placed = self.stats.rooms_placed.saturating_add(1);

        GenerationEvent::RoomPlaced {
            preset,
            entrance: origin,
            exit,
            body,
            orientation,
        }
    }

    fn place_corridor<R>(&mut self, rng: &mut R) -> GenerationEvent
    where
        R: RandomSource + ?Sized,
    {
        let origin = self.cursor.position();
        let orientation = self.cursor.orientation();
        let valid = candidates::valid_candidates(
            &self.grid,
            origin,
            orientation,
            self.config.corridor_length,
        );

        let Some(candidate) = rng
            .pick(valid.len())
            .and_then(|index| valid.get(index).copied())
        else {
            warn!("no corridor fits at {origin:?} facing {orientation:?}");
            self.stats.corridors_skipped = self.stats.corridors_skipped.saturating_add(1);
            if self.config.stall_policy == StallPolicy::Advance {
                self.cursor.hand_over();
            }
            return GenerationEvent::CorridorSkipped {
                at: origin,
                orientation,
            };
        };

        self.grid.fill_footprint(&candidate.footprint());
        self.cursor
            .move_to(candidate.exit_position(), candidate.orientation());
        self.cursor.hand_over();
        self.stats.corridors_placed = self.stats.corridors_placed.saturating_add(1);

        GenerationEvent::CorridorPlaced {
            candidate,
            options: valid.len(),
        }
    }
}
