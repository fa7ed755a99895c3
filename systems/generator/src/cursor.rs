//! Anchor state threaded through successive placements.

use hulkgen_core::{Orientation, Phase, Position};

/// Current anchor position, facing and phase of the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    position: Position,
    orientation: Orientation,
    phase: Phase,
}

impl Cursor {
    /// Creates a cursor with explicit field values.
    #[must_use]
    pub const fn new(position: Position, orientation: Orientation, phase: Phase) -> Self {
        Self {
            position,
            orientation,
            phase,
        }
    }

    /// Cursor every run starts from: left edge, vertically centred, facing
    /// horizontally, with a room due first.
    #[must_use]
    pub fn initial(height: u32) -> Self {
        let row = i32::try_from(height / 2).unwrap_or(i32::MAX);
        Self::new(
            Position::new(0, row),
            Orientation::Horizontal,
            Phase::AwaitingCorridor,
        )
    }

    /// Anchor for the next placement.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Axis the next placement extends along.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Kind of placement due next.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether the cursor reached the last column or last row of a
    /// `width` by `height` board.
    #[must_use]
    pub fn reached_board_edge(&self, width: u32, height: u32) -> bool {
        i64::from(self.position.x()) >= i64::from(width) - 1
            || i64::from(self.position.y()) >= i64::from(height) - 1
    }

    pub(crate) fn move_to(&mut self, position: Position, orientation: Orientation) {
        self.position = position;
        self.orientation = orientation;
    }

    pub(crate) fn hand_over(&mut self) {
        self.phase = self.phase.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_cursor_starts_mid_left_awaiting_a_room() {
        let cursor = Cursor::initial(10);
        assert_eq!(cursor.position(), Position::new(0, 5));
        assert_eq!(cursor.orientation(), Orientation::Horizontal);
        assert_eq!(cursor.phase(), Phase::AwaitingCorridor);
    }

    #[test]
    fn board_edge_checks_either_axis() {
        let inside = Cursor::new(
            Position::new(8, 8),
            Orientation::Horizontal,
            Phase::AwaitingRoom,
        );
        assert!(!inside.reached_board_edge(10, 10));

        let right_edge = Cursor::new(
            Position::new(9, 2),
            Orientation::Horizontal,
            Phase::AwaitingRoom,
        );
        assert!(right_edge.reached_board_edge(10, 10));

        let bottom_edge = Cursor::new(
            Position::new(2, 12),
            Orientation::Vertical,
            Phase::AwaitingRoom,
        );
        assert!(bottom_edge.reached_board_edge(10, 10));
    }

    #[test]
    fn hand_over_flips_phase() {
        let mut cursor = Cursor::initial(4);
        cursor.hand_over();
        assert_eq!(cursor.phase(), Phase::AwaitingRoom);
        cursor.hand_over();
        assert_eq!(cursor.phase(), Phase::AwaitingCorridor);
    }
}
