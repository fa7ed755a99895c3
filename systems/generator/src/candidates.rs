//! Corridor candidate enumeration and overlap filtering.

use hulkgen_core::{
    Footprint, FootprintSize, Orientation, PlacementCandidate, Position, TurnKind,
};
use hulkgen_world::Grid;
use log::trace;

/// Enumerates the straight, left and right corridor candidates for a cursor
/// at `origin` facing `orientation`, in that order.
#[must_use]
pub fn enumerate(
    origin: Position,
    orientation: Orientation,
    length: u32,
) -> [PlacementCandidate; 3] {
    TurnKind::ALL.map(|turn| candidate(origin, orientation, turn, length))
}

/// Returns the candidates whose rectangles do not overlap filled cells,
/// preserving enumeration order.
#[must_use]
pub fn valid_candidates(
    grid: &Grid,
    origin: Position,
    orientation: Orientation,
    length: u32,
) -> Vec<PlacementCandidate> {
    enumerate(origin, orientation, length)
        .into_iter()
        .filter(|candidate| {
            let placeable = grid.can_place_footprint(&candidate.footprint());
            if !placeable {
                trace!(
                    "rejected {:?} corridor at {:?}",
                    candidate.turn(),
                    candidate.footprint().anchor()
                );
            }
            placeable
        })
        .collect()
}

fn candidate(
    origin: Position,
    orientation: Orientation,
    turn: TurnKind,
    length: u32,
) -> PlacementCandidate {
    let across = FootprintSize::new(length, 1);
    let down = FootprintSize::new(1, length);
    let back = 1 - i32::try_from(length).unwrap_or(i32::MAX);

    let (anchor, size, heading) = match (orientation, turn) {
        (Orientation::Horizontal, TurnKind::Straight) => {
            (origin.offset(1, 0), across, Orientation::Horizontal)
        }
        (Orientation::Horizontal, TurnKind::Right) => {
            (origin.offset(0, 1), down, Orientation::Vertical)
        }
        (Orientation::Horizontal, TurnKind::Left) => {
            (origin.offset(0, back), down, Orientation::Vertical)
        }
        (Orientation::Vertical, TurnKind::Straight) => {
            (origin.offset(0, 1), down, Orientation::Vertical)
        }
        (Orientation::Vertical, TurnKind::Right) => {
            (origin.offset(1, 0), across, Orientation::Horizontal)
        }
        (Orientation::Vertical, TurnKind::Left) => {
            (origin.offset(back, 0), across, Orientation::Horizontal)
        }
    };

    PlacementCandidate::new(turn, Footprint::from_anchor_and_size(anchor, size), heading)
}
