// Connectivity model: which directions a placed wire claims.
//
// A wire segment is attached toward the block face the player clicked. The
// clicked face belongs to the neighboring block, so the attachment direction
// (from the wire's position) is that face's opposite: clicking the top of a
// floor block places a wire above it, attached `Down`.
//
// Placing onto a position that already holds a wire does not create a second
// cell. The existing cell gains one more arm and keeps its power. This is how
// a single position carries floor and wall segments at once.
//
// Nothing here checks support. `support::is_supported` must approve the
// result before the placement pipeline commits it (see `engine.rs`).

use crate::cell::WireCell;
use crate::types::Direction;
use serde::{Deserialize, Serialize};

/// Context for one placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementContext {
    /// The face of the neighboring block that was targeted.
    pub clicked_face: Direction,
}

impl PlacementContext {
    pub const fn new(clicked_face: Direction) -> Self {
        Self { clicked_face }
    }

    /// Direction from the new wire toward the block it attaches to.
    pub const fn attachment(self) -> Direction {
        self.clicked_face.opposite()
    }
}

/// Derive the cell to commit for a placement.
///
/// `existing` is the wire already at the target position, if any. Merges
/// add `attach` to its connections; otherwise a fresh unpowered cell with
/// only `attach` is returned.
pub fn place_or_merge(existing: Option<WireCell>, attach: Direction) -> WireCell {
    match existing {
        Some(cell) => WireCell::new(cell.power, cell.connections.with(attach)),
        None => WireCell::attached(attach),
    }
}
