// The seam between the wire engine and whatever grid hosts it.
//
// The engine owns no world state. Every operation borrows a `GridAccess`
// implementation for the duration of the call, reads and writes wire cells
// through it, and hands non-wire concerns (neighbor reactions, item drops)
// back to it.
//
// `Conductor` is the capability interface every grid occupant exposes to
// the engine: can a wire attach to this face, what signal leaves this face,
// and does this occupant merge into wire networks. The host's `GridAccess`
// impl answers position-level queries by delegating to the occupant there.
//
// See also: `world.rs` for the reference implementation (`GridWorld`),
// `engine.rs` for the caller side of every method here.

use crate::cell::WireCell;
use crate::types::{BlockPos, Direction, Power};

/// What an occupant of a single grid position offers its neighbors.
pub trait Conductor {
    /// Whether a wire on the neighboring side can attach to `face` of this
    /// occupant. `face` is the side of this occupant touching the wire.
    fn offers_attachment(&self, face: Direction) -> bool;

    /// Signal strength this occupant emits out of `face`.
    fn signal_toward(&self, face: Direction) -> Power;

    /// Whether this occupant is a wire cell that joins flood-filled networks.
    fn joins_wire_network(&self) -> bool {
        false
    }
}

impl Conductor for WireCell {
    fn offers_attachment(&self, _face: Direction) -> bool {
        false
    }

    fn signal_toward(&self, _face: Direction) -> Power {
        self.strong_power()
    }

    fn joins_wire_network(&self) -> bool {
        true
    }
}

/// Host grid as seen by the wire engine.
///
/// Wire cells are read and written directly. Everything else is reached
/// through occupant-level queries, so the engine never needs to know what
/// kinds of blocks the host has.
pub trait GridAccess {
    /// The wire cell at `pos`, if that position holds one.
    fn wire(&self, pos: BlockPos) -> Option<WireCell>;

    /// Store `cell` at `pos`, replacing whatever wire state was there.
    fn set_wire(&mut self, pos: BlockPos, cell: WireCell);

    /// Remove the wire at `pos`, leaving the position empty. Returns the
    /// removed cell, or `None` if there was no wire.
    fn remove_wire(&mut self, pos: BlockPos) -> Option<WireCell>;

    /// Whether `pos` is empty and could receive a new wire cell.
    fn is_vacant(&self, pos: BlockPos) -> bool;

    /// Whether the occupant at `pos` merges into flood-filled wire networks.
    /// Must agree with `wire`: an occupant that joins is a wire cell.
    fn joins_wire_network(&self, pos: BlockPos) -> bool;

    /// Whether the occupant at `pos` offers an attachment surface on `face`.
    fn offers_attachment(&self, pos: BlockPos, face: Direction) -> bool;

    /// Signal the non-wire occupant at `pos` emits out of `face`. Wire
    /// positions are answered by the engine itself and never asked here.
    fn signal_toward(&self, pos: BlockPos, face: Direction) -> Power;

    /// A non-wire occupant at `pos` is told that its neighbor at `from`
    /// changed state. Returns `true` if the occupant's own output changed,
    /// in which case the engine continues the cascade from `pos`.
    fn neighbor_changed(&mut self, pos: BlockPos, from: BlockPos) -> bool;

    /// A wire cell at `pos` lost its support and was removed; the host
    /// spawns the corresponding item.
    fn drop_item(&mut self, pos: BlockPos, cell: WireCell);
}

/// The wire cell at `pos`, for callers whose contract guarantees one.
///
/// # Panics
///
/// Panics if `pos` holds no wire: the host's grid has diverged from what the
/// engine last committed there.
pub fn expect_wire<G: GridAccess + ?Sized>(grid: &G, pos: BlockPos) -> WireCell {
    match grid.wire(pos) {
        Some(cell) => cell,
        None => panic!("expected a wire cell at {pos}, found none"),
    }
}
