// Narrative events emitted by the wire engine.
//
// The engine records what it did (placements, removals, drops, network
// repowers, truncated cascades) as `WireEvent`s in an `EventLog`. The host
// drains the log after each entry-point call to drive UI, sound, or
// debugging overlays. Events are output only; nothing in the engine reads
// them back.
//
// Each event carries a monotonic `sequence` number so hosts that merge logs
// from several calls still get a total order.
//
// See also: `engine.rs` for where each event kind is emitted, `sim.rs`
// which returns drained events from `RedstoneSim::apply`.

use crate::types::{BlockPos, Connections, Power};
use serde::{Deserialize, Serialize};

/// Why a placement was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The target holds a non-wire occupant.
    Occupied,
    /// At least one arm of the resulting cell would have nothing to rest on.
    Unsupported,
}

/// A narrative event from the wire engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    pub sequence: u64,
    pub kind: WireEventKind,
}

/// Types of engine events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireEventKind {
    /// A new wire cell was committed.
    Placed { pos: BlockPos, connections: Connections },
    /// An existing wire cell gained an arm.
    Merged { pos: BlockPos, connections: Connections },
    /// A placement was refused; the grid is unchanged.
    PlacementRejected { pos: BlockPos, reason: RejectReason },
    /// The host removed a wire cell.
    Removed { pos: BlockPos },
    /// A wire cell lost its support and was dropped as an item.
    Dropped { pos: BlockPos },
    /// A network update changed the power of at least one member.
    NetworkRepowered {
        seed: BlockPos,
        members: usize,
        changed: usize,
        power: Power,
    },
    /// A cascade dispatch was dropped at the depth limit.
    CascadeTruncated { target: BlockPos, depth: u32 },
}

/// Append-only event buffer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<WireEvent>,
    /// Monotonic counter, never reset by `drain`.
    next_sequence: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: WireEventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(WireEvent { sequence, kind });
    }

    /// Events recorded since the last drain, oldest first.
    pub fn events(&self) -> &[WireEvent] {
        &self.events
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<WireEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
