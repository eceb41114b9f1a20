// Wire cell state and its persisted form.
//
// A `WireCell` is everything the engine stores per occupied grid position:
// a power level and the set of directions the segment is attached toward.
// The position itself is owned by the grid, not the cell.
//
// Persisted form is exactly 10 bits packed into a `u16`:
//   bits 0..4   power (0-15)
//   bits 4..10  connections, one bit per direction in `Direction::ALL` order
//   bits 10..16 reserved, must be zero
// Serde goes through this packed form, so a saved cell is a single integer.
//
// The output queries (`strong_power`, `weak_power_toward`) answer what the
// cell offers when its network is power-providing. Suppression during an
// update is applied one level up, in `signal.rs`.
//
// See also: `placement.rs` for how connections are chosen, `support.rs` for
// the attachment check, `engine.rs` which is the only writer of `power`.

use crate::types::{Connections, Direction, Power};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One wire segment's state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub struct WireCell {
    pub power: Power,
    pub connections: Connections,
}

/// A packed cell value had reserved bits set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("packed wire cell {bits:#06x} has reserved bits set")]
pub struct CellDecodeError {
    pub bits: u16,
}

impl WireCell {
    const POWER_BITS: u16 = 4;
    const RESERVED_MASK: u16 = !0u16 << 10;

    pub const fn new(power: Power, connections: Connections) -> Self {
        Self { power, connections }
    }

    /// An unpowered cell attached in exactly one direction.
    pub const fn attached(dir: Direction) -> Self {
        Self::new(Power::ZERO, Connections::only(dir))
    }

    pub const fn is_connected(&self, dir: Direction) -> bool {
        self.connections.contains(dir)
    }

    /// Omnidirectional output: the cell's power.
    pub const fn strong_power(&self) -> Power {
        self.power
    }

    /// Directional output: the cell's power toward connected directions only.
    pub const fn weak_power_toward(&self, dir: Direction) -> Power {
        if self.connections.contains(dir) {
            self.power
        } else {
            Power::ZERO
        }
    }

    pub const fn to_bits(self) -> u16 {
        (self.power.get() as u16) | ((self.connections.bits() as u16) << Self::POWER_BITS)
    }

    pub fn from_bits(bits: u16) -> Result<Self, CellDecodeError> {
        if bits & Self::RESERVED_MASK != 0 {
            return Err(CellDecodeError { bits });
        }
        let power = Power::new((bits & 0xF) as u8);
        let connections = Connections::from_bits((bits >> Self::POWER_BITS) as u8)
            .ok_or(CellDecodeError { bits })?;
        Ok(Self { power, connections })
    }
}

impl From<WireCell> for u16 {
    fn from(cell: WireCell) -> Self {
        cell.to_bits()
    }
}

impl TryFrom<u16> for WireCell {
    type Error = CellDecodeError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        WireCell::from_bits(bits)
    }
}
