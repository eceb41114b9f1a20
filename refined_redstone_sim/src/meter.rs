// Power meter: a debugging probe for any grid position.
//
// `looking` is the direction the viewer is looking in, so the viewer stands
// on the `looking.opposite()` side of `pos`. A wire reports its committed
// power and its attachment arms. Any other occupant reports the signal it
// emits out of the face turned toward the viewer.

use crate::grid::GridAccess;
use crate::types::{BlockPos, Connections, Direction, Power};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeterReading {
    Wire {
        intensity: Power,
        connections: Connections,
    },
    Signal {
        intensity: Power,
    },
}

impl MeterReading {
    pub fn intensity(&self) -> Power {
        match self {
            MeterReading::Wire { intensity, .. } | MeterReading::Signal { intensity } => {
                *intensity
            }
        }
    }
}

impl fmt::Display for MeterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterReading::Wire {
                intensity,
                connections,
            } => {
                write!(f, "Intensity: {intensity}   Connections:")?;
                for dir in connections.directions() {
                    write!(f, " {dir}")?;
                }
                Ok(())
            }
            MeterReading::Signal { intensity } => write!(f, "Intensity: {intensity}"),
        }
    }
}

/// Probe `pos` as seen by a viewer looking in direction `looking`.
pub fn read<G: GridAccess + ?Sized>(grid: &G, pos: BlockPos, looking: Direction) -> MeterReading {
    match grid.wire(pos) {
        Some(cell) => MeterReading::Wire {
            intensity: cell.power,
            connections: cell.connections,
        },
        None => MeterReading::Signal {
            intensity: grid.signal_toward(pos, looking.opposite()),
        },
    }
}
