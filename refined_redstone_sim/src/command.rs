// Commands that mutate the reference host.
//
// All external mutations to a `RedstoneSim` go through `WireCommand`. A host
// (test harness, replay file, editor) builds a list of commands and hands it
// to `RedstoneSim::apply`, which runs them in order and returns the engine
// events they produced. Commands are plain serde data, so a command list is
// also a replayable script.
//
// - `Place`: a player places a wire by clicking `clicked_face` of the block
//   the wire will rest on.
// - `Remove`: the host breaks the wire at `pos`.
// - `SetBlock`: replace whatever is at `pos` with a non-wire block (or air).
// - `Notify`: deliver a raw neighbor-change notification to the wire at
//   `pos`, as if `from` had changed.
//
// See also: `sim.rs` for how each command is dispatched to the engine.

use crate::types::{BlockPos, Direction, Power};
use crate::world::Occupant;
use serde::{Deserialize, Serialize};

/// A host-issued mutation of the reference grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireCommand {
    Place {
        pos: BlockPos,
        clicked_face: Direction,
    },
    Remove {
        pos: BlockPos,
    },
    SetBlock {
        pos: BlockPos,
        block: BlockSpec,
    },
    Notify {
        pos: BlockPos,
        from: BlockPos,
    },
}

/// A non-wire block a `SetBlock` command can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSpec {
    Air,
    Solid,
    Source { strength: Power },
    Diode { facing: Direction },
}

impl BlockSpec {
    /// The occupant this spec places. Diodes start unpowered.
    pub fn occupant(self) -> Occupant {
        match self {
            BlockSpec::Air => Occupant::Air,
            BlockSpec::Solid => Occupant::Solid,
            BlockSpec::Source { strength } => Occupant::Source { strength },
            BlockSpec::Diode { facing } => Occupant::diode(facing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_parses_from_json() {
        let json = r#"[
            { "Place": { "pos": { "x": 1, "y": 1, "z": 1 }, "clicked_face": "Up" } },
            { "SetBlock": { "pos": { "x": 0, "y": 1, "z": 1 },
                            "block": { "Source": { "strength": 15 } } } },
            { "Remove": { "pos": { "x": 1, "y": 1, "z": 1 } } }
        ]"#;
        let commands: Vec<WireCommand> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[1],
            WireCommand::SetBlock {
                pos: BlockPos::new(0, 1, 1),
                block: BlockSpec::Source {
                    strength: Power::MAX
                },
            }
        );
    }

    #[test]
    fn diode_spec_starts_unpowered() {
        let occupant = BlockSpec::Diode {
            facing: Direction::South,
        }
        .occupant();
        assert_eq!(occupant, Occupant::diode(Direction::South));
    }
}
