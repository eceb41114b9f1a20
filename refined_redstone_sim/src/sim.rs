// Top-level reference host: a grid plus the engine that keeps its wires
// powered.
//
// `RedstoneSim` owns a `GridWorld`, a `WireEngine`, and the `WireConfig` both
// were built from. Everything outside the crate drives it through
// `apply(&[WireCommand])`, which runs each command through the matching
// engine entry point and returns the events they produced, oldest first.
//
// Command handling:
// - `Place` goes to `WireEngine::on_placed`. Rejections surface as
//   `PlacementRejected` events; the grid is untouched.
// - `Remove` breaks whatever is at `pos`. A wire goes through `on_removed`;
//   any other block becomes air and its neighbors are told.
// - `SetBlock` clears a wire first if there is one, writes the new block,
//   lets it read its surroundings (`GridWorld::refresh`), then tells its
//   neighbors.
// - `Notify` delivers a raw neighbor change: to the engine for a wire, to the
//   world otherwise.
//
// ## Serialization
//
// Only `config` and `world` are saved. The engine holds no grid state, so it
// is `#[serde(skip)]` and rebuilt from the config after load (its stats and
// event log start fresh). `to_json()` / `from_json()` wrap the full cycle.
// A load fails if the saved grid is oversized or disagrees with the saved
// config's `world_size`.
//
// See also: `command.rs` for `WireCommand`, `engine.rs` for the entry
// points, `world.rs` for the grid, `config.rs` for `WireConfig`.

use crate::command::WireCommand;
use crate::config::{ConfigError, WireConfig};
use crate::engine::WireEngine;
use crate::event::WireEvent;
use crate::grid::GridAccess;
use crate::meter::{self, MeterReading};
use crate::placement::PlacementContext;
use crate::types::{BlockPos, Direction};
use crate::world::{GridWorld, Occupant};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure saving or loading a `RedstoneSim`.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved config is invalid: {0}")]
    Config(#[from] ConfigError),
    #[error("saved world is {world:?} but the config says {config:?}")]
    SizeMismatch {
        config: (u32, u32, u32),
        world: (u32, u32, u32),
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RedstoneSim {
    pub config: WireConfig,
    pub world: GridWorld,

    /// Rebuilt from `config` after load.
    #[serde(skip)]
    pub engine: WireEngine,
}

impl RedstoneSim {
    /// Create an empty world of `config.world_size`.
    pub fn new(config: WireConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (sx, sy, sz) = config.world_size;
        Ok(Self {
            world: GridWorld::new(sx, sy, sz),
            engine: WireEngine::new(&config),
            config,
        })
    }

    /// Run `commands` in order and return the events they produced.
    ///
    /// The world's notification log is cleared afterwards; it only means
    /// something to callers driving the engine directly.
    pub fn apply(&mut self, commands: &[WireCommand]) -> Vec<WireEvent> {
        for command in commands {
            self.apply_command(command);
        }
        self.world.take_notifications();
        self.engine.drain_events()
    }

    fn apply_command(&mut self, command: &WireCommand) {
        match *command {
            WireCommand::Place { pos, clicked_face } => {
                self.engine
                    .on_placed(&mut self.world, pos, PlacementContext::new(clicked_face));
            }
            WireCommand::Remove { pos } => {
                if self.world.wire(pos).is_some() {
                    self.engine.on_removed(&mut self.world, pos);
                } else if !self.world.get(pos).is_air() {
                    self.world.set(pos, Occupant::Air);
                    self.engine.on_block_changed(&mut self.world, pos);
                }
            }
            WireCommand::SetBlock { pos, block } => {
                if !self.world.in_bounds(pos) {
                    log::debug!("ignoring SetBlock outside the world at {pos}");
                    return;
                }
                if self.world.wire(pos).is_some() {
                    self.engine.on_removed(&mut self.world, pos);
                }
                self.world.set(pos, block.occupant());
                self.world.refresh(pos);
                self.engine.on_block_changed(&mut self.world, pos);
            }
            WireCommand::Notify { pos, from } => {
                if self.world.wire(pos).is_some() {
                    self.engine.on_neighbor_changed(&mut self.world, pos, from);
                } else if self.world.neighbor_changed(pos, from) {
                    self.engine.on_block_changed(&mut self.world, pos);
                }
            }
        }
    }

    /// Probe `pos` with the power meter.
    pub fn meter(&self, pos: BlockPos, looking: Direction) -> MeterReading {
        meter::read(&self.world, pos, looking)
    }

    /// Serialize the simulation to a JSON string.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a simulation from JSON and rebuild the engine.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let mut sim: RedstoneSim = serde_json::from_str(json)?;
        sim.config.validate()?;
        if sim.world.size() != sim.config.world_size {
            return Err(SaveError::SizeMismatch {
                config: sim.config.world_size,
                world: sim.world.size(),
            });
        }
        sim.engine = WireEngine::new(&sim.config);
        Ok(sim)
    }
}
