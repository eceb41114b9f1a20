// Data-driven configuration for the wire engine and its reference host.
//
// All tunable parameters live in `WireConfig`, loaded from JSON. The engine
// reads the cascade limit from here instead of hard-coding it, and
// `RedstoneSim` reads the grid size.
//
// `from_json` parses and then validates; `validate` can be called on a
// hand-built config too. Missing fields fall back to `Default`.
//
// See also: `engine.rs` (`max_cascade_depth`), `sim.rs` (`world_size`).

use crate::world::{MAX_CELLS, cell_count};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong loading a `WireConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max_cascade_depth must be at least 1")]
    ZeroCascadeDepth,
    #[error("world_size {0:?} has a zero dimension")]
    EmptyWorld((u32, u32, u32)),
    #[error("world_size {0:?} exceeds {MAX_CELLS} cells")]
    WorldTooLarge((u32, u32, u32)),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireConfig {
    /// Dimensions `(x, y, z)` of the reference `GridWorld`.
    pub world_size: (u32, u32, u32),

    /// Deepest chain of synchronous neighbor notifications one entry-point
    /// call may run. Dispatches past this depth are dropped and logged.
    pub max_cascade_depth: u32,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            world_size: (64, 32, 64),
            max_cascade_depth: 512,
        }
    }
}

impl WireConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WireConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cascade_depth == 0 {
            return Err(ConfigError::ZeroCascadeDepth);
        }
        let (x, y, z) = self.world_size;
        if x == 0 || y == 0 || z == 0 {
            return Err(ConfigError::EmptyWorld(self.world_size));
        }
        if cell_count(self.world_size).is_none() {
            return Err(ConfigError::WorldTooLarge(self.world_size));
        }
        Ok(())
    }
}
