// Test bench for whole-grid wire scenarios.
//
// Wraps a real `RedstoneSim` and drives it only through `WireCommand`s, the
// same path any host uses. Everything happens on a single layer: a solid
// floor at y=0 and wires, sources, and diodes at y=1, addressed by `(x, z)`.
//
// Shape helpers return the `(x, z)` cells of common layouts (lines, rings,
// T-junctions) and of seeded random connected shapes, so scenario tests can
// assert properties over many layouts without hand-writing each one.
//
// See also: `tests/scenarios.rs` for the scenarios themselves.

use refined_redstone_sim::command::{BlockSpec, WireCommand};
use refined_redstone_sim::config::WireConfig;
use refined_redstone_sim::event::WireEvent;
use refined_redstone_sim::grid::GridAccess;
use refined_redstone_sim::network::discover_network;
use refined_redstone_sim::sim::RedstoneSim;
use refined_redstone_sim::types::{BlockPos, Direction, Power};
use std::collections::BTreeSet;

/// The layer wires live on.
pub const WIRE_Y: i32 = 1;

pub fn at(x: i32, z: i32) -> BlockPos {
    BlockPos::new(x, WIRE_Y, z)
}

/// A floor-backed world plus the events every command produced.
pub struct TestBench {
    pub sim: RedstoneSim,
    pub events: Vec<WireEvent>,
}

impl TestBench {
    /// A `size_x` by `size_z` world with a solid floor, default config.
    pub fn with_floor(size_x: u32, size_z: u32) -> Self {
        Self::with_config(WireConfig {
            world_size: (size_x, 4, size_z),
            ..WireConfig::default()
        })
    }

    /// A floor-backed world from an explicit config.
    pub fn with_config(config: WireConfig) -> Self {
        let (size_x, _, size_z) = config.world_size;
        let sim = RedstoneSim::new(config).expect("test config should be valid");
        let mut bench = Self {
            sim,
            events: Vec::new(),
        };
        let floor: Vec<_> = (0..size_x as i32)
            .flat_map(|x| (0..size_z as i32).map(move |z| (x, z)))
            .map(|(x, z)| WireCommand::SetBlock {
                pos: BlockPos::new(x, 0, z),
                block: BlockSpec::Solid,
            })
            .collect();
        bench.run(&floor);
        bench
    }

    pub fn run(&mut self, commands: &[WireCommand]) {
        let events = self.sim.apply(commands);
        self.events.extend(events);
    }

    /// Place a wire on the floor at `(x, z)`.
    pub fn wire(&mut self, x: i32, z: i32) {
        self.run(&[WireCommand::Place {
            pos: at(x, z),
            clicked_face: Direction::Up,
        }]);
    }

    pub fn wires(&mut self, cells: &[(i32, i32)]) {
        for &(x, z) in cells {
            self.wire(x, z);
        }
    }

    pub fn source(&mut self, x: i32, z: i32, level: u8) {
        self.block(
            x,
            z,
            BlockSpec::Source {
                strength: Power::new(level),
            },
        );
    }

    pub fn diode(&mut self, x: i32, z: i32, facing: Direction) {
        self.block(x, z, BlockSpec::Diode { facing });
    }

    pub fn block(&mut self, x: i32, z: i32, block: BlockSpec) {
        self.run(&[WireCommand::SetBlock {
            pos: at(x, z),
            block,
        }]);
    }

    /// Break whatever is on the wire layer at `(x, z)`.
    pub fn remove(&mut self, x: i32, z: i32) {
        self.run(&[WireCommand::Remove { pos: at(x, z) }]);
    }

    /// Break the floor block under `(x, z)`.
    pub fn remove_floor(&mut self, x: i32, z: i32) {
        self.run(&[WireCommand::Remove {
            pos: BlockPos::new(x, 0, z),
        }]);
    }

    /// Power of the wire at `(x, z)`, or `None` if there is no wire.
    pub fn power(&self, x: i32, z: i32) -> Option<u8> {
        self.sim.world.wire(at(x, z)).map(|cell| cell.power.get())
    }

    /// Distinct power levels held by the network containing `(x, z)`.
    pub fn network_levels(&self, x: i32, z: i32) -> BTreeSet<u8> {
        let network = discover_network(at(x, z), &self.sim.world);
        network
            .members()
            .iter()
            .filter_map(|&pos| self.sim.world.wire(pos))
            .map(|cell| cell.power.get())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// `len` cells running east from `(x, z)`.
pub fn line(x: i32, z: i32, len: i32) -> Vec<(i32, i32)> {
    (0..len).map(|i| (x + i, z)).collect()
}

/// The 2x2 ring with its north-west corner at `(x, z)`.
pub fn ring(x: i32, z: i32) -> Vec<(i32, i32)> {
    vec![(x, z), (x + 1, z), (x + 1, z + 1), (x, z + 1)]
}

/// A bar of `arm * 2 + 1` cells running east from `(x, z)`, with a stem of
/// `arm` cells hanging south from its middle.
pub fn t_junction(x: i32, z: i32, arm: i32) -> Vec<(i32, i32)> {
    let mut cells = line(x, z, arm * 2 + 1);
    cells.extend((1..=arm).map(|i| (x + arm, z + i)));
    cells
}

/// A connected shape of up to `cells` positions grown by random walk from
/// `(x, z)`, kept inside `[1, size_x - 1) x [1, size_z - 1)` so the border
/// stays free for sources.
pub fn random_shape(
    rng: &mut fastrand::Rng,
    (x, z): (i32, i32),
    cells: usize,
    (size_x, size_z): (i32, i32),
) -> Vec<(i32, i32)> {
    let mut shape = vec![(x, z)];
    let mut seen: BTreeSet<(i32, i32)> = shape.iter().copied().collect();
    let mut attempts = 0;
    while shape.len() < cells && attempts < cells * 20 {
        attempts += 1;
        let (bx, bz) = shape[rng.usize(..shape.len())];
        let (dx, dz) = match rng.u8(..4) {
            0 => (1, 0),
            1 => (-1, 0),
            2 => (0, 1),
            _ => (0, -1),
        };
        let next = (bx + dx, bz + dz);
        let inside = next.0 >= 1 && next.0 < size_x - 1 && next.1 >= 1 && next.1 < size_z - 1;
        if inside && seen.insert(next) {
            shape.push(next);
        }
    }
    log::debug!("random shape of {} cells after {attempts} attempts", shape.len());
    shape
}
