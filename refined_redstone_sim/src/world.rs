// Dense 3D block grid: the reference host for the wire engine.
//
// The world is stored as a flat `Vec<Occupant>` indexed by
// `x + z * size_x + y * size_x * size_z`, giving O(1) read/write access.
// Out-of-bounds reads return `Air`; out-of-bounds writes are no-ops, and
// out-of-bounds positions are never vacant, so nothing can be placed there.
//
// `Occupant` is the small block vocabulary the host understands: air, solid
// cubes, constant power sources, one-way diodes, and wire cells. Each
// implements `Conductor`, and `GridWorld` implements `GridAccess` by
// delegating to the occupant at the queried position.
//
// Diodes are the only occupants with reactive state. On a neighbor-change
// notification a diode re-reads the signal at its back face and copies it to
// its output. It reports a change only when the output moved, which is what
// lets a cascade cross from one wire network into another and then stop.
//
// Serialization goes through `SavedWorld`: the grid size plus a sorted list
// of non-air occupants. Loading is fallible: a saved size whose cell count
// overflows or exceeds `MAX_CELLS` is rejected before anything is allocated.
// The drop and notification logs are transient and start empty after load.
//
// See also: `grid.rs` for the traits implemented here, `sim.rs` which owns a
// `GridWorld` alongside the engine.

use crate::cell::WireCell;
use crate::grid::{Conductor, GridAccess};
use crate::types::{BlockPos, Direction, Power};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest grid a `GridWorld` will allocate, in cells.
pub const MAX_CELLS: usize = 1 << 24;

/// Number of cells in a grid of `size`, or `None` if that exceeds
/// `MAX_CELLS`.
pub fn cell_count((x, y, z): (u32, u32, u32)) -> Option<usize> {
    (x as usize)
        .checked_mul(y as usize)?
        .checked_mul(z as usize)
        .filter(|&total| total <= MAX_CELLS)
}

/// A requested grid size has too many cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("world size {0:?} exceeds {MAX_CELLS} cells")]
pub struct WorldTooLarge(pub (u32, u32, u32));

/// A one-way signal component. Reads at its back, emits at its front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diode {
    /// The face output leaves through. Input arrives on `facing.opposite()`.
    pub facing: Direction,
    pub input: Power,
    pub output: Power,
}

/// What fills a single grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Air,
    /// A full cube. Wires attach to any face; it emits nothing.
    Solid,
    /// A full cube emitting a constant signal out of every face.
    Source { strength: Power },
    Diode(Diode),
    Wire(WireCell),
}

impl Occupant {
    /// An unpowered diode pointing `facing`.
    pub const fn diode(facing: Direction) -> Self {
        Occupant::Diode(Diode {
            facing,
            input: Power::ZERO,
            output: Power::ZERO,
        })
    }

    pub const fn is_air(&self) -> bool {
        matches!(self, Occupant::Air)
    }
}

impl Conductor for Occupant {
    fn offers_attachment(&self, face: Direction) -> bool {
        match self {
            Occupant::Solid | Occupant::Source { .. } => true,
            Occupant::Wire(cell) => cell.offers_attachment(face),
            Occupant::Air | Occupant::Diode(_) => false,
        }
    }

    fn signal_toward(&self, face: Direction) -> Power {
        match self {
            Occupant::Source { strength } => *strength,
            Occupant::Diode(diode) if diode.facing == face => diode.output,
            Occupant::Wire(cell) => cell.signal_toward(face),
            Occupant::Air | Occupant::Solid | Occupant::Diode(_) => Power::ZERO,
        }
    }

    fn joins_wire_network(&self) -> bool {
        matches!(self, Occupant::Wire(_))
    }
}

/// Dense 3D block grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "SavedWorld", try_from = "SavedWorld")]
pub struct GridWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    occupants: Vec<Occupant>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    /// Wire items dropped by the engine, oldest first.
    drops: Vec<(BlockPos, WireCell)>,
    /// `(listener, changed_neighbor)` pairs delivered to non-wire occupants.
    notifications: Vec<(BlockPos, BlockPos)>,
}

/// On-disk form of a `GridWorld`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SavedWorld {
    size: (u32, u32, u32),
    occupied: Vec<(BlockPos, Occupant)>,
}

impl From<GridWorld> for SavedWorld {
    fn from(world: GridWorld) -> Self {
        Self {
            size: (world.size_x, world.size_y, world.size_z),
            occupied: world.occupied().collect(),
        }
    }
}

impl TryFrom<SavedWorld> for GridWorld {
    type Error = WorldTooLarge;

    fn try_from(saved: SavedWorld) -> Result<Self, Self::Error> {
        let (sx, sy, sz) = saved.size;
        let mut world = GridWorld::try_new(sx, sy, sz)?;
        for (pos, occupant) in saved.occupied {
            world.set(pos, occupant);
        }
        Ok(world)
    }
}

impl GridWorld {
    /// Create a new world filled with `Air`.
    ///
    /// # Panics
    ///
    /// Panics if the grid would exceed `MAX_CELLS`. Use `try_new` for sizes
    /// that come from outside the program.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        match Self::try_new(size_x, size_y, size_z) {
            Ok(world) => world,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create a new world filled with `Air`, refusing oversized grids.
    pub fn try_new(size_x: u32, size_y: u32, size_z: u32) -> Result<Self, WorldTooLarge> {
        let size = (size_x, size_y, size_z);
        let total = cell_count(size).ok_or(WorldTooLarge(size))?;
        Ok(Self {
            occupants: vec![Occupant::Air; total],
            size_x,
            size_y,
            size_z,
            drops: Vec::new(),
            notifications: Vec::new(),
        })
    }

    pub fn size(&self) -> (u32, u32, u32) {
        (self.size_x, self.size_y, self.size_z)
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, pos: BlockPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.size_x
            && (pos.y as u32) < self.size_y
            && (pos.z as u32) < self.size_z
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, pos: BlockPos) -> Option<usize> {
        if self.in_bounds(pos) {
            let x = pos.x as usize;
            let y = pos.y as usize;
            let z = pos.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    fn position_of(&self, index: usize) -> BlockPos {
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        let x = index % sx;
        let z = (index / sx) % sz;
        let y = index / (sx * sz);
        BlockPos::new(x as i32, y as i32, z as i32)
    }

    /// Read an occupant. Returns `Air` for out-of-bounds coordinates.
    pub fn get(&self, pos: BlockPos) -> Occupant {
        self.index(pos)
            .map(|i| self.occupants[i])
            .unwrap_or(Occupant::Air)
    }

    /// Write an occupant. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, pos: BlockPos, occupant: Occupant) {
        if let Some(i) = self.index(pos) {
            self.occupants[i] = occupant;
        }
    }

    /// All non-air positions in flat-index order (x inner, z mid, y outer).
    pub fn occupied(&self) -> impl Iterator<Item = (BlockPos, Occupant)> + '_ {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, occupant)| !occupant.is_air())
            .map(|(i, &occupant)| (self.position_of(i), occupant))
    }

    /// Signal arriving at `pos` from its neighbor in `dir`: what that
    /// neighbor emits out of the face touching `pos`.
    pub fn incoming_signal(&self, pos: BlockPos, dir: Direction) -> Power {
        self.get(pos.offset(dir)).signal_toward(dir.opposite())
    }

    /// Re-evaluate a reactive occupant against its current neighbors.
    /// Returns `true` if its output changed.
    pub fn refresh(&mut self, pos: BlockPos) -> bool {
        let Occupant::Diode(diode) = self.get(pos) else {
            return false;
        };
        let input = self.incoming_signal(pos, diode.facing.opposite());
        let updated = Diode {
            input,
            output: input,
            ..diode
        };
        self.set(pos, Occupant::Diode(updated));
        updated.output != diode.output
    }

    /// Drain the log of dropped wire items.
    pub fn take_drops(&mut self) -> Vec<(BlockPos, WireCell)> {
        std::mem::take(&mut self.drops)
    }

    /// Drain the log of notifications delivered to non-wire occupants.
    pub fn take_notifications(&mut self) -> Vec<(BlockPos, BlockPos)> {
        std::mem::take(&mut self.notifications)
    }
}

impl GridAccess for GridWorld {
    fn wire(&self, pos: BlockPos) -> Option<WireCell> {
        match self.get(pos) {
            Occupant::Wire(cell) => Some(cell),
            _ => None,
        }
    }

    fn set_wire(&mut self, pos: BlockPos, cell: WireCell) {
        self.set(pos, Occupant::Wire(cell));
    }

    fn remove_wire(&mut self, pos: BlockPos) -> Option<WireCell> {
        let cell = self.wire(pos)?;
        self.set(pos, Occupant::Air);
        Some(cell)
    }

    fn is_vacant(&self, pos: BlockPos) -> bool {
        self.in_bounds(pos) && self.get(pos).is_air()
    }

    fn joins_wire_network(&self, pos: BlockPos) -> bool {
        self.get(pos).joins_wire_network()
    }

    fn offers_attachment(&self, pos: BlockPos, face: Direction) -> bool {
        self.get(pos).offers_attachment(face)
    }

    fn signal_toward(&self, pos: BlockPos, face: Direction) -> Power {
        self.get(pos).signal_toward(face)
    }

    fn neighbor_changed(&mut self, pos: BlockPos, from: BlockPos) -> bool {
        self.notifications.push((pos, from));
        self.refresh(pos)
    }

    fn drop_item(&mut self, pos: BlockPos, cell: WireCell) {
        self.drops.push((pos, cell));
    }
}
