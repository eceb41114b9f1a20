// Core types shared across the wire engine.
//
// Defines grid coordinates (`BlockPos`), the six axis directions
// (`Direction`), signal strength (`Power`), and the per-cell connection set
// (`Connections`). All types derive `Serialize` and `Deserialize` for
// save/load and command replay.
//
// **Critical constraint: determinism.** `Direction::ALL` fixes the order in
// which neighbors are visited everywhere in the crate (discovery, signal
// aggregation, cascade dispatch). Changing it changes event order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D block grid. Each component is in block units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The face-adjacent position one step in `dir`.
    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.to_offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// All 6 face-adjacent positions, paired with the direction that leads
    /// to each, in `Direction::ALL` order.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, BlockPos)> {
        Direction::ALL.into_iter().map(move |dir| (dir, self.offset(dir)))
    }

    /// The direction from `self` to `other`, if they share a face.
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&dir| self.offset(dir) == other)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Canonical iteration order. The position in this array is also the
    /// bit index used by `Connections`.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit offset `(dx, dy, dz)` for one step in this direction.
    pub const fn to_offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Index into `Direction::ALL`.
    pub const fn index(self) -> usize {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
            Direction::North => 2,
            Direction::South => 3,
            Direction::West => 4,
            Direction::East => 5,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Down => "Down",
            Direction::Up => "Up",
            Direction::North => "North",
            Direction::South => "South",
            Direction::West => "West",
            Direction::East => "East",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Signal strength
// ---------------------------------------------------------------------------

/// A redstone signal strength in `[0, 15]`.
///
/// Construction clamps, so a `Power` can never hold an out-of-range value.
/// Deserialization does not clamp: a saved level above 15 is rejected.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Power(u8);

impl Power {
    pub const ZERO: Power = Power(0);
    pub const MAX: Power = Power(15);

    /// Clamp `level` into the valid range.
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// A raw level outside `[0, 15]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("power level {0} is above 15")]
pub struct PowerOutOfRange(pub u8);

impl TryFrom<u8> for Power {
    type Error = PowerOutOfRange;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > Self::MAX.0 {
            Err(PowerOutOfRange(level))
        } else {
            Ok(Self(level))
        }
    }
}

impl From<Power> for u8 {
    fn from(power: Power) -> Self {
        power.0
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Connection set
// ---------------------------------------------------------------------------

/// The set of directions a wire cell claims as connected, one bit per
/// direction in `Direction::ALL` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connections(u8);

impl Connections {
    pub const NONE: Connections = Connections(0);
    const MASK: u8 = 0b0011_1111;

    /// A set holding exactly `dir`.
    pub const fn only(dir: Direction) -> Self {
        Self(1 << dir.index())
    }

    /// Build from raw bits. Returns `None` if any bit above the sixth is set.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::MASK != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// This set with `dir` added.
    pub const fn with(self, dir: Direction) -> Self {
        Self(self.0 | (1 << dir.index()))
    }

    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Connected directions in `Direction::ALL` order.
    pub fn directions(self) -> SmallVec<[Direction; 6]> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.contains(dir))
            .collect()
    }
}
