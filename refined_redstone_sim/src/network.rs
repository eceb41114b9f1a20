// Network discovery: flood fill over face-adjacent wire cells.
//
// A network is the maximal set of wire positions reachable from a seed by
// stepping across shared faces. Membership is decided by the occupant's
// `Conductor::joins_wire_network` capability, asked through the grid.
// The per-cell `connections` flags are not consulted, so two segments that
// touch are one network even if neither is attached toward the other.
//
// Networks are never stored. Each propagation event rediscovers the network
// from its seed, so the result always reflects the grid as it is now.
//
// `Network` keeps members in BFS discovery order (seed first) for
// deterministic iteration, plus an `FxHashSet` index for O(1) membership
// tests. BFS visits each position at most once, so discovery is
// O(network size) and terminates on any finite grid.

use crate::grid::GridAccess;
use crate::types::BlockPos;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// A snapshot of one wire network's membership.
#[derive(Clone, Debug)]
pub struct Network {
    members: Vec<BlockPos>,
    index: FxHashSet<BlockPos>,
}

impl Network {
    /// The position discovery started from.
    pub fn seed(&self) -> BlockPos {
        self.members[0]
    }

    /// Members in BFS discovery order, seed first.
    pub fn members(&self) -> &[BlockPos] {
        &self.members
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: discovery includes the seed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Discover the network containing `seed`.
///
/// # Panics
///
/// Panics if `seed` holds no wire cell.
pub fn discover_network<G: GridAccess + ?Sized>(seed: BlockPos, grid: &G) -> Network {
    assert!(
        grid.wire(seed).is_some(),
        "network discovery seeded at {seed}, which holds no wire cell"
    );

    let mut members = vec![seed];
    let mut index = FxHashSet::default();
    let mut queue = VecDeque::new();
    index.insert(seed);
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        for (_, neighbor) in current.neighbors() {
            if index.contains(&neighbor) {
                continue;
            }
            if grid.joins_wire_network(neighbor) {
                index.insert(neighbor);
                members.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    Network { members, index }
}
