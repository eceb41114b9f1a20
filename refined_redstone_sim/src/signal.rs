// Power aggregation and wire output queries.
//
// `OutputGate` replaces the old "can provide power" flag on the block type.
// While a network is being updated, its members must not feed their own
// soon-to-be-overwritten power back into the aggregation, so the updater
// builds a `Suppressed` gate over that network and passes it down. The gate
// lives only as long as the update's read phase; every other reader uses
// `Open`.
//
// `strongest_incoming_signal` is the per-cell aggregation: the maximum over
// all six neighbors of the signal each emits out of the face touching this
// cell. Wire neighbors answer through the gate (strong power, or zero if
// suppressed); everything else is asked through `GridAccess::signal_toward`.

use crate::cell::WireCell;
use crate::grid::GridAccess;
use crate::network::Network;
use crate::types::{BlockPos, Direction, Power};

/// Whether wire cells currently provide power, per network.
#[derive(Clone, Copy, Debug)]
pub enum OutputGate<'a> {
    /// Every wire provides its committed power.
    Open,
    /// Members of this network provide nothing; all other wires are open.
    Suppressed(&'a Network),
}

impl OutputGate<'_> {
    /// Whether the wire at `pos` is power-providing under this gate.
    pub fn is_providing(&self, pos: BlockPos) -> bool {
        match self {
            OutputGate::Open => true,
            OutputGate::Suppressed(network) => !network.contains(pos),
        }
    }

    /// Omnidirectional output of the wire `cell` at `pos`.
    pub fn strong_power(&self, pos: BlockPos, cell: &WireCell) -> Power {
        if self.is_providing(pos) {
            cell.strong_power()
        } else {
            Power::ZERO
        }
    }

    /// Output of the wire `cell` at `pos` toward `dir`; zero unless the cell
    /// is connected that way.
    pub fn weak_power_toward(&self, pos: BlockPos, cell: &WireCell, dir: Direction) -> Power {
        if self.is_providing(pos) {
            cell.weak_power_toward(dir)
        } else {
            Power::ZERO
        }
    }
}

/// Signal arriving at `pos` from the neighbor one step in `dir`.
fn signal_from<G: GridAccess + ?Sized>(
    grid: &G,
    pos: BlockPos,
    dir: Direction,
    gate: &OutputGate<'_>,
) -> Power {
    let neighbor = pos.offset(dir);
    match grid.wire(neighbor) {
        Some(cell) => gate.strong_power(neighbor, &cell),
        None => grid.signal_toward(neighbor, dir.opposite()),
    }
}

/// The strongest signal any neighbor offers the cell at `pos`.
pub fn strongest_incoming_signal<G: GridAccess + ?Sized>(
    pos: BlockPos,
    grid: &G,
    gate: &OutputGate<'_>,
) -> Power {
    Direction::ALL
        .into_iter()
        .map(|dir| signal_from(grid, pos, dir, gate))
        .max()
        .unwrap_or(Power::ZERO)
}

/// The strongest signal reaching any member of `network` from outside it.
pub fn network_target<G: GridAccess + ?Sized>(network: &Network, grid: &G) -> Power {
    let gate = OutputGate::Suppressed(network);
    network
        .members()
        .iter()
        .map(|&pos| strongest_incoming_signal(pos, grid, &gate))
        .max()
        .unwrap_or(Power::ZERO)
}

/// Strong power offered by the wire at `pos`, or zero if there is none.
pub fn strong_power_at<G: GridAccess + ?Sized>(grid: &G, pos: BlockPos) -> Power {
    grid.wire(pos)
        .map(|cell| OutputGate::Open.strong_power(pos, &cell))
        .unwrap_or(Power::ZERO)
}

/// Weak power offered by the wire at `pos` toward `dir`, or zero if there
/// is none.
pub fn weak_power_at<G: GridAccess + ?Sized>(grid: &G, pos: BlockPos, dir: Direction) -> Power {
    grid.wire(pos)
        .map(|cell| OutputGate::Open.weak_power_toward(pos, &cell, dir))
        .unwrap_or(Power::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::discover_network;
    use crate::types::Connections;
    use crate::world::{GridWorld, Occupant};

    fn powered_wire(level: u8) -> Occupant {
        Occupant::Wire(WireCell::new(
            Power::new(level),
            Connections::only(Direction::Down),
        ))
    }

    #[test]
    fn no_neighbors_yields_zero() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(4, 4, 4);
        world.set(pos, powered_wire(0));
        assert_eq!(
            strongest_incoming_signal(pos, &world, &OutputGate::Open),
            Power::ZERO
        );
    }

    #[test]
    fn takes_maximum_over_sources() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(4, 4, 4);
        world.set(pos, powered_wire(0));
        world.set(
            pos.offset(Direction::North),
            Occupant::Source {
                strength: Power::new(6),
            },
        );
        world.set(
            pos.offset(Direction::Up),
            Occupant::Source {
                strength: Power::new(11),
            },
        );
        assert_eq!(
            strongest_incoming_signal(pos, &world, &OutputGate::Open),
            Power::new(11)
        );
    }

    #[test]
    fn diode_only_counts_when_facing_the_cell() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(4, 1, 4);
        world.set(pos, powered_wire(0));
        let diode_pos = pos.offset(Direction::West);
        world.set(
            diode_pos,
            Occupant::Diode(crate::world::Diode {
                facing: Direction::North,
                input: Power::new(9),
                output: Power::new(9),
            }),
        );
        assert_eq!(
            strongest_incoming_signal(pos, &world, &OutputGate::Open),
            Power::ZERO
        );
        world.set(
            diode_pos,
            Occupant::Diode(crate::world::Diode {
                facing: Direction::East,
                input: Power::new(9),
                output: Power::new(9),
            }),
        );
        assert_eq!(
            strongest_incoming_signal(pos, &world, &OutputGate::Open),
            Power::new(9)
        );
    }

    #[test]
    fn suppressed_gate_hides_own_network() {
        let mut world = GridWorld::new(8, 8, 8);
        let a = BlockPos::new(2, 1, 2);
        let b = a.offset(Direction::East);
        world.set(a, powered_wire(14));
        world.set(b, powered_wire(14));
        let network = discover_network(a, &world);

        // Open: b sees a's stale power.
        assert_eq!(
            strongest_incoming_signal(b, &world, &OutputGate::Open),
            Power::new(14)
        );
        // Suppressed: the network's own power is invisible, so with no
        // external source the target is zero.
        let gate = OutputGate::Suppressed(&network);
        assert_eq!(strongest_incoming_signal(b, &world, &gate), Power::ZERO);
        assert_eq!(network_target(&network, &world), Power::ZERO);

        // Both output queries go dark under suppression, even toward a
        // connected direction.
        let cell = world.wire(a).unwrap();
        assert_eq!(gate.weak_power_toward(a, &cell, Direction::Down), Power::ZERO);
        assert_eq!(gate.strong_power(a, &cell), Power::ZERO);
        assert_eq!(
            OutputGate::Open.weak_power_toward(a, &cell, Direction::Down),
            Power::new(14)
        );
        // Wires outside the suppressed network stay open.
        let outsider = BlockPos::new(6, 6, 6);
        assert!(gate.is_providing(outsider));
        assert_eq!(
            gate.weak_power_toward(outsider, &cell, Direction::Down),
            Power::new(14)
        );
    }

    #[test]
    fn network_target_is_max_over_members() {
        let mut world = GridWorld::new(8, 8, 8);
        for x in 1..5 {
            world.set(BlockPos::new(x, 1, 1), powered_wire(0));
        }
        world.set(
            BlockPos::new(0, 1, 1),
            Occupant::Source {
                strength: Power::new(4),
            },
        );
        world.set(
            BlockPos::new(3, 2, 1),
            Occupant::Source {
                strength: Power::new(8),
            },
        );
        let network = discover_network(BlockPos::new(1, 1, 1), &world);
        assert_eq!(network_target(&network, &world), Power::new(8));
    }

    #[test]
    fn host_queries() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(2, 2, 2);
        world.set(pos, powered_wire(10));
        assert_eq!(strong_power_at(&world, pos), Power::new(10));
        assert_eq!(weak_power_at(&world, pos, Direction::Down), Power::new(10));
        assert_eq!(weak_power_at(&world, pos, Direction::Up), Power::ZERO);
        // Non-wire positions offer no wire power.
        assert_eq!(strong_power_at(&world, BlockPos::new(0, 0, 0)), Power::ZERO);
        assert_eq!(
            weak_power_at(&world, BlockPos::new(0, 0, 0), Direction::Down),
            Power::ZERO
        );
    }
}
