// Validity checker: is a wire cell still physically attached?
//
// Every arm of a cell must rest on a surface. For each direction the cell is
// connected toward, the neighbor in that direction has to offer an
// attachment face on the side touching the wire (`dir.opposite()`). One
// unsupported arm invalidates the whole cell; the engine then removes it and
// asks the host to drop its item. A cell with no arms at all is unsupported.
//
// Wire cells never offer attachment, so a segment cannot hang off another
// segment.

use crate::cell::WireCell;
use crate::grid::GridAccess;
use crate::types::BlockPos;

/// Whether every connection of `cell`, placed at `pos`, rests on an
/// attachment face.
pub fn is_supported<G: GridAccess + ?Sized>(cell: &WireCell, pos: BlockPos, grid: &G) -> bool {
    if cell.connections.is_empty() {
        return false;
    }
    cell.connections
        .directions()
        .into_iter()
        .all(|dir| grid.offers_attachment(pos.offset(dir), dir.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Connections, Direction, Power};
    use crate::world::{GridWorld, Occupant};

    fn floor_world() -> GridWorld {
        let mut world = GridWorld::new(8, 8, 8);
        for x in 0..8 {
            for z in 0..8 {
                world.set(BlockPos::new(x, 0, z), Occupant::Solid);
            }
        }
        world
    }

    #[test]
    fn floor_wire_is_supported() {
        let world = floor_world();
        let cell = WireCell::attached(Direction::Down);
        assert!(is_supported(&cell, BlockPos::new(3, 1, 3), &world));
    }

    #[test]
    fn wire_over_air_is_not_supported() {
        let world = floor_world();
        let cell = WireCell::attached(Direction::Down);
        assert!(!is_supported(&cell, BlockPos::new(3, 2, 3), &world));
    }

    #[test]
    fn every_arm_must_be_supported() {
        let mut world = floor_world();
        let pos = BlockPos::new(3, 1, 3);
        let cell = WireCell::new(
            Power::ZERO,
            Connections::only(Direction::Down).with(Direction::East),
        );
        // East neighbor is air: the east arm is unsupported.
        assert!(!is_supported(&cell, pos, &world));
        world.set(pos.offset(Direction::East), Occupant::Solid);
        assert!(is_supported(&cell, pos, &world));
    }

    #[test]
    fn wires_and_diodes_offer_no_attachment() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(3, 2, 3);
        let below = pos.offset(Direction::Down);
        world.set(below, Occupant::Wire(WireCell::attached(Direction::Down)));
        let cell = WireCell::attached(Direction::Down);
        assert!(!is_supported(&cell, pos, &world));

        world.set(below, Occupant::diode(Direction::North));
        assert!(!is_supported(&cell, pos, &world));
    }

    #[test]
    fn cell_without_connections_is_unsupported() {
        let world = floor_world();
        let cell = WireCell::default();
        assert!(!is_supported(&cell, BlockPos::new(1, 1, 1), &world));
    }

    #[test]
    fn power_source_blocks_offer_attachment() {
        let mut world = GridWorld::new(8, 8, 8);
        let pos = BlockPos::new(2, 2, 2);
        world.set(
            pos.offset(Direction::West),
            Occupant::Source {
                strength: Power::MAX,
            },
        );
        let cell = WireCell::attached(Direction::West);
        assert!(is_supported(&cell, pos, &world));
    }
}
