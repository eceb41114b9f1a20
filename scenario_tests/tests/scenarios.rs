// Whole-grid wire scenarios.
//
// Each test builds a floor-backed world through `TestBench`, drives it with
// the same `WireCommand`s a host would send, and checks network-level
// properties: uniform power, source dominance over any shape, splitting and
// joining networks, diode cascades, the cascade depth guard, and save/load.

use refined_redstone_sim::cell::WireCell;
use refined_redstone_sim::command::{BlockSpec, WireCommand};
use refined_redstone_sim::config::WireConfig;
use refined_redstone_sim::event::WireEventKind;
use refined_redstone_sim::grid::GridAccess;
use refined_redstone_sim::sim::RedstoneSim;
use refined_redstone_sim::types::{BlockPos, Direction};
use scenario_tests::{TestBench, at, line, random_shape, ring, t_junction};
use std::collections::BTreeSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The first position beside `shape` that is not part of it.
fn free_neighbor(shape: &[(i32, i32)]) -> (i32, i32) {
    let occupied: BTreeSet<_> = shape.iter().copied().collect();
    shape
        .iter()
        .flat_map(|&(x, z)| [(x - 1, z), (x + 1, z), (x, z - 1), (x, z + 1)])
        .find(|cell| !occupied.contains(cell))
        .expect("a finite shape always has a free neighbor")
}

fn levels(values: &[u8]) -> BTreeSet<u8> {
    values.iter().copied().collect()
}

// ---------------------------------------------------------------------------
// Basic shapes
// ---------------------------------------------------------------------------

#[test]
fn line_of_five_with_full_source() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 12);
    bench.wires(&line(1, 3, 5));
    bench.source(0, 3, 15);
    for x in 1..=5 {
        assert_eq!(bench.power(x, 3), Some(15), "cell at x={x}");
    }
}

#[test]
fn loop_without_source_stays_dark() {
    init_logging();
    let mut bench = TestBench::with_floor(8, 8);
    bench.wires(&ring(3, 3));
    assert_eq!(bench.network_levels(3, 3), levels(&[0]));
    assert_eq!(bench.sim.engine.stats().truncated_dispatches, 0);
}

#[test]
fn loop_takes_source_power_everywhere() {
    init_logging();
    let mut bench = TestBench::with_floor(8, 8);
    bench.wires(&ring(3, 3));
    bench.source(2, 3, 6);
    assert_eq!(bench.network_levels(4, 4), levels(&[6]));
}

#[test]
fn t_junction_is_uniform() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 12);
    bench.wires(&t_junction(2, 2, 3));
    // Feed the end of the stem.
    bench.source(5, 6, 11);
    assert_eq!(bench.network_levels(2, 2), levels(&[11]));
    assert_eq!(bench.power(8, 2), Some(11), "far end of the bar");
}

#[test]
fn strongest_of_several_sources_wins() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 6);
    bench.wires(&line(1, 2, 8));
    bench.source(0, 2, 4);
    bench.source(9, 2, 13);
    bench.source(5, 3, 9);
    assert_eq!(bench.network_levels(1, 2), levels(&[13]));

    bench.remove(9, 2);
    assert_eq!(bench.network_levels(1, 2), levels(&[9]));
}

#[test]
fn disjoint_networks_never_interact() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 6);
    bench.wires(&line(1, 2, 3));
    bench.block(4, 2, BlockSpec::Solid);
    bench.wires(&line(5, 2, 3));
    bench.source(0, 2, 15);

    assert_eq!(bench.network_levels(1, 2), levels(&[15]));
    assert_eq!(bench.network_levels(5, 2), levels(&[0]));
}

// ---------------------------------------------------------------------------
// Editing networks
// ---------------------------------------------------------------------------

#[test]
fn bridging_two_networks_joins_them() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 6);
    bench.wires(&line(1, 2, 3));
    bench.wires(&line(5, 2, 3));
    bench.source(0, 2, 12);
    assert_eq!(bench.power(7, 2), Some(0));

    bench.wire(4, 2);
    assert_eq!(bench.network_levels(7, 2), levels(&[12]));
}

#[test]
fn breaking_a_cell_splits_the_network() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 6);
    bench.wires(&line(1, 2, 7));
    bench.source(0, 2, 15);
    bench.remove(4, 2);

    assert_eq!(bench.power(4, 2), None);
    assert_eq!(bench.network_levels(1, 2), levels(&[15]));
    assert_eq!(bench.network_levels(5, 2), levels(&[0]));
    assert!(bench.sim.world.take_drops().is_empty());
}

#[test]
fn losing_the_floor_drops_the_cell() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 6);
    bench.wires(&line(1, 2, 5));
    bench.source(0, 2, 15);
    bench.remove_floor(3, 2);

    assert_eq!(bench.power(3, 2), None);
    let drops = bench.sim.world.take_drops();
    assert_eq!(drops.len(), 1, "exactly one cell lost its support");
    assert_eq!(drops[0].0, at(3, 2));
    assert_eq!(bench.network_levels(1, 2), levels(&[15]));
    assert_eq!(bench.network_levels(4, 2), levels(&[0]));
    assert!(
        bench
            .events
            .iter()
            .any(|e| e.kind == WireEventKind::Dropped { pos: at(3, 2) })
    );
}

#[test]
fn second_arm_merges_into_one_cell() {
    init_logging();
    let mut bench = TestBench::with_floor(8, 8);
    bench.block(3, 2, BlockSpec::Solid);
    bench.wire(3, 3);
    // Click the south face of the wall to the north.
    bench.run(&[WireCommand::Place {
        pos: at(3, 3),
        clicked_face: Direction::South,
    }]);

    let cell = bench.sim.world.wire(at(3, 3)).expect("cell should remain");
    assert_eq!(cell.connections.len(), 2);
    assert!(cell.is_connected(Direction::Down));
    assert!(cell.is_connected(Direction::North));
    assert_eq!(
        bench.sim.meter(at(3, 3), Direction::Down).to_string(),
        "Intensity: 0   Connections: Down North"
    );

    // Losing the floor leaves an arm unsupported, so the whole cell drops.
    bench.remove_floor(3, 3);
    assert_eq!(bench.power(3, 3), None);
}

// ---------------------------------------------------------------------------
// Random shapes
// ---------------------------------------------------------------------------

#[test]
fn any_shape_settles_to_its_source() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(0x5eed_0f_a11);
    for round in 0..25 {
        let mut bench = TestBench::with_floor(20, 20);
        let cells = rng.usize(1..60);
        let shape = random_shape(&mut rng, (10, 10), cells, (20, 20));
        bench.wires(&shape);

        let feed = free_neighbor(&shape);
        let level = rng.u8(1..=15);
        bench.source(feed.0, feed.1, level);

        for &(x, z) in &shape {
            assert_eq!(
                bench.power(x, z),
                Some(level),
                "round {round}: cell ({x}, {z}) of {} cells",
                shape.len()
            );
        }
    }
}

#[test]
fn fragments_stay_uniform_after_random_cuts() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(42);
    for round in 0..10 {
        let mut bench = TestBench::with_floor(20, 20);
        let shape = random_shape(&mut rng, (10, 10), 50, (20, 20));
        bench.wires(&shape);
        let feed = free_neighbor(&shape);
        bench.source(feed.0, feed.1, 15);

        for _ in 0..5 {
            let (x, z) = shape[rng.usize(..shape.len())];
            if bench.power(x, z).is_some() {
                bench.remove(x, z);
            }
        }
        for &(x, z) in &shape {
            if bench.power(x, z).is_some() {
                assert_eq!(
                    bench.network_levels(x, z).len(),
                    1,
                    "round {round}: network at ({x}, {z}) is not uniform"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Diodes and the cascade
// ---------------------------------------------------------------------------

#[test]
fn diode_chain_carries_power_forward_only() {
    init_logging();
    let mut bench = TestBench::with_floor(16, 6);
    // Source -> A -> diode -> B -> diode -> C
    bench.wires(&line(1, 2, 3));
    bench.diode(4, 2, Direction::East);
    bench.wires(&line(5, 2, 3));
    bench.diode(8, 2, Direction::East);
    bench.wires(&line(9, 2, 3));

    bench.source(0, 2, 14);
    for (x, name) in [(1, "A"), (5, "B"), (9, "C")] {
        assert_eq!(bench.network_levels(x, 2), levels(&[14]), "network {name}");
    }

    bench.remove(0, 2);
    for (x, name) in [(1, "A"), (5, "B"), (9, "C")] {
        assert_eq!(bench.network_levels(x, 2), levels(&[0]), "network {name}");
    }

    // Feeding C does not flow back through the diodes.
    bench.source(12, 2, 9);
    assert_eq!(bench.network_levels(9, 2), levels(&[9]));
    assert_eq!(bench.network_levels(5, 2), levels(&[0]));
    assert_eq!(bench.network_levels(1, 2), levels(&[0]));
}

#[test]
fn shallow_depth_limit_truncates_without_panicking() {
    init_logging();
    let mut bench = TestBench::with_config(WireConfig {
        world_size: (10, 4, 6),
        max_cascade_depth: 1,
    });
    bench.wires(&line(1, 2, 2));
    bench.diode(3, 2, Direction::East);
    bench.wires(&line(4, 2, 2));
    bench.source(0, 2, 10);

    assert_eq!(bench.network_levels(1, 2), levels(&[10]));
    assert_eq!(bench.network_levels(4, 2), levels(&[0]), "cascade was cut");
    assert!(bench.sim.engine.stats().truncated_dispatches > 0);
    assert!(
        bench
            .events
            .iter()
            .any(|e| matches!(e.kind, WireEventKind::CascadeTruncated { .. }))
    );
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

#[test]
fn save_load_preserves_every_cell() {
    init_logging();
    let mut bench = TestBench::with_floor(12, 12);
    bench.wires(&t_junction(1, 1, 3));
    bench.diode(8, 1, Direction::East);
    bench.wires(&line(9, 1, 2));
    bench.source(0, 1, 7);

    let json = bench.sim.to_json().expect("save should serialize");
    let mut restored = RedstoneSim::from_json(&json).expect("save should load");
    assert_eq!(
        restored.world.occupied().collect::<Vec<_>>(),
        bench.sim.world.occupied().collect::<Vec<_>>()
    );
    let packed = |sim: &RedstoneSim| -> Vec<(BlockPos, u16)> {
        sim.world
            .occupied()
            .filter_map(|(pos, _)| sim.world.wire(pos).map(|cell| (pos, cell.to_bits())))
            .collect()
    };
    assert_eq!(packed(&restored), packed(&bench.sim));
    for (_, bits) in packed(&restored) {
        assert_eq!(WireCell::from_bits(bits).map(WireCell::to_bits), Ok(bits));
    }

    // The restored sim keeps working.
    let events = restored.apply(&[WireCommand::Remove { pos: at(0, 1) }]);
    assert!(
        events
            .iter()
            .any(|e| matches!(e.kind, WireEventKind::NetworkRepowered { .. }))
    );
    assert_eq!(restored.world.wire(at(10, 1)).map(|c| c.power.get()), Some(0));
}
