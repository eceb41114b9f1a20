// refined_redstone_sim: uniform-power redstone wire networks.
//
// A wire network is every wire cell reachable across shared faces. Unlike
// decaying redstone, all members of a network carry the same power: the
// strongest signal any non-member neighbor offers any member. This crate
// discovers networks, computes and commits that power, and cascades
// neighbor-change notifications outward until the grid is stable.
//
// Module overview:
// - `types.rs`:     BlockPos, Direction, Power, Connections.
// - `cell.rs`:      WireCell (power + attachment arms) and its packed u16 form.
// - `grid.rs`:      GridAccess (host seam) and Conductor (occupant capabilities).
// - `placement.rs`: Placement context and the place-or-merge rule.
// - `support.rs`:   Structural validity: every arm must rest on something.
// - `network.rs`:   BFS network discovery.
// - `signal.rs`:    Power aggregation, the per-update OutputGate, output queries.
// - `engine.rs`:    WireEngine entry points, network update, notification cascade.
// - `event.rs`:     Narrative WireEvents and the EventLog.
// - `config.rs`:    WireConfig, loaded from JSON.
// - `world.rs`:     GridWorld, the dense reference host grid.
// - `command.rs`:   WireCommand, the scripted mutations of the reference host.
// - `sim.rs`:       RedstoneSim: world + engine + config, apply and save/load.
// - `meter.rs`:     Power meter readings for debugging.
//
// The engine is host-agnostic: anything implementing `GridAccess` can embed
// it. `GridWorld` and `RedstoneSim` are the in-crate host used by tests,
// benches, and the scenario crate.
//
// **Critical constraint: determinism.** Neighbor visits follow
// `Direction::ALL`, networks iterate in BFS order, and saved worlds list
// occupants in grid-index order. Same commands, same grid, same events.

pub mod cell;
pub mod command;
pub mod config;
pub mod engine;
pub mod event;
pub mod grid;
pub mod meter;
pub mod network;
pub mod placement;
pub mod signal;
pub mod sim;
pub mod support;
pub mod types;
pub mod world;
