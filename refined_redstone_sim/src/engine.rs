// The wire engine: entry points, the network power update, and the cascade.
//
// `WireEngine` is what a host calls when the grid changes around a wire. It
// holds no world state; every method borrows the host's `GridAccess` for the
// duration of the call.
//
// ## Entry points
//
// - `on_placed`: derive the cell (new or merged), check support, commit, and
//   update the network.
// - `on_removed`: remove the cell and settle each network left behind.
// - `on_neighbor_changed`: re-check support (drop if lost), otherwise update
//   the network.
// - `on_block_changed`: the host changed a non-wire occupant; tell its six
//   neighbors.
//
// ## Network power update
//
//   1. Discover the network from the seed (`network.rs`).
//   2. Aggregate the strongest external signal over all members with the
//      network's own output suppressed (`signal::network_target`). The
//      suppression gate exists only for this read phase.
//   3. Write the target to every member whose power differs.
//   4. Notify the neighbors of every member.
//
// Step 3 is a no-op once the network is stable, and that is what ends the
// cascade. Step 4 always runs, so non-wire listeners hear about every pass
// even when nothing moved. Neighbors that are themselves members of the
// network are skipped in step 4: they were committed at the target in step 3
// and re-updating them would repeat this exact update.
//
// ## Cascade
//
// Notifications are synchronous recursion. A wire neighbor re-enters through
// `react_to_neighbor`; a non-wire neighbor goes to
// `GridAccess::neighbor_changed`, and if its output changed the engine
// notifies its neighbors in turn. Each nested dispatch increments a depth
// counter. Dispatches past `max_cascade_depth` are dropped with a warning so
// a misbehaving host occupant cannot overflow the stack.
//
// See also: `signal.rs` for the aggregation and output gate, `support.rs` for
// the validity check, `placement.rs` for merge rules, `world.rs` for the
// reference host.

use crate::cell::WireCell;
use crate::config::WireConfig;
use crate::event::{EventLog, RejectReason, WireEvent, WireEventKind};
use crate::grid::{GridAccess, expect_wire};
use crate::network::{Network, discover_network};
use crate::placement::{PlacementContext, place_or_merge};
use crate::signal::network_target;
use crate::support::is_supported;
use crate::types::{BlockPos, Power};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Result of `WireEngine::on_placed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// A new cell was created.
    Placed,
    /// An arm was added to the cell already there.
    Merged,
    /// Nothing was committed.
    Rejected(RejectReason),
}

/// Summary of one network power update.
#[derive(Clone, Debug)]
pub struct NetworkUpdate {
    pub network: Network,
    /// The uniform power every member now holds.
    pub power: Power,
    /// How many members had a different power before this update.
    pub changed: usize,
}

/// Running counters, mostly for tests and debugging overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub network_updates: u64,
    pub cells_repowered: u64,
    pub truncated_dispatches: u64,
}

/// The uniform-power wire engine.
#[derive(Clone, Debug)]
pub struct WireEngine {
    max_cascade_depth: u32,
    /// Nesting level of the dispatch currently running.
    depth: u32,
    events: EventLog,
    stats: EngineStats,
}

impl Default for WireEngine {
    fn default() -> Self {
        WireEngine::new(&WireConfig::default())
    }
}

impl WireEngine {
    pub fn new(config: &WireConfig) -> Self {
        Self {
            max_cascade_depth: config.max_cascade_depth,
            depth: 0,
            events: EventLog::new(),
            stats: EngineStats::default(),
        }
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[WireEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<WireEvent> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// A wire is being placed at `pos`.
    pub fn on_placed<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        ctx: PlacementContext,
    ) -> PlacementOutcome {
        let existing = grid.wire(pos);
        if existing.is_none() && !grid.is_vacant(pos) {
            return self.reject(pos, RejectReason::Occupied);
        }

        let cell = place_or_merge(existing, ctx.attachment());
        if !is_supported(&cell, pos, grid) {
            return self.reject(pos, RejectReason::Unsupported);
        }

        grid.set_wire(pos, cell);
        let outcome = if existing.is_some() {
            log::debug!("merged wire arm {} at {pos}", ctx.attachment());
            self.events.push(WireEventKind::Merged {
                pos,
                connections: cell.connections,
            });
            PlacementOutcome::Merged
        } else {
            log::debug!("placed wire at {pos} attached {}", ctx.attachment());
            self.events.push(WireEventKind::Placed {
                pos,
                connections: cell.connections,
            });
            PlacementOutcome::Placed
        };

        self.update_network_power(grid, pos);
        outcome
    }

    /// The host is removing the wire at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` holds no wire.
    pub fn on_removed<G: GridAccess + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) {
        if grid.remove_wire(pos).is_none() {
            panic!("on_removed at {pos}, which holds no wire cell");
        }
        log::debug!("removed wire at {pos}");
        self.events.push(WireEventKind::Removed { pos });
        self.settle_after_removal(grid, pos);
    }

    /// The neighbor at `from` of the wire at `pos` changed state.
    ///
    /// # Panics
    ///
    /// Panics if `pos` holds no wire.
    pub fn on_neighbor_changed<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        from: BlockPos,
    ) {
        self.react_to_neighbor(grid, pos, from);
    }

    /// The host changed the non-wire occupant at `pos`.
    pub fn on_block_changed<G: GridAccess + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) {
        self.notify_neighbors(grid, pos, None);
    }

    // -----------------------------------------------------------------------
    // Network power update
    // -----------------------------------------------------------------------

    /// Force every member of the network containing `seed` to the strongest
    /// external signal reaching any member, then notify their neighbors.
    ///
    /// # Panics
    ///
    /// Panics if `seed` holds no wire.
    pub fn update_network_power<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        seed: BlockPos,
    ) -> NetworkUpdate {
        let network = discover_network(seed, grid);
        let target = network_target(&network, grid);

        let mut changed = 0;
        for &pos in network.members() {
            let cell = expect_wire(grid, pos);
            if cell.power != target {
                grid.set_wire(pos, WireCell { power: target, ..cell });
                changed += 1;
            }
        }

        self.stats.network_updates += 1;
        self.stats.cells_repowered += changed as u64;
        log::trace!(
            "network at {seed}: {} members, power {target}, {changed} changed",
            network.len()
        );
        if changed > 0 {
            self.events.push(WireEventKind::NetworkRepowered {
                seed,
                members: network.len(),
                changed,
                power: target,
            });
        }

        for &pos in network.members() {
            self.notify_neighbors(grid, pos, Some(&network));
        }

        NetworkUpdate {
            network,
            power: target,
            changed,
        }
    }

    // -----------------------------------------------------------------------
    // Cascade
    // -----------------------------------------------------------------------

    fn reject(&mut self, pos: BlockPos, reason: RejectReason) -> PlacementOutcome {
        log::debug!("rejected wire placement at {pos}: {reason:?}");
        self.events
            .push(WireEventKind::PlacementRejected { pos, reason });
        PlacementOutcome::Rejected(reason)
    }

    /// Validity check then update for the wire at `pos`. Returns the update,
    /// or `None` if the cell was dropped.
    fn react_to_neighbor<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        from: BlockPos,
    ) -> Option<NetworkUpdate> {
        let cell = expect_wire(grid, pos);
        log::trace!("wire at {pos} notified by {from}");
        if is_supported(&cell, pos, grid) {
            return Some(self.update_network_power(grid, pos));
        }

        grid.remove_wire(pos);
        grid.drop_item(pos, cell);
        log::debug!("dropped unsupported wire at {pos}");
        self.events.push(WireEventKind::Dropped { pos });
        self.settle_after_removal(grid, pos);
        None
    }

    /// The wire at `pos` is gone. Its former neighbors may now belong to as
    /// many as six separate networks; update each of them once.
    fn settle_after_removal<G: GridAccess + ?Sized>(&mut self, grid: &mut G, pos: BlockPos) {
        let mut settled: FxHashSet<BlockPos> = FxHashSet::default();
        for (_, neighbor) in pos.neighbors() {
            if settled.contains(&neighbor) {
                continue;
            }
            if let Some(update) = self.dispatch(grid, neighbor, pos) {
                settled.extend(update.network.members().iter().copied());
            }
        }
    }

    /// Tell each of `origin`'s neighbors that `origin` changed, skipping
    /// members of `skip`.
    fn notify_neighbors<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        origin: BlockPos,
        skip: Option<&Network>,
    ) {
        for (_, target) in origin.neighbors() {
            if skip.is_some_and(|network| network.contains(target)) {
                continue;
            }
            self.dispatch(grid, target, origin);
        }
    }

    /// Deliver "`from` changed" to whatever occupies `target`.
    fn dispatch<G: GridAccess + ?Sized>(
        &mut self,
        grid: &mut G,
        target: BlockPos,
        from: BlockPos,
    ) -> Option<NetworkUpdate> {
        if self.depth >= self.max_cascade_depth {
            log::warn!(
                "cascade depth {} reached; dropping notification {from} -> {target}",
                self.depth
            );
            self.stats.truncated_dispatches += 1;
            self.events.push(WireEventKind::CascadeTruncated {
                target,
                depth: self.depth,
            });
            return None;
        }

        self.depth += 1;
        let update = if grid.wire(target).is_some() {
            self.react_to_neighbor(grid, target, from)
        } else {
            if grid.neighbor_changed(target, from) {
                self.notify_neighbors(grid, target, None);
            }
            None
        };
        self.depth -= 1;
        update
    }
}
