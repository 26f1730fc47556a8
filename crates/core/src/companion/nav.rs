//! Movement collaborator: a route follower that walks a companion toward an
//! acquired target one tile per travel interval, and the tagged neighbor
//! query the reachability scanner builds its frontier from.
//! It does not decide where to go; controllers hand it targets.

use std::collections::{BTreeMap, VecDeque, btree_map::Entry};

use crate::state::{Companion, Map};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborKind {
    /// Directly walkable ground; the scan frontier may continue through it.
    Ground,
    /// Not walkable; the scanner must probe it for resource presence.
    Probe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedNeighbor {
    pub pos: Pos,
    pub kind: NeighborKind,
}

/// The four direct neighbors of `pos`, each pre-classified for physical
/// walkability so the scanner never re-tests ground cells.
pub fn direct_walkable_neighbors(map: &Map, pos: Pos) -> [TaggedNeighbor; 4] {
    neighbors(pos).map(|n| TaggedNeighbor {
        pos: n,
        kind: if map.walkable(n) { NeighborKind::Ground } else { NeighborKind::Probe },
    })
}

pub struct MovementController {
    target: Option<Pos>,
    route: VecDeque<Pos>,
    travel_interval_ms: u32,
    travel_accum_ms: u32,
}

impl MovementController {
    pub fn new(travel_interval_ms: u32) -> Self {
        Self { target: None, route: VecDeque::new(), travel_interval_ms, travel_accum_ms: 0 }
    }

    /// Plans a route from `from` to `tile` and starts following it.
    /// Returns false (and keeps no target) when no route exists.
    pub fn acquire_target(&mut self, map: &Map, from: Pos, tile: Pos) -> bool {
        self.reset();
        match bfs_route(map, from, tile) {
            Some(route) => {
                self.route = route;
                self.target = Some(tile);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.route.clear();
        self.travel_accum_ms = 0;
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Advances travel by one tick. Returns true exactly once, on the tick
    /// the companion arrives at the acquired target.
    pub fn update(&mut self, tick: Tick, companion: &mut Companion) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        self.travel_accum_ms += tick.delta_ms;
        while self.travel_accum_ms >= self.travel_interval_ms {
            self.travel_accum_ms -= self.travel_interval_ms;
            let Some(step) = self.route.pop_front() else {
                break;
            };
            if step.x != companion.pos.x {
                companion.facing = if step.x > companion.pos.x { Facing::East } else { Facing::West };
            }
            companion.pos = step;
        }

        if self.route.is_empty() && companion.pos == target {
            self.target = None;
            self.travel_accum_ms = 0;
            return true;
        }
        false
    }
}

/// Shortest walkable route, excluding `from`, ending at `to`.
/// `Some` with an empty route means the companion already stands there.
fn bfs_route(map: &Map, from: Pos, to: Pos) -> Option<VecDeque<Pos>> {
    if from == to {
        return Some(VecDeque::new());
    }
    if !map.walkable(from) || !map.walkable(to) {
        return None;
    }

    let mut came_from: BTreeMap<Pos, Pos> = BTreeMap::new();
    let mut queue = VecDeque::new();
    came_from.insert(from, from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut route = VecDeque::new();
            let mut cursor = to;
            while cursor != from {
                route.push_front(cursor);
                cursor = came_from[&cursor];
            }
            return Some(route);
        }
        for neighbor in neighbors(current) {
            if !map.walkable(neighbor) {
                continue;
            }
            if let Entry::Vacant(entry) = came_from.entry(neighbor) {
                entry.insert(current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}
