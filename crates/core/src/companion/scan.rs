//! Bounded reachability scan: a breadth-first flood fill over a square
//! window centered on the companion, classifying every offset it can prove
//! something about. The window lives for one scan invocation only.

use std::collections::VecDeque;

use crate::companion::nav::{NeighborKind, direct_walkable_neighbors};
use crate::state::Map;
use crate::types::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellClass {
    /// Never reached by any walkable path from the scan origin.
    Unreachable,
    Walkable,
    /// Tested and dry: in range but neither walkable nor water.
    Blocked,
    Water,
    /// The resource query fell off the map edge; distinct from Blocked so
    /// callers can tell a real shoreline from the end of the world.
    OffMap,
}

/// Square classification grid of side `2 * radius + 1`, stored as a flat
/// buffer addressed by `y * side + x` in window-local coordinates.
pub struct LocalWindow {
    origin: Pos,
    radius: i32,
    side: i32,
    cells: Vec<CellClass>,
    pub any_water: bool,
}

impl LocalWindow {
    fn new(origin: Pos, radius: i32) -> Self {
        let side = 2 * radius + 1;
        Self {
            origin,
            radius,
            side,
            cells: vec![CellClass::Unreachable; (side * side) as usize],
            any_water: false,
        }
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn origin(&self) -> Pos {
        self.origin
    }

    /// Classification at a window-local offset; `None` outside the window.
    pub fn get(&self, local: Pos) -> Option<CellClass> {
        self.index(local).map(|idx| self.cells[idx])
    }

    fn set(&mut self, local: Pos, class: CellClass) {
        if let Some(idx) = self.index(local) {
            self.cells[idx] = class;
        }
    }

    pub fn to_absolute(&self, local: Pos) -> Pos {
        Pos { y: self.origin.y + local.y - self.radius, x: self.origin.x + local.x - self.radius }
    }

    fn to_local(&self, absolute: Pos) -> Option<Pos> {
        let local =
            Pos { y: absolute.y - self.origin.y + self.radius, x: absolute.x - self.origin.x + self.radius };
        self.index(local).map(|_| local)
    }

    fn index(&self, local: Pos) -> Option<usize> {
        if local.x < 0 || local.y < 0 || local.x >= self.side || local.y >= self.side {
            return None;
        }
        Some((local.y * self.side + local.x) as usize)
    }
}

/// Flood-fills walkable ground outward from `origin`, probing non-ground
/// neighbors for water. Cells beyond `radius` are never enqueued, so the
/// scan is bounded and always completes within the tick that asked for it.
/// No side effects on the map or the companion.
pub fn scan_for_water(map: &Map, origin: Pos, radius: i32) -> LocalWindow {
    let mut window = LocalWindow::new(origin, radius);
    let center = Pos { y: radius, x: radius };
    window.set(center, CellClass::Walkable);

    let mut frontier = VecDeque::new();
    frontier.push_back(origin);

    while let Some(current) = frontier.pop_front() {
        for neighbor in direct_walkable_neighbors(map, current) {
            let Some(local) = window.to_local(neighbor.pos) else {
                continue;
            };
            if window.get(local) != Some(CellClass::Unreachable) {
                continue;
            }
            match neighbor.kind {
                NeighborKind::Ground => {
                    window.set(local, CellClass::Walkable);
                    frontier.push_back(neighbor.pos);
                }
                NeighborKind::Probe => match map.water_at(neighbor.pos) {
                    Some(true) => {
                        window.set(local, CellClass::Water);
                        window.any_water = true;
                    }
                    Some(false) => window.set(local, CellClass::Blocked),
                    None => window.set(local, CellClass::OffMap),
                },
            }
        }
    }

    window
}
