//! Spot selection over a classified scan window: every walkable tile
//! horizontally adjacent to reachable water is a candidate, and one is
//! chosen uniformly so repeated activations vary visibly.

use crate::companion::scan::{CellClass, LocalWindow};
use crate::rng::RandomSource;
use crate::types::{Facing, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FishingSpot {
    /// Absolute map tile to stand on.
    pub tile: Pos,
    pub facing: Facing,
}

/// Enumerates candidates in deterministic y-then-x window order.
/// Pure: no randomness, no side effects; usable for capability queries.
pub fn candidate_spots(window: &LocalWindow) -> Vec<FishingSpot> {
    let mut candidates = Vec::new();
    for y in 0..window.side() {
        for x in 0..window.side() {
            if window.get(Pos { y, x }) != Some(CellClass::Water) {
                continue;
            }
            let west = Pos { y, x: x - 1 };
            if window.get(west) == Some(CellClass::Walkable) {
                candidates
                    .push(FishingSpot { tile: window.to_absolute(west), facing: Facing::East });
            }
            let east = Pos { y, x: x + 1 };
            if window.get(east) == Some(CellClass::Walkable) {
                candidates
                    .push(FishingSpot { tile: window.to_absolute(east), facing: Facing::West });
            }
        }
    }
    candidates
}

/// Uniform choice among all candidates; `None` when the window offers no
/// walkable water-adjacent tile. Deliberately unweighted by distance.
pub fn select_spot(window: &LocalWindow, rng: &mut dyn RandomSource) -> Option<FishingSpot> {
    let candidates = candidate_spots(window);
    if candidates.is_empty() {
        return None;
    }
    let choice = rng.pick(candidates.len());
    Some(candidates[choice])
}
