//! Per-companion autonomous behavior: spot scanning, movement, and the
//! fishing activity controller, composed by a thin per-companion brain.
//! This module does not own world state or the session scheduler loop.

mod brain;
pub mod fishing;
mod nav;
mod scan;
mod spot;

#[cfg(test)]
pub(crate) mod test_support;

pub use brain::CompanionBrain;
pub use fishing::FishingController;
pub use nav::{MovementController, NeighborKind, TaggedNeighbor, direct_walkable_neighbors};
pub use scan::{CellClass, LocalWindow, scan_for_water};
pub use spot::{FishingSpot, candidate_spots, select_spot};
