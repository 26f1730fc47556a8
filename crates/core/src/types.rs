use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct CompanionId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Land,
    Obstacle,
    Water,
}

/// Horizontal orientation while fishing; derived from which side of the
/// water the chosen standing tile sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    East,
    West,
}

/// One step of simulated wall-clock time handed to every per-tick entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub delta_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FishQuality {
    Normal,
    Silver,
    Gold,
    Iridium,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaughtFish {
    pub species: &'static str,
    pub quality: FishQuality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisengageReason {
    LeaderLeft,
    GaveUp,
    LocationChanged,
    Deactivated,
}

/// Diagnostic events appended to the controller/session log as the
/// simulation runs. Expected steady-state outcomes land here instead of
/// surfacing as errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEvent {
    SpotAcquired { target: Pos, facing: Facing },
    EngagedAtSpot { pos: Pos },
    RewardProduced { species: &'static str, quality: FishQuality },
    JunkSnagged { species: &'static str },
    RewardsDelivered { count: usize },
    DeliveryBlocked { remaining: usize },
    Disengaged { reason: DisengageReason },
    CompanionExcluded,
}

pub fn neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
