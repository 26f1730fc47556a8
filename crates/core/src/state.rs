use slotmap::SlotMap;

use crate::types::*;

#[derive(Clone)]
pub struct Map {
    pub internal_width: usize,
    pub internal_height: usize,
    pub tiles: Vec<TileKind>,
}

impl Map {
    pub fn new(width: usize, height: usize) -> Self {
        Self { internal_width: width, internal_height: height, tiles: vec![TileKind::Land; width * height] }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.internal_width
            && (pos.y as usize) < self.internal_height
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Obstacle;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.tile_at(pos) == TileKind::Land
    }

    /// Resource-presence predicate. `None` signals an out-of-range query,
    /// which callers treat as data (the map simply ends there), not an error.
    pub fn water_at(&self, pos: Pos) -> Option<bool> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tile_at(pos) == TileKind::Water)
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.internal_width + (pos.x as usize)
    }
}

/// Leader-side item storage with a fixed slot count.
#[derive(Clone, Debug)]
pub struct Inventory {
    capacity: usize,
    items: Vec<CaughtFish>,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, items: Vec::new() }
    }

    /// Attempts to store one item. Returns false when every slot is taken.
    pub fn try_add(&mut self, item: CaughtFish) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn free_slots(&self) -> usize {
        self.capacity - self.items.len()
    }

    pub fn items(&self) -> &[CaughtFish] {
        &self.items
    }
}

#[derive(Clone, Debug)]
pub struct Leader {
    pub pos: Pos,
    pub fishing_skill: u8,
    pub inventory: Inventory,
}

#[derive(Clone, Debug)]
pub struct Companion {
    pub name: String,
    pub pos: Pos,
    pub facing: Facing,
    /// Presentation flag: the wide fishing sprite pose. Read by the
    /// rendering layer, owned by the activity controller.
    pub engaged_pose: bool,
}

impl Companion {
    pub fn new(name: &str, pos: Pos) -> Self {
        Self { name: name.to_string(), pos, facing: Facing::East, engaged_pose: false }
    }
}

pub struct World {
    pub map: Map,
    pub leader: Leader,
    pub companions: SlotMap<CompanionId, Companion>,
}

impl World {
    pub fn new(map: Map, leader: Leader) -> Self {
        Self { map, leader, companions: SlotMap::with_key() }
    }

    pub fn spawn_companion(&mut self, name: &str, pos: Pos) -> CompanionId {
        self.companions.insert(Companion::new(name, pos))
    }

    pub fn find_companion(&self, name: &str) -> Option<CompanionId> {
        self.companions.iter().find(|(_, c)| c.name == name).map(|(id, _)| id)
    }
}
