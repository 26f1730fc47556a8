//! Per-companion orchestration: owns one fishing controller, decides when
//! to offer it the activity, and hands stacked rewards back to the leader.
//! The brain holds a companion id, never a borrow, so the session can keep
//! many brains alongside one mutable world.

use crate::companion::fishing::FishingController;
use crate::content::{ContentPack, FishingTuning};
use crate::rng::RandomSource;
use crate::state::World;
use crate::types::{CompanionId, LogEvent, Tick, manhattan};

pub struct CompanionBrain {
    companion_id: CompanionId,
    /// Leader distance within which an idle companion walks its catch over.
    handoff_range: u32,
    controller: FishingController,
}

impl CompanionBrain {
    pub fn new(companion_id: CompanionId, tuning: FishingTuning, content: &ContentPack) -> Self {
        let handoff_range = tuning.proximity_tiles;
        Self { companion_id, handoff_range, controller: FishingController::new(tuning, content) }
    }

    pub fn companion_id(&self) -> CompanionId {
        self.companion_id
    }

    /// One scheduler tick. An idle controller first delivers any stacked
    /// catch to a nearby leader with room, then re-offers the activity; an
    /// active one just advances. A despawned companion makes this a no-op.
    pub fn update(&mut self, tick: Tick, world: &mut World, rng: &mut dyn RandomSource) {
        let World { map, leader, companions } = world;
        let Some(companion) = companions.get_mut(self.companion_id) else {
            return;
        };

        if self.controller.is_idle() {
            if self.controller.has_pending_rewards()
                && leader.inventory.free_slots() > 0
                && manhattan(leader.pos, companion.pos) <= self.handoff_range
            {
                self.controller.give_rewards_to(&mut leader.inventory);
            }
            if self.controller.can_perform(map, companion) {
                self.controller.activate(map, companion, rng);
            }
        } else {
            self.controller.update(tick, companion, leader, rng);
        }

        self.controller.side_update(tick);
    }

    pub fn notify_location_changed(&mut self, world: &mut World, rng: &mut dyn RandomSource) {
        let World { map, companions, .. } = world;
        if let Some(companion) = companions.get_mut(self.companion_id) {
            self.controller.on_location_changed(map, companion, rng);
        }
    }

    pub fn deactivate(&mut self, world: &mut World) {
        if let Some(companion) = world.companions.get_mut(self.companion_id) {
            self.controller.deactivate(companion);
        }
    }

    /// Explicit collection, independent of the idle-time automatic handoff.
    pub fn give_rewards_to_leader(&mut self, world: &mut World) -> bool {
        self.controller.give_rewards_to(&mut world.leader.inventory)
    }

    pub fn activity(&self) -> &FishingController {
        &self.controller
    }

    pub fn drain_log(&mut self) -> Vec<LogEvent> {
        self.controller.drain_log()
    }
}
