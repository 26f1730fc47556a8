//! Session scheduler: resolves the companion roster against the world,
//! owns one brain per resolved companion plus the seeded random stream,
//! and fans explicit tick and lifecycle calls out to every brain. All
//! brain diagnostics drain into one session-level log, tagged by name.

use std::collections::BTreeMap;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::companion::CompanionBrain;
use crate::content::{ContentPack, FishingTuning};
use crate::state::World;
use crate::types::{LogEvent, Tick};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionNote {
    pub companion: String,
    pub event: LogEvent,
}

pub struct Session {
    brains: BTreeMap<String, CompanionBrain>,
    rng: ChaCha8Rng,
    log: Vec<SessionNote>,
    ticks: u64,
}

impl Session {
    /// Resolves every roster name against the world. Names without a
    /// spawned companion are skipped and noted, never an error: the rest
    /// of the roster still runs.
    pub fn new(world: &World, tuning: &FishingTuning, content: &ContentPack, seed: u64) -> Self {
        let mut brains = BTreeMap::new();
        let mut log = Vec::new();
        for name in &content.roster {
            match world.find_companion(name) {
                Some(id) => {
                    brains.insert(
                        name.to_string(),
                        CompanionBrain::new(id, tuning.clone(), content),
                    );
                }
                None => log.push(SessionNote {
                    companion: name.to_string(),
                    event: LogEvent::CompanionExcluded,
                }),
            }
        }
        Self { brains, rng: ChaCha8Rng::seed_from_u64(seed), log, ticks: 0 }
    }

    /// Advances every brain by one tick, in stable name order so a fixed
    /// seed replays the same session.
    pub fn tick(&mut self, tick: Tick, world: &mut World) {
        self.ticks += 1;
        for (name, brain) in &mut self.brains {
            brain.update(tick, world, &mut self.rng);
            for event in brain.drain_log() {
                self.log.push(SessionNote { companion: name.clone(), event });
            }
        }
    }

    /// The leader moved the party to a different map area.
    pub fn notify_location_changed(&mut self, world: &mut World) {
        for (name, brain) in &mut self.brains {
            brain.notify_location_changed(world, &mut self.rng);
            for event in brain.drain_log() {
                self.log.push(SessionNote { companion: name.clone(), event });
            }
        }
    }

    /// Winds every activity down, leaving stacked rewards collectable.
    pub fn deactivate_all(&mut self, world: &mut World) {
        for (name, brain) in &mut self.brains {
            brain.deactivate(world);
            for event in brain.drain_log() {
                self.log.push(SessionNote { companion: name.clone(), event });
            }
        }
    }

    /// Leader-initiated collection from every companion holding a catch.
    pub fn collect_rewards(&mut self, world: &mut World) {
        for (name, brain) in &mut self.brains {
            if brain.activity().has_pending_rewards() {
                brain.give_rewards_to_leader(world);
                for event in brain.drain_log() {
                    self.log.push(SessionNote { companion: name.clone(), event });
                }
            }
        }
    }

    pub fn brain(&self, name: &str) -> Option<&CompanionBrain> {
        self.brains.get(name)
    }

    pub fn roster(&self) -> impl Iterator<Item = &str> {
        self.brains.keys().map(String::as_str)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn log(&self) -> &[SessionNote] {
        &self.log
    }
}
