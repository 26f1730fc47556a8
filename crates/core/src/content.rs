//! Static species tables and numeric tuning for the fishing activity.
//! Everything the behavior treats as "configuration, not structural" lives
//! here so tests and the CLI runner can swap values freely.

use serde::{Deserialize, Serialize};

use crate::types::FishQuality;

pub mod keys {
    pub const FISH_CHUB: &str = "fish_chub";
    pub const FISH_CARP: &str = "fish_carp";
    pub const FISH_PERCH: &str = "fish_perch";
    pub const FISH_BREAM: &str = "fish_bream";
    pub const FISH_PIKE: &str = "fish_pike";
    pub const FISH_SHAD: &str = "fish_shad";

    pub const JUNK_DRIFTWOOD: &str = "junk_driftwood";
    pub const JUNK_SOGGY_NEWSPAPER: &str = "junk_soggy_newspaper";
    pub const JUNK_BROKEN_GLASSES: &str = "junk_broken_glasses";

    pub const COMPANION_WILLOW: &str = "willow";
    pub const COMPANION_MARLIN: &str = "marlin";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FishSpecies {
    pub id: &'static str,
    pub name: &'static str,
}

/// Content shipped with the simulation: which fish exist, what counts as
/// junk, and which companions the roster tries to resolve at session setup.
pub struct ContentPack {
    pub species: Vec<FishSpecies>,
    pub junk: Vec<FishSpecies>,
    pub roster: Vec<&'static str>,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self {
            species: vec![
                FishSpecies { id: keys::FISH_CHUB, name: "Chub" },
                FishSpecies { id: keys::FISH_CARP, name: "Carp" },
                FishSpecies { id: keys::FISH_PERCH, name: "Perch" },
                FishSpecies { id: keys::FISH_BREAM, name: "Bream" },
                FishSpecies { id: keys::FISH_PIKE, name: "Pike" },
                FishSpecies { id: keys::FISH_SHAD, name: "Shad" },
            ],
            junk: vec![
                FishSpecies { id: keys::JUNK_DRIFTWOOD, name: "Driftwood" },
                FishSpecies { id: keys::JUNK_SOGGY_NEWSPAPER, name: "Soggy Newspaper" },
                FishSpecies { id: keys::JUNK_BROKEN_GLASSES, name: "Broken Glasses" },
            ],
            roster: vec![keys::COMPANION_WILLOW, keys::COMPANION_MARLIN],
        }
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

/// One rung of the skill-keyed quality ladder, evaluated top down:
/// the first rung whose `min_skill` is met and whose chance fires wins.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QualityTier {
    pub min_skill: u8,
    pub chance: f64,
    pub quality: FishQuality,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FishingTuning {
    /// Half-side of the square scan window, in tiles.
    pub scan_radius: i32,
    /// A reward roll succeeds 1 time in this many.
    pub reward_chance_in: u32,
    /// Per-tick chance of giving the activity up once grace has elapsed.
    pub disengage_chance: f64,
    pub grace_on_engage_ms: u32,
    pub grace_per_catch_ms: u32,
    pub reward_indicator_ms: u32,
    /// Manhattan distance beyond which the leader counts as gone.
    pub proximity_tiles: u32,
    /// Chance that a successful roll snags junk instead of a fish.
    pub junk_chance: f64,
    /// Milliseconds of travel per tile while walking to the spot.
    pub travel_interval_ms: u32,
    pub quality_tiers: Vec<QualityTier>,
}

impl Default for FishingTuning {
    fn default() -> Self {
        Self {
            scan_radius: 6,
            reward_chance_in: 4,
            disengage_chance: 0.02,
            grace_on_engage_ms: 1000,
            grace_per_catch_ms: 2000,
            reward_indicator_ms: 3000,
            proximity_tiles: 12,
            junk_chance: 0.15,
            travel_interval_ms: 250,
            quality_tiers: vec![
                QualityTier { min_skill: 8, chance: 0.05, quality: FishQuality::Iridium },
                QualityTier { min_skill: 6, chance: 0.20, quality: FishQuality::Gold },
                QualityTier { min_skill: 2, chance: 0.55, quality: FishQuality::Silver },
            ],
        }
    }
}

impl FishingTuning {
    /// Values the per-tick loop cannot run with. Fatal at load time, in
    /// the same spirit as an unresolvable roster name.
    pub fn validate(&self) -> Result<(), String> {
        if self.reward_chance_in == 0 {
            return Err("reward_chance_in must be at least 1".to_string());
        }
        if self.travel_interval_ms == 0 {
            return Err("travel_interval_ms must be nonzero".to_string());
        }
        if self.scan_radius <= 0 {
            return Err("scan_radius must be positive".to_string());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate().map_err(serde::de::Error::custom)?;
        Ok(tuning)
    }
}
