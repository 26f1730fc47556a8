pub mod companion;
pub mod content;
pub mod rng;
pub mod session;
pub mod state;
pub mod types;

pub use companion::{CompanionBrain, FishingController};
pub use content::{ContentPack, FishSpecies, FishingTuning, QualityTier};
pub use rng::RandomSource;
pub use session::{Session, SessionNote};
pub use state::{Companion, Inventory, Leader, Map, World};
pub use types::*;
