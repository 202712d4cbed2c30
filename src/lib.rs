//! Tactics Classic - turn-based squad tactics with fog of war and reaction fire
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, units, combat, AI, turn cycle)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input mapping and screen/tile coordinates
//! - `persistence`: Key/value JSON storage (LocalStorage in the browser)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use error::{ActionError, StorageError};
pub use settings::Settings;
pub use stats::MissionStats;
pub use tuning::Rules;

/// Application constants
pub mod consts {
    /// Safety cap on turns for headless auto-play
    pub const AUTOPLAY_TURN_LIMIT: u32 = 60;
}
