//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one PCG stream per random action)
//! - Stable iteration order (by unit id, tiles row-major)
//! - Turn-based: nothing advances without a command or an alien step
//! - No rendering or platform dependencies

pub mod ai;
pub mod combat;
pub mod los;
pub mod map;
pub mod mapgen;
pub mod movement;
pub mod path;
pub mod reaction;
pub mod state;
pub mod turn;
pub mod unit;
pub mod weapon;

pub use ai::{Behavior, Intent, behavior_for};
pub use combat::{FireReport, effective_accuracy, roll_damage, roll_hit};
pub use los::{bresenham, can_see, has_line_of_sight, recompute_visibility};
pub use map::{FogState, Map, Terrain, Tile, manhattan};
pub use mapgen::generate_mission;
pub use path::{Path, find_path, reachable};
pub use state::{GameEvent, Mission, RngState, TurnPhase};
pub use turn::{AlienStep, StepOutcome};
pub use unit::{AlienKind, Faction, Stance, StatBlock, Unit, UnitId};
pub use weapon::{FireMode, ModeStats, Weapon};
