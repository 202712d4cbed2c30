//! Aggregate mission statistics
//!
//! Persisted to LocalStorage, read once at startup and written after each
//! mission ends.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{KeyValueStore, load_or_default, save_json};
use crate::sim::{Faction, Mission, TurnPhase};

/// Lifetime totals across finished missions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionStats {
    pub games_played: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Aliens killed by soldiers
    pub kills: u32,
    pub soldiers_lost: u32,
    /// Fewest turns taken to win, if ever won
    pub best_turns: Option<u32>,
}

impl MissionStats {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "tactics_classic_stats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished mission into the totals. Returns false (and changes
    /// nothing) while the mission is still running.
    pub fn record(&mut self, mission: &Mission) -> bool {
        let Some(outcome) = mission.outcome() else {
            return false;
        };
        self.games_played += 1;
        match outcome {
            TurnPhase::Victory => {
                self.victories += 1;
                self.best_turns = Some(
                    self.best_turns
                        .map_or(mission.turn_number, |b| b.min(mission.turn_number)),
                );
            }
            _ => self.defeats += 1,
        }
        self.kills += mission
            .units
            .iter()
            .filter(|u| u.faction == Faction::Soldier)
            .map(|u| u.kills)
            .sum::<u32>();
        self.soldiers_lost += mission
            .units
            .iter()
            .filter(|u| u.faction == Faction::Soldier && !u.alive)
            .count() as u32;
        log::info!(
            "Recorded {:?}: {} played, {} won",
            outcome,
            self.games_played,
            self.victories
        );
        true
    }

    /// Share of missions won (0.0 when none played)
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.victories as f32 / self.games_played as f32
        }
    }

    pub fn load_from<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save_to<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    /// Load stats from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::persistence::LocalStore::open() {
            Some(store) => Self::load_from(&store),
            None => Self::new(),
        }
    }

    /// Save stats to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(mut store) = crate::persistence::LocalStore::open() {
            if let Err(err) = self.save_to(&mut store) {
                log::warn!("Stats not saved: {}", err);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
