//! Player preferences
//!
//! Persisted separately from stats in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{KeyValueStore, load_or_default, save_json};

/// Presentation settings (never affect the simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Pacing ===
    /// Delay between alien steps during playback
    pub alien_step_delay_ms: u32,

    // === HUD ===
    /// Highlight tiles the selected soldier can reach
    pub show_move_preview: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alien_step_delay_ms: 400,
            show_move_preview: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "tactics_classic_settings";

    /// Gain applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp out-of-range values from hand-edited storage
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.alien_step_delay_ms = self.alien_step_delay_ms.min(5_000);
        self
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn load_from<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default::<Self, S>(store, Self::STORAGE_KEY).sanitized()
    }

    pub fn save_to<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::persistence::LocalStore::open() {
            Some(store) => Self::load_from(&store),
            None => Self::default(),
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(mut store) = crate::persistence::LocalStore::open() {
            match self.save_to(&mut store) {
                Ok(()) => log::info!("Settings saved"),
                Err(err) => log::warn!("Settings not saved: {}", err),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_muted_is_silent() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert!((Settings::default().effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_load_clamps_and_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set_item(Settings::STORAGE_KEY, r#"{"master_volume":3.0,"muted":true}"#)
            .unwrap();
        let settings = Settings::load_from(&store);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.muted);
        assert_eq!(settings.alien_step_delay_ms, 400);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            alien_step_delay_ms: 150,
            show_move_preview: false,
            ..Default::default()
        };
        settings.save_to(&mut store).unwrap();
        assert_eq!(Settings::load_from(&store), settings);
    }

    #[test]
    fn test_toggle_mute_persists() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        settings.save_to(&mut store).unwrap();
        assert!(Settings::load_from(&store).muted);
        assert!(!settings.toggle_mute());
    }
}
