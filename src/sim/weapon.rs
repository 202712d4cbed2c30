//! Weapons and fire modes

use serde::{Deserialize, Serialize};

/// How a weapon is fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireMode {
    Snap,
    Aimed,
    Auto,
}

impl FireMode {
    pub const ALL: [FireMode; 3] = [FireMode::Snap, FireMode::Aimed, FireMode::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            FireMode::Snap => "Snap",
            FireMode::Aimed => "Aimed",
            FireMode::Auto => "Auto",
        }
    }
}

/// Per-mode accuracy and cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeStats {
    pub accuracy_multiplier: f32,
    /// Cost as a percentage of the shooter's max TU
    pub tu_percent: u32,
    /// Discrete shots per trigger pull
    pub shots: u32,
}

impl ModeStats {
    pub const fn single(accuracy_multiplier: f32, tu_percent: u32) -> Self {
        Self {
            accuracy_multiplier,
            tu_percent,
            shots: 1,
        }
    }

    pub const fn burst(accuracy_multiplier: f32, tu_percent: u32, shots: u32) -> Self {
        Self {
            accuracy_multiplier,
            tu_percent,
            shots,
        }
    }

    /// TU cost for a shooter with `max_tu` (rounded up)
    pub fn tu_cost(&self, max_tu: u32) -> u32 {
        (max_tu * self.tu_percent).div_ceil(100)
    }
}

/// A ranged weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: u32,
    pub snap: Option<ModeStats>,
    pub aimed: Option<ModeStats>,
    pub auto: Option<ModeStats>,
    pub capacity: u32,
    pub ammo: u32,
}

impl Weapon {
    pub fn mode(&self, mode: FireMode) -> Option<ModeStats> {
        match mode {
            FireMode::Snap => self.snap,
            FireMode::Aimed => self.aimed,
            FireMode::Auto => self.auto,
        }
    }

    pub fn is_full(&self) -> bool {
        self.ammo >= self.capacity
    }

    /// Spend one round; false if the magazine is empty
    pub fn consume_round(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn reload(&mut self) {
        self.ammo = self.capacity;
    }

    // === Presets ===

    pub fn rifle(burst: u32) -> Self {
        Self {
            name: "Rifle".to_string(),
            damage: 30,
            snap: Some(ModeStats::single(0.60, 25)),
            aimed: Some(ModeStats::single(1.10, 80)),
            auto: Some(ModeStats::burst(0.35, 35, burst)),
            capacity: 20,
            ammo: 20,
        }
    }

    pub fn heavy_cannon() -> Self {
        Self {
            name: "Heavy Cannon".to_string(),
            damage: 56,
            snap: Some(ModeStats::single(0.60, 33)),
            aimed: Some(ModeStats::single(0.90, 80)),
            auto: None,
            capacity: 6,
            ammo: 6,
        }
    }

    pub fn plasma_pistol(burst: u32) -> Self {
        Self {
            name: "Plasma Pistol".to_string(),
            damage: 52,
            snap: Some(ModeStats::single(0.65, 30)),
            aimed: Some(ModeStats::single(0.85, 60)),
            auto: Some(ModeStats::burst(0.50, 30, burst)),
            capacity: 26,
            ammo: 26,
        }
    }

    pub fn plasma_rifle(burst: u32) -> Self {
        Self {
            name: "Plasma Rifle".to_string(),
            damage: 80,
            snap: Some(ModeStats::single(0.86, 30)),
            aimed: Some(ModeStats::single(1.00, 60)),
            auto: Some(ModeStats::burst(0.55, 36, burst)),
            capacity: 28,
            ammo: 28,
        }
    }
}
