//! Data-driven game balance
//!
//! Every constant the tactical rules depend on lives in [`Rules`]. The
//! defaults reproduce the classic balance; JSON overrides only need to name
//! the fields they change.

use serde::{Deserialize, Serialize};

use crate::sim::AlienKind;

/// One weighted row of the alien spawn table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: AlienKind,
    pub weight: u32,
}

/// Tactical rules and balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    // === Map / mission ===
    pub map_width: i32,
    pub map_height: i32,
    pub squad_size: usize,
    pub alien_count: usize,
    /// Width of the west/east spawn strips (tiles)
    pub spawn_strip: i32,
    pub spawn_table: Vec<SpawnEntry>,

    // === Vision ===
    /// Manhattan radius of unit sight
    pub sight_radius: i32,

    // === Movement ===
    pub orthogonal_cost: u32,
    pub diagonal_cost: u32,
    pub cover_surcharge: u32,
    pub bush_surcharge: u32,

    // === Stance / actions ===
    pub kneel_cost: u32,
    pub stand_cost: u32,
    pub reload_cost: u32,

    // === Firing ===
    /// Multiplier applied to accuracy while kneeling
    pub kneel_accuracy_bonus: f32,
    /// Accuracy lost per tile of Manhattan distance
    pub distance_penalty: f32,
    pub damage_roll_min: f32,
    pub damage_roll_max: f32,
    pub burst_size: u32,

    // === Reaction fire ===
    /// Fraction of max TU a unit must still hold to react
    pub reaction_threshold: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            map_width: 24,
            map_height: 18,
            squad_size: 4,
            alien_count: 5,
            spawn_strip: 4,
            spawn_table: vec![
                SpawnEntry { kind: AlienKind::Sectoid, weight: 6 },
                SpawnEntry { kind: AlienKind::Floater, weight: 3 },
                SpawnEntry { kind: AlienKind::Muton, weight: 1 },
            ],

            sight_radius: 10,

            orthogonal_cost: 4,
            diagonal_cost: 6,
            cover_surcharge: 1,
            bush_surcharge: 2,

            kneel_cost: 4,
            stand_cost: 8,
            reload_cost: 15,

            kneel_accuracy_bonus: 1.15,
            distance_penalty: 2.0,
            damage_roll_min: 0.5,
            damage_roll_max: 1.5,
            burst_size: 3,

            reaction_threshold: 0.25,
        }
    }
}

impl Rules {
    /// Parse rule overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Minimum TU a unit with `max_tu` must hold to take a reaction shot
    pub fn reaction_floor(&self, max_tu: u32) -> u32 {
        (max_tu as f32 * self.reaction_threshold).ceil() as u32
    }

    /// Pick an alien archetype from the spawn table using a roll in `0..total_weight()`
    pub fn spawn_kind(&self, mut roll: u32) -> AlienKind {
        for entry in &self.spawn_table {
            if roll < entry.weight {
                return entry.kind;
            }
            roll -= entry.weight;
        }
        self.spawn_table
            .last()
            .map(|e| e.kind)
            .unwrap_or(AlienKind::Sectoid)
    }

    pub fn total_spawn_weight(&self) -> u32 {
        self.spawn_table.iter().map(|e| e.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules = Rules::from_json(r#"{"sight_radius": 6, "burst_size": 5}"#).unwrap();
        assert_eq!(rules.sight_radius, 6);
        assert_eq!(rules.burst_size, 5);
        assert_eq!(rules.diagonal_cost, 6);
        assert_eq!(rules.reaction_threshold, 0.25);
    }

    #[test]
    fn test_reaction_floor() {
        let rules = Rules::default();
        assert_eq!(rules.reaction_floor(60), 15);
        assert_eq!(rules.reaction_floor(54), 14);
    }

    #[test]
    fn test_spawn_table_walk() {
        let rules = Rules::default();
        assert_eq!(rules.total_spawn_weight(), 10);
        assert_eq!(rules.spawn_kind(0), AlienKind::Sectoid);
        assert_eq!(rules.spawn_kind(5), AlienKind::Sectoid);
        assert_eq!(rules.spawn_kind(6), AlienKind::Floater);
        assert_eq!(rules.spawn_kind(9), AlienKind::Muton);
    }
}
