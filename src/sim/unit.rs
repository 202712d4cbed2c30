//! Units: soldiers and aliens

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::weapon::Weapon;

/// Stable unit identifier (allocated in spawn order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Soldier,
    Alien,
}

impl Faction {
    pub fn opponent(self) -> Self {
        match self {
            Faction::Soldier => Faction::Alien,
            Faction::Alien => Faction::Soldier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Kneeling,
}

/// Alien archetype (keys behaviour and stat block)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienKind {
    Sectoid,
    Floater,
    Muton,
}

impl AlienKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlienKind::Sectoid => "Sectoid",
            AlienKind::Floater => "Floater",
            AlienKind::Muton => "Muton",
        }
    }
}

/// Base stat block used when spawning a unit
#[derive(Debug, Clone, Copy)]
pub struct StatBlock {
    pub health: i32,
    pub time_units: u32,
    pub reactions: u32,
    pub accuracy: f32,
}

impl StatBlock {
    pub const ROOKIE: StatBlock = StatBlock {
        health: 35,
        time_units: 56,
        reactions: 45,
        accuracy: 60.0,
    };

    pub fn for_alien(kind: AlienKind) -> Self {
        match kind {
            AlienKind::Sectoid => StatBlock {
                health: 30,
                time_units: 54,
                reactions: 63,
                accuracy: 50.0,
            },
            AlienKind::Floater => StatBlock {
                health: 40,
                time_units: 55,
                reactions: 50,
                accuracy: 50.0,
            },
            AlienKind::Muton => StatBlock {
                health: 125,
                time_units: 62,
                reactions: 68,
                accuracy: 60.0,
            },
        }
    }
}

/// A combatant on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub faction: Faction,
    /// Archetype (aliens only)
    pub kind: Option<AlienKind>,
    pub pos: IVec2,
    pub health: i32,
    pub max_health: i32,
    pub tu: u32,
    pub max_tu: u32,
    pub reactions: u32,
    pub accuracy: f32,
    pub stance: Stance,
    pub weapon: Option<Weapon>,
    pub alive: bool,
    #[serde(default)]
    pub kills: u32,
}

impl Unit {
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        faction: Faction,
        pos: IVec2,
        stats: StatBlock,
        weapon: Option<Weapon>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            kind: None,
            pos,
            health: stats.health,
            max_health: stats.health,
            tu: stats.time_units,
            max_tu: stats.time_units,
            reactions: stats.reactions,
            accuracy: stats.accuracy,
            stance: Stance::Standing,
            weapon,
            alive: true,
            kills: 0,
        }
    }

    pub fn is_soldier(&self) -> bool {
        self.faction == Faction::Soldier
    }

    pub fn is_alien(&self) -> bool {
        self.faction == Faction::Alien
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.tu >= cost
    }

    /// Deduct TU, saturating at zero
    pub fn spend_tu(&mut self, cost: u32) {
        self.tu = self.tu.saturating_sub(cost);
    }

    pub fn reset_tu(&mut self) {
        self.tu = self.max_tu;
    }

    /// Apply damage; returns true if this blow killed the unit
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rookie() -> Unit {
        Unit::new(
            UnitId(1),
            "Test",
            Faction::Soldier,
            IVec2::ZERO,
            StatBlock::ROOKIE,
            None,
        )
    }

    #[test]
    fn test_spend_tu_never_negative() {
        let mut unit = rookie();
        unit.spend_tu(50);
        assert_eq!(unit.tu, 6);
        unit.spend_tu(50);
        assert_eq!(unit.tu, 0);
        unit.reset_tu();
        assert_eq!(unit.tu, unit.max_tu);
    }

    #[test]
    fn test_death_at_zero_health() {
        let mut unit = rookie();
        assert!(!unit.take_damage(34));
        assert!(unit.alive);
        assert!(unit.take_damage(1));
        assert!(!unit.alive);
        // Already dead - no second kill
        assert!(!unit.take_damage(10));
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Faction::Soldier.opponent(), Faction::Alien);
        assert_eq!(Faction::Alien.opponent(), Faction::Soldier);
    }
}
