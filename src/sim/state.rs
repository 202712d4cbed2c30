//! Mission state and core simulation types
//!
//! All state that must be persisted for determinism lives here. A mission is
//! reproducible from its seed plus the sequence of commands applied to it.

use std::collections::VecDeque;

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::los::recompute_visibility;
use super::map::{FogState, Map};
use super::turn::AlienStep;
use super::unit::{AlienKind, Faction, Stance, StatBlock, Unit, UnitId};
use super::weapon::{FireMode, Weapon};
use crate::error::ActionError;
use crate::tuning::Rules;

/// Current phase of the turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Player issues orders to soldiers
    Player,
    /// Aliens act one step at a time
    Alien,
    /// All aliens dead
    Victory,
    /// All soldiers dead
    Defeat,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Victory | TurnPhase::Defeat)
    }
}

/// Observable things that happened, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GameEvent {
    MissionStarted {
        seed: u64,
    },
    UnitMoved {
        unit: UnitId,
        from: IVec2,
        to: IVec2,
        tu_spent: u32,
    },
    StanceChanged {
        unit: UnitId,
        stance: Stance,
    },
    Reloaded {
        unit: UnitId,
    },
    ShotFired {
        shooter: UnitId,
        target: UnitId,
        mode: FireMode,
        accuracy: f32,
        hit: bool,
        damage: i32,
    },
    ReactionFire {
        reactor: UnitId,
        target: UnitId,
    },
    UnitKilled {
        unit: UnitId,
        by: Option<UnitId>,
    },
    TurnEnded {
        turn: u32,
    },
    AlienTurnStarted {
        turn: u32,
    },
    TurnStarted {
        turn: u32,
    },
    Victory {
        turn: u32,
    },
    Defeat {
        turn: u32,
    },
}

/// RNG state wrapper for serialization.
///
/// Each random action draws a fresh PCG stream, so the sequence depends only
/// on the seed and the number of actions taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete tactical mission (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    /// Mission seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub rules: Rules,
    pub map: Map,
    /// All units, living and dead (sorted by id)
    pub units: Vec<Unit>,
    pub phase: TurnPhase,
    /// Starts at 1; bumped each time control returns to the player
    pub turn_number: u32,
    /// Pending alien actions for the current alien phase
    pub(crate) alien_queue: VecDeque<AlienStep>,
    /// Events not yet consumed by the presentation layer
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Mission {
    /// Empty mission on the given map (no units yet)
    pub fn new(seed: u64, rules: Rules, map: Map) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            rules,
            map,
            units: Vec::new(),
            phase: TurnPhase::Player,
            turn_number: 1,
            alien_queue: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Place a new unit. Returns `None` if the tile cannot hold it.
    pub fn spawn_unit(
        &mut self,
        faction: Faction,
        name: impl Into<String>,
        pos: IVec2,
        stats: StatBlock,
        weapon: Option<Weapon>,
        kind: Option<AlienKind>,
    ) -> Option<UnitId> {
        let id = UnitId(self.next_id);
        if !self.map.place(pos, id) {
            return None;
        }
        self.next_id += 1;
        let mut unit = Unit::new(id, name, faction, pos, stats, weapon);
        unit.kind = kind;
        self.units.push(unit);
        Some(id)
    }

    // === Queries ===

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.units[i])
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(move |i| &mut self.units[i])
    }

    /// Living units of a faction, in id order
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(move |u| u.alive && u.faction == faction)
    }

    pub fn soldiers(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.living(Faction::Soldier)
    }

    pub fn aliens(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.living(Faction::Alien)
    }

    /// Living aliens standing on currently visible tiles
    pub fn visible_aliens(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.aliens()
            .filter(move |a| self.map.fog(a.pos) == FogState::Visible)
    }

    pub fn unit_at(&self, pos: IVec2) -> Option<&Unit> {
        self.map.occupant(pos).and_then(|id| self.unit(id))
    }

    pub fn fog_at(&self, pos: IVec2) -> FogState {
        self.map.fog(pos)
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Terminal phase, if reached
    pub fn outcome(&self) -> Option<TurnPhase> {
        self.is_over().then_some(self.phase)
    }

    /// Id of the first living soldier after `current` (wrapping)
    pub fn next_soldier(&self, current: Option<UnitId>) -> Option<UnitId> {
        let ids: Vec<UnitId> = self.soldiers().map(|u| u.id).collect();
        match current {
            Some(cur) => ids
                .iter()
                .copied()
                .find(|id| *id > cur)
                .or_else(|| ids.first().copied()),
            None => ids.first().copied(),
        }
    }

    // === Events ===

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    // === Validation helpers ===

    /// A living soldier the player may order right now
    pub(crate) fn require_player_unit(&self, id: UnitId) -> Result<&Unit, ActionError> {
        match self.phase {
            TurnPhase::Victory | TurnPhase::Defeat => return Err(ActionError::MissionOver),
            TurnPhase::Alien => return Err(ActionError::NotPlayerPhase),
            TurnPhase::Player => {}
        }
        let unit = self.require_living(id)?;
        if unit.faction != Faction::Soldier {
            return Err(ActionError::NotControllable(id));
        }
        Ok(unit)
    }

    pub(crate) fn require_living(&self, id: UnitId) -> Result<&Unit, ActionError> {
        let unit = self.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        if !unit.alive {
            return Err(ActionError::UnitDead(id));
        }
        Ok(unit)
    }

    // === State transitions ===

    /// Recompute fog of war from every living soldier
    pub fn refresh_visibility(&mut self) {
        let eyes: Vec<IVec2> = self.soldiers().map(|u| u.pos).collect();
        recompute_visibility(&mut self.map, &self.rules, eyes);
    }

    /// Remove a dead unit from the grid and credit the killer
    pub(crate) fn kill(&mut self, id: UnitId, by: Option<UnitId>) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        unit.alive = false;
        let pos = unit.pos;
        let faction = unit.faction;
        let name = unit.name.clone();
        self.map.clear(pos);

        if let Some(killer) = by {
            if let Some(k) = self.unit_mut(killer) {
                k.kills += 1;
            }
        }
        log::info!("{} killed at ({}, {})", name, pos.x, pos.y);
        self.push_event(GameEvent::UnitKilled { unit: id, by });

        if faction == Faction::Soldier {
            self.refresh_visibility();
        }
        self.check_outcome();
    }

    /// Enter Victory/Defeat when a side is wiped out. Victory wins ties.
    pub(crate) fn check_outcome(&mut self) {
        if self.is_over() {
            return;
        }
        if self.aliens().next().is_none() {
            self.phase = TurnPhase::Victory;
            self.alien_queue.clear();
            log::info!("Victory on turn {}", self.turn_number);
            self.push_event(GameEvent::Victory {
                turn: self.turn_number,
            });
        } else if self.soldiers().next().is_none() {
            self.phase = TurnPhase::Defeat;
            self.alien_queue.clear();
            log::info!("Defeat on turn {}", self.turn_number);
            self.push_event(GameEvent::Defeat {
                turn: self.turn_number,
            });
        }
    }
}
