//! Alien behaviour
//!
//! Each archetype owns a fixed script of intents (Strategy pattern). Intents
//! are re-resolved against the live mission when they execute, so a script
//! written at the start of the turn stays valid after units move or die.

use serde::{Deserialize, Serialize};

use super::los::can_see;
use super::map::manhattan;
use super::path::{find_path, prefix_cost};
use super::state::{Mission, TurnPhase};
use super::unit::{AlienKind, UnitId};
use super::weapon::FireMode;
use crate::error::ActionError;

/// One scripted action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Shoot the nearest visible enemy
    Fire(FireMode),
    /// Close distance toward the nearest (visible, else any) enemy
    Advance,
}

/// Per-archetype decision strategy
pub trait Behavior: Sync {
    fn name(&self) -> &'static str;

    /// Intents executed in order once per turn
    fn script(&self) -> &'static [Intent];

    /// Fire mode whose TU cost is held back while advancing
    fn reserve_mode(&self) -> FireMode {
        FireMode::Snap
    }
}

/// Shoot, close in, shoot again
pub struct Aggressive;

impl Behavior for Aggressive {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn script(&self) -> &'static [Intent] {
        &[
            Intent::Fire(FireMode::Snap),
            Intent::Advance,
            Intent::Fire(FireMode::Snap),
        ]
    }
}

/// Rush in, then hose down with auto fire
pub struct Skirmisher;

impl Behavior for Skirmisher {
    fn name(&self) -> &'static str {
        "skirmisher"
    }

    fn script(&self) -> &'static [Intent] {
        &[Intent::Advance, Intent::Fire(FireMode::Auto)]
    }

    fn reserve_mode(&self) -> FireMode {
        FireMode::Auto
    }
}

/// Take an aimed shot, then push forward
pub struct Brute;

impl Behavior for Brute {
    fn name(&self) -> &'static str {
        "brute"
    }

    fn script(&self) -> &'static [Intent] {
        &[
            Intent::Fire(FireMode::Aimed),
            Intent::Advance,
            Intent::Fire(FireMode::Snap),
        ]
    }
}

static AGGRESSIVE: Aggressive = Aggressive;
static SKIRMISHER: Skirmisher = Skirmisher;
static BRUTE: Brute = Brute;

/// Strategy for an archetype
pub fn behavior_for(kind: AlienKind) -> &'static dyn Behavior {
    match kind {
        AlienKind::Sectoid => &AGGRESSIVE,
        AlienKind::Floater => &SKIRMISHER,
        AlienKind::Muton => &BRUTE,
    }
}

/// Strategy for any unit: aliens by archetype, everyone else aggressive
pub fn behavior_of(mission: &Mission, id: UnitId) -> &'static dyn Behavior {
    mission
        .unit(id)
        .and_then(|u| u.kind)
        .map(behavior_for)
        .unwrap_or(&AGGRESSIVE)
}

impl Mission {
    /// Nearest living enemy `id` can see (ties by id)
    pub fn nearest_visible_enemy(&self, id: UnitId) -> Option<UnitId> {
        let me = self.unit(id)?;
        self.living(me.faction.opponent())
            .filter(|e| can_see(&self.map, &self.rules, me.pos, e.pos))
            .min_by_key(|e| (manhattan(me.pos, e.pos), e.id))
            .map(|e| e.id)
    }

    /// Nearest living enemy regardless of sight (ties by id)
    pub fn nearest_enemy(&self, id: UnitId) -> Option<UnitId> {
        let me = self.unit(id)?;
        self.living(me.faction.opponent())
            .min_by_key(|e| (manhattan(me.pos, e.pos), e.id))
            .map(|e| e.id)
    }

    /// Carry out one intent for `actor`. Returns true if anything happened.
    pub(crate) fn execute_intent(&mut self, actor: UnitId, intent: Intent) -> bool {
        if self.is_over() || !self.unit(actor).is_some_and(|u| u.alive) {
            return false;
        }
        match intent {
            Intent::Fire(mode) => self.ai_fire(actor, mode),
            Intent::Advance => self.ai_advance(actor),
        }
    }

    fn ai_fire(&mut self, actor: UnitId, mode: FireMode) -> bool {
        let Some(target) = self.nearest_visible_enemy(actor) else {
            return false;
        };
        let mode = match self.validate_fire(actor, target, mode) {
            Err(ActionError::ModeUnavailable) => FireMode::Snap,
            Err(ActionError::OutOfAmmo) => return self.resolve_reload(actor).is_ok(),
            _ => mode,
        };
        self.resolve_fire(actor, target, mode).is_ok()
    }

    fn ai_advance(&mut self, actor: UnitId) -> bool {
        let Some(target) = self
            .nearest_visible_enemy(actor)
            .or_else(|| self.nearest_enemy(actor))
        else {
            return false;
        };
        let (Some(me), Some(them)) = (self.unit(actor), self.unit(target)) else {
            return false;
        };
        let (from, goal) = (me.pos, them.pos);

        let reserve = me
            .weapon
            .as_ref()
            .filter(|w| w.ammo > 0)
            .and_then(|w| w.mode(behavior_of(self, actor).reserve_mode()).or(w.snap))
            .map(|m| m.tu_cost(me.max_tu))
            .unwrap_or(0);
        let budget = me.tu.saturating_sub(reserve);

        let Some(path) = find_path(&self.map, &self.rules, from, goal) else {
            return false;
        };
        // Stop short of the enemy's own tile
        let walkable = path.steps.len().saturating_sub(1);
        let mut steps = 0;
        while steps < walkable
            && prefix_cost(&self.map, &self.rules, from, &path, steps + 1) <= budget
        {
            steps += 1;
        }
        if steps == 0 {
            return false;
        }
        let dest = path.steps[steps - 1];
        match self.resolve_move(actor, dest) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("{:?} advance to {:?} rejected: {}", actor, dest, err);
                false
            }
        }
    }

    /// Drive every living soldier with the aggressive script (headless play and demos)
    pub fn autopilot_soldiers(&mut self) -> Result<(), ActionError> {
        match self.phase {
            TurnPhase::Player => {}
            TurnPhase::Alien => return Err(ActionError::NotPlayerPhase),
            TurnPhase::Victory | TurnPhase::Defeat => return Err(ActionError::MissionOver),
        }
        let ids: Vec<UnitId> = self.soldiers().map(|u| u.id).collect();
        for id in ids {
            // Soldiers can fall to reaction fire mid-loop
            if self.require_player_unit(id).is_err() {
                continue;
            }
            for &intent in AGGRESSIVE.script() {
                self.execute_intent(id, intent);
                if self.is_over() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Play both sides until the mission ends or `turn_limit` turns pass.
    /// Returns the terminal phase, if one was reached.
    pub fn autoplay(&mut self, turn_limit: u32) -> Option<TurnPhase> {
        while !self.is_over() && self.turn_number <= turn_limit {
            if self.autopilot_soldiers().is_err() || self.end_turn().is_err() {
                break;
            }
            self.run_alien_turn();
        }
        self.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::Terrain;
    use crate::sim::mapgen::generate_mission;
    use crate::sim::state::GameEvent;
    use crate::sim::state::test_support::*;
    use crate::tuning::Rules;
    use glam::IVec2;

    #[test]
    fn test_behavior_table() {
        assert_eq!(behavior_for(AlienKind::Sectoid).name(), "aggressive");
        assert_eq!(
            behavior_for(AlienKind::Sectoid).script(),
            &[
                Intent::Fire(FireMode::Snap),
                Intent::Advance,
                Intent::Fire(FireMode::Snap)
            ]
        );
        assert_eq!(behavior_for(AlienKind::Floater).reserve_mode(), FireMode::Auto);
        assert_eq!(behavior_for(AlienKind::Muton).script()[0], Intent::Fire(FireMode::Aimed));
    }

    #[test]
    fn test_nearest_visible_enemy_ignores_walled_off() {
        let mut mission = open_mission(12, 3);
        let a = add_alien(&mut mission, IVec2::new(6, 1));
        let near = add_soldier(&mut mission, IVec2::new(4, 1));
        let far = add_soldier(&mut mission, IVec2::new(11, 1));
        assert_eq!(mission.nearest_visible_enemy(a), Some(near));

        mission.map.set_terrain(IVec2::new(5, 1), Terrain::Wall);
        mission.map.set_terrain(IVec2::new(5, 0), Terrain::Wall);
        mission.map.set_terrain(IVec2::new(5, 2), Terrain::Wall);
        assert_eq!(mission.nearest_visible_enemy(a), Some(far));
        assert_eq!(mission.nearest_enemy(a), Some(near));
    }

    #[test]
    fn test_advance_stops_short_and_keeps_reserve() {
        let mut mission = open_mission(30, 1);
        let a = add_alien(&mut mission, IVec2::new(29, 0));
        let s = add_soldier(&mut mission, IVec2::new(0, 0));
        // Pretend the alien phase is running
        mission.phase = TurnPhase::Alien;

        assert!(mission.execute_intent(a, Intent::Advance));
        let alien = mission.unit(a).unwrap();
        // 54 TU, 17 held for a snap shot: 9 steps of 4 TU
        assert_eq!(alien.pos, IVec2::new(20, 0));
        assert_eq!(alien.tu, 54 - 36);
        assert!(alien.tu >= 17);
        assert!(mission.unit(s).unwrap().alive);
    }

    #[test]
    fn test_advance_never_enters_target_tile() {
        let mut mission = open_mission(5, 1);
        let a = add_alien(&mut mission, IVec2::new(2, 0));
        add_soldier(&mut mission, IVec2::new(0, 0));
        mission.phase = TurnPhase::Alien;
        assert!(mission.execute_intent(a, Intent::Advance));
        assert_eq!(mission.unit(a).unwrap().pos, IVec2::new(1, 0));
        // Already adjacent: nothing to do
        assert!(!mission.execute_intent(a, Intent::Advance));
    }

    #[test]
    fn test_fire_intent_reloads_when_empty() {
        let mut mission = open_mission(8, 1);
        let a = add_alien(&mut mission, IVec2::new(5, 0));
        add_soldier(&mut mission, IVec2::new(0, 0));
        mission.phase = TurnPhase::Alien;
        mission.unit_mut(a).unwrap().weapon.as_mut().unwrap().ammo = 0;

        assert!(mission.execute_intent(a, Intent::Fire(FireMode::Snap)));
        let events = mission.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Reloaded { unit } if *unit == a))
        );
    }

    #[test]
    fn test_autopilot_soldiers_acts() {
        let mut mission = open_mission(10, 3);
        add_soldier(&mut mission, IVec2::new(0, 1));
        add_alien(&mut mission, IVec2::new(9, 1));
        mission.refresh_visibility();
        mission.autopilot_soldiers().unwrap();
        assert!(!mission.take_events().is_empty());
    }

    #[test]
    fn test_autoplay_is_deterministic() {
        let mut a = generate_mission(11, Rules::default());
        let mut b = generate_mission(11, Rules::default());
        let outcome = a.autoplay(40);
        assert_eq!(outcome, b.autoplay(40));
        assert_eq!(a.turn_number, b.turn_number);
        assert_eq!(
            serde_json::to_string(&a.units).unwrap(),
            serde_json::to_string(&b.units).unwrap()
        );
        if outcome.is_none() {
            assert!(a.turn_number > 40);
        }
    }
}
