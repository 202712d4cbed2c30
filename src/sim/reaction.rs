//! Reaction fire
//!
//! A unit that still holds enough TU may interrupt an enemy move with a snap
//! shot when its `reactions × remaining TU` beats the mover's
//! `reactions × TU spent on the move`.

use super::los::can_see;
use super::state::{GameEvent, Mission};
use super::unit::UnitId;
use super::weapon::FireMode;

impl Mission {
    /// Reaction score of a unit (`reactions × remaining TU`)
    pub fn reaction_score(&self, id: UnitId) -> u32 {
        self.unit(id).map(|u| u.reactions * u.tu).unwrap_or(0)
    }

    /// Opponents of `mover` that qualify to react, in id order
    pub fn eligible_reactors(&self, mover: UnitId, tu_spent: u32) -> Vec<UnitId> {
        let Some(m) = self.unit(mover).filter(|m| m.alive) else {
            return Vec::new();
        };
        let threshold = m.reactions * tu_spent;
        self.living(m.faction.opponent())
            .filter(|r| r.tu >= self.rules.reaction_floor(r.max_tu))
            .filter(|r| can_see(&self.map, &self.rules, r.pos, m.pos))
            .filter(|r| r.reactions * r.tu > threshold)
            .map(|r| r.id)
            .collect()
    }

    /// Resolve every qualifying reaction shot against `mover`. Returns the reactors that fired.
    pub(crate) fn resolve_reaction_fire(&mut self, mover: UnitId, tu_spent: u32) -> Vec<UnitId> {
        let mut fired = Vec::new();
        for reactor in self.eligible_reactors(mover, tu_spent) {
            let mover_alive = self.unit(mover).is_some_and(|u| u.alive);
            if !mover_alive || self.is_over() {
                break;
            }
            if self.validate_fire(reactor, mover, FireMode::Snap).is_err() {
                continue;
            }
            log::debug!("{:?} reacts to {:?}", reactor, mover);
            self.push_event(GameEvent::ReactionFire {
                reactor,
                target: mover,
            });
            if self.resolve_fire(reactor, mover, FireMode::Snap).is_ok() {
                fired.push(reactor);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::Terrain;
    use crate::sim::state::test_support::*;
    use glam::IVec2;

    #[test]
    fn test_alien_reacts_to_long_move() {
        let mut mission = open_mission(16, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        let a = add_alien(&mut mission, IVec2::new(12, 1));
        // Soldier outlasts the reaction shot
        mission.unit_mut(s).unwrap().health = 10_000;

        mission.move_unit(s, IVec2::new(4, 1)).unwrap();
        let events = mission.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ReactionFire { reactor, target } if *reactor == a && *target == s
        )));
        // Snap shot cost: 30% of 54 = 17 (rounded up)
        assert_eq!(mission.unit(a).unwrap().tu, 54 - 17);
    }

    #[test]
    fn test_low_tu_alien_does_not_react() {
        let mut mission = open_mission(16, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        let a = add_alien(&mut mission, IVec2::new(8, 1));
        // Below 25% of 54
        mission.unit_mut(a).unwrap().tu = 13;
        assert!(mission.eligible_reactors(s, 4).is_empty());
        mission.unit_mut(a).unwrap().tu = 14;
        assert_eq!(mission.eligible_reactors(s, 4), vec![a]);
    }

    #[test]
    fn test_score_must_exceed_mover() {
        let mut mission = open_mission(16, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        let a = add_alien(&mut mission, IVec2::new(8, 1));
        // Alien: 63 × 54 = 3402; soldier 45 × spent
        assert_eq!(mission.reaction_score(a), 3402);
        assert_eq!(mission.eligible_reactors(s, 75), vec![a]);
        assert!(mission.eligible_reactors(s, 76).is_empty());
    }

    #[test]
    fn test_wall_blocks_reaction() {
        let mut mission = open_mission(16, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        add_alien(&mut mission, IVec2::new(8, 1));
        mission.map.set_terrain(IVec2::new(4, 1), Terrain::Wall);
        assert!(mission.eligible_reactors(s, 4).is_empty());
    }

    #[test]
    fn test_aliens_do_not_react_to_aliens() {
        let mut mission = open_mission(16, 3);
        add_soldier(&mut mission, IVec2::new(0, 1));
        let a1 = add_alien(&mut mission, IVec2::new(8, 1));
        add_alien(&mut mission, IVec2::new(9, 1));
        // Opponents of an alien mover are soldiers only
        let reactors = mission.eligible_reactors(a1, 4);
        assert!(reactors.iter().all(|r| mission.unit(*r).unwrap().is_soldier()));
    }

    #[test]
    fn test_reaction_stops_after_mover_dies() {
        let mut mission = open_mission(16, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        // Keeps the mission running after the mover falls
        add_soldier(&mut mission, IVec2::new(0, 2));
        let a1 = add_alien(&mut mission, IVec2::new(12, 1));
        let a2 = add_alien(&mut mission, IVec2::new(12, 0));
        mission.unit_mut(s).unwrap().health = 1;
        mission.unit_mut(a1).unwrap().accuracy = 1000.0;

        mission.move_unit(s, IVec2::new(4, 1)).unwrap();
        assert!(!mission.unit(s).unwrap().alive);
        assert!(!mission.is_over());
        assert_eq!(mission.unit(a1).unwrap().tu, 54 - 17);
        assert_eq!(mission.unit(a2).unwrap().tu, 54);
        let reactors: Vec<UnitId> = mission
            .take_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ReactionFire { reactor, .. } => Some(*reactor),
                _ => None,
            })
            .collect();
        assert_eq!(reactors, vec![a1]);
    }
}
