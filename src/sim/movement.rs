//! Unit movement

use glam::IVec2;

use super::path::{Path, find_path};
use super::state::{GameEvent, Mission};
use super::unit::{Faction, UnitId};
use crate::error::ActionError;

impl Mission {
    /// Cheapest route for a unit to `dest`, checked against its remaining TU
    pub fn plan_move(&self, id: UnitId, dest: IVec2) -> Result<Path, ActionError> {
        let unit = self.require_living(id)?;
        if !self.map.in_bounds(dest) {
            return Err(ActionError::OutOfBounds(dest));
        }
        if !self.map.is_walkable(dest) {
            return Err(ActionError::Blocked(dest));
        }
        if self.map.occupant(dest).is_some() {
            return Err(ActionError::Occupied(dest));
        }
        let path =
            find_path(&self.map, &self.rules, unit.pos, dest).ok_or(ActionError::NoPath(dest))?;
        if !unit.can_afford(path.cost) {
            return Err(ActionError::InsufficientTimeUnits {
                needed: path.cost,
                available: unit.tu,
            });
        }
        Ok(path)
    }

    /// Player order: walk a soldier to `dest`.
    ///
    /// On success the TU are spent, the unit is relocated, fog is recomputed and
    /// reaction fire is resolved, in that order.
    pub fn move_unit(&mut self, id: UnitId, dest: IVec2) -> Result<Path, ActionError> {
        self.require_player_unit(id)?;
        self.resolve_move(id, dest)
    }

    pub(crate) fn resolve_move(&mut self, id: UnitId, dest: IVec2) -> Result<Path, ActionError> {
        if self.is_over() {
            return Err(ActionError::MissionOver);
        }
        let path = self.plan_move(id, dest)?;
        let faction = self.relocate(id, dest, path.cost)?;

        if faction == Faction::Soldier {
            self.refresh_visibility();
            self.resolve_reaction_fire(id, path.cost);
        }
        Ok(path)
    }

    /// Spend TU and swap tiles in one step
    fn relocate(&mut self, id: UnitId, dest: IVec2, cost: u32) -> Result<Faction, ActionError> {
        let from = self.require_living(id)?.pos;
        if !self.map.place(dest, id) {
            return Err(ActionError::Occupied(dest));
        }
        self.map.clear(from);

        let Some(unit) = self.unit_mut(id) else {
            return Err(ActionError::UnknownUnit(id));
        };
        unit.spend_tu(cost);
        unit.pos = dest;
        let faction = unit.faction;

        self.push_event(GameEvent::UnitMoved {
            unit: id,
            from,
            to: dest,
            tu_spent: cost,
        });
        Ok(faction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::{FogState, Terrain};
    use crate::sim::state::test_support::*;
    use proptest::prelude::*;

    #[test]
    fn test_move_deducts_path_cost() {
        let mut mission = open_mission(12, 12);
        let s = add_soldier(&mut mission, IVec2::new(1, 1));
        add_alien(&mut mission, IVec2::new(11, 11));
        mission.map.set_terrain(IVec2::new(2, 2), Terrain::Bush);

        let path = mission.move_unit(s, IVec2::new(2, 2)).unwrap();
        assert_eq!(path.cost, 8);
        let unit = mission.unit(s).unwrap();
        assert_eq!(unit.tu, 56 - 8);
        assert_eq!(unit.pos, IVec2::new(2, 2));
        assert_eq!(mission.map.occupant(IVec2::new(1, 1)), None);
        assert_eq!(mission.map.occupant(IVec2::new(2, 2)), Some(s));
    }

    #[test]
    fn test_diagonal_move_beside_wall_costs_eight() {
        let mut mission = open_mission(12, 12);
        let s = add_soldier(&mut mission, IVec2::new(1, 1));
        add_alien(&mut mission, IVec2::new(11, 11));
        mission.map.set_terrain(IVec2::new(2, 1), Terrain::Wall);
        mission.map.set_terrain(IVec2::new(2, 2), Terrain::Bush);

        let path = mission.move_unit(s, IVec2::new(2, 2)).unwrap();
        assert_eq!(path.steps, vec![IVec2::new(2, 2)]);
        assert_eq!(path.cost, 8);
        assert_eq!(mission.unit(s).unwrap().tu, 56 - 8);
    }

    #[test]
    fn test_move_rejected_when_too_expensive() {
        let mut mission = open_mission(30, 1);
        let s = add_soldier(&mut mission, IVec2::new(0, 0));
        add_alien(&mut mission, IVec2::new(29, 0));
        // 15 orthogonal steps = 60 TU > 56
        let err = mission.move_unit(s, IVec2::new(15, 0)).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientTimeUnits {
                needed: 60,
                available: 56
            }
        );
        assert_eq!(mission.unit(s).unwrap().pos, IVec2::new(0, 0));
        assert_eq!(mission.unit(s).unwrap().tu, 56);
    }

    #[test]
    fn test_move_rejections() {
        let mut mission = open_mission(6, 6);
        let s = add_soldier(&mut mission, IVec2::new(0, 0));
        let other = add_soldier(&mut mission, IVec2::new(3, 3));
        let a = add_alien(&mut mission, IVec2::new(5, 5));
        mission.map.set_terrain(IVec2::new(2, 0), Terrain::Wall);

        assert_eq!(
            mission.move_unit(s, IVec2::new(9, 0)),
            Err(ActionError::OutOfBounds(IVec2::new(9, 0)))
        );
        assert_eq!(
            mission.move_unit(s, IVec2::new(2, 0)),
            Err(ActionError::Blocked(IVec2::new(2, 0)))
        );
        assert_eq!(
            mission.move_unit(s, IVec2::new(3, 3)),
            Err(ActionError::Occupied(IVec2::new(3, 3)))
        );
        assert_eq!(
            mission.move_unit(a, IVec2::new(4, 4)),
            Err(ActionError::NotControllable(a))
        );
        assert!(mission.move_unit(other, IVec2::new(3, 4)).is_ok());
    }

    #[test]
    fn test_move_updates_fog() {
        let mut mission = open_mission(30, 3);
        let s = add_soldier(&mut mission, IVec2::new(0, 1));
        add_alien(&mut mission, IVec2::new(29, 1));
        mission.refresh_visibility();
        assert_eq!(mission.fog_at(IVec2::new(14, 1)), FogState::Unexplored);

        mission.move_unit(s, IVec2::new(5, 1)).unwrap();
        assert_eq!(mission.fog_at(IVec2::new(14, 1)), FogState::Visible);
        assert_eq!(mission.fog_at(IVec2::new(0, 1)), FogState::Visible);
    }

    proptest! {
        #[test]
        fn prop_move_tu_accounting(x in 0..10i32, y in 0..10i32, bush in prop::bool::ANY) {
            let mut mission = open_mission(10, 10);
            let s = add_soldier(&mut mission, IVec2::new(4, 4));
            add_alien(&mut mission, IVec2::new(9, 9));
            let dest = IVec2::new(x, y);
            if bush {
                mission.map.set_terrain(dest, Terrain::Bush);
            }
            let before = mission.unit(s).unwrap().tu;
            match mission.move_unit(s, dest) {
                Ok(path) => {
                    let unit = mission.unit(s).unwrap();
                    prop_assert_eq!(unit.tu, before - path.cost);
                    prop_assert_eq!(unit.pos, dest);
                }
                Err(_) => prop_assert_eq!(mission.unit(s).unwrap().tu, before),
            }
        }
    }
}
