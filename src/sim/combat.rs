//! Firing resolution, stance and reload actions

use rand::Rng;

use super::los::can_see;
use super::map::manhattan;
use super::state::{GameEvent, Mission};
use super::unit::{Stance, UnitId};
use super::weapon::{FireMode, ModeStats};
use crate::error::ActionError;
use crate::tuning::Rules;

/// Hit chance (percent) for one shot.
///
/// `accuracy × mode multiplier`, boosted when kneeling, minus a flat penalty
/// per tile of Manhattan distance. Not clamped: values ≥ 100 always hit and
/// values ≤ 0 never do.
pub fn effective_accuracy(
    accuracy: f32,
    stance: Stance,
    mode: &ModeStats,
    distance: i32,
    rules: &Rules,
) -> f32 {
    let mut acc = accuracy * mode.accuracy_multiplier;
    if stance == Stance::Kneeling {
        acc *= rules.kneel_accuracy_bonus;
    }
    acc - rules.distance_penalty * distance as f32
}

/// Roll one shot: `uniform[0, 100) < accuracy`
pub fn roll_hit<R: Rng>(rng: &mut R, accuracy: f32) -> bool {
    rng.random_range(0.0f32..100.0) < accuracy
}

/// Damage for one hit: `damage × uniform[min, max)`, truncated
pub fn roll_damage<R: Rng>(rng: &mut R, damage: u32, rules: &Rules) -> i32 {
    let (lo, hi) = (rules.damage_roll_min, rules.damage_roll_max);
    let factor = if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    };
    (damage as f32 * factor) as i32
}

/// Result of a resolved trigger pull
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireReport {
    pub shots: u32,
    pub hits: u32,
    pub damage: i32,
    pub killed: bool,
}

impl Mission {
    /// Check a shot is legal without changing anything; returns the mode stats and TU cost
    pub fn validate_fire(
        &self,
        shooter: UnitId,
        target: UnitId,
        mode: FireMode,
    ) -> Result<(ModeStats, u32), ActionError> {
        if self.is_over() {
            return Err(ActionError::MissionOver);
        }
        let s = self.require_living(shooter)?;
        let t = self.unit(target).ok_or(ActionError::NoTarget)?;
        if !t.alive || t.faction == s.faction {
            return Err(ActionError::NoTarget);
        }
        let weapon = s.weapon.as_ref().ok_or(ActionError::NoWeapon)?;
        let stats = weapon.mode(mode).ok_or(ActionError::ModeUnavailable)?;
        if weapon.ammo == 0 {
            return Err(ActionError::OutOfAmmo);
        }
        let cost = stats.tu_cost(s.max_tu);
        if !s.can_afford(cost) {
            return Err(ActionError::InsufficientTimeUnits {
                needed: cost,
                available: s.tu,
            });
        }
        if !can_see(&self.map, &self.rules, s.pos, t.pos) {
            return Err(ActionError::TargetNotVisible);
        }
        Ok((stats, cost))
    }

    /// Player order: fire at `target` with `mode`
    pub fn fire(
        &mut self,
        shooter: UnitId,
        target: UnitId,
        mode: FireMode,
    ) -> Result<FireReport, ActionError> {
        self.require_player_unit(shooter)?;
        self.resolve_fire(shooter, target, mode)
    }

    /// Fire regardless of whose turn it is (reaction fire, AI)
    pub(crate) fn resolve_fire(
        &mut self,
        shooter: UnitId,
        target: UnitId,
        mode: FireMode,
    ) -> Result<FireReport, ActionError> {
        let (stats, cost) = self.validate_fire(shooter, target, mode)?;

        let mut rng = self.rng_state.next_rng();
        let rules = self.rules.clone();
        let (accuracy, damage_base, name) = {
            let Some(s) = self.unit_mut(shooter) else {
                return Err(ActionError::UnknownUnit(shooter));
            };
            s.spend_tu(cost);
            let (accuracy, stance, pos, name) = (s.accuracy, s.stance, s.pos, s.name.clone());
            let damage = s.weapon.as_ref().map(|w| w.damage).unwrap_or(0);
            let target_pos = self.unit(target).map(|t| t.pos).unwrap_or(pos);
            let distance = manhattan(pos, target_pos);
            (
                effective_accuracy(accuracy, stance, &stats, distance, &rules),
                damage,
                name,
            )
        };
        log::debug!(
            "{} fires {} at {:?} ({:.0}%)",
            name,
            mode.as_str(),
            target,
            accuracy
        );

        let mut report = FireReport::default();
        for _ in 0..stats.shots {
            let loaded = self
                .unit_mut(shooter)
                .and_then(|s| s.weapon.as_mut())
                .is_some_and(|w| w.consume_round());
            if !loaded {
                break;
            }
            report.shots += 1;

            let hit = roll_hit(&mut rng, accuracy);
            let damage = if hit {
                roll_damage(&mut rng, damage_base, &rules)
            } else {
                0
            };
            let killed = match self.unit_mut(target) {
                Some(t) if hit => t.take_damage(damage),
                _ => false,
            };
            if hit {
                report.hits += 1;
                report.damage += damage;
            }
            self.push_event(GameEvent::ShotFired {
                shooter,
                target,
                mode,
                accuracy,
                hit,
                damage,
            });
            if killed {
                report.killed = true;
                self.kill(target, Some(shooter));
                break;
            }
        }
        Ok(report)
    }

    /// Player order: drop to a kneel
    pub fn kneel(&mut self, id: UnitId) -> Result<(), ActionError> {
        self.change_stance(id, Stance::Kneeling)
    }

    /// Player order: stand back up
    pub fn stand(&mut self, id: UnitId) -> Result<(), ActionError> {
        self.change_stance(id, Stance::Standing)
    }

    /// Kneel if standing, stand if kneeling
    pub fn toggle_stance(&mut self, id: UnitId) -> Result<(), ActionError> {
        let stance = self.require_player_unit(id)?.stance;
        match stance {
            Stance::Standing => self.kneel(id),
            Stance::Kneeling => self.stand(id),
        }
    }

    fn change_stance(&mut self, id: UnitId, stance: Stance) -> Result<(), ActionError> {
        let unit = self.require_player_unit(id)?;
        if unit.stance == stance {
            return Err(ActionError::AlreadyInStance);
        }
        let cost = match stance {
            Stance::Kneeling => self.rules.kneel_cost,
            Stance::Standing => self.rules.stand_cost,
        };
        if !unit.can_afford(cost) {
            return Err(ActionError::InsufficientTimeUnits {
                needed: cost,
                available: unit.tu,
            });
        }
        if let Some(unit) = self.unit_mut(id) {
            unit.spend_tu(cost);
            unit.stance = stance;
        }
        self.push_event(GameEvent::StanceChanged { unit: id, stance });
        Ok(())
    }

    /// Player order: refill the magazine
    pub fn reload(&mut self, id: UnitId) -> Result<(), ActionError> {
        self.require_player_unit(id)?;
        self.resolve_reload(id)
    }

    pub(crate) fn resolve_reload(&mut self, id: UnitId) -> Result<(), ActionError> {
        let cost = self.rules.reload_cost;
        let unit = self.require_living(id)?;
        let weapon = unit.weapon.as_ref().ok_or(ActionError::NoWeapon)?;
        if weapon.is_full() {
            return Err(ActionError::MagazineFull);
        }
        if !unit.can_afford(cost) {
            return Err(ActionError::InsufficientTimeUnits {
                needed: cost,
                available: unit.tu,
            });
        }
        if let Some(unit) = self.unit_mut(id) {
            unit.spend_tu(cost);
            if let Some(w) = unit.weapon.as_mut() {
                w.reload();
            }
        }
        self.push_event(GameEvent::Reloaded { unit: id });
        Ok(())
    }
}
