//! Player input
//!
//! Raw browser events become [`InputAction`]s; the [`PlayerController`]
//! turns those into mission commands for the selected soldier. Rejected
//! commands simply have no effect.

use glam::{IVec2, Vec2};

use crate::error::ActionError;
use crate::sim::{Faction, FireMode, FogState, Mission, UnitId};

/// Something the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Tile under the cursor was clicked
    ClickTile(IVec2),
    EndTurn,
    ToggleKneel,
    Reload,
    SelectMode(FireMode),
    NextSoldier,
    NewMission,
    /// Sound on/off (a preference, not a mission command)
    ToggleMute,
}

impl InputAction {
    /// Keyboard binding (`KeyboardEvent.key` values)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | "e" | "E" => Some(InputAction::EndTurn),
            "k" | "K" => Some(InputAction::ToggleKneel),
            "r" | "R" => Some(InputAction::Reload),
            "1" => Some(InputAction::SelectMode(FireMode::Snap)),
            "2" => Some(InputAction::SelectMode(FireMode::Aimed)),
            "3" => Some(InputAction::SelectMode(FireMode::Auto)),
            "Tab" => Some(InputAction::NextSoldier),
            "n" | "N" => Some(InputAction::NewMission),
            "m" | "M" => Some(InputAction::ToggleMute),
            _ => None,
        }
    }
}

/// Where the map sits on the canvas (letterboxed, square tiles)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Canvas size in pixels
    pub canvas: Vec2,
    /// Map size in tiles
    pub map: IVec2,
}

impl GridLayout {
    /// Share of the canvas the map may fill
    const FILL: f32 = 0.96;

    pub fn new(canvas_w: f32, canvas_h: f32, map_w: i32, map_h: i32) -> Self {
        Self {
            canvas: Vec2::new(canvas_w, canvas_h),
            map: IVec2::new(map_w.max(1), map_h.max(1)),
        }
    }

    /// Edge length of one tile in pixels
    pub fn tile_size(&self) -> f32 {
        let fit = self.canvas / self.map.as_vec2();
        fit.x.min(fit.y) * Self::FILL
    }

    /// Pixel position of the map's top-left corner
    pub fn origin(&self) -> Vec2 {
        (self.canvas - self.map.as_vec2() * self.tile_size()) * 0.5
    }

    /// Grid space (tiles, y down) to canvas pixels
    pub fn grid_to_screen(&self, grid: Vec2) -> Vec2 {
        self.origin() + grid * self.tile_size()
    }

    /// Affine grid → NDC transform as `(scale, offset)`; NDC y points up
    pub fn ndc_transform(&self) -> (Vec2, Vec2) {
        let canvas = self.canvas.max(Vec2::ONE);
        let to_ndc = Vec2::new(2.0, -2.0) / canvas;
        let scale = to_ndc * self.tile_size();
        let offset = self.origin() * to_ndc + Vec2::new(-1.0, 1.0);
        (scale, offset)
    }

    /// Grid space to normalized device coordinates
    pub fn grid_to_ndc(&self, grid: Vec2) -> Vec2 {
        let (scale, offset) = self.ndc_transform();
        grid * scale + offset
    }

    /// Tile under a canvas pixel, if it lands on the map
    pub fn screen_to_tile(&self, px: f32, py: f32) -> Option<IVec2> {
        let size = self.tile_size();
        if size <= 0.0 {
            return None;
        }
        let grid = (Vec2::new(px, py) - self.origin()) / size;
        let tile = grid.floor().as_ivec2();
        let inside = tile.x >= 0 && tile.y >= 0 && tile.x < self.map.x && tile.y < self.map.y;
        inside.then_some(tile)
    }
}

/// Outcome of one input
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Nothing to do (no selection, empty tile, unbound key)
    Ignored,
    /// Selection or fire mode changed
    Selected,
    /// A mission command went through
    Applied,
    /// The mission refused the command
    Rejected(ActionError),
    /// Caller should generate a fresh mission
    NewMission,
    /// Caller should flip and persist the mute preference
    ToggleMute,
}

/// Selection state and command dispatch for the human player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerController {
    pub selected: Option<UnitId>,
    pub fire_mode: FireMode,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            selected: None,
            fire_mode: FireMode::Snap,
        }
    }
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a selection that no longer points at a living soldier
    pub fn sync(&mut self, mission: &Mission) {
        let valid = self
            .selected
            .and_then(|id| mission.unit(id))
            .is_some_and(|u| u.alive && u.faction == Faction::Soldier);
        if !valid {
            self.selected = mission.next_soldier(None);
        }
    }

    pub fn handle(&mut self, mission: &mut Mission, action: InputAction) -> Handled {
        self.sync(mission);
        let result = match action {
            InputAction::NewMission => return Handled::NewMission,
            InputAction::ToggleMute => return Handled::ToggleMute,
            InputAction::NextSoldier => {
                self.selected = mission.next_soldier(self.selected);
                return Handled::Selected;
            }
            InputAction::SelectMode(mode) => {
                self.fire_mode = mode;
                return Handled::Selected;
            }
            InputAction::EndTurn => mission.end_turn(),
            InputAction::ToggleKneel => match self.selected {
                Some(id) => mission.toggle_stance(id),
                None => return Handled::Ignored,
            },
            InputAction::Reload => match self.selected {
                Some(id) => mission.reload(id),
                None => return Handled::Ignored,
            },
            InputAction::ClickTile(tile) => return self.click(mission, tile),
        };
        Self::report(result)
    }

    /// Select a soldier, fire at a seen alien, or walk to an empty tile
    fn click(&mut self, mission: &mut Mission, tile: IVec2) -> Handled {
        if let Some(unit) = mission.unit_at(tile) {
            let (id, faction) = (unit.id, unit.faction);
            return match (faction, self.selected) {
                (Faction::Soldier, _) => {
                    self.selected = Some(id);
                    Handled::Selected
                }
                (Faction::Alien, Some(shooter)) if mission.fog_at(tile) == FogState::Visible => {
                    Self::report(mission.fire(shooter, id, self.fire_mode).map(|_| ()))
                }
                _ => Handled::Ignored,
            };
        }
        match self.selected {
            Some(id) => Self::report(mission.move_unit(id, tile).map(|_| ())),
            None => Handled::Ignored,
        }
    }

    fn report(result: Result<(), ActionError>) -> Handled {
        match result {
            Ok(()) => Handled::Applied,
            Err(err) => {
                log::debug!("Command rejected: {}", err);
                Handled::Rejected(err)
            }
        }
    }
}
