//! CPU mesh for one frame of the tactical view
//!
//! Everything is emitted in grid space (one unit per tile, y down); the
//! pipeline maps it onto the canvas.

use glam::{IVec2, Vec2};

use super::shapes::{circle, diamond, quad, ring};
use super::vertex::{Vertex, colors};
use crate::sim::path::reachable;
use crate::sim::{AlienKind, FogState, Mission, Stance, Terrain, Unit, UnitId};

/// Presentation-only state layered over the mission
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub selected: Option<UnitId>,
    pub show_move_preview: bool,
}

const UNIT_RADIUS: f32 = 0.32;
const SEGMENTS: u32 = 16;

fn terrain_color(terrain: Terrain) -> [f32; 4] {
    match terrain {
        Terrain::Ground => colors::GROUND,
        Terrain::Wall => colors::WALL,
        Terrain::Cover => colors::COVER,
        Terrain::Bush => colors::BUSH,
    }
}

fn unit_color(unit: &Unit) -> [f32; 4] {
    match unit.kind {
        Some(AlienKind::Sectoid) => colors::SECTOID,
        Some(AlienKind::Floater) => colors::FLOATER,
        Some(AlienKind::Muton) => colors::MUTON,
        None if unit.tu == 0 => colors::SOLDIER_SPENT,
        None => colors::SOLDIER,
    }
}

fn tile_center(pos: IVec2) -> Vec2 {
    pos.as_vec2() + Vec2::splat(0.5)
}

/// Whether the player may see this unit right now
pub fn is_drawn(mission: &Mission, unit: &Unit) -> bool {
    unit.alive && (unit.is_soldier() || mission.fog_at(unit.pos) == FogState::Visible)
}

/// Build the full frame mesh
pub fn build(mission: &Mission, overlay: &Overlay) -> Vec<Vertex> {
    let mut out = Vec::with_capacity((mission.map.width() * mission.map.height()) as usize * 6);

    for pos in mission.map.positions() {
        let Some(tile) = mission.map.tile(pos) else {
            continue;
        };
        let color = match tile.fog() {
            FogState::Visible => terrain_color(tile.terrain),
            FogState::Explored => colors::dim(terrain_color(tile.terrain), colors::EXPLORED_DIM),
            FogState::Unexplored => colors::FOG,
        };
        // Thin gutter between tiles
        let min = pos.as_vec2() + Vec2::splat(0.03);
        quad(&mut out, min, min + Vec2::splat(0.94), color);
    }

    if overlay.show_move_preview {
        move_preview(&mut out, mission, overlay.selected);
    }

    for unit in mission.units.iter().filter(|u| is_drawn(mission, u)) {
        let center = tile_center(unit.pos);
        let color = unit_color(unit);
        match unit.stance {
            Stance::Standing => circle(&mut out, center, UNIT_RADIUS, color, SEGMENTS),
            Stance::Kneeling => diamond(&mut out, center, UNIT_RADIUS, color),
        }
        health_bar(&mut out, unit);
    }

    if let Some(unit) = overlay.selected.and_then(|id| mission.unit(id)) {
        if unit.alive {
            let center = tile_center(unit.pos);
            ring(&mut out, center, 0.4, 0.47, colors::SELECTION, SEGMENTS * 2);
        }
    }
    out
}

fn move_preview(out: &mut Vec<Vertex>, mission: &Mission, selected: Option<UnitId>) {
    let Some(unit) = selected.and_then(|id| mission.unit(id)) else {
        return;
    };
    if !unit.alive || mission.phase != crate::sim::TurnPhase::Player {
        return;
    }
    for (pos, _) in reachable(&mission.map, &mission.rules, unit.pos, unit.tu) {
        let min = pos.as_vec2() + Vec2::splat(0.08);
        quad(out, min, min + Vec2::splat(0.84), colors::MOVE_PREVIEW);
    }
}

fn health_bar(out: &mut Vec<Vertex>, unit: &Unit) {
    if unit.health >= unit.max_health || unit.max_health <= 0 {
        return;
    }
    let frac = (unit.health as f32 / unit.max_health as f32).clamp(0.0, 1.0);
    let min = unit.pos.as_vec2() + Vec2::new(0.1, 0.06);
    quad(
        out,
        min,
        min + Vec2::new(0.8 * frac, 0.08),
        colors::HEALTH_BAR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::*;

    fn count_color(mesh: &[Vertex], color: [f32; 4]) -> usize {
        mesh.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_hidden_aliens_not_drawn() {
        let mut mission = open_mission(30, 1);
        add_soldier(&mut mission, IVec2::new(0, 0));
        let far = add_alien(&mut mission, IVec2::new(29, 0));
        mission.refresh_visibility();
        let overlay = Overlay::default();

        let mesh = build(&mission, &overlay);
        assert_eq!(count_color(&mesh, colors::SECTOID), 0);
        assert_eq!(count_color(&mesh, colors::SOLDIER), (SEGMENTS * 3) as usize);

        let near = add_alien(&mut mission, IVec2::new(3, 0));
        let mesh = build(&mission, &overlay);
        assert!(is_drawn(&mission, mission.unit(near).unwrap()));
        assert!(!is_drawn(&mission, mission.unit(far).unwrap()));
        assert_eq!(count_color(&mesh, colors::SECTOID), (SEGMENTS * 3) as usize);
    }

    #[test]
    fn test_fog_colors() {
        let mut mission = open_mission(30, 1);
        let s = add_soldier(&mut mission, IVec2::new(0, 0));
        add_alien(&mut mission, IVec2::new(29, 0));
        mission.refresh_visibility();
        mission.move_unit(s, IVec2::new(4, 0)).unwrap();

        let mesh = build(&mission, &Overlay::default());
        // Tiles 0..=14 visible, 15..=29 never seen
        assert_eq!(count_color(&mesh, colors::FOG), 15 * 6);
        assert!(count_color(&mesh, colors::GROUND) >= 14 * 6);
    }

    #[test]
    fn test_selection_and_preview() {
        let mut mission = open_mission(5, 5);
        let s = add_soldier(&mut mission, IVec2::new(2, 2));
        add_alien(&mut mission, IVec2::new(4, 4));
        mission.refresh_visibility();
        let overlay = Overlay {
            selected: Some(s),
            show_move_preview: true,
        };
        let mesh = build(&mission, &overlay);
        assert_eq!(count_color(&mesh, colors::SELECTION), (SEGMENTS * 2 * 6) as usize);
        // Every free tile but the soldier's own is reachable on a 5x5 field
        assert_eq!(count_color(&mesh, colors::MOVE_PREVIEW), 23 * 6);
    }
}
