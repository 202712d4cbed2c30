//! Procedural mission generation
//!
//! Layout: a solid wall border, a handful of hollow buildings with one
//! doorway each in the middle band, scattered cover and bush, then the squad
//! on the west strip and the aliens on the east strip.

use glam::IVec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::map::{Map, Terrain};
use super::state::{GameEvent, Mission};
use super::unit::{AlienKind, Faction, StatBlock};
use super::weapon::Weapon;
use crate::tuning::Rules;

const SQUAD_NAMES: [&str; 8] = [
    "Vasquez", "Okafor", "Lindqvist", "Moreau", "Tanaka", "Brennan", "Kowalski", "Silva",
];

/// Chance per open tile of low cover / bush
const COVER_CHANCE: f32 = 0.08;
const BUSH_CHANCE: f32 = 0.08;

/// Standard issue for an archetype
pub fn alien_loadout(kind: AlienKind, burst: u32) -> Weapon {
    match kind {
        AlienKind::Sectoid => Weapon::plasma_pistol(burst),
        AlienKind::Floater => Weapon::plasma_rifle(burst),
        AlienKind::Muton => Weapon::heavy_cannon(),
    }
}

/// Axis-aligned building footprint (inclusive corners)
#[derive(Debug, Clone, Copy)]
struct Footprint {
    min: IVec2,
    max: IVec2,
}

impl Footprint {
    /// Overlap test with a one-tile gap
    fn crowds(&self, other: &Footprint) -> bool {
        self.min.x - 1 <= other.max.x
            && other.min.x - 1 <= self.max.x
            && self.min.y - 1 <= other.max.y
            && other.min.y - 1 <= self.max.y
    }

    fn is_corner(&self, p: IVec2) -> bool {
        (p.x == self.min.x || p.x == self.max.x) && (p.y == self.min.y || p.y == self.max.y)
    }

    fn perimeter(&self) -> Vec<IVec2> {
        let mut tiles = Vec::new();
        for y in self.min.y..=self.max.y {
            for x in self.min.x..=self.max.x {
                if x == self.min.x || x == self.max.x || y == self.min.y || y == self.max.y {
                    tiles.push(IVec2::new(x, y));
                }
            }
        }
        tiles
    }
}

/// Build a fresh mission from a seed
pub fn generate_mission(seed: u64, rules: Rules) -> Mission {
    let (width, height) = (rules.map_width.max(3), rules.map_height.max(3));
    let mut mission = Mission::new(seed, rules, Map::new(width, height));
    let mut rng = mission.rng_state.next_rng();

    lay_border(&mut mission.map);
    let buildings = lay_buildings(&mut mission.map, &mission.rules, &mut rng);
    scatter_foliage(&mut mission.map, &mut rng);
    spawn_squad(&mut mission, &mut rng);
    spawn_aliens(&mut mission, &mut rng);

    mission.refresh_visibility();
    log::info!(
        "Mission {} generated: {}x{}, {} buildings, {} soldiers, {} aliens",
        seed,
        width,
        height,
        buildings,
        mission.soldiers().count(),
        mission.aliens().count()
    );
    mission.push_event(GameEvent::MissionStarted { seed });
    mission
}

fn lay_border(map: &mut Map) {
    let (w, h) = (map.width(), map.height());
    for x in 0..w {
        map.set_terrain(IVec2::new(x, 0), Terrain::Wall);
        map.set_terrain(IVec2::new(x, h - 1), Terrain::Wall);
    }
    for y in 0..h {
        map.set_terrain(IVec2::new(0, y), Terrain::Wall);
        map.set_terrain(IVec2::new(w - 1, y), Terrain::Wall);
    }
}

/// Hollow buildings between the spawn strips. Returns how many were placed.
fn lay_buildings<R: Rng>(map: &mut Map, rules: &Rules, rng: &mut R) -> usize {
    let (w, h) = (map.width(), map.height());
    // Keep a free column beside each strip and a free row inside the border
    let (x_lo, x_hi) = (rules.spawn_strip + 2, w - rules.spawn_strip - 3);
    let (y_lo, y_hi) = (2, h - 3);
    if x_hi - x_lo < 2 || y_hi - y_lo < 2 {
        return 0;
    }

    let wanted = rng.random_range(2..=4usize);
    let mut placed: Vec<Footprint> = Vec::with_capacity(wanted);
    for _ in 0..wanted * 10 {
        if placed.len() == wanted {
            break;
        }
        let bw = rng.random_range(3..=6).min(x_hi - x_lo + 1);
        let bh = rng.random_range(3..=5).min(y_hi - y_lo + 1);
        let min = IVec2::new(
            rng.random_range(x_lo..=x_hi - bw + 1),
            rng.random_range(y_lo..=y_hi - bh + 1),
        );
        let footprint = Footprint {
            min,
            max: min + IVec2::new(bw - 1, bh - 1),
        };
        if placed.iter().any(|p| p.crowds(&footprint)) {
            continue;
        }

        let perimeter = footprint.perimeter();
        for &p in &perimeter {
            map.set_terrain(p, Terrain::Wall);
        }
        let doors: Vec<IVec2> = perimeter
            .into_iter()
            .filter(|&p| !footprint.is_corner(p))
            .collect();
        if let Some(&door) = doors.get(rng.random_range(0..doors.len().max(1))) {
            map.set_terrain(door, Terrain::Ground);
        }
        placed.push(footprint);
    }
    placed.len()
}

fn scatter_foliage<R: Rng>(map: &mut Map, rng: &mut R) {
    let open: Vec<IVec2> = map
        .positions()
        .filter(|&p| map.terrain(p) == Some(Terrain::Ground))
        .collect();
    for p in open {
        let roll: f32 = rng.random();
        if roll < COVER_CHANCE {
            map.set_terrain(p, Terrain::Cover);
        } else if roll < COVER_CHANCE + BUSH_CHANCE {
            map.set_terrain(p, Terrain::Bush);
        }
    }
}

/// Shuffled ground tiles in columns `x_range`
fn spawn_candidates<R: Rng>(map: &Map, x_range: (i32, i32), rng: &mut R) -> Vec<IVec2> {
    let mut tiles: Vec<IVec2> = map
        .positions()
        .filter(|p| p.x >= x_range.0 && p.x <= x_range.1)
        .filter(|&p| map.terrain(p) == Some(Terrain::Ground) && map.occupant(p).is_none())
        .collect();
    tiles.shuffle(rng);
    tiles
}

fn spawn_squad<R: Rng>(mission: &mut Mission, rng: &mut R) {
    let strip = (1, mission.rules.spawn_strip);
    let burst = mission.rules.burst_size;
    let candidates = spawn_candidates(&mission.map, strip, rng);
    for (i, pos) in candidates
        .into_iter()
        .take(mission.rules.squad_size)
        .enumerate()
    {
        let name = SQUAD_NAMES[i % SQUAD_NAMES.len()];
        mission.spawn_unit(
            Faction::Soldier,
            name,
            pos,
            StatBlock::ROOKIE,
            Some(Weapon::rifle(burst)),
            None,
        );
    }
}

fn spawn_aliens<R: Rng>(mission: &mut Mission, rng: &mut R) {
    let w = mission.map.width();
    let strip = (w - 1 - mission.rules.spawn_strip, w - 2);
    let burst = mission.rules.burst_size;
    let total = mission.rules.total_spawn_weight();
    let candidates = spawn_candidates(&mission.map, strip, rng);
    for (i, pos) in candidates
        .into_iter()
        .take(mission.rules.alien_count)
        .enumerate()
    {
        let kind = if total > 0 {
            mission.rules.spawn_kind(rng.random_range(0..total))
        } else {
            AlienKind::Sectoid
        };
        mission.spawn_unit(
            Faction::Alien,
            format!("{} {}", kind.as_str(), i + 1),
            pos,
            StatBlock::for_alien(kind),
            Some(alien_loadout(kind, burst)),
            Some(kind),
        );
    }
}
