//! Pathfinding over the 8-neighbourhood with TU costs
//!
//! Frontier expansion with cost relaxation: the cheapest path wins and equal
//! costs resolve by tile order, so results are deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::map::{Map, Terrain};
use crate::tuning::Rules;

/// Orthogonal neighbours first, then diagonals
const NEIGHBORS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// A route from a unit's tile. `steps` excludes the start and ends at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<IVec2>,
    pub cost: u32,
}

impl Path {
    pub fn destination(&self) -> Option<IVec2> {
        self.steps.last().copied()
    }
}

/// Extra TU for entering a tile of this terrain
pub fn terrain_surcharge(rules: &Rules, terrain: Terrain) -> u32 {
    match terrain {
        Terrain::Cover => rules.cover_surcharge,
        Terrain::Bush => rules.bush_surcharge,
        Terrain::Ground | Terrain::Wall => 0,
    }
}

/// TU to step from `from` onto the adjacent tile `to`, ignoring occupancy.
///
/// `None` when `to` is not adjacent or not walkable. Walls beside a
/// diagonal do not block it.
pub fn step_cost(map: &Map, rules: &Rules, from: IVec2, to: IVec2) -> Option<u32> {
    let delta = to - from;
    if delta == IVec2::ZERO || delta.x.abs() > 1 || delta.y.abs() > 1 {
        return None;
    }
    let terrain = map.terrain(to).filter(|t| *t != Terrain::Wall)?;
    let diagonal = delta.x != 0 && delta.y != 0;
    let base = if diagonal {
        rules.diagonal_cost
    } else {
        rules.orthogonal_cost
    };
    Some(base + terrain_surcharge(rules, terrain))
}

struct Search {
    width: i32,
    dist: Vec<Option<u32>>,
    prev: Vec<Option<IVec2>>,
}

impl Search {
    fn index(&self, p: IVec2) -> usize {
        (p.y * self.width + p.x) as usize
    }

    fn cost(&self, p: IVec2) -> Option<u32> {
        self.dist[self.index(p)]
    }
}

fn explore(map: &Map, rules: &Rules, from: IVec2, goal: Option<IVec2>, budget: u32) -> Search {
    let len = (map.width() * map.height()) as usize;
    let mut search = Search {
        width: map.width(),
        dist: vec![None; len],
        prev: vec![None; len],
    };
    if !map.in_bounds(from) {
        return search;
    }

    let start = search.index(from);
    search.dist[start] = Some(0);
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((0u32, from.y, from.x)));

    while let Some(Reverse((cost, y, x))) = frontier.pop() {
        let here = IVec2::new(x, y);
        if search.cost(here).is_some_and(|best| cost > best) {
            continue;
        }
        if goal == Some(here) {
            break;
        }
        for offset in NEIGHBORS {
            let next = here + offset;
            let Some(edge) = step_cost(map, rules, here, next) else {
                continue;
            };
            // Other units block transit but may be the destination
            if map.occupant(next).is_some() && goal != Some(next) {
                continue;
            }
            let total = cost + edge;
            if total > budget {
                continue;
            }
            let i = search.index(next);
            if search.dist[i].is_none_or(|best| total < best) {
                search.dist[i] = Some(total);
                search.prev[i] = Some(here);
                frontier.push(Reverse((total, next.y, next.x)));
            }
        }
    }
    search
}

/// Cheapest path from `from` to `to`, if any
pub fn find_path(map: &Map, rules: &Rules, from: IVec2, to: IVec2) -> Option<Path> {
    if from == to || !map.in_bounds(from) || !map.is_walkable(to) {
        return None;
    }
    let search = explore(map, rules, from, Some(to), u32::MAX);
    let cost = search.cost(to)?;

    let mut steps = vec![to];
    let mut cursor = to;
    while let Some(p) = search.prev[search.index(cursor)] {
        if p == from {
            break;
        }
        steps.push(p);
        cursor = p;
    }
    steps.reverse();
    Some(Path { steps, cost })
}

/// Every free tile reachable within `budget` TU, with its cost, in row-major order
pub fn reachable(map: &Map, rules: &Rules, from: IVec2, budget: u32) -> Vec<(IVec2, u32)> {
    let search = explore(map, rules, from, None, budget);
    map.positions()
        .filter(|&p| p != from && map.occupant(p).is_none())
        .filter_map(|p| search.cost(p).map(|c| (p, c)))
        .collect()
}

/// Cost of walking a prefix of `path` (first `n` steps) starting at `from`
pub fn prefix_cost(map: &Map, rules: &Rules, from: IVec2, path: &Path, n: usize) -> u32 {
    let mut prev = from;
    let mut total = 0;
    for &step in path.steps.iter().take(n) {
        total += step_cost(map, rules, prev, step).unwrap_or(0);
        prev = step;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::unit::UnitId;

    #[test]
    fn test_diagonal_onto_bush_costs_eight() {
        let mut map = Map::new(5, 5);
        map.set_terrain(IVec2::new(2, 2), Terrain::Bush);
        let rules = Rules::default();
        let path = find_path(&map, &rules, IVec2::new(1, 1), IVec2::new(2, 2)).unwrap();
        assert_eq!(path.cost, 8);
        assert_eq!(path.steps, vec![IVec2::new(2, 2)]);
    }

    #[test]
    fn test_step_costs() {
        let mut map = Map::new(5, 5);
        map.set_terrain(IVec2::new(2, 1), Terrain::Cover);
        let rules = Rules::default();
        assert_eq!(step_cost(&map, &rules, IVec2::new(1, 1), IVec2::new(2, 1)), Some(5));
        assert_eq!(step_cost(&map, &rules, IVec2::new(1, 1), IVec2::new(1, 2)), Some(4));
        assert_eq!(step_cost(&map, &rules, IVec2::new(1, 1), IVec2::new(3, 1)), None);
    }

    #[test]
    fn test_path_routes_around_wall() {
        let mut map = Map::new(5, 5);
        for y in 0..4 {
            map.set_terrain(IVec2::new(2, y), Terrain::Wall);
        }
        let rules = Rules::default();
        let path = find_path(&map, &rules, IVec2::new(0, 0), IVec2::new(4, 0)).unwrap();
        assert_eq!(path.destination(), Some(IVec2::new(4, 0)));
        assert!(path.steps.iter().all(|p| map.is_walkable(*p)));
        assert_eq!(path.steps.iter().filter(|p| **p == IVec2::new(2, 4)).count(), 1);
        // Cost matches the sum of its steps
        assert_eq!(
            prefix_cost(&map, &rules, IVec2::new(0, 0), &path, path.steps.len()),
            path.cost
        );
    }

    #[test]
    fn test_occupied_tiles_block_transit_but_not_destination() {
        let mut map = Map::new(3, 1);
        map.place(IVec2::new(1, 0), UnitId(2));
        let rules = Rules::default();
        assert!(find_path(&map, &rules, IVec2::new(0, 0), IVec2::new(2, 0)).is_none());
        let path = find_path(&map, &rules, IVec2::new(0, 0), IVec2::new(1, 0)).unwrap();
        assert_eq!(path.cost, 4);
    }

    #[test]
    fn test_diagonal_past_wall_corner() {
        let mut map = Map::new(4, 4);
        map.set_terrain(IVec2::new(2, 1), Terrain::Wall);
        map.set_terrain(IVec2::new(2, 2), Terrain::Bush);
        let rules = Rules::default();
        assert_eq!(step_cost(&map, &rules, IVec2::new(1, 1), IVec2::new(2, 2)), Some(8));
        let path = find_path(&map, &rules, IVec2::new(1, 1), IVec2::new(2, 2)).unwrap();
        assert_eq!(path.steps, vec![IVec2::new(2, 2)]);
        assert_eq!(path.cost, 8);
        // The wall itself stays closed
        assert_eq!(step_cost(&map, &rules, IVec2::new(1, 0), IVec2::new(2, 1)), None);
    }

    #[test]
    fn test_reachable_within_budget() {
        let map = Map::new(10, 1);
        let rules = Rules::default();
        let tiles = reachable(&map, &rules, IVec2::new(0, 0), 12);
        assert_eq!(
            tiles,
            vec![(IVec2::new(1, 0), 4), (IVec2::new(2, 0), 8), (IVec2::new(3, 0), 12)]
        );
    }

    #[test]
    fn test_unreachable_destination() {
        let mut map = Map::new(3, 3);
        map.set_terrain(IVec2::new(1, 1), Terrain::Wall);
        let rules = Rules::default();
        assert!(find_path(&map, &rules, IVec2::new(0, 0), IVec2::new(1, 1)).is_none());
        assert!(find_path(&map, &rules, IVec2::new(0, 0), IVec2::new(0, 0)).is_none());
    }
}
