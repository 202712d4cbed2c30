//! Line of sight and fog of war
//!
//! Sight is a Bresenham ray test against wall tiles. The ray is always traced
//! from the lexicographically smaller endpoint so `a -> b` and `b -> a`
//! inspect exactly the same tiles.

use glam::IVec2;

use super::map::{Map, manhattan};
use crate::tuning::Rules;

/// Tiles on the Bresenham line from `a` to `b`, endpoints included
pub fn bresenham(a: IVec2, b: IVec2) -> Vec<IVec2> {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut p = a;
    loop {
        line.push(p);
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
    line
}

#[inline]
fn canonical(a: IVec2, b: IVec2) -> (IVec2, IVec2) {
    if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) }
}

/// True when no wall lies strictly between `a` and `b`
pub fn has_line_of_sight(map: &Map, a: IVec2, b: IVec2) -> bool {
    if a == b {
        return true;
    }
    let (from, to) = canonical(a, b);
    let line = bresenham(from, to);
    line[1..line.len() - 1].iter().all(|&p| !map.is_opaque(p))
}

/// Within sight radius and unobstructed
pub fn can_see(map: &Map, rules: &Rules, from: IVec2, to: IVec2) -> bool {
    manhattan(from, to) <= rules.sight_radius && has_line_of_sight(map, from, to)
}

/// Rebuild the visible set from the given viewer positions.
///
/// Every tile a viewer can see becomes visible and permanently explored.
pub fn recompute_visibility<I>(map: &mut Map, rules: &Rules, viewers: I)
where
    I: IntoIterator<Item = IVec2>,
{
    map.clear_visibility();
    let r = rules.sight_radius;
    for eye in viewers {
        for dy in -r..=r {
            let span = r - dy.abs();
            for dx in -span..=span {
                let target = eye + IVec2::new(dx, dy);
                if map.in_bounds(target) && has_line_of_sight(map, eye, target) {
                    map.reveal(target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::{FogState, Terrain};
    use proptest::prelude::*;

    #[test]
    fn test_bresenham_endpoints() {
        let line = bresenham(IVec2::new(0, 0), IVec2::new(5, 2));
        assert_eq!(line.first(), Some(&IVec2::new(0, 0)));
        assert_eq!(line.last(), Some(&IVec2::new(5, 2)));
        assert_eq!(line.len(), 6);

        let single = bresenham(IVec2::new(3, 3), IVec2::new(3, 3));
        assert_eq!(single, vec![IVec2::new(3, 3)]);
    }

    #[test]
    fn test_wall_blocks_sight() {
        let mut map = Map::new(7, 3);
        map.set_terrain(IVec2::new(3, 1), Terrain::Wall);
        assert!(!has_line_of_sight(&map, IVec2::new(0, 1), IVec2::new(6, 1)));
        // The wall itself is visible
        assert!(has_line_of_sight(&map, IVec2::new(0, 1), IVec2::new(3, 1)));
        // Around the wall
        assert!(has_line_of_sight(&map, IVec2::new(0, 0), IVec2::new(6, 0)));
    }

    #[test]
    fn test_can_see_respects_radius() {
        let map = Map::new(30, 3);
        let rules = Rules::default();
        let eye = IVec2::new(0, 0);
        assert!(can_see(&map, &rules, eye, IVec2::new(10, 0)));
        assert!(!can_see(&map, &rules, eye, IVec2::new(10, 1)));
    }

    #[test]
    fn test_visibility_and_exploration() {
        let mut map = Map::new(20, 5);
        map.set_terrain(IVec2::new(5, 2), Terrain::Wall);
        let rules = Rules {
            sight_radius: 8,
            ..Rules::default()
        };

        recompute_visibility(&mut map, &rules, [IVec2::new(2, 2)]);
        assert_eq!(map.fog(IVec2::new(4, 2)), FogState::Visible);
        assert_eq!(map.fog(IVec2::new(5, 2)), FogState::Visible);
        assert_eq!(map.fog(IVec2::new(6, 2)), FogState::Unexplored);
        assert_eq!(map.fog(IVec2::new(15, 2)), FogState::Unexplored);

        // Viewer leaves: previously seen tiles stay explored
        recompute_visibility(&mut map, &rules, [IVec2::new(17, 0)]);
        assert_eq!(map.fog(IVec2::new(4, 2)), FogState::Explored);
        assert_eq!(map.fog(IVec2::new(15, 2)), FogState::Visible);

        // No viewers: nothing visible
        recompute_visibility(&mut map, &rules, std::iter::empty());
        assert_eq!(map.fog(IVec2::new(15, 2)), FogState::Explored);
    }

    fn arb_map() -> impl Strategy<Value = Map> {
        prop::collection::vec(prop::bool::weighted(0.25), 12 * 12).prop_map(|walls| {
            let mut map = Map::new(12, 12);
            for (i, wall) in walls.into_iter().enumerate() {
                if wall {
                    let pos = IVec2::new(i as i32 % 12, i as i32 / 12);
                    map.set_terrain(pos, Terrain::Wall);
                }
            }
            map
        })
    }

    proptest! {
        #[test]
        fn prop_line_of_sight_is_symmetric(
            map in arb_map(),
            ax in 0..12i32, ay in 0..12i32,
            bx in 0..12i32, by in 0..12i32,
        ) {
            let a = IVec2::new(ax, ay);
            let b = IVec2::new(bx, by);
            prop_assert_eq!(has_line_of_sight(&map, a, b), has_line_of_sight(&map, b, a));
        }

        #[test]
        fn prop_bresenham_steps_are_adjacent(
            ax in -20..20i32, ay in -20..20i32,
            bx in -20..20i32, by in -20..20i32,
        ) {
            let line = bresenham(IVec2::new(ax, ay), IVec2::new(bx, by));
            for pair in line.windows(2) {
                let d = (pair[1] - pair[0]).abs();
                prop_assert!(d.x <= 1 && d.y <= 1 && d != IVec2::ZERO);
            }
        }
    }
}
