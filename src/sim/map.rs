//! Tile grid

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::unit::UnitId;

/// Terrain class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Ground,
    /// Blocks movement and sight
    Wall,
    Cover,
    Bush,
}

/// What the player currently knows about a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FogState {
    Visible,
    /// Seen before, not in sight now (rendered dim)
    Explored,
    /// Never seen (rendered as pure fog)
    Unexplored,
}

/// A single map cell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub visible: bool,
    pub explored: bool,
    pub occupant: Option<UnitId>,
}

impl Tile {
    pub fn fog(&self) -> FogState {
        if self.visible {
            FogState::Visible
        } else if self.explored {
            FogState::Explored
        } else {
            FogState::Unexplored
        }
    }
}

/// Fixed-size mission map (row-major)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Create an all-ground map
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn tile(&self, pos: IVec2) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, pos: IVec2) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn terrain(&self, pos: IVec2) -> Option<Terrain> {
        self.tile(pos).map(|t| t.terrain)
    }

    /// Change a tile's terrain. Walls evict nothing: callers must not wall an occupied tile.
    pub fn set_terrain(&mut self, pos: IVec2, terrain: Terrain) {
        if let Some(tile) = self.tile_mut(pos) {
            if terrain == Terrain::Wall && tile.occupant.is_some() {
                return;
            }
            tile.terrain = terrain;
        }
    }

    /// In bounds and not a wall
    pub fn is_walkable(&self, pos: IVec2) -> bool {
        matches!(self.terrain(pos), Some(t) if t != Terrain::Wall)
    }

    /// Blocks line of sight (out-of-bounds counts as opaque)
    pub fn is_opaque(&self, pos: IVec2) -> bool {
        !matches!(self.terrain(pos), Some(t) if t != Terrain::Wall)
    }

    pub fn occupant(&self, pos: IVec2) -> Option<UnitId> {
        self.tile(pos).and_then(|t| t.occupant)
    }

    /// Claim a tile for a unit. Fails on walls and occupied tiles.
    pub fn place(&mut self, pos: IVec2, id: UnitId) -> bool {
        match self.tile_mut(pos) {
            Some(tile) if tile.terrain != Terrain::Wall && tile.occupant.is_none() => {
                tile.occupant = Some(id);
                true
            }
            _ => false,
        }
    }

    /// Release a tile
    pub fn clear(&mut self, pos: IVec2) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupant = None;
        }
    }

    /// Reset current visibility (explored flags persist)
    pub fn clear_visibility(&mut self) {
        for tile in &mut self.tiles {
            tile.visible = false;
        }
    }

    /// Mark a tile visible and permanently explored
    pub fn reveal(&mut self, pos: IVec2) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.visible = true;
            tile.explored = true;
        }
    }

    pub fn fog(&self, pos: IVec2) -> FogState {
        self.tile(pos)
            .map(Tile::fog)
            .unwrap_or(FogState::Unexplored)
    }

    /// All tile positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x, y)))
    }
}

/// Manhattan distance between two tiles
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_never_walkable_or_occupied() {
        let mut map = Map::new(4, 4);
        let pos = IVec2::new(1, 1);
        map.set_terrain(pos, Terrain::Wall);
        assert!(!map.is_walkable(pos));
        assert!(map.is_opaque(pos));
        assert!(!map.place(pos, UnitId(1)));
        assert_eq!(map.occupant(pos), None);
    }

    #[test]
    fn test_cannot_wall_occupied_tile() {
        let mut map = Map::new(4, 4);
        let pos = IVec2::new(2, 2);
        assert!(map.place(pos, UnitId(7)));
        map.set_terrain(pos, Terrain::Wall);
        assert_eq!(map.terrain(pos), Some(Terrain::Ground));
    }

    #[test]
    fn test_single_occupant() {
        let mut map = Map::new(3, 3);
        let pos = IVec2::new(0, 0);
        assert!(map.place(pos, UnitId(1)));
        assert!(!map.place(pos, UnitId(2)));
        assert_eq!(map.occupant(pos), Some(UnitId(1)));
        map.clear(pos);
        assert!(map.place(pos, UnitId(2)));
    }

    #[test]
    fn test_fog_states() {
        let mut map = Map::new(3, 3);
        let pos = IVec2::new(1, 2);
        assert_eq!(map.fog(pos), FogState::Unexplored);
        map.reveal(pos);
        assert_eq!(map.fog(pos), FogState::Visible);
        map.clear_visibility();
        assert_eq!(map.fog(pos), FogState::Explored);
    }

    #[test]
    fn test_out_of_bounds() {
        let map = Map::new(5, 3);
        assert!(!map.in_bounds(IVec2::new(5, 0)));
        assert!(!map.in_bounds(IVec2::new(0, -1)));
        assert!(map.is_opaque(IVec2::new(-1, 0)));
        assert!(!map.is_walkable(IVec2::new(0, 3)));
        assert_eq!(map.positions().count(), 15);
    }
}
