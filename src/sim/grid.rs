//! Fixed-size tile grid
//!
//! Tiles are stored row-major, so every enumeration (and therefore every
//! minority count built on top of it) is deterministic.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::tile::{Tile, TileType};

/// Axis directions on the grid. Up is +row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor lookup order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, 1),
            Direction::Down => IVec2::new(0, -1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Dominant direction of a vector, `None` for zero
    pub fn from_vec(v: Vec2) -> Option<Self> {
        if v.x == 0.0 && v.y == 0.0 {
            None
        } else if v.x.abs() >= v.y.abs() {
            Some(if v.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if v.y > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}

/// Rectangle the movers are clamped to (spans the border tile centers)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlayArea {
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// The tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    columns: i32,
    rows: i32,
    tile_size: f32,
    /// World position of tile (0, 0)'s center
    origin: Vec2,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid centered on the world origin with unit spacing
    pub fn build(columns: i32, rows: i32) -> Self {
        Self::with_tile_size(columns, rows, crate::consts::TILE_SIZE)
    }

    /// Build a grid centered on the world origin
    pub fn with_tile_size(columns: i32, rows: i32, tile_size: f32) -> Self {
        let origin = -Vec2::new((columns - 1) as f32, (rows - 1) as f32) * tile_size / 2.0;
        Self::with_layout(columns, rows, tile_size, origin)
    }

    /// Build a grid whose tile (0, 0) is centered at `origin`
    ///
    /// The outer ring starts walkable, everything inside starts slippery.
    pub fn with_layout(columns: i32, rows: i32, tile_size: f32, origin: Vec2) -> Self {
        let columns = columns.max(0);
        let rows = rows.max(0);
        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let coords = IVec2::new(col, row);
                let center = origin + coords.as_vec2() * tile_size;
                let border = row == 0 || col == 0 || row == rows - 1 || col == columns - 1;
                let tile_type = if border {
                    TileType::Walkable
                } else {
                    TileType::Slippery
                };
                tiles.push(Tile::new(coords, center, tile_type));
            }
        }
        log::debug!("Built {}x{} grid ({} tiles)", columns, rows, tiles.len());
        Self {
            columns,
            rows,
            tile_size,
            origin,
            tiles,
        }
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn in_bounds(&self, coords: IVec2) -> bool {
        (0..self.columns).contains(&coords.x) && (0..self.rows).contains(&coords.y)
    }

    #[inline]
    fn index(&self, coords: IVec2) -> Option<usize> {
        self.in_bounds(coords)
            .then(|| (coords.y * self.columns + coords.x) as usize)
    }

    /// Tile at the given coordinates; `None` outside the grid
    pub fn get(&self, coords: IVec2) -> Option<&Tile> {
        self.index(coords).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, coords: IVec2) -> Option<&mut Tile> {
        self.index(coords).map(move |i| &mut self.tiles[i])
    }

    /// Type of the tile at `coords`, `None` outside the grid
    pub fn type_at(&self, coords: IVec2) -> Option<TileType> {
        self.get(coords).map(|t| t.tile_type)
    }

    /// All tiles, row-major
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All tiles of a type, row-major
    pub fn by_type(&self, tile_type: TileType) -> Vec<&Tile> {
        self.tiles
            .iter()
            .filter(|t| t.tile_type == tile_type)
            .collect()
    }

    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.tile_type == tile_type)
            .count()
    }

    /// No slippery tiles left
    pub fn is_cleared(&self) -> bool {
        !self.tiles.iter().any(Tile::is_slippery)
    }

    /// The up-to-four axis neighbors that exist, in up/down/left/right order
    pub fn neighbors(&self, coords: IVec2) -> Vec<&Tile> {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.get(coords + dir.offset()))
            .collect()
    }

    /// Reset every tile to its build-time state
    pub fn reset_all(&mut self) {
        for tile in &mut self.tiles {
            tile.reset_to_default();
        }
    }

    /// Fraction of originally slippery tiles that are now walkable
    pub fn captured_fraction(&self) -> f32 {
        let (total, captured) = self
            .tiles
            .iter()
            .filter(|t| t.original_type() == TileType::Slippery)
            .fold((0usize, 0usize), |(total, captured), t| {
                (total + 1, captured + usize::from(t.is_walkable()))
            });
        if total == 0 {
            1.0
        } else {
            captured as f32 / total as f32
        }
    }

    /// World-space center of a tile position (valid even out of bounds)
    #[inline]
    pub fn center_of(&self, coords: IVec2) -> Vec2 {
        self.origin + coords.as_vec2() * self.tile_size
    }

    /// Tile whose square contains `pos`
    pub fn coords_at(&self, pos: Vec2) -> Option<IVec2> {
        let local = (pos - self.origin) / self.tile_size;
        let coords = local.round().as_ivec2();
        self.in_bounds(coords).then_some(coords)
    }

    /// Tiles overlapped by an axis-aligned square collider, row-major
    pub fn overlapping(&self, pos: Vec2, half_extent: f32) -> Vec<IVec2> {
        let local = (pos - self.origin) / self.tile_size;
        let reach = 0.5 + half_extent / self.tile_size;
        let min = (local - Vec2::splat(reach)).floor().as_ivec2();
        let max = (local + Vec2::splat(reach)).ceil().as_ivec2();

        let mut result = Vec::new();
        for row in min.y.max(0)..=max.y.min(self.rows - 1) {
            for col in min.x.max(0)..=max.x.min(self.columns - 1) {
                let d = (local - IVec2::new(col, row).as_vec2()).abs();
                if d.x < reach && d.y < reach {
                    result.push(IVec2::new(col, row));
                }
            }
        }
        result
    }

    /// Clamp rectangle for movers
    pub fn play_area(&self) -> PlayArea {
        PlayArea {
            min: self.center_of(IVec2::ZERO),
            max: self.center_of(IVec2::new(self.columns - 1, self.rows - 1)),
        }
    }

    /// Debug dump, top row first: `#` walkable, `.` slippery, `*` capturing
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.columns + 1) * self.rows) as usize);
        for row in (0..self.rows).rev() {
            for col in 0..self.columns {
                let tile = &self.tiles[(row * self.columns + col) as usize];
                out.push(match (tile.tile_type, tile.capturing) {
                    (TileType::Walkable, _) => '#',
                    (TileType::Slippery, true) => '*',
                    (TileType::Slippery, false) => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}
