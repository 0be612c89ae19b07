//! Per-cell tile state

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Territory type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Claimed territory: safe for the player, lethal for enemies
    Walkable,
    /// Unclaimed territory: enemies roam here, the player cuts through it
    Slippery,
}

/// A single grid cell
///
/// Tiles live for the whole game; a level restart calls
/// [`Tile::reset_to_default`] instead of rebuilding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    coords: IVec2,
    center: Vec2,
    original_type: TileType,
    pub tile_type: TileType,
    /// A mover currently stands on this tile
    pub highlighted: bool,
    /// Part of the player's in-progress cut
    pub capturing: bool,
}

impl Tile {
    pub fn new(coords: IVec2, center: Vec2, tile_type: TileType) -> Self {
        Self {
            coords,
            center,
            original_type: tile_type,
            tile_type,
            highlighted: false,
            capturing: false,
        }
    }

    /// Grid coordinates (x = column, y = row)
    #[inline]
    pub fn coords(&self) -> IVec2 {
        self.coords
    }

    /// World-space center
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn original_type(&self) -> TileType {
        self.original_type
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.tile_type == TileType::Walkable
    }

    #[inline]
    pub fn is_slippery(&self) -> bool {
        self.tile_type == TileType::Slippery
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Flag a slippery tile as part of the cut being drawn
    pub fn mark_capturing(&mut self) {
        if self.is_slippery() {
            self.capturing = true;
        }
    }

    /// Convert to claimed territory
    pub fn mark_captured(&mut self) {
        self.tile_type = TileType::Walkable;
        self.highlighted = false;
        self.capturing = false;
    }

    /// Restore the type the tile was built with and clear transient flags
    pub fn reset_to_default(&mut self) {
        self.tile_type = self.original_type;
        self.highlighted = false;
        self.capturing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slippery() -> Tile {
        Tile::new(IVec2::new(3, 4), Vec2::new(-5.5, -1.0), TileType::Slippery)
    }

    #[test]
    fn test_mark_captured_clears_flags() {
        let mut tile = slippery();
        tile.set_highlighted(true);
        tile.mark_capturing();
        assert!(tile.capturing);

        tile.mark_captured();
        assert!(tile.is_walkable());
        assert!(!tile.highlighted);
        assert!(!tile.capturing);
    }

    #[test]
    fn test_reset_round_trip() {
        let mut tile = slippery();
        tile.mark_capturing();
        tile.mark_captured();
        tile.mark_captured();
        tile.set_highlighted(true);

        tile.reset_to_default();
        assert_eq!(tile.tile_type, tile.original_type());
        assert_eq!(tile.tile_type, TileType::Slippery);
        assert!(!tile.highlighted);
        assert!(!tile.capturing);
        assert_eq!(tile.coords(), IVec2::new(3, 4));
    }

    #[test]
    fn test_walkable_never_capturing() {
        let mut tile = Tile::new(IVec2::ZERO, Vec2::ZERO, TileType::Walkable);
        tile.mark_capturing();
        assert!(!tile.capturing);
    }
}
