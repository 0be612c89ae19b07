//! Shared movement and tile-ownership contract for the player and enemies
//!
//! A mover integrates its velocity, stays inside the play area, and owns
//! exactly one tile at a time: the first tile it overlaps, then whichever
//! overlapped tile has the closest center. Ownership changes are the only
//! thing that drives cut tracking.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, PlayArea};
use super::tile::TileType;

/// Animation state reported to the rendering side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverAnim {
    Idle,
    Walking(Direction),
    Dying,
}

impl MoverAnim {
    pub fn from_velocity(vel: Vec2) -> Self {
        Direction::from_vec(vel).map_or(MoverAnim::Idle, MoverAnim::Walking)
    }
}

/// A change of owned tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    /// Previously owned tile (`None` on first contact)
    pub from: Option<IVec2>,
    pub to: IVec2,
}

/// What a tile change means for the cut tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    /// Walkable -> Slippery
    Begin,
    /// Slippery -> Slippery while tracking
    Continue,
    /// Slippery -> Walkable while tracking
    End,
    None,
}

/// Classify a tile transition
pub fn classify(from: TileType, to: TileType, tracking: bool) -> SlideEvent {
    match (from, to, tracking) {
        (TileType::Walkable, TileType::Slippery, _) => SlideEvent::Begin,
        (TileType::Slippery, TileType::Slippery, true) => SlideEvent::Continue,
        (_, TileType::Walkable, true) => SlideEvent::End,
        _ => SlideEvent::None,
    }
}

/// Clamp raw input to unit length and keep only its dominant axis
///
/// An exact tie between non-zero axes keeps the previous direction; no input
/// means stop.
pub fn snap_to_axis(raw: Vec2, previous: Vec2) -> Vec2 {
    let input = raw.clamp_length_max(1.0);
    let (ax, ay) = (input.x.abs(), input.y.abs());
    if ax > ay {
        Vec2::new(input.x, 0.0)
    } else if ay > ax {
        Vec2::new(0.0, input.y)
    } else if ax == 0.0 {
        Vec2::ZERO
    } else {
        previous
    }
}

/// Position, velocity and owned tile of a moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Maximum speed (units/s)
    pub speed: f32,
    /// Half size of the square collider
    pub half_extent: f32,
    pub current_tile: Option<IVec2>,
}

impl Mover {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed,
            half_extent: crate::consts::MOVER_HALF_EXTENT,
            current_tile: None,
        }
    }

    /// Advance by the current velocity and clamp to the play area
    pub fn integrate(&mut self, dt: f32, area: &PlayArea) {
        self.pos = area.clamp(self.pos + self.vel * dt);
    }

    /// Update tile ownership from the tiles the collider overlaps
    ///
    /// Returns a change only when the owned tile is different.
    pub fn detect_tile(&mut self, grid: &Grid) -> Option<TileChange> {
        let pos = self.pos;
        let dist = |c: IVec2| grid.center_of(c).distance(pos);
        let closest = grid
            .overlapping(pos, self.half_extent)
            .into_iter()
            .filter(|&c| Some(c) != self.current_tile)
            .min_by(|&a, &b| {
                dist(a)
                    .partial_cmp(&dist(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let adopt = match self.current_tile {
            None => true,
            Some(current) => dist(closest) < dist(current),
        };
        if !adopt {
            return None;
        }
        let change = TileChange {
            from: self.current_tile,
            to: closest,
        };
        self.current_tile = Some(closest);
        Some(change)
    }

    /// Forget the owned tile (used on respawn)
    pub fn clear_tile(&mut self) {
        self.current_tile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transitions() {
        use TileType::*;
        assert_eq!(classify(Walkable, Slippery, false), SlideEvent::Begin);
        assert_eq!(classify(Slippery, Slippery, true), SlideEvent::Continue);
        assert_eq!(classify(Slippery, Walkable, true), SlideEvent::End);
        assert_eq!(classify(Walkable, Walkable, false), SlideEvent::None);
        assert_eq!(classify(Slippery, Slippery, false), SlideEvent::None);
        assert_eq!(classify(Slippery, Walkable, false), SlideEvent::None);
    }

    #[test]
    fn test_snap_to_axis() {
        let prev = Vec2::new(0.0, 1.0);
        assert_eq!(snap_to_axis(Vec2::new(0.8, 0.3), prev), Vec2::new(0.8, 0.0));
        assert_eq!(snap_to_axis(Vec2::new(0.1, -0.5), prev), Vec2::new(0.0, -0.5));
        assert_eq!(snap_to_axis(Vec2::new(0.5, 0.5), prev), prev);
        assert_eq!(snap_to_axis(Vec2::ZERO, prev), Vec2::ZERO);

        // Clamped to unit length before snapping
        let snapped = snap_to_axis(Vec2::new(3.0, 4.0), prev);
        assert!((snapped.y - 0.8).abs() < 1e-5);
        assert_eq!(snapped.x, 0.0);
    }

    #[test]
    fn test_first_contact_adopts_tile() {
        let grid = Grid::build(18, 11);
        let mut mover = Mover::new(grid.center_of(IVec2::new(0, 0)), 10.0);
        let change = mover.detect_tile(&grid).unwrap();
        assert_eq!(change.from, None);
        assert_eq!(change.to, IVec2::ZERO);
        // No change while standing still
        assert!(mover.detect_tile(&grid).is_none());
    }

    #[test]
    fn test_switches_only_when_closer() {
        let grid = Grid::build(18, 11);
        let start = grid.center_of(IVec2::new(0, 5));
        let mut mover = Mover::new(start, 10.0);
        mover.detect_tile(&grid);

        // Overlapping the next tile but still closer to the current one
        mover.pos = start + Vec2::new(0.3, 0.0);
        assert!(mover.detect_tile(&grid).is_none());

        mover.pos = start + Vec2::new(0.6, 0.0);
        let change = mover.detect_tile(&grid).unwrap();
        assert_eq!(change.from, Some(IVec2::new(0, 5)));
        assert_eq!(change.to, IVec2::new(1, 5));
    }

    #[test]
    fn test_integrate_clamps_to_area() {
        let grid = Grid::build(18, 11);
        let mut mover = Mover::new(grid.center_of(IVec2::ZERO), 10.0);
        mover.vel = Vec2::new(-10.0, -10.0);
        mover.integrate(1.0, &grid.play_area());
        assert_eq!(mover.pos, grid.play_area().min);
    }

    #[test]
    fn test_anim_from_velocity() {
        assert_eq!(MoverAnim::from_velocity(Vec2::ZERO), MoverAnim::Idle);
        assert_eq!(
            MoverAnim::from_velocity(Vec2::new(-3.0, 0.0)),
            MoverAnim::Walking(Direction::Left)
        );
        assert_eq!(
            MoverAnim::from_velocity(Vec2::new(0.0, 2.0)),
            MoverAnim::Walking(Direction::Up)
        );
    }
}
