//! Enemy movers
//!
//! Enemies wander between random slippery tiles. Standing on a walkable tile,
//! or on a slippery tile with no slippery neighbor, kills them.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::motion::{Mover, MoverAnim};
use super::player::set_highlight;
use super::state::GameEvent;
use super::tile::TileType;
use super::tracker::CutTracker;
use crate::config::EnemyConfig;
use crate::consts::ENEMY_ARRIVE_EPSILON;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub mover: Mover,
    pub spawn: Vec2,
    target: Option<IVec2>,
    pub alive: bool,
    anim: MoverAnim,
}

impl Enemy {
    pub fn new(config: &EnemyConfig) -> Self {
        Self {
            mover: Mover::new(config.spawn, config.speed),
            spawn: config.spawn,
            target: None,
            alive: true,
            anim: MoverAnim::Idle,
        }
    }

    /// Tile the enemy is heading for
    pub fn target(&self) -> Option<IVec2> {
        self.target
    }

    pub fn anim(&self) -> MoverAnim {
        self.anim
    }

    /// Back to the spawn point, alive, with no target
    pub fn respawn(&mut self) {
        self.mover.pos = self.spawn;
        self.mover.vel = Vec2::ZERO;
        self.mover.clear_tile();
        self.target = None;
        self.alive = true;
        self.anim = MoverAnim::Idle;
    }

    /// Pick a random slippery tile other than the current target
    ///
    /// Keeps the current target when it is the only candidate.
    pub fn select_random_target<R: Rng>(&mut self, grid: &Grid, rng: &mut R) {
        let candidates: Vec<IVec2> = grid
            .by_type(TileType::Slippery)
            .into_iter()
            .map(|t| t.coords())
            .filter(|&c| Some(c) != self.target)
            .collect();
        if candidates.is_empty() {
            return;
        }
        let next = candidates[rng.random_range(0..candidates.len())];
        log::debug!("Enemy retargeted to {}", next);
        self.target = Some(next);
    }

    /// Apply the capture rules to the current tile
    ///
    /// Returns `true` if the enemy died. A survivor heads for its first
    /// slippery neighbor.
    pub fn check_capture(&mut self, grid: &Grid, index: usize, events: &mut Vec<GameEvent>) -> bool {
        if !self.alive {
            return false;
        }
        let Some(current) = self.mover.current_tile else {
            return false;
        };
        if grid.type_at(current) == Some(TileType::Walkable) {
            self.die(index, events);
            return true;
        }
        match grid
            .neighbors(current)
            .into_iter()
            .find(|t| t.is_slippery())
        {
            Some(escape) => {
                self.target = Some(escape.coords());
                false
            }
            None => {
                self.die(index, events);
                true
            }
        }
    }

    /// The enemy is standing on the unresolved cut
    pub fn touches_trail(&self, grid: &Grid, tracker: &CutTracker) -> bool {
        self.alive
            && self
                .mover
                .current_tile
                .is_some_and(|c| tracker.tile_is_in_sequence(grid, c))
    }

    /// Advance one fixed step toward the target tile
    ///
    /// Highlights the tile the enemy moves onto and clears the one it left,
    /// except for tiles of the in-progress cut.
    pub fn step<R: Rng>(
        &mut self,
        dt: f32,
        grid: &mut Grid,
        rng: &mut R,
        index: usize,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.alive {
            return;
        }
        if self.target.is_none() {
            self.select_random_target(grid, rng);
        }

        self.mover.vel = match self.target.map(|t| grid.center_of(t)) {
            Some(center) if center.distance(self.mover.pos) >= ENEMY_ARRIVE_EPSILON => {
                (center - self.mover.pos).normalize_or_zero() * self.mover.speed
            }
            Some(_) => {
                self.select_random_target(grid, rng);
                Vec2::ZERO
            }
            None => Vec2::ZERO,
        };
        self.mover.integrate(dt, &grid.play_area());

        if let Some(change) = self.mover.detect_tile(grid) {
            if !is_capturing(grid, change.to) {
                set_highlight(grid, change.to, true, events);
            }
            if let Some(from) = change.from {
                if !is_capturing(grid, from) {
                    set_highlight(grid, from, false, events);
                }
            }
            if grid.type_at(change.to) == Some(TileType::Walkable) {
                self.check_capture(grid, index, events);
                return;
            }
        }
        self.set_anim(MoverAnim::from_velocity(self.mover.vel), index, events);
    }

    fn die(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        log::info!("Enemy {} captured", index);
        self.alive = false;
        self.mover.vel = Vec2::ZERO;
        self.target = None;
        events.push(GameEvent::EnemyDied { index });
        self.set_anim(MoverAnim::Dying, index, events);
    }

    fn set_anim(&mut self, anim: MoverAnim, index: usize, events: &mut Vec<GameEvent>) {
        if self.anim != anim {
            self.anim = anim;
            events.push(GameEvent::EnemyAnim { index, anim });
        }
    }
}

fn is_capturing(grid: &Grid, coords: IVec2) -> bool {
    grid.get(coords).is_some_and(|t| t.capturing)
}
