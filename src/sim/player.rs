//! Player controller
//!
//! Walks freely on walkable tiles, slides in a locked direction across
//! slippery ones, and drives the cut tracker from its tile changes.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::capture::Capture;
use super::grid::Grid;
use super::motion::{Mover, MoverAnim, SlideEvent, TileChange, classify, snap_to_axis};
use super::state::GameEvent;
use super::tile::TileType;
use super::tracker::CutTracker;
use crate::consts::SNAP_EPSILON;
use crate::move_towards;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub mover: Mover,
    pub start_position: Vec2,
    /// Center of the adopted tile while the player is being pulled onto it
    snap_target: Option<Vec2>,
    /// Locked velocity while sliding
    sliding_velocity: Option<Vec2>,
    /// Last snapped input, held on exact diagonal ties
    last_input: Vec2,
    allowed_turns: u32,
    turns_remaining: u32,
    pub dead: bool,
    anim: MoverAnim,
}

impl Player {
    pub fn new(start_position: Vec2, speed: f32, allowed_turns: u32) -> Self {
        Self {
            mover: Mover::new(start_position, speed),
            start_position,
            snap_target: None,
            sliding_velocity: None,
            last_input: Vec2::ZERO,
            allowed_turns,
            turns_remaining: allowed_turns,
            dead: false,
            anim: MoverAnim::Idle,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.mover.pos
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding_velocity.is_some()
    }

    pub fn is_snapping(&self) -> bool {
        self.snap_target.is_some()
    }

    pub fn anim(&self) -> MoverAnim {
        self.anim
    }

    /// Turns left in the current slide, `None` without a turn limit
    pub fn turns_remaining(&self) -> Option<u32> {
        (self.allowed_turns > 0).then_some(self.turns_remaining)
    }

    /// Change speed (on level start)
    pub fn set_speed(&mut self, speed: f32) {
        self.mover.speed = speed;
    }

    /// Put the player back at the start with no motion state
    pub fn reset(&mut self) {
        self.mover.pos = self.start_position;
        self.mover.vel = Vec2::ZERO;
        self.mover.clear_tile();
        self.snap_target = None;
        self.sliding_velocity = None;
        self.last_input = Vec2::ZERO;
        self.turns_remaining = self.allowed_turns;
        self.dead = false;
        self.anim = MoverAnim::Idle;
    }

    pub fn die(&mut self, events: &mut Vec<GameEvent>) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.mover.vel = Vec2::ZERO;
        self.snap_target = None;
        self.set_anim(MoverAnim::Dying, events);
    }

    /// Advance one fixed step
    ///
    /// Returns the capture if this step closed a cut.
    pub fn step(
        &mut self,
        input: Vec2,
        dt: f32,
        grid: &mut Grid,
        tracker: &mut CutTracker,
        events: &mut Vec<GameEvent>,
    ) -> Option<Capture> {
        if self.dead {
            return None;
        }

        let direction = snap_to_axis(input, self.last_input);
        self.last_input = direction;

        if let Some(target) = self.snap_target {
            let pos = move_towards(self.mover.pos, target, self.mover.speed * dt);
            self.mover.pos = pos;
            if pos.distance(target) < SNAP_EPSILON {
                self.mover.pos = target;
                self.snap_target = None;
            }
        } else {
            self.steer(direction);
            self.mover.integrate(dt, &grid.play_area());
        }
        self.set_anim(MoverAnim::from_velocity(self.mover.vel), events);

        if self.is_snapping() && self.is_sliding() {
            return None;
        }
        let change = self.mover.detect_tile(grid)?;
        self.adopt(change, grid, tracker, events)
    }

    fn steer(&mut self, direction: Vec2) {
        let speed = self.mover.speed;
        match self.sliding_velocity {
            Some(slide) => {
                let perpendicular = direction != Vec2::ZERO && direction.dot(slide).abs() < 1e-6;
                if perpendicular && self.allowed_turns > 0 && self.turns_remaining > 0 {
                    let turned = direction.normalize() * speed;
                    self.turns_remaining -= 1;
                    log::debug!(
                        "Slide turned to {:?}, {} turn(s) left",
                        turned,
                        self.turns_remaining
                    );
                    self.sliding_velocity = Some(turned);
                    self.mover.vel = turned;
                } else {
                    self.mover.vel = slide;
                }
            }
            None => self.mover.vel = direction * speed,
        }
    }

    fn adopt(
        &mut self,
        change: TileChange,
        grid: &mut Grid,
        tracker: &mut CutTracker,
        events: &mut Vec<GameEvent>,
    ) -> Option<Capture> {
        let TileChange { from, to } = change;
        let to_type = grid.type_at(to)?;
        let mut captured = None;

        if let Some(from) = from {
            let from_type = grid.type_at(from).unwrap_or(TileType::Walkable);
            match classify(from_type, to_type, tracker.is_tracking()) {
                SlideEvent::Begin => self.begin_slide(from, to, grid, tracker),
                SlideEvent::Continue => {
                    tracker.add(to);
                    if let Some(tile) = grid.get_mut(to) {
                        tile.mark_capturing();
                    }
                }
                SlideEvent::End => {
                    captured = tracker.end_tracking(grid, to);
                    if let Some(capture) = &captured {
                        events.push(GameEvent::TilesCaptured {
                            count: capture.len(),
                            remaining: capture.remaining,
                        });
                    }
                }
                SlideEvent::None => {}
            }
        }

        if to_type == TileType::Walkable {
            self.sliding_velocity = None;
            self.turns_remaining = self.allowed_turns;
        }
        if !tracker.tile_is_in_sequence(grid, to) {
            set_highlight(grid, to, true, events);
        }
        if let Some(from) = from {
            if !tracker.tile_is_in_sequence(grid, from) {
                set_highlight(grid, from, false, events);
            }
        }

        self.snap_target = Some(grid.center_of(to));
        events.push(GameEvent::PlayerStepped { coords: to });
        captured
    }

    fn begin_slide(&mut self, from: IVec2, to: IVec2, grid: &mut Grid, tracker: &mut CutTracker) {
        if let Some(tile) = grid.get_mut(to) {
            tile.mark_capturing();
        }
        tracker.begin_tracking(from, to);
        let heading = if self.mover.vel != Vec2::ZERO {
            self.mover.vel.normalize()
        } else {
            (to - from).as_vec2().normalize_or_zero()
        };
        self.sliding_velocity = Some(heading * self.mover.speed);
        self.turns_remaining = self.allowed_turns;
        log::debug!("Slide started at {} heading {:?}", to, heading);
    }

    fn set_anim(&mut self, anim: MoverAnim, events: &mut Vec<GameEvent>) {
        if self.anim != anim {
            self.anim = anim;
            events.push(GameEvent::PlayerAnim(anim));
        }
    }
}

/// Set a tile's highlight, emitting an event only on change
pub(super) fn set_highlight(grid: &mut Grid, coords: IVec2, on: bool, events: &mut Vec<GameEvent>) {
    if let Some(tile) = grid.get_mut(coords) {
        if tile.highlighted != on {
            tile.set_highlighted(on);
            events.push(GameEvent::TileHighlight { coords, on });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn setup() -> (Grid, CutTracker, Player) {
        let grid = Grid::build(18, 11);
        let start = grid.center_of(IVec2::new(0, 5));
        (grid, CutTracker::new(), Player::new(start, 10.0, 0))
    }

    fn run(
        player: &mut Player,
        grid: &mut Grid,
        tracker: &mut CutTracker,
        input: Vec2,
        ticks: usize,
    ) -> (Vec<Capture>, Vec<GameEvent>) {
        let mut captures = Vec::new();
        let mut events = Vec::new();
        for _ in 0..ticks {
            if let Some(c) = player.step(input, SIM_DT, grid, tracker, &mut events) {
                captures.push(c);
            }
        }
        (captures, events)
    }

    #[test]
    fn test_first_step_adopts_start_tile() {
        let (mut grid, mut tracker, mut player) = setup();
        let (_, events) = run(&mut player, &mut grid, &mut tracker, Vec2::ZERO, 1);
        assert_eq!(player.mover.current_tile, Some(IVec2::new(0, 5)));
        assert!(grid.get(IVec2::new(0, 5)).unwrap().highlighted);
        assert!(events.contains(&GameEvent::PlayerStepped { coords: IVec2::new(0, 5) }));
    }

    #[test]
    fn test_slide_across_row_captures() {
        let (mut grid, mut tracker, mut player) = setup();
        run(&mut player, &mut grid, &mut tracker, Vec2::ZERO, 1);

        // One nudge right starts the slide, the rest happens on its own
        run(&mut player, &mut grid, &mut tracker, Vec2::X, 10);
        assert!(player.is_sliding());
        assert!(tracker.is_tracking());

        let (captures, events) = run(&mut player, &mut grid, &mut tracker, Vec2::ZERO, 600);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].len(), 80);
        assert_eq!(grid.count(TileType::Slippery), 64);
        assert!(!player.is_sliding());
        assert_eq!(player.mover.current_tile, Some(IVec2::new(17, 5)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::TilesCaptured { count: 80, .. })));
    }

    #[test]
    fn test_slide_ignores_input() {
        let (mut grid, mut tracker, mut player) = setup();
        run(&mut player, &mut grid, &mut tracker, Vec2::ZERO, 1);
        run(&mut player, &mut grid, &mut tracker, Vec2::X, 20);
        assert!(player.is_sliding());

        // No turns allowed: pushing up keeps the slide horizontal
        let y_before = player.pos().y;
        run(&mut player, &mut grid, &mut tracker, Vec2::Y, 20);
        assert_eq!(player.pos().y, y_before);
        assert_eq!(tracker.turn_count(), 0);
    }

    #[test]
    fn test_turn_uses_allowance() {
        let mut grid = Grid::build(18, 11);
        let mut tracker = CutTracker::new();
        let mut player = Player::new(grid.center_of(IVec2::new(0, 5)), 10.0, 1);
        assert_eq!(player.turns_remaining(), Some(1));

        run(&mut player, &mut grid, &mut tracker, Vec2::ZERO, 1);
        run(&mut player, &mut grid, &mut tracker, Vec2::X, 40);
        assert!(player.is_sliding());
        run(&mut player, &mut grid, &mut tracker, -Vec2::Y, 15);
        assert_eq!(player.turns_remaining(), Some(0));
        assert!(player.mover.vel.y < 0.0);
        assert_eq!(player.mover.vel.x, 0.0);
    }

    #[test]
    fn test_walking_on_border_never_tracks() {
        let (mut grid, mut tracker, mut player) = setup();
        run(&mut player, &mut grid, &mut tracker, Vec2::Y, 200);
        assert!(!tracker.is_tracking());
        assert_eq!(grid.count(TileType::Slippery), 16 * 9);
        assert_eq!(player.mover.current_tile, Some(IVec2::new(0, 10)));
    }

    #[test]
    fn test_die_and_reset() {
        let (mut grid, mut tracker, mut player) = setup();
        let mut events = Vec::new();
        run(&mut player, &mut grid, &mut tracker, Vec2::X, 20);
        player.die(&mut events);
        player.die(&mut events);
        assert_eq!(events, vec![GameEvent::PlayerAnim(MoverAnim::Dying)]);
        assert!(player.step(Vec2::X, SIM_DT, &mut grid, &mut tracker, &mut events).is_none());

        player.reset();
        assert!(!player.dead);
        assert!(!player.is_sliding());
        assert!(!player.is_snapping());
        assert_eq!(player.pos(), player.start_position);
        assert_eq!(player.mover.current_tile, None);
    }
}
