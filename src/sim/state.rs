//! Game state and events
//!
//! `GameState` owns everything a run needs: grid, cut tracker, player,
//! enemies and the level runner. Collaborators read `events` after each tick.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::grid::Grid;
use super::motion::MoverAnim;
use super::player::Player;
use super::runner::{GameResult, LevelRunner, RoundPhase};
use super::tracker::CutTracker;
use crate::config::GameConfig;

/// Something collaborators (rendering, audio, UI) may react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player adopted a new tile
    PlayerStepped { coords: IVec2 },
    TileHighlight { coords: IVec2, on: bool },
    /// A cut closed and tiles flipped to walkable
    TilesCaptured { count: usize, remaining: usize },
    PlayerAnim(MoverAnim),
    EnemyAnim { index: usize, anim: MoverAnim },
    EnemyDied { index: usize },
    /// Level (0-based) set up and running
    LevelStarted { level: usize },
    LifeLost { lives_lost: u32 },
    LevelCleared { level: usize },
    GameFinished(GameResult),
}

/// Values shown by the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub level_running: bool,
    /// 1-based level number
    pub level: usize,
    /// Only present when a turn limit is configured
    pub turns_remaining: Option<u32>,
    pub captured_fraction: f32,
    pub lives_lost: u32,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub grid: Grid,
    pub tracker: CutTracker,
    pub player: Player,
    /// Enemies of the active level (index = spawn order)
    pub enemies: Vec<Enemy>,
    pub runner: LevelRunner,
    /// Events produced by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let grid = Grid::with_tile_size(config.columns, config.rows, config.tile_size);
        let player = Player::new(
            grid.center_of(config.player_start),
            config.player_speed(0),
            config.allowed_turns,
        );
        let runner = LevelRunner::new(
            config.levels.len(),
            config.level_clear_delay,
            config.life_lost_delay,
        );
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            grid,
            tracker: CutTracker::new(),
            player,
            enemies: Vec::new(),
            runner,
            events: Vec::new(),
        }
    }

    /// Default configuration
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::default(), seed)
    }

    pub fn phase(&self) -> RoundPhase {
        self.runner.phase()
    }

    /// Put the given level back in its initial state
    ///
    /// Cancels any cut, restores every tile, returns the player to the start
    /// and respawns the level's enemies. Calling it twice is the same as once.
    pub fn reset_level(&mut self, level: usize) {
        self.tracker.cancel(&mut self.grid);
        self.grid.reset_all();
        self.player.set_speed(self.config.player_speed(level));
        self.player.reset();
        self.spawn_enemies(level);
        log::info!("Level {} reset", level + 1);
    }

    /// Replace the enemies with fresh ones for the given level
    pub fn spawn_enemies(&mut self, level: usize) {
        self.enemies = self
            .config
            .levels
            .get(level)
            .map(|l| l.enemies.iter().map(Enemy::new).collect())
            .unwrap_or_default();
    }

    /// Enemy touched the trail: reset the board and pause
    pub fn lose_life(&mut self) {
        if !self.runner.life_lost() {
            return;
        }
        self.player.die(&mut self.events);
        self.events.push(GameEvent::LifeLost {
            lives_lost: self.runner.lives_lost(),
        });

        self.tracker.cancel(&mut self.grid);
        self.grid.reset_all();
        self.player.reset();
        self.enemies.clear();
    }

    /// React to tiles changing hands
    ///
    /// Enemies on captured ground die. The level-cleared transition fires at
    /// most once no matter how often this runs.
    pub fn notify_captured(&mut self) {
        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.check_capture(&self.grid, index, &mut self.events);
        }
        if self.grid.is_cleared() && self.runner.level_cleared() {
            self.events.push(GameEvent::LevelCleared {
                level: self.runner.level_index(),
            });
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            level_running: self.runner.is_running(),
            level: self.runner.level_index() + 1,
            turns_remaining: self.player.turns_remaining(),
            captured_fraction: self.grid.captured_fraction(),
            lives_lost: self.runner.lives_lost(),
        }
    }
}
