//! Slipcut - A Qix-like territory capture game on a tile grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, cut tracking, capture, movers)
//! - `config`: Data-driven levels and tuning
//! - `audio`: Sound cue dispatch to an optional playback backend
//! - `error`: Error types shared across the crate

pub mod audio;
pub mod config;
pub mod error;
pub mod sim;

pub use config::{EnemyConfig, GameConfig, LevelConfig};
pub use error::{CaptureError, ConfigError, RunnerError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Reference grid dimensions
    pub const COLUMN_COUNT: i32 = 18;
    pub const ROW_COUNT: i32 = 11;
    /// Distance between neighboring tile centers
    pub const TILE_SIZE: f32 = 1.0;

    /// Half extent of the square collider used by movers (player and enemies)
    pub const MOVER_HALF_EXTENT: f32 = 0.4;
    /// Player is "on" the snap target once within this distance
    pub const SNAP_EPSILON: f32 = 0.01;
    /// Enemy picks a new target once within this distance of the current one
    pub const ENEMY_ARRIVE_EPSILON: f32 = 0.1;

    /// Player speed defaults (units/s)
    pub const PLAYER_START_SPEED: f32 = 10.0;
    pub const PLAYER_SPEED_PER_LEVEL: f32 = 2.6;
    /// Enemy speed default (units/s)
    pub const ENEMY_SPEED: f32 = 2.3;

    /// Pause after clearing a level (seconds)
    pub const LEVEL_CLEAR_DELAY: f32 = 2.0;
    /// Pause after losing a life (seconds)
    pub const LIFE_LOST_DELAY: f32 = 1.5;
}

/// Convert a duration in seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / consts::SIM_DT).round() as u32).max(1)
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_delta
    }
}
