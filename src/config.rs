//! Game configuration
//!
//! Levels, enemy spawns and tuning values. Loaded from JSON when a path is
//! given, otherwise the built-in defaults are used.

use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// One enemy spawn entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// World-space spawn position
    pub spawn: Vec2,
    /// Movement speed (units/s)
    #[serde(default = "default_enemy_speed")]
    pub speed: f32,
}

fn default_enemy_speed() -> f32 {
    ENEMY_SPEED
}

impl EnemyConfig {
    pub fn new(spawn: Vec2, speed: f32) -> Self {
        Self { spawn, speed }
    }
}

/// A single level: the enemies spawned when it starts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub enemies: Vec<EnemyConfig>,
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    pub columns: i32,
    pub rows: i32,
    /// Spacing between tile centers in world units
    pub tile_size: f32,

    // === Player ===
    /// Tile the player starts every level (and every life) on
    pub player_start: IVec2,
    /// Player speed on the first level
    pub player_start_speed: f32,
    /// Extra player speed for each level after the first
    pub player_speed_per_level: f32,
    /// Direction changes allowed during a single slide (0 = straight cuts only)
    pub allowed_turns: u32,

    // === Pacing ===
    /// Seconds between clearing a level and starting the next
    pub level_clear_delay: f32,
    /// Seconds between losing a life and resuming play
    pub life_lost_delay: f32,

    // === Levels ===
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: COLUMN_COUNT,
            rows: ROW_COUNT,
            tile_size: TILE_SIZE,

            player_start: IVec2::ZERO,
            player_start_speed: PLAYER_START_SPEED,
            player_speed_per_level: PLAYER_SPEED_PER_LEVEL,
            allowed_turns: 0,

            level_clear_delay: LEVEL_CLEAR_DELAY,
            life_lost_delay: LIFE_LOST_DELAY,

            levels: vec![
                LevelConfig {
                    enemies: vec![EnemyConfig::new(Vec2::new(3.5, 2.0), ENEMY_SPEED)],
                },
                LevelConfig {
                    enemies: vec![
                        EnemyConfig::new(Vec2::new(3.5, 2.0), 2.8),
                        EnemyConfig::new(Vec2::new(-4.5, -2.0), 2.8),
                    ],
                },
                LevelConfig {
                    enemies: vec![
                        EnemyConfig::new(Vec2::new(3.5, 2.0), 3.2),
                        EnemyConfig::new(Vec2::new(-4.5, -2.0), 3.2),
                        EnemyConfig::new(Vec2::new(0.5, 3.0), 3.2),
                    ],
                },
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {} ({} levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Player speed for a given level (0-based)
    pub fn player_speed(&self, level_index: usize) -> f32 {
        self.player_start_speed + level_index as f32 * self.player_speed_per_level
    }

    /// Check values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 3 || self.rows < 3 {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} has no interior; need at least 3x3",
                self.columns, self.rows
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        let IVec2 { x: col, y: row } = self.player_start;
        let in_bounds = (0..self.columns).contains(&col) && (0..self.rows).contains(&row);
        let on_border = col == 0 || row == 0 || col == self.columns - 1 || row == self.rows - 1;
        if !in_bounds || !on_border {
            return Err(ConfigError::Invalid(format!(
                "player_start {} must be a border tile",
                self.player_start
            )));
        }
        if self.player_start_speed <= 0.0 || self.player_speed_per_level < 0.0 {
            return Err(ConfigError::Invalid("player speeds must be positive".into()));
        }
        if self.level_clear_delay < 0.0 || self.life_lost_delay < 0.0 {
            return Err(ConfigError::Invalid("delays must not be negative".into()));
        }
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".into()));
        }
        if let Some(enemy) = self
            .levels
            .iter()
            .flat_map(|level| &level.enemies)
            .find(|enemy| enemy.speed <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "enemy at {} has non-positive speed {}",
                enemy.spawn, enemy.speed
            )));
        }
        Ok(())
    }
}
