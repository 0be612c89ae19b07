//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major tiles, enemies by spawn index)
//! - No rendering or platform dependencies

pub mod capture;
pub mod enemy;
pub mod grid;
pub mod motion;
pub mod player;
pub mod polygon;
pub mod runner;
pub mod state;
pub mod tick;
pub mod tile;
pub mod tracker;

pub use capture::{Capture, CaptureMethod, Orientation, Side};
pub use enemy::Enemy;
pub use grid::{Direction, Grid, PlayArea};
pub use motion::{Mover, MoverAnim};
pub use player::Player;
pub use runner::{GameResult, LevelRunner, RoundPhase};
pub use state::{GameEvent, GameState, Hud};
pub use tick::{TickInput, tick};
pub use tile::{Tile, TileType};
pub use tracker::CutTracker;
