//! Error types
//!
//! Out-of-bounds lookups are not errors (they return `None`). Everything here
//! signals either bad input data or an orchestration bug.

use glam::IVec2;
use thiserror::Error;

use crate::sim::GameResult;

/// A cut sequence that cannot be resolved into a capture
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("cut sequence too short: {len} tile(s), need at least 2")]
    TooShort { len: usize },

    #[error("diagonal cut from {from} to {to}: tiles share neither row nor column")]
    Diagonal { from: IVec2, to: IVec2 },

    #[error("cut never leaves tile {0}")]
    ZeroLength(IVec2),

    #[error("cut references tile {0} outside the grid")]
    OutOfBounds(IVec2),
}

/// Level orchestration misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("game already finished with {0:?}")]
    AlreadyFinished(GameResult),

    #[error("cannot start: runner is not idle")]
    NotIdle,

    #[error("no levels configured")]
    NoLevels,
}

/// Failure loading or validating a game configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
