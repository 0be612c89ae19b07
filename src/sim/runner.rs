//! Level progression
//!
//! Phase machine for a run: which level is active, the pauses after a lost
//! life or a cleared level, and the final result. Waits are tick counters.

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;
use crate::secs_to_ticks;

/// Phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the start input
    Idle,
    /// Active gameplay
    Running,
    /// Pause before enemies respawn
    LifeLost,
    /// Pause before the next level
    LevelCleared,
    /// Run ended
    Finished,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Completed,
    Quit,
}

/// Work the game state has to do after the runner advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerAction {
    None,
    /// Set up the given level (0-based)
    StartLevel(usize),
    RespawnEnemies,
    Finished(GameResult),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRunner {
    phase: RoundPhase,
    level_index: usize,
    level_count: usize,
    lives_lost: u32,
    /// Ticks left in the current pause
    timer_ticks: u32,
    level_clear_ticks: u32,
    life_lost_ticks: u32,
    result: Option<GameResult>,
}

impl LevelRunner {
    pub fn new(level_count: usize, level_clear_delay: f32, life_lost_delay: f32) -> Self {
        Self {
            phase: RoundPhase::Idle,
            level_index: 0,
            level_count,
            lives_lost: 0,
            timer_ticks: 0,
            level_clear_ticks: secs_to_ticks(level_clear_delay),
            life_lost_ticks: secs_to_ticks(life_lost_delay),
            result: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Active level (0-based)
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn lives_lost(&self) -> u32 {
        self.lives_lost
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Begin the first level
    pub fn start(&mut self) -> Result<usize, RunnerError> {
        if self.phase != RoundPhase::Idle {
            return Err(RunnerError::NotIdle);
        }
        if self.level_count == 0 {
            return Err(RunnerError::NoLevels);
        }
        self.level_index = 0;
        self.phase = RoundPhase::Running;
        log::info!("Run started ({} levels)", self.level_count);
        Ok(self.level_index)
    }

    /// Enter `LevelCleared`; `true` only on the transition itself
    pub fn level_cleared(&mut self) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.phase = RoundPhase::LevelCleared;
        self.timer_ticks = self.level_clear_ticks;
        log::info!("Level {} cleared", self.level_index + 1);
        true
    }

    /// Enter `LifeLost`; `true` only on the transition itself
    pub fn life_lost(&mut self) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.phase = RoundPhase::LifeLost;
        self.timer_ticks = self.life_lost_ticks;
        self.lives_lost += 1;
        log::info!("Life lost ({} so far)", self.lives_lost);
        true
    }

    /// Record the final result
    pub fn finish(&mut self, result: GameResult) -> Result<(), RunnerError> {
        if let Some(previous) = self.result {
            log::error!("finish({:?}) after run already ended with {:?}", result, previous);
            return Err(RunnerError::AlreadyFinished(previous));
        }
        self.result = Some(result);
        self.phase = RoundPhase::Finished;
        log::info!("Run finished: {:?}", result);
        Ok(())
    }

    /// Replay the current level from scratch
    ///
    /// Returns the level to set up, or `None` once the run has finished.
    pub fn restart(&mut self) -> Option<usize> {
        match self.phase {
            RoundPhase::Finished => {
                log::warn!("Ignoring restart: run already finished");
                None
            }
            RoundPhase::Idle => self.start().ok(),
            _ => {
                self.phase = RoundPhase::Running;
                self.timer_ticks = 0;
                log::info!("Restarting level {}", self.level_index + 1);
                Some(self.level_index)
            }
        }
    }

    /// Count down the current pause by one tick
    pub fn advance(&mut self) -> RunnerAction {
        match self.phase {
            RoundPhase::LevelCleared | RoundPhase::LifeLost => {}
            _ => return RunnerAction::None,
        }
        self.timer_ticks = self.timer_ticks.saturating_sub(1);
        if self.timer_ticks > 0 {
            return RunnerAction::None;
        }

        if self.phase == RoundPhase::LifeLost {
            self.phase = RoundPhase::Running;
            return RunnerAction::RespawnEnemies;
        }
        if self.level_index + 1 < self.level_count {
            self.level_index += 1;
            self.phase = RoundPhase::Running;
            log::info!("Starting level {}", self.level_index + 1);
            return RunnerAction::StartLevel(self.level_index);
        }
        match self.finish(GameResult::Completed) {
            Ok(()) => RunnerAction::Finished(GameResult::Completed),
            Err(_) => RunnerAction::None,
        }
    }
}
