//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::runner::{GameResult, RoundPhase, RunnerAction};
use super::state::{GameEvent, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw movement axes (snapped to the dominant axis by the player)
    pub direction: Vec2,
    /// Start the run from the title/idle screen
    pub start: bool,
    /// Replay the current level from scratch
    pub restart: bool,
    /// End the run
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Nothing moves once the run is over
    if state.phase() == RoundPhase::Finished {
        return;
    }

    if input.quit {
        match state.runner.finish(GameResult::Quit) {
            Ok(()) => state.events.push(GameEvent::GameFinished(GameResult::Quit)),
            Err(err) => log::error!("Quit ignored: {}", err),
        }
        return;
    }

    if input.restart {
        if let Some(level) = state.runner.restart() {
            state.reset_level(level);
            state.events.push(GameEvent::LevelStarted { level });
        }
    }

    match state.phase() {
        RoundPhase::Idle => {
            if input.start {
                match state.runner.start() {
                    Ok(level) => {
                        state.reset_level(level);
                        state.events.push(GameEvent::LevelStarted { level });
                    }
                    Err(err) => log::error!("Cannot start run: {}", err),
                }
            }
        }
        RoundPhase::Running => simulate(state, input, dt),
        RoundPhase::LifeLost | RoundPhase::LevelCleared => match state.runner.advance() {
            RunnerAction::None => {}
            RunnerAction::StartLevel(level) => {
                state.reset_level(level);
                state.events.push(GameEvent::LevelStarted { level });
            }
            RunnerAction::RespawnEnemies => {
                let level = state.runner.level_index();
                state.spawn_enemies(level);
                log::debug!("Enemies respawned for level {}", level + 1);
            }
            RunnerAction::Finished(result) => {
                state.events.push(GameEvent::GameFinished(result));
            }
        },
        RoundPhase::Finished => {}
    }

    state.time_ticks += 1;
}

/// One step of active gameplay: player, capture resolution, enemies, trail
fn simulate(state: &mut GameState, input: &TickInput, dt: f32) {
    let captured = state.player.step(
        input.direction,
        dt,
        &mut state.grid,
        &mut state.tracker,
        &mut state.events,
    );
    if captured.is_some() {
        state.notify_captured();
        if !state.runner.is_running() {
            return;
        }
    }

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        enemy.step(dt, &mut state.grid, &mut state.rng, index, &mut state.events);
    }

    let touched = state.tracker.is_tracking()
        && state
            .enemies
            .iter()
            .any(|e| e.touches_trail(&state.grid, &state.tracker));
    if touched {
        state.lose_life();
    }
}
