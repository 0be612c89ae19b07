//! Slipcut entry point
//!
//! Headless driver: loads an optional JSON config, runs a scripted session
//! through the fixed-timestep loop and prints the final board.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use slipcut::{
    GameConfig,
    audio::{AudioManager, LogSink},
    consts::*,
    sim::{GameEvent, GameState, RoundPhase, TickInput, tick},
};

/// Render frame time of the scripted session
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

/// Scripted input: (seconds, direction)
#[cfg(not(target_arch = "wasm32"))]
const SCRIPT: &[(f32, [f32; 2])] = &[
    (0.5, [0.0, 1.0]),
    (3.0, [1.0, 0.0]),
    (0.6, [0.0, 1.0]),
    (3.0, [-1.0, 0.0]),
    (0.4, [0.0, -1.0]),
    (2.0, [0.0, 0.0]),
];

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON game config (defaults to the built-in levels)
    config: Option<std::path::PathBuf>,
    /// RNG seed for enemy wandering
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let args = Args::parse();
    env_logger::init();
    log::info!("Slipcut (headless) starting with seed {}...", args.seed);

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    if let Err(err) = config.validate() {
        log::error!("{}", err);
        std::process::exit(1);
    }

    let mut state = GameState::new(config, args.seed);
    let mut audio = AudioManager::new(Some(Box::new(LogSink)));

    let mut input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &input, SIM_DT);
    audio.handle_events(&state.events);
    input.start = false;

    let mut accumulator = 0.0;
    'script: for &(secs, [x, y]) in SCRIPT {
        input.direction = glam::Vec2::new(x, y);
        let frames = (secs / FRAME_DT).round() as u32;
        for _ in 0..frames {
            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
                audio.handle_events(&state.events);
                report(&state.events);
            }
            if state.phase() == RoundPhase::Finished {
                break 'script;
            }
        }
    }

    let hud = state.hud();
    println!("{}", state.grid.to_ascii());
    println!(
        "level {} | captured {:.0}% | lives lost {} | running {}",
        hud.level,
        hud.captured_fraction * 100.0,
        hud.lives_lost,
        hud.level_running
    );
}

/// Log the events collaborators care about most
#[cfg(not(target_arch = "wasm32"))]
fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::TilesCaptured { count, remaining } => {
                log::info!("Captured {} tiles, {} remaining", count, remaining)
            }
            GameEvent::LevelStarted { level } => log::info!("Level {} started", level + 1),
            GameEvent::GameFinished(result) => log::info!("Game finished: {:?}", result),
            GameEvent::EnemyDied { .. } | GameEvent::LifeLost { .. } => {
                log::info!("{:?}", event)
            }
            _ => log::trace!("{:?}", event),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the product on wasm
}
