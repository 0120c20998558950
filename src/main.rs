//! Snake Sim headless runner
//!
//! Drives the simulation core with a greedy autopilot at a fixed frame delta,
//! logging every event. Useful for soak-testing seeds and tuning.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_sim::sim::{Cell, Direction, SimEvent, SimulationCore};
use snake_sim::{Difficulty, GameOptions, Phase, Settings, SimulationConfig};

#[derive(Parser)]
#[command(name = "snake-sim")]
#[command(version, about = "Headless runner for the snake simulation core")]
struct Cli {
    /// Run seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of host frames to simulate
    #[arg(long, default_value = "3600")]
    frames: u32,

    /// Wall-clock delta per frame (ms)
    #[arg(long, default_value = "16.6667")]
    frame_ms: f32,

    /// Difficulty (defaults to the saved setting)
    #[arg(long)]
    difficulty: Option<DifficultyArg>,

    /// Base steps per second (defaults to the saved setting)
    #[arg(long)]
    speed: Option<u32>,

    /// Disable obstacles
    #[arg(long)]
    no_obstacles: bool,

    /// Disable power-ups
    #[arg(long)]
    no_powerups: bool,

    /// Settings file holding preferences and the best score
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let options = GameOptions {
        difficulty: cli.difficulty.map(Difficulty::from).unwrap_or(settings.difficulty),
        obstacles_enabled: settings.obstacles_enabled && !cli.no_obstacles,
        powerups_enabled: settings.powerups_enabled && !cli.no_powerups,
        base_steps_per_second: cli.speed.unwrap_or(settings.base_steps_per_second),
    };
    let config = SimulationConfig {
        seed: cli.seed,
        options,
        ..Default::default()
    };

    let mut core = SimulationCore::new(config).context("invalid simulation config")?;
    core.reset(options).context("invalid game options")?;
    log::info!("Snake Sim starting with seed {}", cli.seed);

    let mut frames_run = 0;
    for _ in 0..cli.frames {
        if let Some(direction) = autopilot(&core) {
            core.queue_direction(direction);
        }
        core.advance(cli.frame_ms);
        frames_run += 1;

        for event in core.drain_events() {
            log_event(&event);
        }
        if core.phase() == Phase::GameOver {
            break;
        }
    }

    let state = core.state();
    println!(
        "seed {}: {} after {} frames / {} ticks, score {}, length {}",
        cli.seed,
        if core.phase() == Phase::GameOver {
            "game over"
        } else {
            "survived"
        },
        frames_run,
        state.ticks,
        state.score,
        state.snake.len()
    );

    if let Some(path) = &cli.settings {
        settings.apply_options(&options);
        if settings.record_score(state.score) {
            println!("new best score: {}", state.score);
        }
        settings
            .save(path)
            .with_context(|| format!("failed to save settings to {}", path.display()))?;
    }

    Ok(())
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::GameOver { reason } => log::info!("Game over: {}", reason.as_str()),
        SimEvent::ScoreChanged { score } => log::debug!("Score: {}", score),
        other => log::info!("{:?}", other),
    }
}

/// Greedy pick: the safe neighbor closest to the target, else any safe neighbor
fn autopilot(core: &SimulationCore) -> Option<Direction> {
    let state = core.state();
    let head = state.snake.head();
    let target = state.target?;

    Direction::ALL
        .into_iter()
        .filter(|&d| state.snake.len() == 1 || !state.direction.is_opposite(d))
        .filter(|&d| is_safe(core, head.step(d)))
        .min_by_key(|&d| head.step(d).manhattan(target))
}

fn is_safe(core: &SimulationCore, cell: Cell) -> bool {
    let state = core.state();
    core.grid().in_bounds(cell)
        && !state.is_obstacle(cell)
        && !state.snake.occupies(cell, state.snake.pending_growth == 0)
}
