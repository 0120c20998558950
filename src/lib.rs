//! Snake Sim - deterministic core of an arcade grid snake game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snake, spawning, effects, collisions, stepper)
//! - `config`: Construction and reset options, validated up front
//! - `settings`: Host-side persisted preferences (best score, skin, last options)
//!
//! Rendering, audio and input capture live outside this crate. The core consumes
//! directional intents and wall-clock deltas, and emits discrete state plus events.

pub mod config;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, Difficulty, GameOptions, SimulationConfig};
pub use settings::{Settings, SettingsError};
pub use sim::{
    Cell, Direction, EffectKind, GameOverReason, Phase, SimEvent, SimulationCore,
    SimulationState,
};

/// Game tuning constants
pub mod consts {
    use crate::sim::Cell;

    /// Default board size (~16:9)
    pub const DEFAULT_COLS: u32 = 34;
    pub const DEFAULT_ROWS: u32 = 19;
    /// Starting snake length, laid out left of the board center
    pub const INITIAL_SNAKE_LENGTH: usize = 4;
    /// Smallest board that fits the starting snake
    pub const MIN_COLS: u32 = 2 * INITIAL_SNAKE_LENGTH as u32 - 2;
    pub const MIN_ROWS: u32 = 1;
    /// Largest board side accepted; cells are addressed with `i32`
    pub const MAX_COLS: u32 = 4096;
    pub const MAX_ROWS: u32 = 4096;

    /// Default simulation rate (steps per second)
    pub const DEFAULT_STEPS_PER_SECOND: u32 = 10;
    /// Floor of the slowed rate
    pub const SLOW_MIN_STEPS_PER_SECOND: u32 = 5;
    /// Rate reduction while slow is active
    pub const SLOW_STEP_REDUCTION: u32 = 4;
    /// Longest frame delta credited to the stepper (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 50.0;

    /// Every effect lasts this long after pickup (ms)
    pub const EFFECT_DURATION_MS: f32 = 6500.0;
    /// Shield time burned by a wall or obstacle hit (ms)
    pub const SHIELD_PENALTY_MS: f32 = 2200.0;
    /// Shield time burned by biting yourself (ms)
    pub const SHIELD_SELF_PENALTY_MS: f32 = 2500.0;
    /// Shielded self-bites only amputate snakes longer than this
    pub const AMPUTATION_MIN_LENGTH: usize = 6;
    /// Segments removed by an amputation
    pub const AMPUTATION_SEGMENTS: usize = 2;

    /// Score for eating a target
    pub const TARGET_SCORE: u32 = 10;
    /// Growth queued by eating a target
    pub const TARGET_GROWTH: u32 = 2;
    /// Score for collecting a power-up
    pub const POWERUP_SCORE: u32 = 12;
    /// Extra obstacles appear whenever the score lands on a multiple of this
    pub const OBSTACLE_MILESTONE: u32 = 50;

    /// Power-ups allowed on the board at once
    pub const MAX_POWERUPS: usize = 2;
    /// How long an uncollected power-up stays on the board (ms)
    pub const POWERUP_BOARD_TTL_MS: f32 = 9000.0;

    /// Random draws before falling back to a linear scan
    pub const SPAWN_TRIES: u32 = 600;
    /// Returned when the board is completely full
    pub const FALLBACK_CELL: Cell = Cell::new(1, 1);
    /// Obstacles never spawn closer than this (Manhattan) to the head
    pub const OBSTACLE_SAFE_DISTANCE: u32 = 6;

    /// Magnet only pulls targets within this Manhattan distance
    pub const MAGNET_RADIUS: u32 = 9;
    /// Per-tick chance the target drifts one cell
    pub const MAGNET_PULL_CHANCE: f64 = 0.12;
}
