//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (power-ups by ID, obstacles by spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod engine;
pub mod grid;
pub mod snake;
pub mod spawn;
pub mod state;
pub mod stepper;
pub mod tick;

pub use collision::{Collision, Resolution, classify, resolve};
pub use effects::{EffectKind, EffectState};
pub use engine::SimulationCore;
pub use grid::{Cell, Direction, GridWorld};
pub use snake::Snake;
pub use spawn::{Occupancy, SpawnManager};
pub use state::{BounceSeverity, GameOverReason, Phase, PowerUp, SimEvent, SimulationState};
pub use stepper::{Stepper, step_interval_ms};
pub use tick::{TickOutcome, magnet_drift, tick};
