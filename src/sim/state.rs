//! Simulation state and event types
//!
//! Everything the host may observe between frames lives here. The RNG is held
//! by the spawner, so a state snapshot is plain data and compares by value.

use serde::{Deserialize, Serialize};

use super::effects::{EffectKind, EffectState};
use super::grid::{Cell, Direction, GridWorld};
use super::snake::Snake;
use crate::consts::*;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Board is set up but nothing is running
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOverReason {
    Wall,
    Obstacle,
    #[serde(rename = "self")]
    SelfCollision,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::Wall => "wall",
            GameOverReason::Obstacle => "obstacle",
            GameOverReason::SelfCollision => "self",
        }
    }
}

/// How hard the shield was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BounceSeverity {
    /// Wall or obstacle
    Light,
    /// Self-bite
    Heavy,
}

/// Signals for render/audio/UI collaborators, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    TargetConsumed { cell: Cell },
    PowerupSpawned { kind: EffectKind, cell: Cell },
    PowerupExpired { kind: EffectKind, cell: Cell },
    PowerupStarted { kind: EffectKind },
    ShieldBounce { severity: BounceSeverity, cell: Cell },
    Amputated { segments: usize },
    ObstaclesAdded { count: usize },
    ScoreChanged { score: u32 },
    GameOver { reason: GameOverReason },
}

/// A power-up waiting on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: EffectKind,
    pub cell: Cell,
    pub remaining_on_board_ms: f32,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub score: u32,
    pub snake: Snake,
    /// Static between spawns
    pub obstacles: Vec<Cell>,
    pub target: Option<Cell>,
    /// Active power-ups (sorted by id)
    pub powerups: Vec<PowerUp>,
    pub effects: EffectState,
    /// Direction committed by the last tick
    pub direction: Direction,
    /// Direction the next tick will commit
    pub pending_direction: Direction,
    pub phase: Phase,
    /// Simulation tick counter
    pub ticks: u64,
    /// Next power-up ID
    next_id: u32,
}

impl SimulationState {
    /// Fresh run on `grid`: centered snake heading right, empty board
    pub fn new(grid: &GridWorld) -> Self {
        Self {
            score: 0,
            snake: Snake::new(grid.center(), Direction::Right, INITIAL_SNAKE_LENGTH),
            obstacles: Vec::new(),
            target: None,
            powerups: Vec::new(),
            effects: EffectState::default(),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            phase: Phase::Menu,
            ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new power-up ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn add_score(&mut self, points: u32, events: &mut Vec<SimEvent>) {
        self.score += points;
        events.push(SimEvent::ScoreChanged { score: self.score });
    }

    /// Count power-ups down by a frame delta, dropping the expired ones
    pub fn age_powerups(&mut self, dt_ms: f32, events: &mut Vec<SimEvent>) {
        for powerup in &mut self.powerups {
            powerup.remaining_on_board_ms -= dt_ms;
        }
        self.powerups.retain(|p| {
            let alive = p.remaining_on_board_ms > 0.0;
            if !alive {
                events.push(SimEvent::PowerupExpired {
                    kind: p.kind,
                    cell: p.cell,
                });
            }
            alive
        });
    }
}
