//! Collision classification and shield resolution
//!
//! Classification runs in a fixed order: wall, obstacle, self. A cell can only
//! fall into one class, so the first match wins.

use super::effects::{EffectKind, EffectState};
use super::grid::{Cell, GridWorld};
use super::state::{BounceSeverity, GameOverReason, SimulationState};
use crate::consts::*;

/// What the proposed head cell runs into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Free,
    Wall,
    Obstacle,
    SelfCollision,
}

impl Collision {
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self {
            Collision::Free => None,
            Collision::Wall => Some(GameOverReason::Wall),
            Collision::Obstacle => Some(GameOverReason::Obstacle),
            Collision::SelfCollision => Some(GameOverReason::SelfCollision),
        }
    }

    /// Shield time burned when this collision is absorbed
    pub fn shield_penalty_ms(&self) -> f32 {
        match self {
            Collision::SelfCollision => SHIELD_SELF_PENALTY_MS,
            _ => SHIELD_PENALTY_MS,
        }
    }

    pub fn bounce_severity(&self) -> BounceSeverity {
        match self {
            Collision::SelfCollision => BounceSeverity::Heavy,
            _ => BounceSeverity::Light,
        }
    }
}

/// Outcome after the shield had its say
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing in the way
    Clear,
    /// Shield absorbed the hit
    Shielded(Collision),
    /// Run ends
    Fatal(GameOverReason),
}

/// Classify `next` for the snake in `state`.
///
/// The tail is ignored when the snake will not grow this tick, since it
/// vacates its cell in the same tick.
pub fn classify(grid: &GridWorld, state: &SimulationState, next: Cell) -> Collision {
    if !grid.in_bounds(next) {
        return Collision::Wall;
    }
    if state.is_obstacle(next) {
        return Collision::Obstacle;
    }

    let would_grow = state.target == Some(next);
    let tail_vacates = !would_grow && state.snake.pending_growth == 0;
    if state.snake.occupies(next, tail_vacates) {
        return Collision::SelfCollision;
    }

    Collision::Free
}

/// Apply shield rules to a classified collision, charging the shield if it absorbs the hit
pub fn resolve(collision: Collision, effects: &mut EffectState) -> Resolution {
    let Some(reason) = collision.game_over_reason() else {
        return Resolution::Clear;
    };

    if effects.is_active(EffectKind::Shield) {
        effects.consume(EffectKind::Shield, collision.shield_penalty_ms());
        Resolution::Shielded(collision)
    } else {
        Resolution::Fatal(reason)
    }
}
