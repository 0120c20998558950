//! Discrete simulation tick
//!
//! Advances the snake by one cell and resolves collisions, consumption,
//! pickups, growth, power-up spawning and magnet drift, in that order.

use super::collision::{Collision, Resolution, classify, resolve};
use super::effects::EffectKind;
use super::grid::GridWorld;
use super::spawn::SpawnManager;
use super::state::{GameOverReason, Phase, PowerUp, SimEvent, SimulationState};
use crate::config::GameOptions;
use crate::consts::*;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Head advanced onto a free cell
    Moved,
    /// Shield absorbed a collision (obstacle hits leave the snake in place)
    Bounced(Collision),
    /// Run ended this tick
    GameOver(GameOverReason),
}

/// Advance the simulation by one discrete step.
///
/// The caller decides whether the phase allows ticking.
pub fn tick(
    state: &mut SimulationState,
    grid: &GridWorld,
    options: &GameOptions,
    spawner: &mut SpawnManager,
    events: &mut Vec<SimEvent>,
) -> TickOutcome {
    state.ticks += 1;
    state.direction = state.pending_direction;

    let head = state.snake.head();
    let next = head.step(state.direction);
    let collision = classify(grid, state, next);

    let outcome = match resolve(collision, &mut state.effects) {
        Resolution::Clear => {
            state.snake.push_head(next);
            TickOutcome::Moved
        }
        Resolution::Fatal(reason) => {
            state.phase = Phase::GameOver;
            log::info!(
                "Game over ({}) at tick {} with score {}",
                reason.as_str(),
                state.ticks,
                state.score
            );
            events.push(SimEvent::GameOver { reason });
            return TickOutcome::GameOver(reason);
        }
        Resolution::Shielded(Collision::Obstacle) => {
            log::debug!("Shield bounced off obstacle at ({}, {})", next.x, next.y);
            events.push(SimEvent::ShieldBounce {
                severity: collision.bounce_severity(),
                cell: head,
            });
            return TickOutcome::Bounced(Collision::Obstacle);
        }
        Resolution::Shielded(Collision::Wall) => {
            let clamped = grid.clamp(next);
            state.direction = state.direction.reversed();
            state.pending_direction = state.direction;
            state.snake.push_head(clamped);
            log::debug!("Shield bounced off wall at ({}, {})", clamped.x, clamped.y);
            events.push(SimEvent::ShieldBounce {
                severity: collision.bounce_severity(),
                cell: clamped,
            });
            TickOutcome::Bounced(Collision::Wall)
        }
        Resolution::Shielded(absorbed) => {
            events.push(SimEvent::ShieldBounce {
                severity: absorbed.bounce_severity(),
                cell: next,
            });
            if state.snake.len() > AMPUTATION_MIN_LENGTH {
                let segments = state.snake.amputate(AMPUTATION_SEGMENTS);
                log::debug!("Shielded self-bite, amputated {} segments", segments);
                events.push(SimEvent::Amputated { segments });
            }
            state.snake.push_head(next);
            TickOutcome::Bounced(absorbed)
        }
    };

    consume_target(state, options, spawner, events);
    collect_powerups(state, events);
    state.snake.settle_tail();

    spawner.maybe_spawn_powerup(state, options, events);
    magnet_drift(state, grid, spawner);

    log::trace!(
        "Tick {}: head ({}, {}), length {}",
        state.ticks,
        state.snake.head().x,
        state.snake.head().y,
        state.snake.len()
    );
    outcome
}

/// Eat the target under the head, if any
fn consume_target(
    state: &mut SimulationState,
    options: &GameOptions,
    spawner: &mut SpawnManager,
    events: &mut Vec<SimEvent>,
) {
    let head = state.snake.head();
    if state.target != Some(head) {
        return;
    }

    state.snake.pending_growth += TARGET_GROWTH;
    events.push(SimEvent::TargetConsumed { cell: head });
    state.add_score(TARGET_SCORE, events);
    spawner.spawn_target(state);

    if options.obstacles_enabled && state.score % OBSTACLE_MILESTONE == 0 {
        let count = spawner.add_obstacles(state, options.difficulty.milestone_obstacles());
        log::debug!("Score {} reached, added {} obstacles", state.score, count);
        events.push(SimEvent::ObstaclesAdded { count });
    }
}

/// Start the effect of every power-up under the head
fn collect_powerups(state: &mut SimulationState, events: &mut Vec<SimEvent>) {
    let head = state.snake.head();
    let (picked, kept): (Vec<PowerUp>, Vec<PowerUp>) = std::mem::take(&mut state.powerups)
        .into_iter()
        .partition(|p| p.cell == head);
    state.powerups = kept;

    for powerup in picked {
        state.effects.start(powerup.kind);
        log::debug!("Power-up {:?} started", powerup.kind);
        events.push(SimEvent::PowerupStarted { kind: powerup.kind });
        state.add_score(POWERUP_SCORE, events);
    }
}

/// Biased random walk of the target toward the head while magnet is active.
///
/// Moves along the axis with the larger offset (ties go to y) and only onto an
/// in-bounds cell free of snake and obstacles.
pub fn magnet_drift(state: &mut SimulationState, grid: &GridWorld, spawner: &mut SpawnManager) {
    if !state.effects.is_active(EffectKind::Magnet) {
        return;
    }
    let Some(target) = state.target else {
        return;
    };
    let head = state.snake.head();
    if head.manhattan(target) > MAGNET_RADIUS {
        return;
    }
    if !spawner.chance(MAGNET_PULL_CHANCE) {
        return;
    }

    let dx = head.x - target.x;
    let dy = head.y - target.y;
    let mut next = target;
    if dx.abs() > dy.abs() {
        next.x += dx.signum();
    } else {
        next.y += dy.signum();
    }

    if grid.in_bounds(next) && !state.snake.contains(next) && !state.is_obstacle(next) {
        state.target = Some(next);
    }
}
