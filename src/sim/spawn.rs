//! Placement of targets, obstacles and power-ups
//!
//! All randomness in the simulation is drawn from the spawner's seeded PCG
//! stream, so a run is reproducible from its seed and input sequence.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::EffectKind;
use super::grid::{Cell, GridWorld};
use super::state::{PowerUp, SimEvent, SimulationState};
use crate::config::GameOptions;
use crate::consts::*;

/// Cells that a spawn must avoid
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    cells: HashSet<Cell>,
}

impl Occupancy {
    /// Snake, obstacles, power-ups and the current target
    pub fn of(state: &SimulationState) -> Self {
        let mut cells: HashSet<Cell> = state.snake.segments().collect();
        cells.extend(state.obstacles.iter().copied());
        cells.extend(state.powerups.iter().map(|p| p.cell));
        cells.extend(state.target);
        Self { cells }
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Seeded placement service
#[derive(Debug, Clone)]
pub struct SpawnManager {
    grid: GridWorld,
    rng: Pcg32,
}

impl SpawnManager {
    pub fn new(grid: GridWorld, seed: u64) -> Self {
        Self {
            grid,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform draw among free cells.
    ///
    /// Falls back to a row-major scan after `SPAWN_TRIES` misses, and to
    /// `FALLBACK_CELL` when the board is full.
    pub fn random_free_cell(&mut self, occupancy: &Occupancy) -> Cell {
        for _ in 0..SPAWN_TRIES {
            let cell = Cell::new(
                self.rng.random_range(0..self.grid.cols()) as i32,
                self.rng.random_range(0..self.grid.rows()) as i32,
            );
            if !occupancy.contains(cell) {
                return cell;
            }
        }

        log::warn!(
            "No free cell after {} random tries ({} of {} occupied), scanning",
            SPAWN_TRIES,
            occupancy.len(),
            self.grid.cell_count()
        );
        if let Some(cell) = self.grid.cells().find(|&c| !occupancy.contains(c)) {
            return cell;
        }

        log::warn!("Board is full, using fallback cell {:?}", FALLBACK_CELL);
        FALLBACK_CELL
    }

    /// Bernoulli roll on the simulation stream
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Replace the target with a fresh free cell
    pub fn spawn_target(&mut self, state: &mut SimulationState) -> Cell {
        state.target = None;
        let cell = self.random_free_cell(&Occupancy::of(state));
        state.target = Some(cell);
        log::debug!("Target spawned at ({}, {})", cell.x, cell.y);
        cell
    }

    /// Clear and regenerate obstacles for a new run.
    ///
    /// Draws that land too close to the head are dropped rather than retried,
    /// so fewer than the requested count may be placed.
    pub fn spawn_obstacles(&mut self, state: &mut SimulationState, options: &GameOptions) {
        state.obstacles.clear();
        if !options.obstacles_enabled {
            return;
        }

        let head = state.snake.head();
        let mut occupancy = Occupancy::of(state);
        let requested = options.difficulty.obstacle_count();
        for _ in 0..requested {
            let cell = self.random_free_cell(&occupancy);
            if cell.manhattan(head) < OBSTACLE_SAFE_DISTANCE || occupancy.contains(cell) {
                continue;
            }
            state.obstacles.push(cell);
            occupancy.insert(cell);
        }
        log::debug!(
            "Spawned {}/{} obstacles ({})",
            state.obstacles.len(),
            requested,
            options.difficulty.as_str()
        );
    }

    /// Extra obstacles for a score milestone; no head margin applies
    pub fn add_obstacles(&mut self, state: &mut SimulationState, count: usize) -> usize {
        let mut occupancy = Occupancy::of(state);
        let mut added = 0;
        for _ in 0..count {
            let cell = self.random_free_cell(&occupancy);
            if occupancy.contains(cell) {
                continue;
            }
            state.obstacles.push(cell);
            occupancy.insert(cell);
            added += 1;
        }
        added
    }

    /// Roll for a new power-up this tick
    pub fn maybe_spawn_powerup(
        &mut self,
        state: &mut SimulationState,
        options: &GameOptions,
        events: &mut Vec<SimEvent>,
    ) {
        if !options.powerups_enabled || state.powerups.len() >= MAX_POWERUPS {
            return;
        }
        if !self.chance(options.difficulty.powerup_chance()) {
            return;
        }

        let kind = EffectKind::ALL[self.rng.random_range(0..EffectKind::ALL.len())];
        let cell = self.random_free_cell(&Occupancy::of(state));
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            kind,
            cell,
            remaining_on_board_ms: POWERUP_BOARD_TTL_MS,
        });
        log::debug!("Power-up {:?} spawned at ({}, {})", kind, cell.x, cell.y);
        events.push(SimEvent::PowerupSpawned { kind, cell });
    }
}
