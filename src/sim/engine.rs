//! Composed simulation core
//!
//! Owns the board, the spawner's RNG stream, the stepper and the event buffer.
//! Hosts feed it frame deltas and directional intents, then read the state and
//! drain events once per frame.

use super::grid::{Direction, GridWorld};
use super::spawn::SpawnManager;
use super::state::{Phase, SimEvent, SimulationState};
use super::stepper::{Stepper, step_interval_ms};
use super::tick::{TickOutcome, tick};
use crate::config::{ConfigError, GameOptions, SimulationConfig};

#[derive(Debug, Clone)]
pub struct SimulationCore {
    config: SimulationConfig,
    grid: GridWorld,
    spawner: SpawnManager,
    stepper: Stepper,
    state: SimulationState,
    events: Vec<SimEvent>,
}

impl SimulationCore {
    /// Validate `config` and set up a fresh board in `Phase::Menu`
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = GridWorld::new(config.cols, config.rows);
        let mut core = Self {
            config,
            grid,
            spawner: SpawnManager::new(grid, config.seed),
            stepper: Stepper::new(),
            state: SimulationState::new(&grid),
            events: Vec::new(),
        };
        core.populate();
        log::info!(
            "Simulation created: {}x{} board, seed {}",
            config.cols,
            config.rows,
            config.seed
        );
        Ok(core)
    }

    /// Fresh snake, target and obstacles; phase is left at `Menu`
    fn populate(&mut self) {
        self.state = SimulationState::new(&self.grid);
        self.stepper.reset();
        self.events.clear();
        self.spawner.spawn_target(&mut self.state);
        self.spawner
            .spawn_obstacles(&mut self.state, &self.config.options);
        self.events.push(SimEvent::ScoreChanged { score: 0 });
    }

    /// Start a new run with `options` and enter `Playing`.
    ///
    /// On error the current run is left untouched.
    pub fn reset(&mut self, options: GameOptions) -> Result<(), ConfigError> {
        self.reset_to_menu(options)?;
        self.state.phase = Phase::Playing;
        Ok(())
    }

    /// Start a new run with `options` but wait in `Menu`
    pub fn reset_to_menu(&mut self, options: GameOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.config.options = options;
        self.populate();
        log::info!(
            "Reset: difficulty {}, obstacles {}, power-ups {}, {} steps/s",
            options.difficulty.as_str(),
            options.obstacles_enabled,
            options.powerups_enabled,
            options.base_steps_per_second
        );
        Ok(())
    }

    /// Menu or Paused -> Playing
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            Phase::Menu | Phase::Paused => {
                self.state.phase = Phase::Playing;
                self.stepper.reset_clock();
                log::info!("Playing");
                true
            }
            _ => false,
        }
    }

    /// Playing -> Paused. Unspent time stays in the accumulator.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Playing {
            return false;
        }
        self.state.phase = Phase::Paused;
        self.stepper.reset_clock();
        log::info!("Paused");
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        self.state.phase == Phase::Paused && self.start()
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Queue the direction for the next tick.
    ///
    /// An exact reversal of the current direction is ignored unless the snake
    /// is a single cell. Returns whether the intent was taken.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.state.phase == Phase::GameOver {
            return false;
        }
        if self.state.snake.len() > 1 && self.state.direction.is_opposite(direction) {
            return false;
        }
        self.state.pending_direction = direction;
        true
    }

    /// Queue a raw unit vector; anything that is not a unit axis vector is ignored
    pub fn queue_delta(&mut self, dx: i32, dy: i32) -> bool {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.queue_direction(direction),
            None => false,
        }
    }

    /// Credit a frame delta and run every whole tick it pays for.
    ///
    /// Effect and power-up countdowns advance once per frame. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, delta_ms: f32) -> usize {
        if self.state.phase != Phase::Playing {
            return 0;
        }

        let dt = self.stepper.accumulate(delta_ms);
        self.state.effects.tick(dt);
        self.state.age_powerups(dt, &mut self.events);

        let step_ms = step_interval_ms(self.effective_steps_per_second());
        let mut ticks = 0;
        while self.stepper.try_consume(step_ms) {
            self.run_tick();
            ticks += 1;
            if self.state.phase != Phase::Playing {
                break;
            }
        }
        ticks
    }

    /// Like `advance`, but from an absolute host timestamp
    pub fn advance_to(&mut self, timestamp_ms: f64) -> usize {
        let delta = self.stepper.frame_delta(timestamp_ms);
        self.advance(delta)
    }

    /// Run exactly one tick, bypassing the stepper. No-op unless Playing.
    pub fn step(&mut self) -> Option<TickOutcome> {
        if self.state.phase != Phase::Playing {
            return None;
        }
        Some(self.run_tick())
    }

    fn run_tick(&mut self) -> TickOutcome {
        tick(
            &mut self.state,
            &self.grid,
            &self.config.options,
            &mut self.spawner,
            &mut self.events,
        )
    }

    /// Rate after effects (slow) are applied
    pub fn effective_steps_per_second(&self) -> u32 {
        self.state
            .effects
            .effective_steps_per_second(self.config.options.base_steps_per_second)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SimulationState {
        self.state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn options(&self) -> &GameOptions {
        &self.config.options
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::sim::effects::EffectKind;
    use crate::sim::grid::Cell;
    use crate::sim::snake::Snake;
    use crate::sim::state::{GameOverReason, PowerUp};
    use proptest::prelude::*;

    fn quiet_options() -> GameOptions {
        GameOptions {
            obstacles_enabled: false,
            powerups_enabled: false,
            ..Default::default()
        }
    }

    fn playing(seed: u64, options: GameOptions) -> SimulationCore {
        let mut core = SimulationCore::new(SimulationConfig::with_seed(seed)).unwrap();
        core.reset(options).unwrap();
        core.drain_events();
        core
    }

    #[test]
    fn test_new_starts_in_menu() {
        let mut core = SimulationCore::new(SimulationConfig::with_seed(1)).unwrap();
        assert_eq!(core.phase(), Phase::Menu);
        assert!(core.state().target.is_some());
        assert!(!core.state().obstacles.is_empty());
        assert_eq!(core.advance(50.0), 0);
        assert_eq!(core.step(), None);

        assert!(core.start());
        assert_eq!(core.phase(), Phase::Playing);
        assert!(!core.start());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimulationConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            SimulationCore::new(config),
            Err(ConfigError::ZeroDimension { .. })
        ));

        let huge = SimulationConfig {
            cols: 3_000_000_000,
            ..Default::default()
        };
        assert!(matches!(
            SimulationCore::new(huge),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut core = playing(7, quiet_options());
        assert_eq!(
            core.state().snake.segments().collect::<Vec<_>>(),
            vec![
                Cell::new(17, 9),
                Cell::new(16, 9),
                Cell::new(15, 9),
                Cell::new(14, 9)
            ]
        );
        assert!(core.state().obstacles.is_empty());
        core.state.target = Some(Cell::new(20, 9));

        let ticks: usize = (0..6).map(|_| core.advance(50.0)).sum();

        assert_eq!(ticks, 3);
        let state = core.state();
        assert_eq!(state.snake.head(), Cell::new(20, 9));
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 5);
        assert!(state.target.is_some());
        assert_ne!(state.target, Some(Cell::new(20, 9)));
        assert!(core.events().contains(&SimEvent::TargetConsumed {
            cell: Cell::new(20, 9)
        }));
    }

    #[test]
    fn test_shield_wall_bounce_through_core() {
        let mut core = playing(3, quiet_options());
        core.state.snake = Snake::new(Cell::new(33, 9), Direction::Right, 4);
        core.state.target = Some(Cell::new(0, 0));
        core.state.effects.set_remaining(EffectKind::Shield, 6500.0);

        assert_eq!(core.step(), Some(TickOutcome::Bounced(crate::sim::Collision::Wall)));
        assert_eq!(core.state().effects.remaining(EffectKind::Shield), 4300.0);
        assert_eq!(core.state().direction, Direction::Left);
        assert_eq!(core.phase(), Phase::Playing);
    }

    #[test]
    fn test_queue_direction_rejects_reversal() {
        let mut core = playing(1, quiet_options());
        assert!(!core.queue_direction(Direction::Left));
        assert_eq!(core.state().pending_direction, Direction::Right);

        assert!(core.queue_direction(Direction::Up));
        assert_eq!(core.state().pending_direction, Direction::Up);

        assert!(!core.queue_delta(1, 1));
        assert!(core.queue_delta(0, 1));
        assert_eq!(core.state().pending_direction, Direction::Down);
    }

    #[test]
    fn test_single_cell_snake_may_reverse() {
        let mut core = playing(1, quiet_options());
        core.state.snake = Snake::new(Cell::new(10, 10), Direction::Right, 1);
        assert!(core.queue_direction(Direction::Left));
    }

    #[test]
    fn test_game_over_stops_draining() {
        let mut core = playing(2, quiet_options());
        core.state.snake = Snake::new(Cell::new(33, 9), Direction::Right, 4);
        core.state.target = Some(Cell::new(0, 0));

        assert_eq!(core.advance(50.0), 0);
        assert_eq!(core.advance(50.0), 1);
        assert_eq!(core.phase(), Phase::GameOver);
        assert_eq!(core.advance(50.0), 0);
        assert!(!core.queue_direction(Direction::Up));
        assert!(!core.start());
        assert_eq!(
            core.drain_events(),
            vec![SimEvent::GameOver {
                reason: GameOverReason::Wall
            }]
        );
        assert!(core.events().is_empty());
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut core = playing(2, GameOptions::default());
        core.state.phase = Phase::GameOver;
        core.state.score = 120;

        let options = GameOptions {
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        core.reset(options).unwrap();
        assert_eq!(core.phase(), Phase::Playing);
        assert_eq!(core.score(), 0);
        assert_eq!(core.state().snake.len(), 4);
        assert!(core.state().obstacles.len() <= Difficulty::Easy.obstacle_count());
        assert_eq!(core.options().difficulty, Difficulty::Easy);
        assert_eq!(core.events(), &[SimEvent::ScoreChanged { score: 0 }]);

        core.reset_to_menu(GameOptions::default()).unwrap();
        assert_eq!(core.phase(), Phase::Menu);
    }

    #[test]
    fn test_reset_to_menu_from_any_phase() {
        for phase in [Phase::Playing, Phase::Paused, Phase::GameOver] {
            let mut core = playing(4, GameOptions::default());
            core.state.phase = phase;
            core.state.score = 60;
            core.state.ticks = 33;

            core.reset_to_menu(quiet_options()).unwrap();
            assert_eq!(core.phase(), Phase::Menu);
            assert_eq!(core.score(), 0);
            assert_eq!(core.state().ticks, 0);
            assert!(core.state().obstacles.is_empty());
            assert!(core.state().target.is_some());
            assert_eq!(core.events(), &[SimEvent::ScoreChanged { score: 0 }]);

            assert_eq!(core.step(), None);
            assert!(core.start());
        }
    }

    #[test]
    fn test_reset_with_bad_options_keeps_run() {
        let mut core = playing(2, quiet_options());
        core.state.score = 30;
        let bad = GameOptions {
            base_steps_per_second: 0,
            ..Default::default()
        };
        assert!(core.reset(bad).is_err());
        assert_eq!(core.score(), 30);
        assert_eq!(core.phase(), Phase::Playing);
    }

    #[test]
    fn test_pause_retains_accumulator_without_burst() {
        let mut core = playing(4, quiet_options());
        core.state.target = Some(Cell::new(0, 0));

        assert_eq!(core.advance_to(1000.0), 0);
        assert_eq!(core.advance_to(1050.0), 0);
        assert!(core.pause());
        assert_eq!(core.advance_to(1100.0), 0);

        // Long pause; resume must not credit it
        assert!(core.toggle_pause());
        assert_eq!(core.advance_to(90_000.0), 0);
        assert_eq!(core.state().ticks, 0);
        // The 50ms banked before the pause completes the next step
        assert_eq!(core.advance_to(90_050.0), 1);
    }

    #[test]
    fn test_slow_effect_lowers_tick_rate() {
        let mut fast = playing(5, quiet_options());
        let mut slow = playing(5, quiet_options());
        fast.state.target = Some(Cell::new(0, 0));
        slow.state.target = Some(Cell::new(0, 0));
        slow.state.effects.start(EffectKind::Slow);
        assert_eq!(slow.effective_steps_per_second(), 6);

        let fast_ticks: usize = (0..4).map(|_| fast.advance(50.0)).sum();
        let slow_ticks: usize = (0..4).map(|_| slow.advance(50.0)).sum();
        assert_eq!(fast_ticks, 2);
        assert_eq!(slow_ticks, 1);
    }

    #[test]
    fn test_effects_count_down_per_frame() {
        let mut core = playing(6, quiet_options());
        core.state.effects.start(EffectKind::Magnet);
        core.advance(30.0);
        core.advance(500.0);
        assert_eq!(core.state().effects.remaining(EffectKind::Magnet), 6420.0);
    }

    #[test]
    fn test_powerups_expire_on_board() {
        let mut core = playing(6, quiet_options());
        let id = core.state.next_entity_id();
        core.state.powerups.push(PowerUp {
            id,
            kind: EffectKind::Shield,
            cell: Cell::new(0, 0),
            remaining_on_board_ms: 60.0,
        });
        core.advance(50.0);
        assert_eq!(core.state().powerups.len(), 1);
        core.advance(50.0);
        assert!(core.state().powerups.is_empty());
        assert!(core.events().contains(&SimEvent::PowerupExpired {
            kind: EffectKind::Shield,
            cell: Cell::new(0, 0)
        }));
    }

    #[test]
    fn test_determinism() {
        // Two cores with the same seed and inputs must agree frame by frame
        let script: Vec<(Option<Direction>, f32)> = (0..400)
            .map(|i| {
                let turn = match i % 37 {
                    0 => Some(Direction::Up),
                    9 => Some(Direction::Left),
                    18 => Some(Direction::Down),
                    27 => Some(Direction::Right),
                    _ => None,
                };
                (turn, 10.0 + (i % 5) as f32 * 7.0)
            })
            .collect();

        let run = || {
            let mut core = playing(99_999, GameOptions::default());
            core.state.effects.start(EffectKind::Shield);
            let mut frames = Vec::new();
            for (turn, dt) in &script {
                if let Some(direction) = turn {
                    core.queue_direction(*direction);
                }
                core.advance(*dt);
                frames.push((core.snapshot(), core.drain_events()));
            }
            frames
        };

        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_core_invariants(
            seed in any::<u64>(),
            frames in proptest::collection::vec((0u8..6, 0.0f32..120.0), 1..300),
        ) {
            let mut core = playing(seed, GameOptions::default());
            for (input, dt) in frames {
                match input {
                    0 => { core.queue_direction(Direction::Up); }
                    1 => { core.queue_direction(Direction::Down); }
                    2 => { core.queue_direction(Direction::Left); }
                    3 => { core.queue_direction(Direction::Right); }
                    _ => {}
                }
                core.advance(dt);
                let state = core.state();
                prop_assert!(!state.snake.is_empty());
                prop_assert!(state.snake.segments().all(|c| core.grid().in_bounds(c)));
                prop_assert!(state.powerups.len() <= crate::consts::MAX_POWERUPS);
                if core.phase() == Phase::GameOver {
                    break;
                }
            }
        }
    }
}
