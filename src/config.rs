//! Simulation configuration
//!
//! `SimulationConfig` is fixed for the lifetime of a core (board size, seed).
//! `GameOptions` is re-applied on every reset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board dimensions must be positive (got {cols}x{rows})")]
    ZeroDimension { cols: u32, rows: u32 },

    #[error("board {cols}x{rows} cannot fit the starting snake (needs at least {min_cols}x{min_rows})")]
    BoardTooSmall {
        cols: u32,
        rows: u32,
        min_cols: u32,
        min_rows: u32,
    },

    #[error("board {cols}x{rows} exceeds the maximum of {max_cols}x{max_rows}")]
    BoardTooLarge {
        cols: u32,
        rows: u32,
        max_cols: u32,
        max_rows: u32,
    },

    #[error("base steps per second must be at least 1 (got {0})")]
    InvalidStepRate(u32),

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Obstacles placed on reset
    pub fn obstacle_count(&self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 16,
            Difficulty::Hard => 22,
        }
    }

    /// Chance per tick that a power-up appears (harder = rarer)
    pub fn powerup_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.030,
            Difficulty::Normal => 0.022,
            Difficulty::Hard => 0.017,
        }
    }

    /// Obstacles added each time the score hits a milestone
    pub fn milestone_obstacles(&self) -> usize {
        match self {
            Difficulty::Hard => 2,
            _ => 1,
        }
    }
}

/// Options applied on every reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub difficulty: Difficulty,
    pub obstacles_enabled: bool,
    pub powerups_enabled: bool,
    /// Simulation rate before the slow effect is applied
    pub base_steps_per_second: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            obstacles_enabled: true,
            powerups_enabled: true,
            base_steps_per_second: DEFAULT_STEPS_PER_SECOND,
        }
    }
}

impl GameOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_steps_per_second == 0 {
            return Err(ConfigError::InvalidStepRate(self.base_steps_per_second));
        }
        Ok(())
    }
}

/// Construction-time configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub cols: u32,
    pub rows: u32,
    /// Run seed for reproducibility
    pub seed: u64,
    pub options: GameOptions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            seed: 0,
            options: GameOptions::default(),
        }
    }
}

impl SimulationConfig {
    /// Default board with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Re-derive the column count from a host aspect ratio, keeping `rows`.
    ///
    /// Must be applied before the core is built; the board never resizes mid-run.
    pub fn fit_to_aspect(mut self, width: f32, height: f32) -> Self {
        if width > 0.0 && height > 0.0 {
            let cols = (self.rows as f32 * width / height).round() as u32;
            self.cols = cols.clamp(MIN_COLS, MAX_COLS);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::ZeroDimension {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cols < MIN_COLS || self.rows < MIN_ROWS {
            return Err(ConfigError::BoardTooSmall {
                cols: self.cols,
                rows: self.rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
            });
        }
        if self.cols > MAX_COLS || self.rows > MAX_ROWS {
            return Err(ConfigError::BoardTooLarge {
                cols: self.cols,
                rows: self.rows,
                max_cols: MAX_COLS,
                max_rows: MAX_ROWS,
            });
        }
        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.cols, 34);
        assert_eq!(config.rows, 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let config = SimulationConfig {
            cols: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDimension { cols: 0, rows: 19 })
        ));
    }

    #[test]
    fn test_board_too_small_rejected() {
        let config = SimulationConfig {
            cols: 5,
            rows: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { .. })
        ));
    }

    #[test]
    fn test_oversized_board_rejected() {
        let config = SimulationConfig {
            cols: 3_000_000_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { cols: 3_000_000_000, rows: 19, .. })
        ));

        let tall = SimulationConfig {
            rows: MAX_ROWS + 1,
            ..Default::default()
        };
        assert!(matches!(
            SimulationConfig::from_json(&serde_json::to_string(&tall).unwrap()),
            Err(ConfigError::BoardTooLarge { .. })
        ));

        let largest = SimulationConfig {
            cols: MAX_COLS,
            rows: MAX_ROWS,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_zero_step_rate_rejected() {
        let options = GameOptions {
            base_steps_per_second: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidStepRate(0))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimulationConfig::from_json(r#"{"seed": 7, "options": {"difficulty": "hard"}}"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.options.difficulty, Difficulty::Hard);
        assert!(config.options.obstacles_enabled);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            SimulationConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{"rows": 0}"#),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_fit_to_aspect() {
        let config = SimulationConfig::default().fit_to_aspect(1920.0, 1080.0);
        assert_eq!(config.cols, 34);

        let square = SimulationConfig::default().fit_to_aspect(100.0, 100.0);
        assert_eq!(square.cols, 19);

        let tall = SimulationConfig::default().fit_to_aspect(10.0, 1000.0);
        assert_eq!(tall.cols, MIN_COLS);

        let wide = SimulationConfig::default().fit_to_aspect(1_000_000.0, 1.0);
        assert_eq!(wide.cols, MAX_COLS);
    }

    #[test]
    fn test_difficulty_tables() {
        assert_eq!(Difficulty::Easy.obstacle_count(), 10);
        assert_eq!(Difficulty::Hard.obstacle_count(), 22);
        assert_eq!(Difficulty::Hard.milestone_obstacles(), 2);
        assert_eq!(Difficulty::Normal.milestone_obstacles(), 1);
        assert!(Difficulty::Easy.powerup_chance() > Difficulty::Hard.powerup_chance());
    }
}
