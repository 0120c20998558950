//! Host preferences and best score
//!
//! Persisted by the host between sessions. The simulation core never reads or
//! writes these; hosts turn them into `GameOptions` and feed scores back in.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Difficulty, GameOptions};
use crate::consts::DEFAULT_STEPS_PER_SECOND;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    pub difficulty: Difficulty,
    pub obstacles_enabled: bool,
    pub powerups_enabled: bool,
    /// Speed slider value
    pub base_steps_per_second: u32,

    // === Cosmetic ===
    /// Selected skin identifier; opaque to the core
    pub skin: String,

    // === Records ===
    pub best_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            obstacles_enabled: true,
            powerups_enabled: true,
            base_steps_per_second: DEFAULT_STEPS_PER_SECOND,
            skin: "neon".to_string(),
            best_score: 0,
        }
    }
}

impl Settings {
    /// Options for the next reset
    pub fn options(&self) -> GameOptions {
        GameOptions {
            difficulty: self.difficulty,
            obstacles_enabled: self.obstacles_enabled,
            powerups_enabled: self.powerups_enabled,
            base_steps_per_second: self.base_steps_per_second,
        }
    }

    /// Remember the options a run was started with
    pub fn apply_options(&mut self, options: &GameOptions) {
        self.difficulty = options.difficulty;
        self.obstacles_enabled = options.obstacles_enabled;
        self.powerups_enabled = options.powerups_enabled;
        self.base_steps_per_second = options.base_steps_per_second;
    }

    /// Record a finished run's score. Returns true on a new best.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from `path`, falling back to defaults if missing or corrupt
    pub fn load(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved (best score {})", self.best_score);
        Ok(())
    }
}
