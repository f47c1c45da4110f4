use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::action::Direction;

/// Largest accepted grid side
pub const MAX_GRID_SIZE: usize = 1024;

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("grid size must be at most {max}, got {size}")]
    GridTooLarge { size: usize, max: usize },
    #[error("minimum speed must be greater than zero")]
    ZeroMinSpeed,
    #[error("initial speed {initial}ms is below the minimum speed {min}ms")]
    InitialBelowMin { initial: u64, min: u64 },
    #[error("swipe threshold must be a positive number, got {0}")]
    InvalidSwipeThreshold(f32),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Tick period of a fresh game, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick period shrinks per food eaten
    pub speed_step_ms: u64,
    /// Lower bound for the tick period
    pub min_speed_ms: u64,
    /// Points awarded per food
    pub score_increment: u32,
    /// Gestures shorter than this on both axes count as a tap
    pub swipe_threshold: f32,
    /// Heading of a freshly started snake
    pub start_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_speed_ms: 150,
            speed_step_ms: 5,
            min_speed_ms: 50,
            score_increment: 10,
            swipe_threshold: 30.0,
            start_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse game config")
    }

    /// Load a configuration file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err(ConfigError::InitialBelowMin {
                initial: self.initial_speed_ms,
                min: self.min_speed_ms,
            });
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            return Err(ConfigError::InvalidSwipeThreshold(self.swipe_threshold));
        }
        Ok(())
    }
}
