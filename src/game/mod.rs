//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A driver feeds it intents and ticks; the presentation layer reads a [`Snapshot`].

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickOutcome};
pub use food::FoodSpawner;
pub use snapshot::Snapshot;
pub use state::{CollisionType, GamePhase, GameState, Position, Snake};
