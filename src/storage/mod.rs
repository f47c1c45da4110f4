//! High-score persistence
//!
//! The engine only talks to the [`HighScoreStore`] trait: it loads the record
//! once when created and saves it when a finished game beats it. Store errors
//! are logged by the engine and never stop a game from ending or restarting.

pub mod high_score;

pub use high_score::{HighScoreStore, JsonFileStore, MemoryStore};
