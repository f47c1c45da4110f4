//! Grid Snake - a tick-driven Snake engine with keyboard and swipe input
//!
//! This library provides:
//! - Core game logic: movement, collisions, food, score and speed (game module)
//! - Input arbitration for key presses and swipe gestures (input module)
//! - High-score persistence behind a trait (storage module)
//! - The variable-period tick clock (clock module)
//! - A terminal front end (render, metrics and modes modules)

pub mod clock;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
