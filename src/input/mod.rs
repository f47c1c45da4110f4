//! Input arbitration: keyboard and swipe gestures both resolve to an [`Intent`](crate::game::Intent)

pub mod gesture;
pub mod handler;

pub use gesture::{classify, Gesture, Point, SwipeTracker};
pub use handler::{direction_from_symbol, InputHandler, KeyAction};
