//! Swipe gestures
//!
//! A gesture is a start point and an end point. Short movements on both axes
//! are taps; anything longer picks the dominant axis and its sign.

use crate::game::{Direction, Intent};

/// A point in screen units, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Swipe(Direction),
}

impl Gesture {
    /// A tap asks for a start; the engine ignores it while a game runs
    pub fn into_intent(self) -> Intent {
        match self {
            Gesture::Tap => Intent::Start,
            Gesture::Swipe(direction) => Intent::Turn(direction),
        }
    }
}

/// Resolve a completed gesture
pub fn classify(start: Point, end: Point, threshold: f32) -> Gesture {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs() < threshold && dy.abs() < threshold {
        return Gesture::Tap;
    }

    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    Gesture::Swipe(direction)
}

/// Tracks one gesture at a time
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<Point>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn begin(&mut self, point: Point) {
        self.start = Some(point);
    }

    /// Complete the gesture. None when no gesture was in progress.
    pub fn finish(&mut self, point: Point) -> Option<Gesture> {
        self.start
            .take()
            .map(|start| classify(start, point, self.threshold))
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn in_progress(&self) -> bool {
        self.start.is_some()
    }
}
