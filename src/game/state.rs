use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
}

impl Snake {
    /// A one-cell snake, the shape every game starts with
    pub fn single(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
        }
    }

    /// Build a snake from explicit cells, head first. Returns None when empty.
    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if position is covered by any segment, head and tail included
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Top-level lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first start intent
    Ready,
    Running,
    /// Ended by a collision
    Over,
    /// Ended because the snake filled the grid
    Won,
}

impl GamePhase {
    /// Whether a start intent is accepted in this phase
    pub fn can_start(&self) -> bool {
        !matches!(self, GamePhase::Running)
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// None only once the snake covers the whole grid
    pub food: Option<Position>,
    /// Direction applied by the most recent tick
    pub direction: Direction,
    /// Direction the next tick will apply
    pub pending_direction: Direction,
    pub grid_size: usize,
    pub score: u32,
    pub speed_ms: u64,
    pub phase: GamePhase,
    /// Food was eaten on the last tick
    pub ate_food: bool,
    /// The game that just ended set a new record
    pub new_high_score: bool,
    pub high_score: u32,
    pub ticks: u32,
}

impl GameState {
    /// Create a fresh state for `snake`, waiting in the Ready phase
    pub fn new(snake: Snake, food: Option<Position>, config: &GameConfig) -> Self {
        Self {
            snake,
            food,
            direction: config.start_direction,
            pending_direction: config.start_direction,
            grid_size: config.grid_size,
            score: 0,
            speed_ms: config.initial_speed_ms,
            phase: GamePhase::Ready,
            ate_food: false,
            new_high_score: false,
            high_score: 0,
            ticks: 0,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = grid_extent(self.grid_size);
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}

/// Cell every game starts from: the middle of the grid
pub fn start_origin(grid_size: usize) -> Position {
    let center = grid_extent(grid_size) / 2;
    Position::new(center, center)
}

/// Grid size as a coordinate bound. Sizes past `i32::MAX` are clamped;
/// validated configs never get near it.
pub(crate) fn grid_extent(grid_size: usize) -> i32 {
    i32::try_from(grid_size).unwrap_or(i32::MAX)
}
