use super::state::{GamePhase, GameState, Position};

/// Read-only view of everything the presentation layer draws
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    state: &'a GameState,
}

impl<'a> Snapshot<'a> {
    pub fn from_state(state: &'a GameState) -> Self {
        Self { state }
    }

    /// Snake cells, head first
    pub fn snake(&self) -> impl Iterator<Item = &'a Position> + 'a {
        self.state.snake.iter()
    }

    pub fn head(&self) -> Position {
        self.state.snake.head()
    }

    pub fn food(&self) -> Option<Position> {
        self.state.food
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Food was eaten on the last tick
    pub fn ate_food(&self) -> bool {
        self.state.ate_food
    }

    pub fn new_high_score(&self) -> bool {
        self.state.new_high_score
    }

    pub fn grid_size(&self) -> usize {
        self.state.grid_size
    }

    pub fn is_snake(&self, pos: Position) -> bool {
        self.state.snake.contains(pos)
    }
}
