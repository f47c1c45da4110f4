use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{
    action::{Direction, Intent},
    config::{ConfigError, GameConfig},
    food::FoodSpawner,
    snapshot::Snapshot,
    state::{start_origin, CollisionType, GamePhase, GameState, Position, Snake},
};
use crate::storage::HighScoreStore;

/// Events produced by a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// The game ended with a new record
    pub new_high_score: bool,
    /// The tick period changed; the clock must be rearmed
    pub speed_changed: bool,
    /// The game left the Running phase; the clock must stop
    pub phase_changed: bool,
}

/// The game engine: sole owner of the authoritative game state.
///
/// Input handlers only ever touch the pending direction or request a start;
/// the snake and food are mutated by [`GameEngine::tick`] alone.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    spawner: FoodSpawner,
    store: Box<dyn HighScoreStore + Send>,
}

impl GameEngine {
    /// Create an engine waiting in the Ready phase
    pub fn new(
        config: GameConfig,
        store: Box<dyn HighScoreStore + Send>,
    ) -> Result<Self, ConfigError> {
        Self::with_spawner(config, store, FoodSpawner::new())
    }

    pub fn with_spawner(
        config: GameConfig,
        store: Box<dyn HighScoreStore + Send>,
        mut spawner: FoodSpawner,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let snake = Snake::single(start_origin(config.grid_size));
        let food = spawner.spawn(config.grid_size, &snake);
        let mut state = GameState::new(snake, food, &config);

        state.high_score = match store.load() {
            Ok(score) => score,
            Err(err) => {
                warn!(error = %err, "failed to load high score, starting from 0");
                0
            }
        };

        Ok(Self {
            config,
            state,
            spawner,
            store,
        })
    }

    /// Start a new game. Only valid from Ready, Over or Won.
    ///
    /// Returns false when a game is already running.
    pub fn start(&mut self) -> bool {
        if !self.state.phase.can_start() {
            trace!("start ignored, game already running");
            return false;
        }

        let snake = Snake::single(start_origin(self.config.grid_size));
        let food = self.spawner.spawn(self.config.grid_size, &snake);
        let high_score = self.state.high_score;

        self.state = GameState::new(snake, food, &self.config);
        self.state.high_score = high_score;
        self.state.phase = GamePhase::Running;

        info!(
            grid_size = self.config.grid_size,
            speed_ms = self.state.speed_ms,
            "game started"
        );
        true
    }

    /// Queue a heading for the next tick.
    ///
    /// Rejected when it reverses the direction applied by the last tick.
    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.state.direction) {
            trace!(?direction, applied = ?self.state.direction, "reversal rejected");
            return false;
        }

        self.state.pending_direction = direction;
        true
    }

    /// Route an input intent to the matching operation
    pub fn handle_intent(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Turn(direction) => self.set_direction(direction),
            Intent::Start => self.start(),
        }
    }

    /// Advance the game by one cell. No-op unless Running.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state.phase != GamePhase::Running {
            return outcome;
        }

        self.state.ate_food = false;
        self.state.direction = self.state.pending_direction;
        self.state.ticks = self.state.ticks.saturating_add(1);

        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);

        if let Some(collision) = self.check_collision(new_head) {
            info!(
                ?collision,
                score = self.state.score,
                length = self.state.snake.len(),
                "game over"
            );
            outcome.collision = Some(collision);
            self.finish(GamePhase::Over, &mut outcome);
            return outcome;
        }

        self.state.snake.push_head(new_head);

        if self.state.food == Some(new_head) {
            self.eat(&mut outcome);
        } else {
            self.state.snake.pop_tail();
        }

        outcome
    }

    /// Check if the new head position causes a collision.
    ///
    /// The body is tested before the tail moves, so the cell the tail is
    /// about to leave still counts as occupied.
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn eat(&mut self, outcome: &mut TickOutcome) {
        let previous_speed = self.state.speed_ms;

        self.state.ate_food = true;
        self.state.score = self.state.score.saturating_add(self.config.score_increment);
        self.state.speed_ms = previous_speed
            .saturating_sub(self.config.speed_step_ms)
            .max(self.config.min_speed_ms);

        outcome.ate_food = true;
        outcome.speed_changed = self.state.speed_ms != previous_speed;

        debug!(
            score = self.state.score,
            speed_ms = self.state.speed_ms,
            length = self.state.snake.len(),
            "food eaten"
        );

        self.state.food = self.spawner.spawn(self.config.grid_size, &self.state.snake);
        if self.state.food.is_none() {
            info!(score = self.state.score, "grid filled, game won");
            self.finish(GamePhase::Won, outcome);
        }
    }

    /// Leave the Running phase and settle the high score
    fn finish(&mut self, phase: GamePhase, outcome: &mut TickOutcome) {
        self.state.phase = phase;
        outcome.phase_changed = true;

        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
            self.state.new_high_score = true;
            outcome.new_high_score = true;

            info!(score = self.state.score, "new high score");
            if let Err(err) = self.store.save(self.state.score) {
                warn!(error = %err, "failed to save high score");
            }
        }
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::from_state(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Current tick period
    pub fn speed(&self) -> Duration {
        self.state.speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn engine(config: GameConfig, store: MemoryStore) -> GameEngine {
        GameEngine::with_spawner(config, Box::new(store), FoodSpawner::seeded(3)).unwrap()
    }

    /// Running engine with a hand-placed snake and food
    fn running_engine(
        config: GameConfig,
        cells: &[Position],
        direction: Direction,
        food: Position,
    ) -> GameEngine {
        let mut engine = engine(config, MemoryStore::new());
        engine.start();
        engine.state.snake = Snake::from_cells(cells.iter().copied()).unwrap();
        engine.state.direction = direction;
        engine.state.pending_direction = direction;
        engine.state.food = Some(food);
        engine
    }

    /// Put food right in front of the head and tick
    fn feed(engine: &mut GameEngine) -> TickOutcome {
        let ahead = engine
            .state
            .snake
            .head()
            .moved_in_direction(engine.state.pending_direction);
        engine.state.food = Some(ahead);
        engine.tick()
    }

    fn assert_food_clear(engine: &GameEngine) {
        if let Some(food) = engine.state.food {
            assert!(!engine.state.snake.contains(food));
        }
    }

    #[test]
    fn test_new_engine_is_ready() {
        let engine = engine(GameConfig::default(), MemoryStore::with_score(70));

        assert_eq!(engine.phase(), GamePhase::Ready);
        assert_eq!(engine.state.snake.len(), 1);
        assert_eq!(engine.state.high_score, 70);
        assert_food_clear(&engine);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameEngine::new(GameConfig::new(1), Box::new(MemoryStore::new()));
        assert!(matches!(result, Err(ConfigError::GridTooSmall(1))));
    }

    #[test]
    fn test_failing_store_loads_zero() {
        let store = MemoryStore::with_score(50);
        store.set_failing(true);
        let engine = engine(GameConfig::default(), store);

        assert_eq!(engine.state.high_score, 0);
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        let before = engine.state.clone();

        assert_eq!(engine.tick(), TickOutcome::default());
        assert_eq!(engine.state, before);
    }

    #[test]
    fn test_start() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());

        assert!(engine.start());
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.state.snake.head(), Position::new(10, 10));
        assert_eq!(engine.state.direction, Direction::Right);
        assert_eq!(engine.state.score, 0);
        assert_eq!(engine.state.speed_ms, 150);
        assert_food_clear(&engine);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();
        engine.tick();
        let before = engine.state.clone();

        assert!(!engine.start());
        assert!(!engine.handle_intent(Intent::Start));
        assert_eq!(engine.state, before);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();
        engine.state.food = Some(Position::new(0, 0));

        let outcome = engine.tick();

        assert!(!outcome.ate_food);
        assert_eq!(outcome.collision, None);
        assert_eq!(engine.state.snake.head(), Position::new(11, 10));
        assert_eq!(engine.state.snake.len(), 1);
        assert_eq!(engine.state.ticks, 1);
    }

    #[test]
    fn test_length_preserved_without_food() {
        let cells = [Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        let mut engine =
            running_engine(GameConfig::default(), &cells, Direction::Right, Position::new(0, 0));

        for _ in 0..5 {
            engine.tick();
            assert_eq!(engine.state.snake.len(), 3);
        }
        assert_eq!(engine.state.snake.head(), Position::new(10, 5));
        assert_eq!(engine.state.snake.tail(), Position::new(8, 5));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();

        let outcome = feed(&mut engine);

        assert!(outcome.ate_food);
        assert!(outcome.speed_changed);
        assert!(engine.state.ate_food);
        assert_eq!(engine.state.score, 10);
        assert_eq!(engine.state.speed_ms, 145);
        assert_eq!(engine.state.snake.len(), 2);
        assert_food_clear(&engine);

        // The flag only lasts one tick
        engine.state.food = Some(Position::new(0, 0));
        engine.tick();
        assert!(!engine.state.ate_food);
    }

    #[test]
    fn test_speed_clamps_at_minimum() {
        let cells = [Position::new(1, 20)];
        let mut engine =
            running_engine(GameConfig::new(40), &cells, Direction::Right, Position::new(0, 0));

        for _ in 0..20 {
            assert!(feed(&mut engine).ate_food);
            assert_food_clear(&engine);
        }
        assert_eq!(engine.state.speed_ms, 50);
        assert_eq!(engine.state.score, 200);
        assert_eq!(engine.state.snake.len(), 21);

        let outcome = feed(&mut engine);
        assert!(outcome.ate_food);
        assert!(!outcome.speed_changed);
        assert_eq!(engine.state.speed_ms, 50);
        assert_eq!(engine.state.score, 210);
    }

    #[test]
    fn test_score_saturates() {
        let config = GameConfig {
            score_increment: u32::MAX - 5,
            ..GameConfig::default()
        };
        let mut engine = engine(config, MemoryStore::new());
        engine.start();

        feed(&mut engine);
        assert_eq!(engine.state.score, u32::MAX - 5);
        feed(&mut engine);
        assert_eq!(engine.state.score, u32::MAX);
    }

    #[test]
    fn test_tick_counter_saturates() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();
        engine.state.food = Some(Position::new(0, 0));
        engine.state.ticks = u32::MAX;

        engine.tick();
        assert_eq!(engine.state.ticks, u32::MAX);
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let result = GameEngine::new(GameConfig::new(usize::MAX), Box::new(MemoryStore::new()));
        assert!(matches!(result, Err(ConfigError::GridTooLarge { .. })));
    }

    #[test]
    fn test_wall_collision() {
        let cells = [Position::new(0, 5), Position::new(1, 5)];
        let mut engine =
            running_engine(GameConfig::small(), &cells, Direction::Left, Position::new(5, 5));
        let snake_before = engine.state.snake.clone();

        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert!(outcome.phase_changed);
        assert_eq!(engine.phase(), GamePhase::Over);
        assert_eq!(engine.state.snake, snake_before);
        assert_eq!(engine.state.food, Some(Position::new(5, 5)));
    }

    #[test]
    fn test_wall_collision_every_side() {
        let cases = [
            (Position::new(0, 4), Direction::Left),
            (Position::new(9, 4), Direction::Right),
            (Position::new(4, 0), Direction::Up),
            (Position::new(4, 9), Direction::Down),
        ];

        for (head, direction) in cases {
            let mut engine =
                running_engine(GameConfig::small(), &[head], direction, Position::new(5, 5));
            assert_eq!(engine.tick().collision, Some(CollisionType::Wall));
        }
    }

    #[test]
    fn test_self_collision() {
        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let cells: Vec<Position> = (1..=5).rev().map(|x| Position::new(x, 5)).collect();
        let mut engine =
            running_engine(GameConfig::small(), &cells, Direction::Right, Position::new(8, 8));

        // Right: (6,5), (5,5), (4,5), (3,5), (2,5)
        engine.tick();
        // Down: (6,6), (6,5), (5,5), (4,5), (3,5)
        engine.set_direction(Direction::Down);
        engine.tick();
        // Left: (5,6), (6,6), (6,5), (5,5), (4,5)
        engine.set_direction(Direction::Left);
        engine.tick();
        // Up: (5,5) is still body
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        // A 2x2 loop: the head's next cell is the tail, which would be
        // vacated this tick. It still counts as occupied.
        let cells = [
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
        ];
        let mut engine =
            running_engine(GameConfig::small(), &cells, Direction::Up, Position::new(0, 0));
        engine.set_direction(Direction::Right);

        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.state.snake.len(), 4);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let cells = [Position::new(10, 10)];
            let mut engine =
                running_engine(GameConfig::default(), &cells, direction, Position::new(0, 0));
            engine.tick();
            let head = engine.state.snake.head();

            assert!(!engine.set_direction(direction.opposite()));
            engine.tick();

            assert_eq!(engine.state.direction, direction);
            assert_eq!(engine.state.snake.head(), head.moved_in_direction(direction));
        }
    }

    #[test]
    fn test_reversal_checked_against_applied_direction() {
        let cells = [Position::new(10, 10), Position::new(9, 10)];
        let mut engine =
            running_engine(GameConfig::default(), &cells, Direction::Right, Position::new(0, 0));

        // Up is queued; Left is still the reverse of the applied Right
        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.state.pending_direction, Direction::Up);

        engine.tick();
        assert_eq!(engine.state.snake.head(), Position::new(10, 9));

        // After Up was applied, Left is a legal turn
        assert!(engine.handle_intent(Intent::Turn(Direction::Left)));
    }

    #[test]
    fn test_direction_change_waits_for_tick() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();
        let head = engine.state.snake.head();

        engine.set_direction(Direction::Down);

        assert_eq!(engine.state.snake.head(), head);
        assert_eq!(engine.state.direction, Direction::Right);
        assert_eq!(engine.state.pending_direction, Direction::Down);
    }

    #[test]
    fn test_new_high_score_emitted_once() {
        let store = MemoryStore::with_score(100);
        let mut engine = engine(GameConfig::new(40), store.clone());
        engine.start();
        engine.state.snake = Snake::single(Position::new(1, 20));

        for _ in 0..11 {
            feed(&mut engine);
        }
        assert_eq!(engine.state.score, 110);

        engine.state.food = Some(Position::new(0, 0));
        engine.set_direction(Direction::Up);
        let mut emitted = 0;
        for _ in 0..30 {
            if engine.tick().new_high_score {
                emitted += 1;
            }
        }

        assert_eq!(emitted, 1);
        assert_eq!(engine.phase(), GamePhase::Over);
        assert!(engine.state.new_high_score);
        assert_eq!(engine.state.high_score, 110);
        assert_eq!(store.score(), 110);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_lower_score_is_not_a_record() {
        let store = MemoryStore::with_score(100);
        let mut engine = engine(GameConfig::new(40), store.clone());
        engine.start();
        engine.state.snake = Snake::single(Position::new(1, 20));

        for _ in 0..9 {
            feed(&mut engine);
        }
        engine.state.food = Some(Position::new(0, 0));
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();
        assert!(!outcome.new_high_score);

        while engine.phase() == GamePhase::Running {
            assert!(!engine.tick().new_high_score);
        }
        assert_eq!(engine.state.score, 90);
        assert!(!engine.state.new_high_score);
        assert_eq!(engine.state.high_score, 100);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_zero_score_never_a_record() {
        let store = MemoryStore::new();
        let cells = [Position::new(0, 0)];
        let mut engine = engine(GameConfig::small(), store.clone());
        engine.start();
        engine.state.snake = Snake::from_cells(cells).unwrap();
        engine.set_direction(Direction::Up);

        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert!(!outcome.new_high_score);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_save_failure_does_not_block_game_over() {
        let store = MemoryStore::new();
        let mut engine = engine(GameConfig::small(), store.clone());
        engine.start();
        feed(&mut engine);
        store.set_failing(true);

        engine.state.snake = Snake::single(Position::new(9, 0));
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(outcome.new_high_score);
        assert_eq!(engine.phase(), GamePhase::Over);
        assert!(engine.start());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut engine = engine(GameConfig::default(), MemoryStore::new());
        engine.start();
        for _ in 0..3 {
            feed(&mut engine);
        }
        engine.state.food = Some(Position::new(0, 0));
        while engine.phase() == GamePhase::Running {
            engine.tick();
        }
        assert!(engine.state.new_high_score);

        assert!(engine.handle_intent(Intent::Start));

        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.state.score, 0);
        assert_eq!(engine.state.speed_ms, 150);
        assert_eq!(engine.state.snake.len(), 1);
        assert_eq!(engine.state.snake.head(), Position::new(10, 10));
        assert_eq!(engine.state.direction, Direction::Right);
        assert!(!engine.state.new_high_score);
        assert!(!engine.state.ate_food);
        assert_eq!(engine.state.high_score, 30);
        assert_food_clear(&engine);
    }

    #[test]
    fn test_filling_grid_wins() {
        // 2x2 grid, three cells taken, food on the last one
        let cells = [Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)];
        let mut engine =
            running_engine(GameConfig::new(2), &cells, Direction::Up, Position::new(1, 0));
        engine.set_direction(Direction::Right);

        let outcome = engine.tick();

        assert!(outcome.ate_food);
        assert!(outcome.phase_changed);
        assert!(outcome.new_high_score);
        assert_eq!(outcome.collision, None);
        assert_eq!(engine.phase(), GamePhase::Won);
        assert_eq!(engine.state.snake.len(), 4);
        assert_eq!(engine.state.food, None);
        assert!(engine.start());
    }

    #[test]
    fn test_food_never_on_snake_during_play() {
        let mut engine = engine(GameConfig::small(), MemoryStore::new());
        engine.start();
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

        for step in 0..200 {
            if engine.phase() != GamePhase::Running {
                engine.start();
            }
            if step % 3 == 0 {
                engine.set_direction(turns[(step / 3) % turns.len()]);
            }
            let before = engine.state.snake.len();
            let outcome = engine.tick();

            if outcome.collision.is_none() {
                let expected = if outcome.ate_food { before + 1 } else { before };
                assert_eq!(engine.state.snake.len(), expected);
            }
            assert_food_clear(&engine);
        }
    }
}
