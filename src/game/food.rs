use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::{grid_extent, Position, Snake};

/// Picks food cells by rejection sampling over the whole grid
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic spawner for tests and reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sample uniformly until a free cell comes up.
    ///
    /// Returns None when the snake already covers every cell, where
    /// sampling would never terminate, and for an empty grid.
    pub fn spawn(&mut self, grid_size: usize, snake: &Snake) -> Option<Position> {
        let extent = grid_extent(grid_size);
        let free = grid_size
            .checked_mul(grid_size)
            .map_or(true, |cells| snake.len() < cells);
        if extent == 0 || !free {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..extent);
            let y = self.rng.gen_range(0..extent);
            let pos = Position::new(x, y);

            if !snake.contains(pos) {
                return Some(pos);
            }
        }
    }
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self::new()
    }
}
