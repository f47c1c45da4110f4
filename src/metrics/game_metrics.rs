use std::time::{Duration, Instant};

/// Per-session statistics shown next to the board
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Best score of this session, independent of the stored record
    pub session_best: u32,
    pub games_played: u32,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            session_best: 0,
            games_played: 0,
            running: false,
        }
    }

    /// Refresh the clock of the game in progress; frozen once it ended
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        if final_score > self.session_best {
            self.session_best = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
