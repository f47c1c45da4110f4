use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Persistence collaborator for the best score ever reached
pub trait HighScoreStore {
    /// Current record, 0 when nothing was stored yet
    fn load(&self) -> Result<u32>;

    fn save(&self, score: u32) -> Result<()>;
}

/// On-disk format of [`JsonFileStore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Keeps the record in a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord =
            serde_json::from_str(&json).context("Failed to deserialize high score")?;

        Ok(record.high_score)
    }

    fn save(&self, score: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// In-process store. Clones share the same value, so a test can keep a
/// handle after moving one into the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: Arc<AtomicU32>,
    saves: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        let store = Self::default();
        store.score.store(score, Ordering::SeqCst);
        store
    }

    /// Make every later load and save fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("memory store is unavailable");
        }
        Ok(self.score())
    }

    fn save(&self, score: u32) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("memory store is unavailable");
        }
        self.score.store(score, Ordering::SeqCst);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
