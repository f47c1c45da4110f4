use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{FoodSpawner, GameConfig, GameEngine};
use grid_snake::modes::PlayMode;
use grid_snake::storage::{HighScoreStore, JsonFileStore, MemoryStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a square grid, in the terminal")]
struct Cli {
    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width and height
    #[arg(long)]
    grid_size: Option<usize>,

    /// Tick period of a fresh game, in milliseconds
    #[arg(long)]
    initial_speed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_snake=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(initial_speed) = cli.initial_speed {
        config.initial_speed_ms = initial_speed;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs only ever go to a file
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = build_config(&cli)?;

    let store: Box<dyn HighScoreStore + Send> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(cli.high_score_file.clone()))
    };

    let spawner = match cli.seed {
        Some(seed) => FoodSpawner::seeded(seed),
        None => FoodSpawner::new(),
    };

    let engine = GameEngine::with_spawner(config, store, spawner)
        .context("Invalid game configuration")?;

    let mut play_mode = PlayMode::new(engine);
    play_mode.run().await?;

    Ok(())
}
