#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Data Defence engine.
//!
//! Runs a fixed number of simulation ticks over the built-in map rotation
//! (or one external map file), summoning minions at the spawnable area's
//! center whenever the engine is ready for one, and prints an end-of-run
//! summary. Useful for smoke-testing balance and configuration changes
//! without a renderer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use data_defence_core::{config::GameConfig, DVec2};
use data_defence_game::{Game, MapSource, Playlist};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the headless runner.
#[derive(Debug, Parser)]
#[command(name = "data-defence", about = "Headless Data Defence simulation runner")]
struct Args {
    /// Number of fixed-timestep ticks to simulate.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// Milliseconds of simulated time per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Map file to run instead of the built-in rotation.
    #[arg(long)]
    map: Option<PathBuf>,

    /// TOML file overriding the default configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport the tile pixel sizes are derived from, as WIDTHxHEIGHT.
    #[arg(long, default_value = "960x720")]
    viewport: String,

    /// Disable the automatic summon driver.
    #[arg(long)]
    no_summon: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let viewport = parse_viewport(&args.viewport)?;
    let playlist = match &args.map {
        Some(path) => playlist_from_file(path)?,
        None => Playlist::builtin(),
    };

    let mut game = Game::new(config, playlist, viewport).context("game failed to start")?;
    info!(ticks = args.ticks, tick_ms = args.tick_ms, "simulation starting");

    let dt = Duration::from_millis(args.tick_ms);
    for _ in 0..args.ticks {
        if !args.no_summon {
            game.queue_summon(summon_target(&game));
        }
        game.advance(dt);
    }

    print_summary(&game);
    Ok(())
}

/// Center of the active stage's spawnable area.
fn summon_target(game: &Game) -> DVec2 {
    let area = game.stage().map().spawnable_area();
    area.min() + area.size() * 0.5
}

fn print_summary(game: &Game) {
    let stage = game.stage();
    let player = game.player();
    let goal_health = stage
        .goal_tower()
        .and_then(|id| stage.towers().get(id))
        .map_or(0.0, |goal| goal.stats.health);

    println!("stage: {} ({:.1}s elapsed)", stage.map().id(), stage.elapsed());
    println!(
        "goal:  {:.1} health, {} minions alive, {} towers standing",
        goal_health,
        stage.minions().len(),
        stage.towers().len()
    );
    println!(
        "data:  {:.1} / {:.0}   memory: {:.1} / {:.0}",
        player.resources.current_data,
        player.resources.max_data,
        player.resources.current_memory,
        player.resources.max_memory
    );
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("could not parse config file {}", path.display()))
}

fn playlist_from_file(path: &Path) -> Result<Playlist> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read map file {}", path.display()))?;
    let id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("custom")
        .to_owned();
    Ok(Playlist::new(vec![MapSource { id, text }])?)
}

fn parse_viewport(value: &str) -> Result<DVec2> {
    let Some((width, height)) = value.split_once(['x', 'X']) else {
        bail!("viewport '{value}' is not in WIDTHxHEIGHT form");
    };
    let width: f64 = width
        .trim()
        .parse()
        .with_context(|| format!("viewport width in '{value}' is not a number"))?;
    let height: f64 = height
        .trim()
        .parse()
        .with_context(|| format!("viewport height in '{value}' is not a number"))?;
    if width <= 0.0 || height <= 0.0 {
        bail!("viewport '{value}' must be positive in both dimensions");
    }
    Ok(DVec2::new(width, height))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
