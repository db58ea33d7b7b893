//! Headless session driver.
//!
//! Generates a cave from a seed, lets a simple autopilot play it for a
//! number of turns and prints what happened. Useful for eyeballing
//! generation and for reproducing a session from its seed.
//! Run with: `cargo run -p delver-sim -- --seed 7 --keys 300 --dump`

mod autopilot;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delver_content::{ConfigLoader, TablesLoader};
use delver_core::{BalanceTables, GameConfig, GameState};

use autopilot::Autopilot;

/// Play a seeded session without a front-end
#[derive(Parser)]
#[command(name = "delver-sim")]
#[command(about = "Headless simulator for the mining game", long_about = None)]
#[command(version)]
struct Cli {
    /// Seed for cave generation and every in-game roll
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Maximum number of key presses the autopilot may send
    #[arg(short, long, default_value_t = 500, value_name = "KEYS")]
    keys: u32,

    /// Game configuration (TOML); stock config when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Balance tables (RON); stock tables when omitted
    #[arg(short, long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Print the final level as ASCII
    #[arg(short, long)]
    dump: bool,
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => GameConfig::default(),
    };
    let tables = match &cli.tables {
        Some(path) => TablesLoader::load(path)?,
        None => BalanceTables::default(),
    };

    let mut state = GameState::new(config, tables, cli.seed)
        .with_context(|| format!("Failed to generate a cave for seed {}", cli.seed))?;
    tracing::info!(
        seed = cli.seed,
        width = state.map.width(),
        height = state.map.height(),
        "session started"
    );

    let played = Autopilot::new(cli.seed).play(&mut state, cli.keys);
    tracing::info!(keys = played, turn = state.turn.turn, "session finished");

    report::summary(&state, played);
    if cli.dump {
        report::dump(&state);
    }
    Ok(())
}

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
