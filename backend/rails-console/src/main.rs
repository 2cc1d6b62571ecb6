//! Plays a game of Rails & Sails on the console: every player answers on stdin, in turn.

mod display;

use anyhow::{Context, Result};
use clap::Parser;
use display::ConsoleDisplay;
use rails_and_sails::config::GameConfig;
use rails_and_sails::interaction::{self, InputSender};
use rails_and_sails::manager::{GameState, Manager};
use rails_and_sails::map::MapData;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::{fs, io, thread};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const WORLD_MAP: &str = include_str!("../data/world.json");

#[derive(Parser, Debug)]
#[command(name = "rails-console")]
#[command(about = "Play Rails & Sails on the console", long_about = None)]
#[command(version)]
struct Args {
    /// Names of the players, between 2 and 5
    #[arg(short, long, num_args = 2..=5, required = true)]
    players: Vec<String>,

    /// JSON file overriding the standard rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON map dataset (cities, routes, destinations). Defaults to the bundled world map
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Seed of the game's shuffles, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Print every snapshot as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;

    serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Forwards stdin to the game line by line, until stdin or the game closes.
fn forward_stdin(input: InputSender) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                debug!(%err, "Stopped reading stdin");
                break;
            }
        };

        if !input.send(line) {
            break;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_json_file(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let map_data: MapData = match &args.map {
        Some(path) => read_json_file(path)?,
        None => serde_json::from_str(WORLD_MAP).context("invalid bundled map")?,
    };

    let mut manager =
        Manager::new(args.players, map_data, config).context("cannot start the game")?;
    info!("Starting a game");

    let mut display = ConsoleDisplay::new(args.json);
    let (input, mut frontend) = interaction::channel(move |state: &GameState| display.show(state));
    thread::spawn(move || forward_stdin(input));

    let standings = manager.run(&mut frontend).context("the game stopped")?;

    println!();
    println!("Final standings:");
    for (rank, standing) in standings.iter().enumerate() {
        println!(
            "{}. {} ({}): {} points",
            rank + 1,
            standing.name,
            standing.color,
            standing.score
        );
    }

    Ok(())
}
