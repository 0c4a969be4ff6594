#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Macan Run headless and manages saves.

mod audio;
mod autopilot;
mod config;
mod levels;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use macan_run_core::{Event, GameState, InputState, TICK_RATE_HZ};
use macan_run_engine::{EngineConfig, GameEngine};
use macan_run_persistence::{default_location, FileSaveStore};
use macan_run_world::{query, LevelManager};
use serde::Serialize;

use crate::{
    audio::LogAudio,
    autopilot::Autopilot,
    config::{CliConfig, RunConfig},
    levels::DirectoryLevels,
};

#[derive(Debug, Parser)]
#[command(name = "macan-run", about = "Headless runner and save tools for Macan Run")]
struct Cli {
    /// TOML settings file with `[engine]` and `[run]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Save file to use instead of the platform data directory.
    #[arg(long, global = true)]
    save: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate the game with a scripted player and print a summary.
    Run {
        /// Directory holding `level<N>.txt` files.
        #[arg(long)]
        levels: Option<PathBuf>,
        /// Number of fixed steps to simulate.
        #[arg(long)]
        ticks: Option<u64>,
        /// Seed of the scripted player's jumps.
        #[arg(long)]
        seed: Option<u64>,
        /// Chance per tick of a jump, between 0 and 1.
        #[arg(long)]
        jump_chance: Option<f64>,
        /// Continue from the existing save instead of starting fresh.
        #[arg(long)]
        resume: bool,
    },
    /// Print the contents of a level as the engine would load it.
    Inspect {
        /// Level number.
        level: u32,
        /// Directory holding `level<N>.txt` files.
        #[arg(long)]
        levels: Option<PathBuf>,
    },
    /// Describe the save file.
    SaveInfo,
    /// Delete the save file and its backup.
    DeleteSave,
    /// Copy the save file to another location.
    ExportSave {
        /// Destination file.
        destination: PathBuf,
    },
    /// Validate a save file and install it.
    ImportSave {
        /// Source file.
        source: PathBuf,
    },
}

/// Entry point for the Macan Run command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref())?;
    let save_path = cli.save.or_else(|| config.run.save_path.clone());

    match cli.command {
        Command::Run {
            levels,
            ticks,
            seed,
            jump_chance,
            resume,
        } => {
            apply_overrides(&mut config.run, levels, ticks, seed, jump_chance)?;
            let store = open_store(save_path)?;
            let summary = run_headless(config.engine, &config.run, store, resume);
            print_json(&summary)
        }
        Command::Inspect { level, levels } => {
            let root = levels.unwrap_or(config.run.levels_dir);
            print_json(&inspect_level(level, &DirectoryLevels::new(root)))
        }
        Command::SaveInfo => print_json(&open_store(save_path)?.info()),
        Command::DeleteSave => {
            let store = open_store(save_path)?;
            let deleted = store.delete().context("failed to delete save files")?;
            println!(
                "{}",
                if deleted {
                    "save files deleted"
                } else {
                    "no save files to delete"
                }
            );
            Ok(())
        }
        Command::ExportSave { destination } => {
            open_store(save_path)?
                .export(&destination)
                .with_context(|| format!("failed to export save to {}", destination.display()))?;
            println!("save exported to {}", destination.display());
            Ok(())
        }
        Command::ImportSave { source } => {
            let record = open_store(save_path)?
                .import(&source)
                .with_context(|| format!("failed to import save from {}", source.display()))?;
            println!("imported {} with score {}", record.level, record.score);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn apply_overrides(
    run: &mut RunConfig,
    levels: Option<PathBuf>,
    ticks: Option<u64>,
    seed: Option<u64>,
    jump_chance: Option<f64>,
) -> Result<()> {
    if let Some(levels) = levels {
        run.levels_dir = levels;
    }
    if let Some(ticks) = ticks {
        run.ticks = ticks;
    }
    if let Some(seed) = seed {
        run.seed = seed;
    }
    if let Some(jump_chance) = jump_chance {
        anyhow::ensure!(
            (0.0..=1.0).contains(&jump_chance),
            "--jump-chance must lie in 0..=1, got {jump_chance}"
        );
        run.jump_chance = jump_chance;
    }
    Ok(())
}

fn open_store(save_path: Option<PathBuf>) -> Result<FileSaveStore> {
    let path = match save_path {
        Some(path) => path,
        None => default_location().context("failed to locate the save directory")?,
    };
    Ok(FileSaveStore::new(path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{text}");
    Ok(())
}

/// Totals gathered while a headless run plays out.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct RunSummary {
    ticks: u64,
    final_state: String,
    level: u32,
    score: u64,
    coins: u32,
    levels_completed: u32,
    game_overs: u32,
    enemies_stomped: u32,
    hits_taken: u32,
    power_ups: u32,
    saves_written: u32,
    sound_effects: u64,
}

impl RunSummary {
    fn record(&mut self, event: &Event) {
        tracing::debug!(?event, "engine event");
        match event {
            Event::StateChanged {
                to: GameState::LevelComplete,
                ..
            } => self.levels_completed += 1,
            Event::StateChanged {
                to: GameState::GameOver,
                ..
            } => self.game_overs += 1,
            Event::EnemyStomped { .. } => self.enemies_stomped += 1,
            Event::PlayerDamaged { .. } => self.hits_taken += 1,
            Event::PowerUpCollected { .. } => self.power_ups += 1,
            Event::GameSaved { success: true, .. } => self.saves_written += 1,
            _ => {}
        }
    }
}

fn run_headless(
    engine_config: EngineConfig,
    run: &RunConfig,
    store: FileSaveStore,
    resume: bool,
) -> RunSummary {
    let levels = DirectoryLevels::new(run.levels_dir.clone());
    tracing::info!(
        levels = %levels.root().display(),
        save = %store.save_path().display(),
        ticks = run.ticks,
        "starting headless run"
    );

    let mut engine = GameEngine::new(engine_config, levels, LogAudio::default(), store);
    let mut pilot = Autopilot::new(run.seed, run.jump_chance, resume);
    let mut input = InputState::new();
    let mut events = Vec::new();
    let mut summary = RunSummary::default();
    let step = Duration::from_secs(1) / TICK_RATE_HZ;

    for _ in 0..run.ticks {
        pilot.drive(engine.state(), engine.has_save(), &mut input);
        engine.tick(step, &mut input, &mut events);
        for event in events.drain(..) {
            summary.record(&event);
        }
    }
    engine.shutdown(&mut events);
    for event in events.drain(..) {
        summary.record(&event);
    }

    RunSummary {
        ticks: run.ticks,
        final_state: format!("{:?}", engine.state()),
        level: engine.current_level(),
        score: engine.score(),
        coins: engine.coins(),
        sound_effects: engine.audio().effects_played(),
        ..summary
    }
}

/// Layout of a single level as seen by the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
struct LevelReport {
    level: u32,
    fallback: bool,
    columns: usize,
    rows: usize,
    player_spawn: Option<(f32, f32)>,
    enemies: usize,
    coins: usize,
    spikes: usize,
    power_ups: usize,
    has_finish: bool,
}

fn inspect_level(level_id: u32, levels: &DirectoryLevels) -> LevelReport {
    let mut manager = LevelManager::new();
    let mut events = Vec::new();
    manager.load_level(level_id, levels, &mut events);

    let (columns, rows) = query::tile_grid(&manager)
        .map_or((0, 0), |grid| (grid.width(), grid.height()));
    LevelReport {
        level: level_id,
        fallback: query::used_fallback(&manager),
        columns,
        rows,
        player_spawn: query::player(&manager).map(|player| (player.x, player.y)),
        enemies: query::enemies(&manager).len(),
        coins: query::coins(&manager).len(),
        spikes: query::spikes(&manager).len(),
        power_ups: query::power_ups(&manager).len(),
        has_finish: query::finish(&manager).is_some(),
    }
}
