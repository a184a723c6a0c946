mod cli;
mod timer;

use std::path::{Path, PathBuf};

use agency_core::collaborators::JsonFileStore;
use agency_core::config::{SimulationConfig, embedded_roster, load_roster};
use agency_core::GameBuilder;
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::timer::LoopTimer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = match resolve_config_path("game.yaml") {
        Some(path) => SimulationConfig::load(&path)?,
        None => SimulationConfig::embedded()?,
    };
    let roster = match resolve_config_path("roster.json") {
        Some(path) => load_roster(&path)?,
        None => embedded_roster()?,
    };

    let timer = LoopTimer::new();
    let mut builder = GameBuilder::new(config.clone(), roster).with_timer(timer.clone());
    if let Some(path) = &config.save_path {
        let saved = JsonFileStore::new(path.clone())
            .load_game()
            .with_context(|| format!("failed to load the save file {}", path.display()))?;
        if let Some(state) = saved {
            info!(path = %path.display(), date = %state.date(), "resuming saved game");
            builder = builder.with_saved_state(state);
        }
    }
    let mut controller = builder.build().context("failed to set up the game")?;

    cli::run(&mut controller, &timer)
}

fn resolve_config_path(file_name: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let candidates = [
        cwd.join("config").join(file_name),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join(file_name),
    ];
    candidates.into_iter().find(|path| path.exists())
}
