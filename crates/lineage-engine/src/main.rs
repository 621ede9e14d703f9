//! Headless runner for the Lineage family simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `lineage-config.yaml` in the working directory
//! 2. Initialize structured logging (tracing), `RUST_LOG` first
//! 3. Load the content catalog (built-in unless `run.catalog` is set)
//! 4. Seed a new game and run `run.years` years
//! 5. Log the summary and optionally write the final state as JSON

mod error;

use std::path::{Path, PathBuf};

use lineage_core::content::{default_catalog, load_catalog};
use lineage_core::{Simulation, SimulationConfig};
use lineage_types::Catalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_CONFIG: &str = "lineage-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, content, or the run itself fails.
fn main() -> Result<(), EngineError> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("lineage-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        start_year = config.world.start_year,
        days_per_tick = config.time.days_per_tick,
        years = config.run.years,
        choices = ?config.run.choices,
        "Run configured"
    );

    let catalog = load_content(config.run.catalog.as_deref())?;
    info!(
        events = catalog.events.len(),
        tracks = catalog.career_tracks.len(),
        businesses = catalog.businesses.len(),
        "Catalog ready"
    );

    let years = config.run.years;
    let snapshot = config.run.snapshot.clone();
    let source = config.run.choices.into_source();
    let mut simulation = Simulation::new(config, catalog, source)?;
    let summary = simulation.run_years(years)?;
    info!(
        generations = summary.generations,
        living = summary.living,
        final_fund = summary.final_fund,
        "Simulation ended"
    );

    if let Some(path) = snapshot {
        let json = serde_json::to_string_pretty(simulation.state())?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "Final state written");
    }

    info!("lineage-engine finished");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. Returns whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::parse("{}")?, false))
    }
}

fn load_content(path: Option<&Path>) -> Result<Catalog, EngineError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog");
            Ok(load_catalog(path)?)
        }
        None => Ok(default_catalog()),
    }
}
