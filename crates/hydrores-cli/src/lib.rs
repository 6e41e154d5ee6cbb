//! hydrores command-line front end.
//!
//! Reads the two curve tables, runs every turbine scenario and writes the
//! scenario tables, the comparison table and the hydrograph chart.

pub mod io;
pub mod plot;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hydrores_core::{simulation, Config, Simulation};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::io::OutputPaths;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HYDRORES_CONFIG";
/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hydrores.toml";

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Where the configuration comes from, in order of precedence.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    local.exists().then(|| local.to_path_buf())
}

/// Load and validate the run configuration, falling back to the defaults
/// when no file is found.
pub fn load_config() -> Result<Config> {
    let config = match config_path() {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_toml_file(&path)?
        }
        None => {
            info!("No configuration file, using defaults");
            Config::default()
        }
    };
    Ok(config.validated()?)
}

/// Run the full chain and write all outputs under `config.paths.output_dir`.
pub fn run(config: &Config, snow: bool) -> Result<Simulation> {
    let hypsometry = io::read_hypsometric_curve(&config.paths.hypsometric_curve)?;
    let reservoir_curve = io::read_reservoir_curve(&config.paths.reservoir_curve)?;

    let sim = simulation::run(config, &hypsometry, &reservoir_curve, snow)
        .context("simulation failed")?;

    let out = OutputPaths::new(&config.paths.output_dir, snow);
    out.create_dirs()?;

    io::write_hydrograph(&out.hydrograph_csv(), &sim.runoff.hydrograph)?;
    plot::write_hydrograph_svg(&out.hydrograph_svg(), &sim.runoff.hydrograph)?;
    for run in &sim.runs {
        let path = out.scenario(run.scenario.id());
        io::write_scenario(&path, run)?;
        info!("Wrote {}", path.display());
    }
    let comparison = out.comparison();
    io::write_comparison(&comparison, &sim.comparison())?;
    info!("Wrote {}", comparison.display());

    Ok(sim)
}
