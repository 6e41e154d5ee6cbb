//! TOML run configuration.
//!
//! Every field has a default reproducing the reference event (200 km² basin,
//! 120 mm in 24 h, 40e6 m³ reservoir). The configuration is read once and
//! passed by reference to each component; nothing mutates it afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{Error, Result};

/// Top-level run configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Input tables and output directory.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Basin geometry and infiltration parameters.
    #[serde(default)]
    pub basin: BasinConfig,
    /// Design storm.
    #[serde(default)]
    pub rainfall: RainfallConfig,
    /// Reservoir storage limits and initial condition.
    #[serde(default)]
    pub reservoir: ReservoirConfig,
    /// Turbine release rates and the scheduled-release window.
    #[serde(default)]
    pub turbine: TurbineConfig,
    /// Time axis.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// CSV with `Elevation` and `cum_area%` columns.
    pub hypsometric_curve: PathBuf,
    /// CSV with `Elevation` and `Volume` [10^6 m³] columns.
    pub reservoir_curve: PathBuf,
    /// Root of the output tree; detailed tables go under `detailed-output/`.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            hypsometric_curve: PathBuf::from("data/in/hypsometric-curve.csv"),
            reservoir_curve: PathBuf::from("data/in/reservoir-elevation-volume.csv"),
            output_dir: PathBuf::from("data/out"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasinConfig {
    /// Basin area [km²].
    pub area_km2: f64,
    /// Average main river slope [-].
    pub avg_slope: f64,
    /// Average basin Curve Number, in (0, 100].
    pub curve_number: f64,
    /// Initial loss coefficient beta [-], in [0, 1].
    pub initial_loss: f64,
}

impl Default for BasinConfig {
    fn default() -> Self {
        Self {
            area_km2: 200.0,
            avg_slope: 0.02,
            curve_number: 100.0,
            initial_loss: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainfallConfig {
    /// Total rainfall depth [mm].
    pub depth_mm: f64,
    /// Rainfall duration Tp [hours].
    pub duration_hours: u32,
    /// Snow-line elevation [m a.s.l.]. Must appear verbatim in the
    /// hypsometric table.
    pub snow_line_elevation: f64,
}

impl Default for RainfallConfig {
    fn default() -> Self {
        Self {
            depth_mm: 120.0,
            duration_hours: 24,
            snow_line_elevation: 1200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReservoirConfig {
    /// Maximum storage [m³]; anything above spills.
    pub max_volume_m3: f64,
    /// Water elevation at t = 0 [m a.s.l.].
    pub initial_water_elevation: f64,
    /// Environmental flow (DMV) [m³/s].
    pub environmental_flow: f64,
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        Self {
            max_volume_m3: 40e6,
            initial_water_elevation: 823.0,
            environmental_flow: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurbineConfig {
    /// Maximum turbine discharge [m³/s].
    pub max_flow: f64,
    /// Ordinary turbine discharge [m³/s].
    pub ordinary_flow: f64,
    /// First hour of day with ordinary release (inclusive).
    pub schedule_start_hour: u32,
    /// Hour of day at which ordinary release stops (exclusive).
    pub schedule_end_hour: u32,
}

impl Default for TurbineConfig {
    fn default() -> Self {
        Self {
            max_flow: 16.0,
            ordinary_flow: 12.0,
            schedule_start_hour: 10,
            schedule_end_hour: 18,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulation length [hours]; the series covers `0..=horizon_hours`.
    pub horizon_hours: u32,
    /// Timestamp of hour 0, e.g. `"2023-01-01T00:00:00"`.
    pub start_date: NaiveDateTime,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_hours: 72,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    /// Dotted path to the offending field, e.g. `basin.avg_slope`.
    pub field: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Loads a configuration from a TOML file. Missing sections and fields
    /// fall back to their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns every problem found.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: f64| {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
            }
        };
        positive("basin.area_km2", self.basin.area_km2);
        positive("basin.avg_slope", self.basin.avg_slope);
        positive("reservoir.max_volume_m3", self.reservoir.max_volume_m3);

        let mut non_negative = |field: &str, value: f64| {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, format!("must be >= 0, got {value}")));
            }
        };
        non_negative("rainfall.depth_mm", self.rainfall.depth_mm);
        non_negative("reservoir.environmental_flow", self.reservoir.environmental_flow);
        non_negative("turbine.max_flow", self.turbine.max_flow);
        non_negative("turbine.ordinary_flow", self.turbine.ordinary_flow);

        let cn = self.basin.curve_number;
        if !(cn > 0.0 && cn <= 100.0) {
            errors.push(ConfigError::new(
                "basin.curve_number",
                format!("must be in (0, 100], got {cn}"),
            ));
        }
        let beta = self.basin.initial_loss;
        if !(0.0..=1.0).contains(&beta) {
            errors.push(ConfigError::new(
                "basin.initial_loss",
                format!("must be in [0, 1], got {beta}"),
            ));
        }
        if !self.rainfall.snow_line_elevation.is_finite() {
            errors.push(ConfigError::new(
                "rainfall.snow_line_elevation",
                "must be finite",
            ));
        }
        if !self.reservoir.initial_water_elevation.is_finite() {
            errors.push(ConfigError::new(
                "reservoir.initial_water_elevation",
                "must be finite",
            ));
        }

        let tp = self.rainfall.duration_hours;
        if tp == 0 {
            errors.push(ConfigError::new("rainfall.duration_hours", "must be > 0"));
        }
        if self.simulation.horizon_hours < tp {
            errors.push(ConfigError::new(
                "simulation.horizon_hours",
                format!(
                    "must be >= rainfall.duration_hours ({tp}), got {}",
                    self.simulation.horizon_hours
                ),
            ));
        }

        let t = &self.turbine;
        if t.schedule_end_hour > 24 {
            errors.push(ConfigError::new(
                "turbine.schedule_end_hour",
                format!("must be <= 24, got {}", t.schedule_end_hour),
            ));
        }
        if t.schedule_start_hour >= t.schedule_end_hour {
            errors.push(ConfigError::new(
                "turbine.schedule_start_hour",
                format!(
                    "must be < schedule_end_hour ({}), got {}",
                    t.schedule_end_hour, t.schedule_start_hour
                ),
            ));
        }

        errors
    }

    /// Returns the configuration unchanged if it validates, otherwise all
    /// problems as [`Error::InvalidConfig`].
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::InvalidConfig(errors))
        }
    }
}
