//! CSV input curves and output tables.
//!
//! Values are written as presented (rounded per column); the simulation
//! itself always runs on full-precision values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use hydrores_core::reservoir::{Fluxes, ScenarioRun};
use hydrores_core::{
    ComparisonTable, Hydrograph, HydrographSample, HypsometricCurve, ReservoirCurve,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const TIMESTAMP_HEADER: &str = "timestamp";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct HypsometricRow {
    #[serde(rename = "Elevation")]
    elevation: f64,
    #[serde(rename = "cum_area%")]
    cum_area: f64,
}

#[derive(Debug, Deserialize)]
struct ReservoirRow {
    #[serde(rename = "Elevation")]
    elevation: f64,
    /// Stored volume [10^6 m³].
    #[serde(rename = "Volume")]
    volume: f64,
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("cannot open \"{}\"", path.display()))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .with_context(|| format!("cannot parse \"{}\"", path.display()))
}

/// Read the `Elevation`, `cum_area%` table.
pub fn read_hypsometric_curve(path: &Path) -> Result<HypsometricCurve> {
    let rows: Vec<HypsometricRow> = read_rows(path)?;
    let (elevations, fractions): (Vec<f64>, Vec<f64>) = rows
        .into_iter()
        .map(|r| (r.elevation, r.cum_area))
        .unzip();
    HypsometricCurve::new(elevations, fractions)
        .with_context(|| format!("invalid hypsometric curve \"{}\"", path.display()))
}

/// Read the `Elevation`, `Volume` table.
pub fn read_reservoir_curve(path: &Path) -> Result<ReservoirCurve> {
    let rows: Vec<ReservoirRow> = read_rows(path)?;
    let (elevations, volumes): (Vec<f64>, Vec<f64>) = rows
        .into_iter()
        .map(|r| (r.elevation, r.volume))
        .unzip();
    ReservoirCurve::new(elevations, volumes)
        .with_context(|| format!("invalid reservoir curve \"{}\"", path.display()))
}

/// Output file locations for one run.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    root: PathBuf,
    snow: bool,
}

impl OutputPaths {
    pub fn new(root: impl Into<PathBuf>, snow: bool) -> Self {
        Self {
            root: root.into(),
            snow,
        }
    }

    pub fn detailed_dir(&self) -> PathBuf {
        self.root.join("detailed-output")
    }

    pub fn hydrograph_csv(&self) -> PathBuf {
        self.detailed_dir().join("hydrograph.csv")
    }

    pub fn hydrograph_svg(&self) -> PathBuf {
        self.detailed_dir().join("hydrograph.svg")
    }

    pub fn scenario(&self, id: u8) -> PathBuf {
        let name = if self.snow {
            format!("scenario_{id}_snow.csv")
        } else {
            format!("scenario_{id}.csv")
        };
        self.detailed_dir().join(name)
    }

    pub fn comparison(&self) -> PathBuf {
        let name = if self.snow { "output_snow.csv" } else { "output.csv" };
        self.root.join(name)
    }

    /// Create the output tree if missing.
    pub fn create_dirs(&self) -> Result<()> {
        let dir = self.detailed_dir();
        fs::create_dir_all(&dir).with_context(|| format!("cannot create \"{}\"", dir.display()))
    }
}

fn format_value(v: f64) -> String {
    // Avoid "-0" after rounding small negatives
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("cannot create \"{}\"", path.display()))
}

pub fn write_hydrograph(path: &Path, hydrograph: &Hydrograph) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(HydrographSample::headers())?;
    for i in 0..hydrograph.len() {
        if let Some(sample) = hydrograph.get(i) {
            wtr.write_record(sample.presented().map(format_value))?;
        }
    }
    wtr.flush()
        .with_context(|| format!("cannot write \"{}\"", path.display()))
}

/// Full per-hour table of one scenario.
pub fn write_scenario(path: &Path, run: &ScenarioRun) -> Result<()> {
    let mut wtr = writer(path)?;
    let mut header = vec![TIMESTAMP_HEADER];
    header.extend_from_slice(Fluxes::headers());
    wtr.write_record(&header)?;

    for (ts, fluxes) in run.rows() {
        let mut record = Vec::with_capacity(Fluxes::N_COLUMNS + 1);
        record.push(format_timestamp(ts));
        record.extend(fluxes.presented().map(format_value));
        wtr.write_record(&record)?;
    }
    wtr.flush()
        .with_context(|| format!("cannot write \"{}\"", path.display()))
}

/// Water level and overflow for every scenario side by side.
pub fn write_comparison(path: &Path, table: &ComparisonTable) -> Result<()> {
    let mut wtr = writer(path)?;
    let mut header = vec![TIMESTAMP_HEADER];
    header.extend(table.headers());
    wtr.write_record(&header)?;

    for i in 0..table.len() {
        if let Some((ts, values)) = table.presented_row(i) {
            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(format_timestamp(ts));
            record.extend(values.into_iter().map(format_value));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()
        .with_context(|| format!("cannot write \"{}\"", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrores_core::{simulation, Config};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn curves(dir: &TempDir) -> (HypsometricCurve, ReservoirCurve) {
        let hyps = write_file(
            dir,
            "hyps.csv",
            "Elevation,cum_area%\n400,0\n800,0.2\n1200,0.55\n1600,0.85\n2000,1\n",
        );
        let res = write_file(
            dir,
            "res.csv",
            "Elevation,Volume\n790,0\n800,3.5\n810,11.5\n820,23.5\n830,39.5\n835,49\n",
        );
        (
            read_hypsometric_curve(&hyps).unwrap(),
            read_reservoir_curve(&res).unwrap(),
        )
    }

    fn read_back(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(String::from).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn reads_hypsometric_curve_by_column_name() {
        let dir = TempDir::new().unwrap();
        let (hyps, _) = curves(&dir);
        assert_eq!(hyps.len(), 5);
        assert_eq!(hyps.cumulative_fraction_at(1200.0).unwrap(), 0.55);
    }

    #[test]
    fn reads_reservoir_curve() {
        let dir = TempDir::new().unwrap();
        let (_, res) = curves(&dir);
        assert!((res.level_from_volume(11.5) - 810.0).abs() < 1e-9);
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.csv", "Elevation,Area\n400,0\n800,1\n");
        assert!(read_hypsometric_curve(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_reservoir_curve(&dir.path().join("nope.csv")).unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn output_names_depend_on_snow_mode() {
        let rain = OutputPaths::new("out", false);
        let snow = OutputPaths::new("out", true);
        assert_eq!(rain.scenario(2), Path::new("out/detailed-output/scenario_2.csv"));
        assert_eq!(snow.scenario(2), Path::new("out/detailed-output/scenario_2_snow.csv"));
        assert_eq!(rain.comparison(), Path::new("out/output.csv"));
        assert_eq!(snow.comparison(), Path::new("out/output_snow.csv"));
    }

    #[test]
    fn writes_scenario_and_comparison_tables() {
        let dir = TempDir::new().unwrap();
        let (hyps, res) = curves(&dir);
        let sim = simulation::run(&Config::default(), &hyps, &res, false).unwrap();

        let paths = OutputPaths::new(dir.path().join("out"), false);
        paths.create_dirs().unwrap();

        write_scenario(&paths.scenario(1), &sim.runs[0]).unwrap();
        let (headers, rows) = read_back(&paths.scenario(1));
        assert_eq!(headers.len(), 11);
        assert_eq!(headers[0], "timestamp");
        assert_eq!(headers[6], "Water level [m slm]");
        assert_eq!(headers[10], "Cum Volume turb [m3]");
        assert_eq!(rows.len(), 73);
        assert_eq!(rows[0][0], "2023-01-01 00:00:00");
        assert_eq!(rows[0][1], "0");
        assert_eq!(rows[0][2], "2");
        // Volumes are whole cubic metres
        assert!(!rows[10][5].contains('.'));

        write_comparison(&paths.comparison(), &sim.comparison()).unwrap();
        let (headers, rows) = read_back(&paths.comparison());
        assert_eq!(headers[0], "timestamp");
        assert_eq!(headers[1], "T_0 - Water level [m slm]");
        assert_eq!(headers[6], "T_ORD - Overflow [m3/s]");
        assert_eq!(rows.len(), 73);
        assert_eq!(rows[72][0], "2023-01-04 00:00:00");
    }

    #[test]
    fn writes_hydrograph_table() {
        let dir = TempDir::new().unwrap();
        let (hyps, _) = curves(&dir);
        let runoff = hydrores_core::runoff::run::run(&Config::default(), &hyps, false).unwrap();
        let path = dir.path().join("hydrograph.csv");
        write_hydrograph(&path, &runoff.hydrograph).unwrap();

        let (headers, rows) = read_back(&path);
        assert_eq!(headers, vec!["t [hour]", "Q [m3/s]"]);
        assert_eq!(rows.len(), 73);
        assert_eq!(rows[0], vec!["0", "0"]);
        let q: f64 = rows[10][1].parse().unwrap();
        assert!((q - runoff.hydrograph.discharge[10]).abs() <= 0.005);
    }
}
