//! Scenario orchestration.
//!
//! Computes the inflow hydrograph once, then runs the reservoir balance for
//! each turbine scenario from its own fresh state. Runs share only the
//! read-only curves, configuration and hydrograph.

use chrono::NaiveDateTime;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::config::Config;
use crate::curves::{HypsometricCurve, ReservoirCurve};
use crate::error::Result;
use crate::reservoir::{self, Fluxes, ScenarioRun};
use crate::runoff::{self, RunoffResponse};
use crate::turbine::Scenario;

/// Scenario identifiers run on every simulation, in output order.
pub const SCENARIO_IDS: [u8; 3] = [1, 2, 3];

/// Outputs of a full run: the hydrograph and one table per scenario.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Whether the contributing area was limited by the snow line.
    pub snow: bool,
    pub runoff: RunoffResponse,
    pub runs: SmallVec<[ScenarioRun; 3]>,
}

/// Run the hydrograph and every scenario.
///
/// Any failure aborts the whole simulation; there are no partial results.
pub fn run(
    config: &Config,
    hypsometry: &HypsometricCurve,
    reservoir_curve: &ReservoirCurve,
    snow: bool,
) -> Result<Simulation> {
    let runoff = runoff::run::run(config, hypsometry, snow)?;
    let summary = &runoff.summary;
    let peak_hour = runoff.hydrograph.peak().map_or(0.0, |p| p.hour);
    info!(
        peak_m3s = summary.peak_discharge,
        peak_hour,
        runoff_volume_m3 = runoff.hydrograph.volume().round(),
        k_hours = summary.storage_coefficient,
        "hydrograph computed"
    );

    let mut runs = SmallVec::new();
    for id in SCENARIO_IDS {
        let scenario = Scenario::from_id(id)?;
        info!("scenario {}: {}", scenario.id(), scenario.label());

        let run = reservoir::run::run(scenario, &runoff.hydrograph, config, reservoir_curve)?;
        match run.no_overflow_level(reservoir_curve) {
            Some(level) => {
                info!(
                    overflow_m3 = run.total_overflow().round(),
                    no_overflow_level = runoff::processes::round_to(level.value, 2),
                    "overflow volume, water level at t=0 to avoid overflow"
                );
                if level.extrapolated {
                    warn!(
                        scenario = %scenario,
                        "water level to avoid overflow lies outside elevation-volume table"
                    );
                }
            }
            None => info!("No overflow"),
        }
        runs.push(run);
    }

    Ok(Simulation { snow, runoff, runs })
}

impl Simulation {
    /// Side-by-side water level and overflow rate for every scenario.
    pub fn comparison(&self) -> ComparisonTable {
        let timestamps = self
            .runs
            .first()
            .map(|r| r.timestamps.clone())
            .unwrap_or_default();

        let headers = Fluxes::headers();
        let level_header = headers[5];
        let overflow_header = headers[7];

        let mut columns = Vec::with_capacity(2 * self.runs.len());
        for run in &self.runs {
            let label = run.scenario.label();
            columns.push(ComparisonColumn {
                header: format!("{label} - {level_header}"),
                decimals: 2,
                values: run.fluxes.water_level.clone(),
            });
            columns.push(ComparisonColumn {
                header: format!("{label} - {overflow_header}"),
                decimals: 1,
                values: run.fluxes.overflow_rate.clone(),
            });
        }

        ComparisonTable {
            timestamps,
            columns,
        }
    }

    pub fn run_for(&self, scenario: Scenario) -> Option<&ScenarioRun> {
        self.runs.iter().find(|r| r.scenario == scenario)
    }
}

/// One column of the cross-scenario table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonColumn {
    pub header: String,
    /// Decimals kept when presented.
    pub decimals: i32,
    pub values: Vec<f64>,
}

/// Cross-scenario table aligned on the hourly timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<ComparisonColumn>,
}

impl ComparisonTable {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row `i`, rounded per column for presentation.
    pub fn presented_row(&self, i: usize) -> Option<(NaiveDateTime, Vec<f64>)> {
        let ts = *self.timestamps.get(i)?;
        let values = self
            .columns
            .iter()
            .map(|c| runoff::processes::round_to(c.values[i], c.decimals))
            .collect();
        Some((ts, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservoir::State;

    fn hypsometry() -> HypsometricCurve {
        HypsometricCurve::new(
            vec![400.0, 800.0, 1200.0, 1600.0, 2000.0],
            vec![0.0, 0.2, 0.55, 0.85, 1.0],
        )
        .unwrap()
    }

    fn reservoir_curve() -> ReservoirCurve {
        ReservoirCurve::new(
            vec![790.0, 795.0, 800.0, 805.0, 810.0, 815.0, 820.0, 825.0, 830.0, 835.0],
            vec![0.0, 1.2, 3.5, 7.0, 11.5, 17.0, 23.5, 31.0, 39.5, 49.0],
        )
        .unwrap()
    }

    fn reference(snow: bool) -> Simulation {
        run(&Config::default(), &hypsometry(), &reservoir_curve(), snow).unwrap()
    }

    #[test]
    fn runs_every_scenario_in_order() {
        let sim = reference(false);
        let ids: Vec<u8> = sim.runs.iter().map(|r| r.scenario.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(sim.runs.iter().all(|r| r.len() == 73));
    }

    #[test]
    fn scenarios_start_from_the_same_volume() {
        let sim = reference(false);
        let v0 = sim.runs[0].initial_volume;
        assert!(sim.runs.iter().all(|r| r.initial_volume == v0));
    }

    #[test]
    fn scenario_runs_are_independent() {
        let config = Config::default();
        let sim = reference(false);
        // Re-running a single scenario alone gives identical output
        let alone = reservoir::run::run(
            Scenario::ScheduledRelease,
            &sim.runoff.hydrograph,
            &config,
            &reservoir_curve(),
        )
        .unwrap();
        let in_batch = sim.run_for(Scenario::ScheduledRelease).unwrap();
        assert_eq!(alone.fluxes.volume, in_batch.fluxes.volume);
        assert_eq!(alone.final_state, in_batch.final_state);
    }

    #[test]
    fn more_release_means_less_overflow() {
        let sim = reference(false);
        let zero = sim.run_for(Scenario::ZeroRelease).unwrap().total_overflow();
        let max = sim.run_for(Scenario::MaxRelease).unwrap().total_overflow();
        let ord = sim.run_for(Scenario::ScheduledRelease).unwrap().total_overflow();
        assert!(zero >= ord);
        assert!(ord >= max);
    }

    #[test]
    fn reference_event_overflows_without_turbines() {
        let sim = reference(false);
        let run = sim.run_for(Scenario::ZeroRelease).unwrap();
        assert!(run.total_overflow() > 0.0);
        let State { volume, .. } = run.final_state;
        assert!(volume <= Config::default().reservoir.max_volume_m3);
    }

    #[test]
    fn comparison_has_two_columns_per_scenario() {
        let sim = reference(false);
        let table = sim.comparison();
        let headers: Vec<&str> = table.headers().collect();
        assert_eq!(
            headers,
            vec![
                "T_0 - Water level [m slm]",
                "T_0 - Overflow [m3/s]",
                "T_MAX - Water level [m slm]",
                "T_MAX - Overflow [m3/s]",
                "T_ORD - Water level [m slm]",
                "T_ORD - Overflow [m3/s]",
            ]
        );
        assert_eq!(table.len(), 73);
    }

    #[test]
    fn comparison_rows_are_rounded() {
        let sim = reference(false);
        let table = sim.comparison();
        let (ts, row) = table.presented_row(40).unwrap();
        assert_eq!(ts, sim.runs[0].timestamps[40]);
        let level = sim.runs[0].fluxes.water_level[40];
        assert_eq!(row[0], (level * 100.0).round() / 100.0);
        assert!(table.presented_row(73).is_none());
    }

    #[test]
    fn snow_mode_is_recorded() {
        let sim = reference(true);
        assert!(sim.snow);
        assert!(sim.runoff.summary.effective_area_km2 < 200.0);
    }

    #[test]
    fn initial_elevation_above_table_is_flagged_on_every_run() {
        let mut config = Config::default();
        config.reservoir.initial_water_elevation = 870.0;
        let sim = run(&config, &hypsometry(), &reservoir_curve(), false).unwrap();
        assert!(sim.runs.iter().all(|r| r.initial_extrapolated));
        assert!(sim.runs.iter().all(|r| r.extrapolated_steps == 0));

        let in_table = reference(false);
        assert!(in_table.runs.iter().all(|r| !r.initial_extrapolated));
    }

    #[test]
    fn lookup_failure_aborts_the_run() {
        let mut config = Config::default();
        config.rainfall.snow_line_elevation = 1234.0;
        assert!(run(&config, &hypsometry(), &reservoir_curve(), true).is_err());
    }
}
