/// Reservoir water balance orchestration.
///
/// - `step()`: Advance the balance by one hour
/// - `run()`: Drive one turbine scenario over the inflow hydrograph
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use super::constants::{SECONDS_PER_STEP, VOLUME_UNIT_M3};
use super::fluxes::{Fluxes, FluxesTimeseries};
use super::state::{self, State};
use crate::config::Config;
use crate::curves::{CurveLookup, ReservoirCurve};
use crate::error::{Error, Result};
use crate::runoff::Hydrograph;
use crate::turbine::Scenario;

/// Execute one balance step.
///
/// Flows are in m³/s and held constant over the hour. Storage above
/// `max_volume` spills and is clipped before the water level is computed.
/// Returns (new_state, fluxes, extrapolated), where `extrapolated` flags a
/// volume outside the elevation-volume table.
pub fn step(
    state: &State,
    inflow: f64,
    environmental_flow: f64,
    turbine_flow: f64,
    max_volume: f64,
    curve: &ReservoirCurve,
) -> (State, Fluxes, bool) {
    // 1. Net balance over the step
    let balance = inflow - environmental_flow - turbine_flow;
    let mut volume = state.volume + balance * SECONDS_PER_STEP;
    let cum_turbined = state.cum_turbined + turbine_flow * SECONDS_PER_STEP;

    // 2. Spill anything above maximum storage
    let overflow_volume = if volume > max_volume {
        let spill = volume - max_volume;
        volume = max_volume;
        spill
    } else {
        0.0
    };
    let cum_overflow = state.cum_overflow + overflow_volume;

    // 3. Water level from the clipped volume (table in 10^6 m³)
    let level = curve.level_lookup(volume / VOLUME_UNIT_M3);

    let new_state = State {
        volume,
        cum_overflow,
        cum_turbined,
    };

    let fluxes = Fluxes {
        inflow,
        environmental_flow,
        turbine_flow,
        balance,
        volume,
        water_level: level.value,
        overflow_volume,
        overflow_rate: overflow_volume / SECONDS_PER_STEP,
        cum_overflow,
        cum_turbined,
    };

    (new_state, fluxes, level.extrapolated)
}

/// One scenario's complete output table and terminal diagnostics.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub scenario: Scenario,
    pub timestamps: Vec<NaiveDateTime>,
    pub fluxes: FluxesTimeseries,
    /// Volume at t = 0 [m³].
    pub initial_volume: f64,
    /// Initial water elevation lay outside the elevation-volume table, so
    /// `initial_volume` comes from the extrapolated fit.
    pub initial_extrapolated: bool,
    pub final_state: State,
    /// Steps whose water level was extrapolated beyond the curve table.
    pub extrapolated_steps: usize,
}

impl ScenarioRun {
    /// Total spilled volume [m³].
    pub fn total_overflow(&self) -> f64 {
        self.final_state.cum_overflow
    }

    /// Initial water level [m a.s.l.] that would have absorbed all the
    /// spilled volume, or `None` if nothing spilled. Flagged as extrapolated
    /// when the remaining volume falls outside the table.
    pub fn no_overflow_level(&self, curve: &ReservoirCurve) -> Option<CurveLookup> {
        let spilled = self.total_overflow();
        if spilled > 0.0 {
            Some(curve.level_lookup(
                (self.initial_volume - spilled) / VOLUME_UNIT_M3,
            ))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Rows in time order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, Fluxes)> + '_ {
        self.timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| self.fluxes.get(i).map(|f| (ts, f)))
    }
}

/// Run the balance for one scenario, starting from the configured initial
/// water elevation.
pub fn run(
    scenario: Scenario,
    hydrograph: &Hydrograph,
    config: &Config,
    curve: &ReservoirCurve,
) -> Result<ScenarioRun> {
    let elevation = config.reservoir.initial_water_elevation;
    let initial = state::initial_volume(curve, elevation);
    if initial.extrapolated {
        warn!(
            scenario = %scenario,
            elevation,
            volume_m3 = initial.value,
            "initial water elevation outside elevation-volume table, extrapolating volume"
        );
    }
    simulate(scenario, hydrograph, config, curve, initial)
}

/// Run the balance for one scenario from an explicit initial volume [m³].
///
/// Steps are strictly sequential: each hour starts from the previous
/// hour's clipped volume.
pub fn run_from(
    scenario: Scenario,
    hydrograph: &Hydrograph,
    config: &Config,
    curve: &ReservoirCurve,
    initial_volume: f64,
) -> Result<ScenarioRun> {
    let initial = CurveLookup {
        value: initial_volume,
        extrapolated: false,
    };
    simulate(scenario, hydrograph, config, curve, initial)
}

fn simulate(
    scenario: Scenario,
    hydrograph: &Hydrograph,
    config: &Config,
    curve: &ReservoirCurve,
    initial: CurveLookup,
) -> Result<ScenarioRun> {
    let initial_volume = initial.value;
    let n = hydrograph.len();
    let start = config.simulation.start_date;
    let max_volume = config.reservoir.max_volume_m3;
    let environmental_flow = config.reservoir.environmental_flow;

    let mut state = State::initialize(initial_volume);
    let mut timestamps = Vec::with_capacity(n);
    let mut fluxes = FluxesTimeseries::with_capacity(n);
    let mut extrapolated_steps = 0;

    for (&hour, &inflow) in hydrograph.hour.iter().zip(&hydrograph.discharge) {
        let timestamp = start
            .checked_add_signed(Duration::hours(hour as i64))
            .ok_or_else(|| Error::domain("simulation hour", hour, "timestamp out of range"))?;

        let turbine_flow = scenario.release(&config.turbine, timestamp);
        let (new_state, step_fluxes, extrapolated) = step(
            &state,
            inflow,
            environmental_flow,
            turbine_flow,
            max_volume,
            curve,
        );

        if extrapolated {
            if extrapolated_steps == 0 {
                warn!(
                    scenario = %scenario,
                    hour,
                    volume_m3 = new_state.volume,
                    "reservoir volume outside elevation-volume table, extrapolating water level"
                );
            }
            extrapolated_steps += 1;
        }

        timestamps.push(timestamp);
        fluxes.push(&step_fluxes);
        state = new_state;
    }

    debug!(
        scenario = %scenario,
        steps = timestamps.len(),
        cum_overflow = state.cum_overflow,
        cum_turbined = state.cum_turbined,
        "scenario run complete"
    );

    Ok(ScenarioRun {
        scenario,
        timestamps,
        fluxes,
        initial_volume,
        initial_extrapolated: initial.extrapolated,
        final_state: state,
        extrapolated_steps,
    })
}
