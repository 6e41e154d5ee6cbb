/// Rainfall-runoff orchestration.
///
/// - `discharge_series()`: linear-reservoir hydrograph for a given effective rainfall
/// - `run()`: full event transform from the configured storm
use tracing::{debug, info};

use super::constants::{M2_PER_KM2, M_PER_MM, SECONDS_PER_HOUR};
use super::hydrograph::{Hydrograph, HydrographSample, RunoffResponse, RunoffSummary};
use super::processes;
use crate::config::{BasinConfig, Config};
use crate::curves::HypsometricCurve;
use crate::error::{Error, Result};

/// Basin description the transform needs besides the storm itself.
#[derive(Debug, Clone, Copy)]
pub struct Catchment<'a> {
    pub basin: &'a BasinConfig,
    pub hypsometry: &'a HypsometricCurve,
    pub snow_line_elevation: f64,
}

impl Catchment<'_> {
    /// Contributing area [km²], limited to below the snow line if `snow`.
    pub fn effective_area(&self, snow: bool) -> Result<f64> {
        processes::effective_area(
            self.basin.area_km2,
            self.hypsometry,
            self.snow_line_elevation,
            snow,
        )
    }
}

/// Build the hourly discharge series for an effective rainfall `pe_mm`
/// spread uniformly over `duration_hours`.
///
/// Hours `0..duration` follow the rising limb, hours `duration..=horizon`
/// the recession from the largest rising-limb value. The series always has
/// `horizon + 1` samples.
pub fn discharge_series(
    catchment: &Catchment<'_>,
    pe_mm: f64,
    snow: bool,
    duration_hours: u32,
    horizon_hours: u32,
) -> Result<RunoffResponse> {
    if duration_hours == 0 {
        return Err(Error::domain("rainfall duration", 0.0, "must be > 0 hours"));
    }
    if horizon_hours < duration_hours {
        return Err(Error::domain(
            "simulation horizon",
            f64::from(horizon_hours),
            "must be >= rainfall duration",
        ));
    }

    let area_km2 = catchment.effective_area(snow)?;
    info!(area_km2, snow, "effective area");
    let tc = processes::time_of_concentration(area_km2, catchment.basin.avg_slope)?;
    info!(tc_hours = tc, "time of concentration");
    let k = processes::storage_coefficient(tc)?;

    // Effective rainfall intensity [m/h] over the contributing area [m³/h]
    let intensity = pe_mm / f64::from(duration_hours) * M_PER_MM;
    let inflow_m3_per_hour = intensity * area_km2 * M2_PER_KM2;
    let q_eq = inflow_m3_per_hour / SECONDS_PER_HOUR;

    let n = horizon_hours as usize + 1;
    let mut hydrograph = Hydrograph::with_capacity(n);

    let mut q_peak = 0.0_f64;
    for t in 0..duration_hours {
        let discharge = processes::rising_limb(f64::from(t), q_eq, k);
        q_peak = q_peak.max(discharge);
        hydrograph.push(&HydrographSample {
            hour: f64::from(t),
            discharge,
        });
    }

    for t in duration_hours..=horizon_hours {
        let discharge = processes::recession_limb(f64::from(t - duration_hours), q_peak, k);
        hydrograph.push(&HydrographSample {
            hour: f64::from(t),
            discharge,
        });
    }
    debug!(samples = hydrograph.len(), q_peak, k, "discharge series built");

    Ok(RunoffResponse {
        hydrograph,
        summary: RunoffSummary {
            effective_precipitation: pe_mm,
            effective_area_km2: area_km2,
            time_of_concentration: tc,
            storage_coefficient: k,
            peak_discharge: q_peak,
        },
    })
}

/// Run the event transform for the configured storm: SCS-CN losses, then
/// the linear-reservoir hydrograph.
pub fn run(config: &Config, hypsometry: &HypsometricCurve, snow: bool) -> Result<RunoffResponse> {
    let pe = processes::effective_precipitation(
        config.rainfall.depth_mm,
        config.basin.curve_number,
        config.basin.initial_loss,
    )?;
    info!(pe_mm = pe, "effective precipitation");

    let catchment = Catchment {
        basin: &config.basin,
        hypsometry,
        snow_line_elevation: config.rainfall.snow_line_elevation,
    };
    discharge_series(
        &catchment,
        pe,
        snow,
        config.rainfall.duration_hours,
        config.simulation.horizon_hours,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hypsometry() -> HypsometricCurve {
        HypsometricCurve::new(
            vec![400.0, 800.0, 1200.0, 1600.0, 2000.0],
            vec![0.0, 0.2, 0.55, 0.85, 1.0],
        )
        .unwrap()
    }

    fn reference(snow: bool) -> RunoffResponse {
        let config = Config::default();
        run(&config, &hypsometry(), snow).unwrap()
    }

    #[test]
    fn reference_event_summary() {
        let r = reference(false);
        assert_eq!(r.summary.effective_precipitation, 120.0);
        assert_eq!(r.summary.effective_area_km2, 200.0);
        assert_eq!(r.summary.time_of_concentration, 12.7);
        assert_relative_eq!(r.summary.storage_coefficient, 8.89, epsilon = 1e-12);
    }

    #[test]
    fn series_has_horizon_plus_one_samples() {
        let r = reference(false);
        assert_eq!(r.hydrograph.len(), 73);
        assert_eq!(r.hydrograph.hour[0], 0.0);
        assert_eq!(r.hydrograph.hour[72], 72.0);
    }

    #[test]
    fn rising_limb_starts_at_zero() {
        let r = reference(false);
        assert_eq!(r.hydrograph.discharge[0], 0.0);
    }

    #[test]
    fn limbs_are_monotonic_and_non_negative() {
        let r = reference(false);
        let q = &r.hydrograph.discharge;
        assert!(q.iter().all(|&v| v >= 0.0));
        for t in 1..24 {
            assert!(q[t] >= q[t - 1], "rising limb decreased at t={t}");
        }
        for t in 25..q.len() {
            assert!(q[t] <= q[t - 1], "recession limb increased at t={t}");
        }
    }

    #[test]
    fn recession_starts_from_end_of_rise() {
        let r = reference(false);
        let q = &r.hydrograph.discharge;
        assert_eq!(q[24], q[23]);
        assert_eq!(r.summary.peak_discharge, q[23]);
    }

    #[test]
    fn rising_limb_matches_closed_form() {
        let r = reference(false);
        // 120 mm over 24 h on 200 km²: 5 mm/h -> 1e6 m³/h -> 277.78 m³/s at equilibrium
        let q_eq = 1e6 / 3600.0;
        let expected = q_eq * (1.0 - (-10.0_f64 / 8.89).exp());
        assert_relative_eq!(r.hydrograph.discharge[10], expected, max_relative = 1e-12);
    }

    #[test]
    fn snow_reduces_peak() {
        let rain = reference(false);
        let snow = reference(true);
        assert_relative_eq!(snow.summary.effective_area_km2, 110.0, epsilon = 1e-5);
        assert!(snow.summary.peak_discharge < rain.summary.peak_discharge);
    }

    #[test]
    fn snow_line_off_table_fails() {
        let mut config = Config::default();
        config.rainfall.snow_line_elevation = 1250.0;
        let err = run(&config, &hypsometry(), true).unwrap_err();
        assert!(matches!(err, Error::ElevationNotFound { .. }));
    }

    #[test]
    fn zero_effective_rain_gives_flat_series() {
        let config = Config::default();
        let catchment = Catchment {
            basin: &config.basin,
            hypsometry: &hypsometry(),
            snow_line_elevation: 1200.0,
        };
        let r = discharge_series(&catchment, 0.0, false, 6, 12).unwrap();
        assert_eq!(r.hydrograph.len(), 13);
        assert!(r.hydrograph.discharge.iter().all(|&q| q == 0.0));
    }

    #[test]
    fn duration_equal_to_horizon() {
        let config = Config::default();
        let catchment = Catchment {
            basin: &config.basin,
            hypsometry: &hypsometry(),
            snow_line_elevation: 1200.0,
        };
        let r = discharge_series(&catchment, 30.0, false, 12, 12).unwrap();
        assert_eq!(r.hydrograph.len(), 13);
        assert_eq!(r.hydrograph.discharge[12], r.hydrograph.discharge[11]);
    }

    #[test]
    fn rejects_horizon_shorter_than_rain() {
        let config = Config::default();
        let catchment = Catchment {
            basin: &config.basin,
            hypsometry: &hypsometry(),
            snow_line_elevation: 1200.0,
        };
        assert!(discharge_series(&catchment, 30.0, false, 24, 12).is_err());
        assert!(discharge_series(&catchment, 30.0, false, 0, 12).is_err());
    }
}
