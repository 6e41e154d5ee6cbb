//! Rainfall-runoff process functions.
//!
//! Pure functions for each stage of the event transform: losses,
//! contributing area, concentration time, and the two limbs of the
//! linear-reservoir response. Inputs outside a formula's domain are
//! rejected rather than allowed to produce NaN.

use super::constants::{
    CN_MAX, EFFECTIVE_PRECIP_DECIMALS, MM_PER_INCH, STORAGE_COEFFICIENT_RATIO, TC_DECIMALS,
    VENTURA_COEFFICIENT,
};
use crate::curves::HypsometricCurve;
use crate::error::{Error, Result};

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// SCS-CN retention parameter S [mm].
pub fn retention(curve_number: f64) -> Result<f64> {
    if !(curve_number > 0.0 && curve_number <= CN_MAX) {
        return Err(Error::domain(
            "curve number",
            curve_number,
            "must be in (0, 100]",
        ));
    }
    Ok(MM_PER_INCH * (1000.0 / curve_number - 10.0))
}

/// Effective precipitation [mm] by the SCS-CN method.
///
/// Runoff starts once rainfall exceeds the initial loss `beta * S`:
/// `Pe = (P - beta*S)² / (P + (1 - beta)*S)`, else 0. Rounded to 0.1 mm.
/// CN = 100 gives S = 0 and Pe = P.
pub fn effective_precipitation(precip_mm: f64, curve_number: f64, beta: f64) -> Result<f64> {
    if !(precip_mm.is_finite() && precip_mm >= 0.0) {
        return Err(Error::domain("precipitation", precip_mm, "must be >= 0"));
    }
    if !(0.0..=1.0).contains(&beta) {
        return Err(Error::domain(
            "initial loss coefficient",
            beta,
            "must be in [0, 1]",
        ));
    }
    let s = retention(curve_number)?;

    let initial_loss = beta * s;
    let pe = if precip_mm > initial_loss {
        (precip_mm - initial_loss).powi(2) / (precip_mm + (1.0 - beta) * s)
    } else {
        0.0
    };
    Ok(round_to(pe, EFFECTIVE_PRECIP_DECIMALS))
}

/// Time of concentration [hours] by the Ventura formula, rounded to 0.01 h.
pub fn time_of_concentration(area_km2: f64, avg_slope: f64) -> Result<f64> {
    if !(area_km2.is_finite() && area_km2 > 0.0) {
        return Err(Error::domain("area", area_km2, "must be > 0"));
    }
    if !(avg_slope.is_finite() && avg_slope > 0.0) {
        return Err(Error::domain("average slope", avg_slope, "must be > 0"));
    }
    let tc = VENTURA_COEFFICIENT * area_km2.sqrt() / avg_slope.sqrt();
    Ok(round_to(tc, TC_DECIMALS))
}

/// Contributing area [km²].
///
/// With snow accounting only the area below the snow line contributes
/// rainfall runoff; the snow line must be a tabulated elevation.
pub fn effective_area(
    basin_area_km2: f64,
    hypsometry: &HypsometricCurve,
    snow_line_elevation: f64,
    snow: bool,
) -> Result<f64> {
    if snow {
        hypsometry.area_at(snow_line_elevation, basin_area_km2)
    } else {
        Ok(basin_area_km2)
    }
}

/// Linear-reservoir storage coefficient k [hours] from Tc.
pub fn storage_coefficient(tc_hours: f64) -> Result<f64> {
    let k = STORAGE_COEFFICIENT_RATIO * tc_hours;
    if k.is_nan() || k <= 0.0 {
        return Err(Error::domain(
            "storage coefficient",
            k,
            "must be > 0 (time of concentration rounds to zero)",
        ));
    }
    Ok(k)
}

/// Rising limb under constant effective rainfall: `q_eq * (1 - e^(-t/k))`.
///
/// `q_eq` is the equilibrium discharge [m³/s] the basin tends to under
/// steady rainfall.
#[inline]
pub fn rising_limb(t_hours: f64, q_eq: f64, k: f64) -> f64 {
    q_eq * (1.0 - (-t_hours / k).exp())
}

/// Recession limb after rainfall stops: `q_peak * e^(-(t - Tp)/k)`.
#[inline]
pub fn recession_limb(hours_since_end: f64, q_peak: f64, k: f64) -> f64 {
    q_peak * (-hours_since_end / k).exp()
}
