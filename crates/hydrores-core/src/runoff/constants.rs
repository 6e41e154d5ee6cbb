/// Rainfall-runoff numerical constants.
///
/// Empirical coefficients of the SCS-CN loss model, the Ventura
/// time-of-concentration formula and the linear-reservoir transform.

// -- SCS Curve Number --

/// Retention scale: S = MM_PER_INCH * (1000 / CN - 10) [mm].
pub const MM_PER_INCH: f64 = 25.4;

/// Upper bound of the Curve Number (impervious basin, S = 0).
pub const CN_MAX: f64 = 100.0;

/// Decimals kept on effective precipitation [mm].
pub const EFFECTIVE_PRECIP_DECIMALS: i32 = 1;

// -- Ventura formula --

/// Tc = VENTURA_COEFFICIENT * sqrt(A) / sqrt(i), A in km², Tc in hours.
pub const VENTURA_COEFFICIENT: f64 = 0.127;

/// Decimals kept on Tc [hours].
pub const TC_DECIMALS: i32 = 2;

// -- Linear reservoir --

/// Storage coefficient k as a fraction of Tc.
pub const STORAGE_COEFFICIENT_RATIO: f64 = 0.7;

// -- Units --

pub const M_PER_MM: f64 = 0.001;
pub const M2_PER_KM2: f64 = 1e6;
pub const SECONDS_PER_HOUR: f64 = 3600.0;
