/// Reservoir balance constants.
///
/// The balance steps hourly; flows are in m³/s and volumes in m³, while the
/// elevation-volume table is indexed in 10^6 m³.
pub use crate::curves::reservoir::VOLUME_UNIT_M3;

/// Length of one balance step [s].
pub const SECONDS_PER_STEP: f64 = 3600.0;
