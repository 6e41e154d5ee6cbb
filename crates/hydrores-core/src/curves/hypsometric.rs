/// Basin hypsometric curve: elevation against cumulative area fraction.
///
/// Lookups are exact-match on a tabulated elevation. The snow line is
/// expected to coincide with a table row; an elevation between rows is a
/// lookup error, not an interpolation.
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct HypsometricCurve {
    elevations: Vec<f64>,
    cum_fractions: Vec<f64>,
}

impl HypsometricCurve {
    /// Build from parallel columns. Elevations must be strictly increasing
    /// and fractions non-decreasing within [0, 1].
    pub fn new(elevations: Vec<f64>, cum_fractions: Vec<f64>) -> Result<Self> {
        if elevations.len() != cum_fractions.len() {
            return Err(Error::InvalidCurve(format!(
                "hypsometric curve: {} elevations but {} area fractions",
                elevations.len(),
                cum_fractions.len()
            )));
        }
        if elevations.len() < 2 {
            return Err(Error::InvalidCurve(
                "hypsometric curve needs at least 2 rows".to_string(),
            ));
        }
        if elevations.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidCurve(
                "hypsometric elevations must be strictly increasing".to_string(),
            ));
        }
        if cum_fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(Error::InvalidCurve(
                "cumulative area fractions must lie in [0, 1]".to_string(),
            ));
        }
        if cum_fractions.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidCurve(
                "cumulative area fractions must be non-decreasing".to_string(),
            ));
        }
        Ok(Self {
            elevations,
            cum_fractions,
        })
    }

    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    /// Cumulative area fraction at exactly `elevation`.
    pub fn cumulative_fraction_at(&self, elevation: f64) -> Result<f64> {
        self.elevations
            .iter()
            .position(|&e| e == elevation)
            .map(|i| self.cum_fractions[i])
            .ok_or(Error::ElevationNotFound { elevation })
    }

    /// Cumulative area at exactly `elevation` [km²], truncated to whole m².
    pub fn area_at(&self, elevation: f64, basin_area_km2: f64) -> Result<f64> {
        let fraction = self.cumulative_fraction_at(elevation)?;
        let area_m2 = (fraction * basin_area_km2 * 1e6).trunc();
        Ok(area_m2 / 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> HypsometricCurve {
        HypsometricCurve::new(
            vec![1000.0, 1100.0, 1200.0, 1300.0],
            vec![0.0, 0.25, 0.55, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn exact_match_returns_fraction() {
        assert_eq!(curve().cumulative_fraction_at(1200.0).unwrap(), 0.55);
    }

    #[test]
    fn between_rows_is_lookup_error() {
        let err = curve().cumulative_fraction_at(1150.0).unwrap_err();
        assert!(matches!(err, Error::ElevationNotFound { elevation } if elevation == 1150.0));
    }

    #[test]
    fn area_scales_fraction_by_basin_area() {
        let area = curve().area_at(1200.0, 200.0).unwrap();
        assert!((area - 110.0).abs() < 1e-5);
    }

    #[test]
    fn area_truncates_to_whole_square_metres() {
        // 0.25 * 0.0000037 km² = 0.925 m², truncated to 0
        let area = curve().area_at(1100.0, 0.0000037).unwrap();
        assert_eq!(area, 0.0);
    }

    #[test]
    fn rejects_decreasing_fraction() {
        let r = HypsometricCurve::new(vec![1.0, 2.0], vec![0.5, 0.4]);
        assert!(r.is_err());
    }

    #[test]
    fn rejects_fraction_above_one() {
        let r = HypsometricCurve::new(vec![1.0, 2.0], vec![0.5, 1.2]);
        assert!(r.is_err());
    }

    #[test]
    fn rejects_unsorted_elevation() {
        let r = HypsometricCurve::new(vec![2.0, 1.0], vec![0.1, 0.2]);
        assert!(r.is_err());
    }
}
