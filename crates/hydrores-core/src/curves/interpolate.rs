/// Tabular curve fitting primitives.
///
/// - `LinearInterpolator`: piecewise-linear through control points, linear
///   extrapolation from the end segments outside the table.
/// - `Polynomial`: least-squares polynomial fit, evaluated with Horner's rule.
use crate::error::{Error, Result};

/// Result of evaluating a curve, flagging out-of-table queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveLookup {
    pub value: f64,
    /// `true` if the query lay outside the tabulated domain.
    pub extrapolated: bool,
}

/// Piecewise-linear interpolant y = f(x) over strictly increasing x.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Build from control points. Requires at least two points, equal
    /// lengths, finite values and strictly increasing `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::InvalidCurve(format!(
                "x length {} does not match y length {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(Error::InvalidCurve(format!(
                "at least 2 points required, got {}",
                xs.len()
            )));
        }
        if xs.iter().chain(&ys).any(|v| !v.is_finite()) {
            return Err(Error::InvalidCurve("non-finite control point".to_string()));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidCurve(
                "x values must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Tabulated x range (min, max).
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }

    /// Evaluate at `x`. Outside the table the first or last segment is
    /// extended; this never fails.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Index of the segment [i, i+1] used for x, clamped to the end segments.
        let i = match self.xs.partition_point(|&xi| xi <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }

    pub fn lookup(&self, x: f64) -> CurveLookup {
        CurveLookup {
            value: self.evaluate(x),
            extrapolated: !self.contains(x),
        }
    }
}

/// Least-squares polynomial y = p(x).
///
/// Stored in a centred and scaled variable `t = (x - shift) / scale` so the
/// normal equations stay well conditioned for elevations in the hundreds of
/// metres.
#[derive(Debug, Clone)]
pub struct Polynomial {
    /// Coefficients in t, lowest order first.
    coeffs: Vec<f64>,
    shift: f64,
    scale: f64,
    /// x range of the fitted points (min, max).
    domain: (f64, f64),
}

impl Polynomial {
    /// Fit a polynomial of `degree` to the points by least squares.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self> {
        let m = degree + 1;
        if xs.len() != ys.len() {
            return Err(Error::InvalidCurve(format!(
                "x length {} does not match y length {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < m {
            return Err(Error::InvalidCurve(format!(
                "degree {degree} fit needs at least {m} points, got {}",
                xs.len()
            )));
        }

        let n = xs.len() as f64;
        let shift = xs.iter().sum::<f64>() / n;
        let scale = xs
            .iter()
            .map(|x| (x - shift).abs())
            .fold(0.0_f64, f64::max);
        if scale == 0.0 || !scale.is_finite() {
            return Err(Error::InvalidCurve(
                "x values must not all coincide".to_string(),
            ));
        }

        // Normal equations (VᵀV) c = Vᵀy, with V the Vandermonde matrix in t.
        let mut a = vec![vec![0.0; m]; m];
        let mut b = vec![0.0; m];
        for (&x, &y) in xs.iter().zip(ys) {
            let t = (x - shift) / scale;
            let mut powers = vec![1.0; 2 * m - 1];
            for k in 1..powers.len() {
                powers[k] = powers[k - 1] * t;
            }
            for (r, row) in a.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    *cell += powers[r + c];
                }
                b[r] += powers[r] * y;
            }
        }

        let coeffs = solve(a, b)?;
        let domain = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        Ok(Self {
            coeffs,
            shift,
            scale,
            domain,
        })
    }

    /// Range of x the polynomial was fitted on (min, max).
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.shift) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// Evaluate at `x`, flagging queries outside the fitted range.
    pub fn lookup(&self, x: f64) -> CurveLookup {
        let (lo, hi) = self.domain;
        CurveLookup {
            value: self.evaluate(x),
            extrapolated: !(lo..=hi).contains(&x),
        }
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(Error::InvalidCurve(
                "polynomial fit is singular".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    fn line() -> LinearInterpolator {
        LinearInterpolator::new(vec![0.0, 10.0, 20.0], vec![100.0, 110.0, 130.0]).unwrap()
    }

    // -- Linear interpolation --

    #[test]
    fn hits_control_points() {
        let f = line();
        assert_approx(f.evaluate(0.0), 100.0, 1e-12);
        assert_approx(f.evaluate(10.0), 110.0, 1e-12);
        assert_approx(f.evaluate(20.0), 130.0, 1e-12);
    }

    #[test]
    fn interpolates_within_segment() {
        let f = line();
        assert_approx(f.evaluate(5.0), 105.0, 1e-12);
        assert_approx(f.evaluate(15.0), 120.0, 1e-12);
    }

    #[test]
    fn extrapolates_below_and_above() {
        let f = line();
        // First segment slope 1, last segment slope 2
        assert_approx(f.evaluate(-5.0), 95.0, 1e-12);
        assert_approx(f.evaluate(25.0), 140.0, 1e-12);
    }

    #[test]
    fn lookup_flags_extrapolation() {
        let f = line();
        assert!(!f.lookup(20.0).extrapolated);
        assert!(f.lookup(20.5).extrapolated);
        assert!(f.lookup(-0.1).extrapolated);
    }

    #[test]
    fn rejects_non_increasing_x() {
        assert!(LinearInterpolator::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(LinearInterpolator::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn rejects_short_or_mismatched_tables() {
        assert!(LinearInterpolator::new(vec![0.0], vec![1.0]).is_err());
        assert!(LinearInterpolator::new(vec![0.0, 1.0], vec![1.0]).is_err());
    }

    // -- Polynomial fit --

    #[test]
    fn cubic_fit_recovers_exact_cubic() {
        let xs: Vec<f64> = (0..10).map(|i| 790.0 + 5.0 * i as f64).collect();
        let cubic = |x: f64| 0.002 * (x - 800.0).powi(3) - 0.1 * (x - 800.0).powi(2) + 3.0 * x;
        let ys: Vec<f64> = xs.iter().map(|&x| cubic(x)).collect();
        let p = Polynomial::fit(&xs, &ys, 3).unwrap();
        assert_eq!(p.domain(), (790.0, 835.0));
        for x in [790.0, 812.5, 833.0, 850.0] {
            assert_approx(p.evaluate(x), cubic(x), 1e-6);
        }
    }

    #[test]
    fn linear_fit_of_noisy_points_is_least_squares() {
        // Best line through (0,0), (1,1), (2,1) is y = 1/6 + x/2
        let p = Polynomial::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 1.0], 1).unwrap();
        assert_approx(p.evaluate(0.0), 1.0 / 6.0, 1e-12);
        assert_approx(p.evaluate(2.0), 7.0 / 6.0, 1e-12);
    }

    #[test]
    fn polynomial_lookup_flags_outside_fitted_range() {
        let p = Polynomial::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 8.0, 27.0], 3).unwrap();
        assert!(!p.lookup(0.0).extrapolated);
        assert!(!p.lookup(3.0).extrapolated);
        assert!(p.lookup(3.5).extrapolated);
        assert!(p.lookup(-0.5).extrapolated);
        assert_approx(p.lookup(4.0).value, 64.0, 1e-9);
    }

    #[test]
    fn fit_needs_enough_points() {
        assert!(Polynomial::fit(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 3).is_err());
    }

    #[test]
    fn fit_rejects_coincident_x() {
        assert!(Polynomial::fit(&[1.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0], 3).is_err());
    }
}
