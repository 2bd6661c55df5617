//! Ordinary least squares over a sequentially indexed series.

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `ys` against `x = 0, 1, 2, ...`.
///
/// Returns `None` when the system is degenerate (zero denominator, which
/// happens for fewer than two points) or when the inputs produce a
/// non-finite coefficient.
pub fn fit_line(ys: &[f64]) -> Option<LinearFit> {
    let m = ys.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (index, &y) in ys.iter().enumerate() {
        let x = index as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = m * sum_xx - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let slope = (m * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / m;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    Some(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-6 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn recovers_exact_line() {
        let ys: Vec<f64> = (0..20).map(|i| 250.0 + 12.5 * i as f64).collect();
        let fit = fit_line(&ys).unwrap();
        assert_close(fit.slope, 12.5);
        assert_close(fit.intercept, 250.0);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let fit = fit_line(&[40.0; 6]).unwrap();
        assert_close(fit.slope, 0.0);
        assert_close(fit.intercept, 40.0);
    }

    #[test]
    fn single_point_is_degenerate() {
        assert!(fit_line(&[100.0]).is_none());
        assert!(fit_line(&[]).is_none());
    }

    #[test]
    fn non_finite_input_is_degenerate() {
        assert!(fit_line(&[1.0, f64::NAN, 3.0]).is_none());
        assert!(fit_line(&[1.0, f64::INFINITY, 3.0]).is_none());
    }

    #[test]
    fn value_at_extends_line() {
        let fit = LinearFit {
            slope: 2.0,
            intercept: 1.0,
        };
        assert_eq!(fit.value_at(3.0), 7.0);
    }
}
