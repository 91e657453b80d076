//! Statistics Calculator Module
//! Descriptive statistics, histogram binning and price/rating correlation.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for the correlation test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Descriptive statistics for one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Pearson correlation with a two-tailed p-value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

impl Correlation {
    pub fn is_significant(&self) -> bool {
        self.p_value <= SIGNIFICANCE_THRESHOLD
    }
}

/// One histogram bucket. `upper` is exclusive except for the last bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics, `None` for an empty series.
    pub fn compute_descriptive_stats(values: &[f64]) -> Option<DescriptiveStats> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        Some(DescriptiveStats {
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
        })
    }

    /// Arithmetic mean, `None` for an empty series.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Pearson correlation of paired samples.
    ///
    /// Returns `None` with fewer than three pairs or when either side is constant.
    pub fn pearson(x: &[f64], y: &[f64]) -> Option<Correlation> {
        let n = x.len().min(y.len());
        if n < 3 {
            return None;
        }
        let (x, y) = (&x[..n], &y[..n]);

        let mean_x = x.iter().sum::<f64>() / n as f64;
        let mean_y = y.iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (a, b) in x.iter().zip(y) {
            let dx = a - mean_x;
            let dy = b - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        if var_x == 0.0 || var_y == 0.0 {
            return None;
        }

        let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);

        // t statistic with n - 2 degrees of freedom; |r| == 1 is a perfect fit
        let df = (n - 2) as f64;
        let p_value = if (1.0 - r * r) <= f64::EPSILON {
            0.0
        } else {
            let t = r * (df / (1.0 - r * r)).sqrt();
            match StudentsT::new(0.0, 1.0, df) {
                Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
                Err(_) => return None,
            }
        };

        Some(Correlation { r, p_value, n })
    }

    /// Equal-width histogram over the observed range.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lo + i as f64 * width,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }
}
