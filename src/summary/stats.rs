//! Descriptive statistics for one numeric column

use serde::Serialize;

/// `describe`-style statistics. Undefined values are NaN and serialize as `null`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Statistics over the non-missing values of a column
    pub fn compute(values: &[Option<f64>]) -> Self {
        let mut vals: Vec<f64> = values.iter().flatten().copied().collect();
        let count = vals.len();

        if count == 0 {
            return Self::undefined();
        }

        vals.sort_by(|a, b| a.total_cmp(b));
        let min = vals[0];
        let max = vals[count - 1];

        let (mean, std_dev) = if min == max && min.is_finite() {
            // Constant column: exact mean, zero spread
            (min, if count > 1 { 0.0 } else { f64::NAN })
        } else {
            let mean = vals.iter().sum::<f64>() / count as f64;
            (mean, sample_std_dev(&vals, mean))
        };

        Self {
            count,
            mean,
            std_dev,
            min,
            p25: percentile(&vals, 0.25),
            p50: percentile(&vals, 0.50),
            p75: percentile(&vals, 0.75),
            max,
        }
    }

    /// All-NaN statistics for a column without values
    pub fn undefined() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Sample standard deviation (n - 1 denominator); NaN below two values
fn sample_std_dev(vals: &[f64], mean: f64) -> f64 {
    if vals.len() < 2 {
        return f64::NAN;
    }
    let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (vals.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated quantile of already sorted values.
///
/// `q` is in `[0, 1]`; position is `q * (n - 1)`. Returns NaN for no values.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if frac == 0.0 {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[test]
    fn test_median_of_four() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
    }

    #[test]
    fn test_quartiles() {
        let stats = ColumnStats::compute(&col(&[4.0, 1.0, 3.0, 2.0]));
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p25, 1.75);
        assert_eq!(stats.p50, 2.5);
        assert_eq!(stats.p75, 3.25);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert!((stats.std_dev - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column() {
        let stats = ColumnStats::compute(&col(&[0.1, 0.1, 0.1]));
        assert_eq!(stats.mean, 0.1);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_constant_infinite_column() {
        let stats = ColumnStats::compute(&col(&[f64::INFINITY, f64::INFINITY]));
        assert_eq!(stats.mean, f64::INFINITY);
        assert!(stats.std_dev.is_nan());
        assert_eq!(stats.p50, f64::INFINITY);
        assert_eq!(stats.max, f64::INFINITY);
    }

    #[test]
    fn test_missing_values_skipped() {
        let stats = ColumnStats::compute(&[Some(10.0), None, Some(20.0), None]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 15.0);
        assert_eq!(stats.p50, 15.0);
    }

    #[test]
    fn test_single_value() {
        let stats = ColumnStats::compute(&col(&[7.0]));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 7.0);
        assert!(stats.std_dev.is_nan());
        assert_eq!(stats.p25, 7.0);
        assert_eq!(stats.p75, 7.0);
    }

    #[test]
    fn test_no_values() {
        let stats = ColumnStats::compute(&[None, None]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.std_dev.is_nan());
        assert!(stats.min.is_nan());
        assert!(stats.p50.is_nan());
        assert!(stats.max.is_nan());
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let json = serde_json::to_value(ColumnStats::undefined()).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
    }
}
