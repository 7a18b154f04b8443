//! Descriptive statistics over loaded datasets.
//!
//! - [`describe`]: count, mean, std, min, quartiles, max and missing count
//!   for each numeric column
//! - [`missing_values`]: missing-cell counts for every column
//! - [`zscore_outliers`]: values beyond a z-score threshold
//! - [`correlation_matrix`]: pairwise Pearson correlation
//! - [`distribution`]: histogram bins and kernel density estimates

mod correlation;
pub mod distribution;
mod outliers;

use serde::Serialize;

use crate::dataset::Dataset;

pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use outliers::{zscore_outliers, ColumnCount, OUTLIER_ZSCORE};

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// First quartile.
    pub q25: f64,
    /// Median.
    pub q50: f64,
    /// Third quartile.
    pub q75: f64,
    /// Maximum.
    pub max: f64,
    /// Number of missing cells.
    pub missing: usize,
}

impl ColumnSummary {
    /// Summarize a sample. `missing` is carried through unchanged.
    #[must_use]
    pub fn from_values(column: impl Into<String>, values: &[f64], missing: usize) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            column: column.into(),
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            missing,
        }
    }

    /// Statistic values in report column order (`count` through `max`).
    #[must_use]
    pub fn statistics(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Report headers matching [`ColumnSummary::statistics`].
pub const STATISTIC_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary statistics for every numeric column, in column order.
#[must_use]
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .numeric_columns()
        .map(|column| {
            ColumnSummary::from_values(
                column.name.clone(),
                &column.present_values(),
                column.missing_count(),
            )
        })
        .collect()
}

/// Missing-cell count for every column, numeric or not.
#[must_use]
pub fn missing_values(dataset: &Dataset) -> Vec<ColumnCount> {
    dataset
        .columns
        .iter()
        .map(|column| ColumnCount {
            column: column.name.clone(),
            count: column.missing_count(),
        })
        .collect()
}

/// Arithmetic mean, NaN for an empty sample.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// NaN when the sample has `ddof` or fewer values.
#[must_use]
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - ddof) as f64).sqrt()
}

/// Sample standard deviation (ddof = 1).
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    std_dev(values, 1)
}

/// Quantile of an ascending-sorted sample by linear interpolation.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * q;
            let lo = h.floor();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let i = lo as usize;
            if i + 1 >= n {
                sorted[n - 1]
            } else {
                sorted[i] + (h - lo) * (sorted[i + 1] - sorted[i])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_close(mean(&values), 5.0);
        assert_close(std_dev(&values, 0), 2.0);
        assert_close(sample_std(&values), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_std_undefined_for_small_samples() {
        assert!(sample_std(&[1.0]).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_close(quantile_sorted(&sorted, 0.25), 1.75);
        assert_close(quantile_sorted(&sorted, 0.5), 2.5);
        assert_close(quantile_sorted(&sorted, 0.75), 3.25);
        assert_close(quantile_sorted(&sorted, 1.0), 4.0);
        assert_close(quantile_sorted(&[7.0], 0.3), 7.0);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_describe_numeric_columns_only() {
        let ds = dataset(
            "t",
            &[
                ("Date", "d1,d2,d3,d4,d5"),
                ("GHI", "1,2,3,4,"),
                ("Comments", ",,,,"),
            ],
        );
        let summary = describe(&ds);

        assert_eq!(summary.len(), 2);
        let ghi = &summary[0];
        assert_eq!(ghi.column, "GHI");
        assert_eq!(ghi.count, 4);
        assert_eq!(ghi.missing, 1);
        assert_close(ghi.mean, 2.5);
        assert_close(ghi.min, 1.0);
        assert_close(ghi.q50, 2.5);
        assert_close(ghi.max, 4.0);

        let comments = &summary[1];
        assert_eq!(comments.count, 0);
        assert_eq!(comments.missing, 5);
        assert!(comments.mean.is_nan());
        assert!(comments.max.is_nan());
    }

    #[test]
    fn test_missing_values_every_column() {
        let ds = dataset("t", &[("Date", "a,,c"), ("GHI", ",,1")]);
        let missing = missing_values(&ds);
        assert_eq!(
            missing,
            vec![
                ColumnCount {
                    column: "Date".to_string(),
                    count: 1
                },
                ColumnCount {
                    column: "GHI".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_statistics_order() {
        let summary = ColumnSummary::from_values("x", &[3.0, 1.0, 2.0], 0);
        let stats = summary.statistics();
        assert_close(stats[0], 3.0);
        assert_close(stats[3], 1.0);
        assert_close(stats[7], 3.0);
        assert_eq!(STATISTIC_NAMES[5], "50%");
    }
}
