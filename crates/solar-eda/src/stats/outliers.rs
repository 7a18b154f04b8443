//! Z-score outlier detection.

use serde::Serialize;

use super::{mean, std_dev};
use crate::dataset::Dataset;

/// Absolute z-score above which a value counts as an outlier.
pub const OUTLIER_ZSCORE: f64 = 3.0;

/// A per-column count (missing cells, outliers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCount {
    /// Column name.
    pub column: String,
    /// The counted quantity.
    pub count: usize,
}

/// Count values whose population z-score exceeds `threshold` in magnitude.
///
/// Only rows complete across every numeric column take part, so a single
/// all-missing numeric column leaves nothing to score. Returns `None` when
/// the dataset has no numeric columns.
#[must_use]
pub fn zscore_outliers(dataset: &Dataset, threshold: f64) -> Option<Vec<ColumnCount>> {
    let columns: Vec<_> = dataset
        .numeric_columns()
        .filter_map(|c| c.values.as_ref().map(|values| (c.name.as_str(), values)))
        .collect();
    if columns.is_empty() {
        return None;
    }

    let complete_rows: Vec<usize> = (0..dataset.row_count)
        .filter(|&row| columns.iter().all(|(_, values)| values[row].is_some()))
        .collect();

    let counts = columns
        .iter()
        .map(|(name, values)| {
            let sample: Vec<f64> = complete_rows.iter().filter_map(|&row| values[row]).collect();
            ColumnCount {
                column: (*name).to_string(),
                count: count_beyond(&sample, threshold),
            }
        })
        .collect();
    Some(counts)
}

fn count_beyond(sample: &[f64], threshold: f64) -> usize {
    let m = mean(sample);
    let sd = std_dev(sample, 0);
    if !sd.is_finite() || sd == 0.0 {
        return 0;
    }
    sample
        .iter()
        .filter(|&&v| ((v - m) / sd).abs() > threshold)
        .count()
}
