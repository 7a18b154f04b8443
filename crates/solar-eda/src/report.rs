//! Per-dataset reports: summary CSV files and console output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::stats::{ColumnCount, ColumnSummary, STATISTIC_NAMES};

/// Everything produced for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    /// Dataset name.
    pub name: String,
    /// Number of data rows.
    pub rows: usize,
    /// Summary statistics per numeric column.
    pub summary: Vec<ColumnSummary>,
    /// Missing-cell counts per column.
    pub missing: Vec<ColumnCount>,
    /// Outlier counts per numeric column; `None` without numeric columns.
    pub outliers: Option<Vec<ColumnCount>>,
    /// Where the summary CSV was written.
    pub summary_path: PathBuf,
    /// Rendered plots.
    pub plots: Vec<PathBuf>,
    /// Where the cleaned dataset was written.
    pub cleaned_path: PathBuf,
}

impl DatasetReport {
    /// Render the console report for this dataset.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Processing dataset: {}", self.name);
        out.push_str(&summary_table(&self.summary));
        out.push_str("Checking for missing values...\n");
        out.push_str(&count_table(&self.missing));
        out.push_str("Checking for outliers...\n");
        if let Some(outliers) = &self.outliers {
            out.push_str(&count_table(outliers));
        }
        let _ = writeln!(out, "Finished processing dataset: {}", self.name);
        out
    }
}

/// Write the summary statistics CSV.
///
/// Header: an empty index label, the statistic names, then `missing`.
/// NaN statistics are written as empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_summary_csv(summary: &[ColumnSummary], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![""];
    header.extend(STATISTIC_NAMES);
    header.push("missing");
    writer.write_record(&header)?;

    for row in summary {
        let mut record = vec![row.column.clone()];
        record.extend(row.statistics().iter().map(|v| format_number(*v)));
        record.push(row.missing.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    debug!("Wrote summary for {} columns to {}", summary.len(), path.display());
    Ok(())
}

/// Format a statistic for CSV output: shortest round-trip text, empty for NaN.
///
/// Exponents carry a sign and at least two digits (`1e+16`, `1.5e-07`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = exponent
                .strip_prefix('-')
                .map_or(("+", exponent), |digits| ("-", digits));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// Fixed-width table of summary statistics, one row per column.
#[must_use]
pub fn summary_table(summary: &[ColumnSummary]) -> String {
    let label_width = summary
        .iter()
        .map(|s| s.column.len())
        .chain(std::iter::once(0))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for name in STATISTIC_NAMES.iter().chain(std::iter::once(&"missing")) {
        let _ = write!(out, " {name:>12}");
    }
    out.push('\n');

    for row in summary {
        let _ = write!(out, "{:<label_width$}", row.column);
        for value in row.statistics() {
            let _ = write!(out, " {:>12}", format_cell(value));
        }
        let _ = writeln!(out, " {:>12}", row.missing);
    }
    out
}

/// Two-column table of per-column counts.
#[must_use]
pub fn count_table(counts: &[ColumnCount]) -> String {
    let width = counts.iter().map(|c| c.column.len()).max().unwrap_or(0);
    let mut out = String::new();
    for c in counts {
        let _ = writeln!(out, "{:<width$} {:>8}", c.column, c.count);
    }
    out
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> Vec<ColumnSummary> {
        vec![
            ColumnSummary::from_values("GHI", &[1.0, 2.0, 3.0, 4.0], 1),
            ColumnSummary::from_values("Comments", &[], 5),
        ]
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(4.0), "4.0");
        assert_eq!(format_number(f64::NAN), "");
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(-2.5e20), "-2.5e+20");
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(1e100), "1e+100");
    }

    #[test]
    fn test_write_summary_csv() {
        let dir = std::env::temp_dir().join(format!("solar_eda_summary_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("summary_t.csv");

        write_summary_csv(&sample_summary(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();

        assert_eq!(lines[0], ",count,mean,std,min,25%,50%,75%,max,missing");
        assert!(lines[1].starts_with("GHI,4.0,2.5,"));
        assert!(lines[1].ends_with(",1.0,1.75,2.5,3.25,4.0,1"));
        assert_eq!(lines[2], "Comments,0.0,,,,,,,,5");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_summary_table_layout() {
        let table = summary_table(&sample_summary());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("count"));
        assert!(lines[0].ends_with("missing"));
        assert!(lines[1].starts_with("GHI"));
        assert!(lines[2].contains("NaN"));
    }

    #[test]
    fn test_render_text_sections() {
        let report = DatasetReport {
            name: "benin-malanville".to_string(),
            rows: 4,
            summary: sample_summary(),
            missing: vec![ColumnCount {
                column: "GHI".to_string(),
                count: 1,
            }],
            outliers: None,
            summary_path: PathBuf::from("s.csv"),
            plots: Vec::new(),
            cleaned_path: PathBuf::from("c.csv"),
        };
        let text = report.render_text();

        assert!(text.starts_with("Processing dataset: benin-malanville\n"));
        assert!(text.contains("Checking for missing values...\nGHI"));
        assert!(text.contains("Checking for outliers...\n"));
        assert!(text.ends_with("Finished processing dataset: benin-malanville\n"));
    }

    #[test]
    fn test_report_serializes() {
        let report = DatasetReport {
            name: "t".to_string(),
            rows: 0,
            summary: Vec::new(),
            missing: Vec::new(),
            outliers: Some(Vec::new()),
            summary_path: PathBuf::from("s.csv"),
            plots: vec![PathBuf::from("p.png")],
            cleaned_path: PathBuf::from("c.csv"),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"plots\":[\"p.png\"]"));
    }
}
