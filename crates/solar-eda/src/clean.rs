//! Cleaning pass: drop the comment and timestamp columns, then forward/backward fill.

use std::path::Path;

use tracing::debug;

use crate::dataset::{Column, Dataset, DATE_COLUMN};
use crate::error::Result;

/// Columns removed before filling. The timestamp serves as the row index and
/// is not written to the cleaned file.
pub const DROPPED_COLUMNS: &[&str] = &["Comments", DATE_COLUMN];

/// Drop [`DROPPED_COLUMNS`], then forward-fill and backward-fill every column.
///
/// A column that is entirely missing stays missing.
pub fn clean(dataset: &mut Dataset) {
    for name in DROPPED_COLUMNS {
        if dataset.drop_column(name).is_some() {
            debug!("Dropped column {} from {}", name, dataset.name);
        }
    }

    for column in &mut dataset.columns {
        forward_fill(column);
        backward_fill(column);
    }
}

fn forward_fill(column: &mut Column) {
    let mut last: Option<usize> = None;
    for row in 0..column.len() {
        if column.cells[row].is_some() {
            last = Some(row);
        } else if let Some(src) = last {
            copy_cell(column, src, row);
        }
    }
}

fn backward_fill(column: &mut Column) {
    let mut next: Option<usize> = None;
    for row in (0..column.len()).rev() {
        if column.cells[row].is_some() {
            next = Some(row);
        } else if let Some(src) = next {
            copy_cell(column, src, row);
        }
    }
}

fn copy_cell(column: &mut Column, src: usize, dst: usize) {
    column.cells[dst] = column.cells[src].clone();
    if let Some(values) = column.values.as_mut() {
        values[dst] = values[src];
    }
}

/// Write the dataset as CSV (header row, no index column).
///
/// Missing cells are written as empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(dataset.columns.iter().map(|c| c.name.as_str()))?;

    for row in 0..dataset.row_count {
        writer.write_record(
            dataset
                .columns
                .iter()
                .map(|c| c.cells[row].as_deref().unwrap_or("")),
        )?;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", dataset.row_count, path.display());
    Ok(())
}
