//! Dataset registry and CSV loading.
//!
//! The analysis runs over a fixed set of three solar-sensor files. Each file
//! is loaded into a column-oriented [`Dataset`] that keeps the raw cell text
//! (so cleaned output reproduces the input formatting) alongside a parsed
//! numeric view for columns where every present cell is a number.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Cell texts treated as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column holding the measurement timestamp.
pub const DATE_COLUMN: &str = "Date";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp in any of the accepted layouts.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One of the fixed input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetFile {
    /// Malanville, Benin.
    BeninMalanville,
    /// Bumbuna, Sierra Leone.
    SierraLeoneBumbuna,
    /// Dapaong, Togo (quality-controlled).
    TogoDapaongQc,
}

impl DatasetFile {
    /// Every dataset, in processing order.
    pub const ALL: [DatasetFile; 3] = [
        Self::BeninMalanville,
        Self::SierraLeoneBumbuna,
        Self::TogoDapaongQc,
    ];

    /// File name inside the data directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::BeninMalanville => "benin-malanville.csv",
            Self::SierraLeoneBumbuna => "sierraleone-bumbuna.csv",
            Self::TogoDapaongQc => "togo-dapaong_qc.csv",
        }
    }

    /// Dataset name: the file name up to its first `.`.
    #[must_use]
    pub fn name(self) -> &'static str {
        let file = self.file_name();
        file.split('.').next().unwrap_or(file)
    }

    /// Full path of this dataset under `data_dir`.
    #[must_use]
    pub fn path_in(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    /// Look up a dataset by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDataset`] if no dataset has that name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| Error::unknown_dataset(name))
    }
}

impl std::fmt::Display for DatasetFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single column of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header name (deduplicated).
    pub name: String,
    /// Raw cell text, `None` for missing cells.
    pub cells: Vec<Option<String>>,
    /// Parsed values when the column is numeric.
    pub values: Option<Vec<Option<f64>>>,
}

impl Column {
    /// Build a column from raw cells, inferring whether it is numeric.
    #[must_use]
    pub fn from_cells(name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        let values = cells
            .iter()
            .map(|cell| match cell {
                None => Some(None),
                Some(text) => text.trim().parse::<f64>().ok().map(Some),
            })
            .collect::<Option<Vec<_>>>();

        Self {
            name: name.into(),
            cells,
            values,
        }
    }

    /// Whether every present cell parsed as a number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.values.is_some()
    }

    /// Number of missing cells.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Present numeric values, in row order.
    #[must_use]
    pub fn present_values(&self) -> Vec<f64> {
        self.values
            .as_ref()
            .map(|values| values.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Dataset name (used in output file names and titles).
    pub name: String,
    /// Columns in header order.
    pub columns: Vec<Column>,
    /// Number of data rows.
    pub row_count: usize,
}

impl Dataset {
    /// Load a headered CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetNotFound`] if the file does not exist,
    /// [`Error::DatasetRead`] on CSV errors, and [`Error::MalformedRow`] when a
    /// row has more fields than the header.
    pub fn load(path: &Path, name: impl Into<String>) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let read_err = |source| Error::DatasetRead {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(read_err)?;

        let headers = dedup_headers(reader.headers().map_err(read_err)?.iter());
        let width = headers.len();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(read_err)?;
            if record.len() > width {
                return Err(Error::MalformedRow {
                    path: path.to_path_buf(),
                    row: index + 1,
                    expected: width,
                    found: record.len(),
                });
            }
            for (column, slot) in cells.iter_mut().enumerate() {
                slot.push(record.get(column).and_then(normalize_cell));
            }
        }

        let dataset = Self::from_columns(
            name,
            headers
                .into_iter()
                .zip(cells)
                .map(|(header, column)| Column::from_cells(header, column))
                .collect(),
        );

        info!(
            "Loaded {} ({} rows, {} columns) from {}",
            dataset.name,
            dataset.row_count,
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Assemble a dataset from prepared columns.
    #[must_use]
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let row_count = columns.first().map_or(0, Column::len);
        Self {
            name: name.into(),
            columns,
            row_count,
        }
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric columns in header order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// The subset of `names` present in this dataset, in the given order.
    #[must_use]
    pub fn present<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| self.has_column(name))
            .collect()
    }

    /// Parse the [`DATE_COLUMN`], or `None` when the dataset has none.
    ///
    /// Missing cells stay `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateParse`] for the first present cell that matches
    /// none of the accepted layouts.
    pub fn timestamps(&self) -> Result<Option<Vec<Option<NaiveDateTime>>>> {
        let Some(date) = self.column(DATE_COLUMN) else {
            return Ok(None);
        };

        date.cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(text) => parse_timestamp(text)
                    .map(Some)
                    .ok_or_else(|| Error::DateParse {
                        column: DATE_COLUMN.to_string(),
                        row: row + 1,
                        value: text.clone(),
                    }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Remove a column, returning it if it existed.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(index))
    }
}

/// Load the selected datasets (all of them for an empty selection) from `data_dir`.
///
/// All files are checked for existence before any of them is parsed, so a
/// missing file aborts the run without partial work.
///
/// # Errors
///
/// Returns [`Error::DatasetNotFound`] for the first missing file, or any
/// error from [`Dataset::load`].
pub fn load_all(data_dir: &Path, selection: &[DatasetFile]) -> Result<Vec<Dataset>> {
    let files: Vec<DatasetFile> = DatasetFile::ALL
        .into_iter()
        .filter(|file| selection.is_empty() || selection.contains(file))
        .collect();

    for file in &files {
        let path = file.path_in(data_dir);
        if !path.exists() {
            return Err(Error::DatasetNotFound { path });
        }
    }

    files
        .into_iter()
        .map(|file| {
            debug!("Reading dataset {}", file);
            Dataset::load(&file.path_in(data_dir), file.name())
        })
        .collect()
}

fn normalize_cell(raw: &str) -> Option<String> {
    if NA_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
fn dedup_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{header}.{count}");
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }
    names
}
