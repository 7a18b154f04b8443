//! Error types for solar-eda.
//!
//! This module defines all error types used throughout the solar-eda crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for solar-eda operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// A required dataset file does not exist.
    #[error("file not found: {}", path.display())]
    DatasetNotFound {
        /// Full path of the missing file.
        path: PathBuf,
    },

    /// Failed to read or parse a dataset CSV.
    #[error("failed to read dataset {}: {source}", path.display())]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A data row has more fields than the header.
    #[error(
        "malformed row {row} in {}: expected {expected} fields, found {found}",
        path.display()
    )]
    MalformedRow {
        /// Path to the dataset file.
        path: PathBuf,
        /// One-based data row number (header excluded).
        row: usize,
        /// Number of header fields.
        expected: usize,
        /// Number of fields in the row.
        found: usize,
    },

    /// A dataset name was requested that is not part of the registry.
    #[error("unknown dataset '{name}'")]
    UnknownDataset {
        /// The requested name.
        name: String,
    },

    // === Analysis Errors ===
    /// A date cell could not be parsed as a datetime.
    #[error("cannot parse '{value}' in column '{column}' (row {row}) as a date")]
    DateParse {
        /// Name of the date column.
        column: String,
        /// One-based data row number.
        row: usize,
        /// The offending cell text.
        value: String,
    },

    // === Plot Errors ===
    /// Rendering a plot failed.
    #[error("failed to render plot {}: {message}", path.display())]
    Plot {
        /// Destination of the plot.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for solar-eda operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a plot rendering error.
    #[must_use]
    pub fn plot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Plot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an unknown dataset error.
    #[must_use]
    pub fn unknown_dataset(name: impl Into<String>) -> Self {
        Self::UnknownDataset { name: name.into() }
    }

    /// Check if this error is a missing input file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatasetNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_not_found_display() {
        let err = Error::DatasetNotFound {
            path: PathBuf::from("/data/benin-malanville.csv"),
        };
        assert_eq!(
            err.to_string(),
            "file not found: /data/benin-malanville.csv"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_not_found_false_for_other_errors() {
        assert!(!Error::unknown_dataset("x").is_not_found());
    }

    #[test]
    fn test_malformed_row_display() {
        let err = Error::MalformedRow {
            path: PathBuf::from("a.csv"),
            row: 7,
            expected: 3,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("a.csv"));
        assert!(msg.contains("row 7"));
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("found 5"));
    }

    #[test]
    fn test_plot_error() {
        let err = Error::plot("/out/plots/x.png", "backend failure");
        let msg = err.to_string();
        assert!(msg.contains("/out/plots/x.png"));
        assert!(msg.contains("backend failure"));
    }

    #[test]
    fn test_date_parse_display() {
        let err = Error::DateParse {
            column: "Date".to_string(),
            row: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse 'yesterday' in column 'Date' (row 3) as a date"
        );
    }

    #[test]
    fn test_unknown_dataset_display() {
        let err = Error::unknown_dataset("mars-olympus");
        assert_eq!(err.to_string(), "unknown dataset 'mars-olympus'");
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("output_dir must not be empty");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden"));
        assert!(msg.contains("access denied"));
    }
}
