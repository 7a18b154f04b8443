//! `solar-eda` - Exploratory data analysis for solar irradiance datasets
//!
//! This library loads the measurement CSVs of three solar sites, computes
//! summary statistics, missing-value and outlier counts, renders a fixed set
//! of plots, and writes forward/backward-filled copies of the data.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod clean;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plots;
pub mod report;
pub mod stats;

pub use config::Config;
pub use dataset::{Dataset, DatasetFile};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use report::DatasetReport;
