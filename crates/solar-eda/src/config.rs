//! Configuration management for solar-eda.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::plots::PlotFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the user config dir.
const APP_DIR_NAME: &str = "solar-eda";

/// Prefix for configuration environment variables.
const ENV_PREFIX: &str = "SOLAR_EDA_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SOLAR_EDA_`, `__` between sections)
/// 2. TOML config file at `~/.config/solar-eda/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Plot rendering configuration.
    pub plots: PlotsConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw dataset CSVs.
    pub data_dir: PathBuf,
    /// Root of the output tree (`plots/`, `summary/`, `processed/`).
    pub output_dir: PathBuf,
}

/// Plot rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotsConfig {
    /// Render plots at all.
    pub enabled: bool,
    /// Image format for every plot.
    pub format: PlotFormat,
    /// Maximum number of markers in the bubble chart.
    /// Set to 0 for unlimited.
    pub max_bubble_points: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("Output"),
        }
    }
}

impl Default for PlotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: PlotFormat::Png,
            max_bubble_points: 0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate one configuration file, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the file is missing, or any
    /// error from [`Config::load_from`].
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_validation(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.paths.data_dir.as_os_str().is_empty() {
            return Err(Error::config_validation("data_dir must not be empty"));
        }

        if self.paths.output_dir.as_os_str().is_empty() {
            return Err(Error::config_validation("output_dir must not be empty"));
        }

        // Cleaned CSVs would land next to (and be confused with) the raw inputs
        if self.paths.output_dir == self.paths.data_dir {
            return Err(Error::config_validation(format!(
                "output_dir cannot be the same as data_dir ({})",
                self.paths.data_dir.display()
            )));
        }

        Ok(())
    }

    /// Directory for rendered plots.
    #[must_use]
    pub fn plots_dir(&self) -> PathBuf {
        self.paths.output_dir.join("plots")
    }

    /// Directory for summary statistics CSVs.
    #[must_use]
    pub fn summary_dir(&self) -> PathBuf {
        self.paths.output_dir.join("summary")
    }

    /// Directory for cleaned datasets.
    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.paths.output_dir.join("processed")
    }

    /// Bubble chart point cap, `None` when unlimited.
    #[must_use]
    pub fn bubble_point_limit(&self) -> Option<usize> {
        match self.plots.max_bubble_points {
            0 => None,
            n => Some(n),
        }
    }
}
