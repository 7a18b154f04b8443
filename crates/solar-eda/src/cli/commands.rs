//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;
use crate::dataset::DatasetFile;
use crate::error::Result;
use crate::plots::PlotFormat;

/// Run command arguments.
#[derive(Debug, Default, Args)]
pub struct RunCommand {
    /// Only process this dataset (repeatable, e.g. benin-malanville)
    #[arg(short, long, value_name = "NAME")]
    pub dataset: Vec<String>,

    /// Directory containing the input CSV files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving plots, summaries and cleaned data
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip plot rendering
    #[arg(long)]
    pub no_plots: bool,

    /// Image format for plots
    #[arg(short, long, value_enum)]
    pub format: Option<PlotFormatArg>,

    /// Output reports as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl RunCommand {
    /// Overlay command-line overrides onto the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir.clone_from(dir);
        }
        if let Some(dir) = &self.output_dir {
            config.paths.output_dir.clone_from(dir);
        }
        if self.no_plots {
            config.plots.enabled = false;
        }
        if let Some(format) = self.format {
            config.plots.format = format.into();
        }
        config.validate()
    }

    /// Resolve `--dataset` names; empty means every dataset.
    ///
    /// # Errors
    ///
    /// Returns an error for a name that matches no dataset.
    pub fn selection(&self) -> Result<Vec<DatasetFile>> {
        self.dataset
            .iter()
            .map(|name| DatasetFile::from_name(name))
            .collect()
    }
}

/// Datasets command arguments.
#[derive(Debug, Args)]
pub struct DatasetsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Plot format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotFormatArg {
    /// PNG bitmaps
    Png,
    /// SVG vector images
    Svg,
}

impl From<PlotFormatArg> for PlotFormat {
    fn from(arg: PlotFormatArg) -> Self {
        match arg {
            PlotFormatArg::Png => Self::Png,
            PlotFormatArg::Svg => Self::Svg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_format_arg_conversion() {
        assert_eq!(PlotFormat::from(PlotFormatArg::Png), PlotFormat::Png);
        assert_eq!(PlotFormat::from(PlotFormatArg::Svg), PlotFormat::Svg);
    }

    #[test]
    fn test_apply_overrides() {
        let cmd = RunCommand {
            data_dir: Some(PathBuf::from("/srv/solar")),
            output_dir: Some(PathBuf::from("/tmp/out")),
            no_plots: true,
            format: Some(PlotFormatArg::Svg),
            ..RunCommand::default()
        };
        let mut config = Config::default();
        cmd.apply(&mut config).unwrap();

        assert_eq!(config.paths.data_dir, PathBuf::from("/srv/solar"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.plots.enabled);
        assert_eq!(config.plots.format, PlotFormat::Svg);
    }

    #[test]
    fn test_apply_without_overrides_keeps_config() {
        let mut config = Config::default();
        RunCommand::default().apply(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_apply_rejects_same_dirs() {
        let cmd = RunCommand {
            output_dir: Some(PathBuf::from("data")),
            ..RunCommand::default()
        };
        let mut config = Config::default();
        assert!(cmd.apply(&mut config).is_err());
    }

    #[test]
    fn test_selection() {
        let cmd = RunCommand {
            dataset: vec!["togo-dapaong_qc".to_string()],
            ..RunCommand::default()
        };
        assert_eq!(cmd.selection().unwrap(), vec![DatasetFile::TogoDapaongQc]);
        assert!(RunCommand::default().selection().unwrap().is_empty());

        let bad = RunCommand {
            dataset: vec!["mars".to_string()],
            ..RunCommand::default()
        };
        assert!(bad.selection().is_err());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
