//! End-to-end analysis run.
//!
//! Output directories are created first and every selected dataset file is
//! checked before any work starts. Each dataset then goes through the same
//! sequence: date parsing, summary, missing values, outliers, plots, cleaning.

use std::path::Path;

use tracing::{debug, info};

use crate::clean::{clean, write_csv};
use crate::config::Config;
use crate::dataset::{load_all, Dataset, DatasetFile};
use crate::error::{Error, Result};
use crate::plots;
use crate::report::{write_summary_csv, DatasetReport};
use crate::stats::{self, OUTLIER_ZSCORE};

/// Run the analysis over the selected datasets (all three when empty).
///
/// # Errors
///
/// Returns an error if an output directory cannot be created, a dataset is
/// missing or malformed, or any output fails to write.
pub fn run(config: &Config, selection: &[DatasetFile]) -> Result<Vec<DatasetReport>> {
    create_output_dirs(config)?;

    let datasets = load_all(&config.paths.data_dir, selection)?;
    info!("Loaded {} datasets from {}", datasets.len(), config.paths.data_dir.display());

    datasets
        .into_iter()
        .map(|dataset| process_dataset(dataset, config))
        .collect()
}

/// Create the output root and its `plots`, `summary` and `processed` children.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] naming the directory that failed.
pub fn create_output_dirs(config: &Config) -> Result<()> {
    for dir in [
        config.paths.output_dir.clone(),
        config.plots_dir(),
        config.summary_dir(),
        config.processed_dir(),
    ] {
        create_dir(&dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

/// Analyze, plot, clean and write one dataset.
///
/// # Errors
///
/// Returns [`Error::DateParse`] for an unparsable date, whether or not plots
/// are enabled, or an error if any output cannot be produced.
pub fn process_dataset(mut dataset: Dataset, config: &Config) -> Result<DatasetReport> {
    let name = dataset.name.clone();
    info!("Processing dataset {} ({} rows)", name, dataset.row_count);

    let times = dataset.timestamps()?;

    let summary = stats::describe(&dataset);
    let summary_path = config.summary_dir().join(format!("summary_{name}.csv"));
    write_summary_csv(&summary, &summary_path)?;

    let missing = stats::missing_values(&dataset);
    let outliers = stats::zscore_outliers(&dataset, OUTLIER_ZSCORE);
    if outliers.is_none() {
        debug!("No numeric columns in {}, outlier check skipped", name);
    }

    let plots = if config.plots.enabled {
        plots::render_all(&dataset, times.as_deref(), config)?
    } else {
        debug!("Plot rendering disabled");
        Vec::new()
    };

    let rows = dataset.row_count;
    clean(&mut dataset);
    let cleaned_path = config.processed_dir().join(format!("cleaned_{name}.csv"));
    write_csv(&dataset, &cleaned_path)?;

    info!(
        "Finished {}: {} plots, cleaned data in {}",
        name,
        plots.len(),
        cleaned_path.display()
    );

    Ok(DatasetReport {
        name,
        rows,
        summary,
        missing,
        outliers,
        summary_path,
        plots,
        cleaned_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;

    fn test_config(tag: &str) -> Config {
        let root = std::env::temp_dir().join(format!("solar_eda_pipeline_{tag}_{}", std::process::id()));
        let mut config = Config::default();
        config.paths.data_dir = root.join("data");
        config.paths.output_dir = root.join("Output");
        config.plots.enabled = false;
        config
    }

    #[test]
    fn test_create_output_dirs() {
        let config = test_config("dirs");
        create_output_dirs(&config).unwrap();
        assert!(config.plots_dir().is_dir());
        assert!(config.summary_dir().is_dir());
        assert!(config.processed_dir().is_dir());

        let _ = std::fs::remove_dir_all(config.paths.output_dir.parent().unwrap());
    }

    #[test]
    fn test_create_dir_failure_names_path() {
        let config = test_config("blocked");
        let root = config.paths.output_dir.parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&root).unwrap();
        // A regular file where the output directory should go
        std::fs::write(&config.paths.output_dir, "").unwrap();

        let err = create_output_dirs(&config).unwrap_err();
        assert!(matches!(err, Error::DirectoryCreate { .. }));
        assert!(err.to_string().contains("Output"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_process_dataset() {
        crate::logging::init_test_logging();
        let config = test_config("process");
        create_output_dirs(&config).unwrap();

        let ds = dataset(
            "site",
            &[
                ("Date", "2021-08-09 00:01,2021-08-09 00:02,2021-08-09 00:03,2021-08-09 00:04"),
                ("GHI", "1,,3,4"),
                ("Tamb", "20,21,22,23"),
                ("Comments", ",,,"),
            ],
        );
        let report = process_dataset(ds, &config).unwrap();

        assert_eq!(report.rows, 4);
        // Date is text; the all-missing Comments column counts as numeric
        assert_eq!(report.summary.len(), 3);
        assert!(report.plots.is_empty());
        assert_eq!(report.missing[0].count, 0);
        assert_eq!(report.missing[1].count, 1);
        assert!(report.summary_path.ends_with("summary/summary_site.csv"));

        let cleaned = std::fs::read_to_string(&report.cleaned_path).unwrap();
        assert_eq!(cleaned, "GHI,Tamb\n1,20\n1,21\n3,22\n4,23\n");

        let _ = std::fs::remove_dir_all(config.paths.output_dir.parent().unwrap());
    }

    #[test]
    fn test_bad_date_fails_without_plots() {
        let config = test_config("bad_date");
        create_output_dirs(&config).unwrap();
        assert!(!config.plots.enabled);

        let ds = dataset("site", &[("Date", "2021-08-09 00:01,yesterday"), ("GHI", "1,2")]);
        let err = process_dataset(ds, &config).unwrap_err();
        assert!(matches!(err, Error::DateParse { row: 2, .. }));
        assert!(!config.processed_dir().join("cleaned_site.csv").exists());

        let _ = std::fs::remove_dir_all(config.paths.output_dir.parent().unwrap());
    }
}
