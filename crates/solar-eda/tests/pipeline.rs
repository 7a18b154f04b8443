//! End-to-end runs of the analysis pipeline over synthetic site files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use solar_eda::plots::PlotFormat;
use solar_eda::{pipeline, Config, DatasetFile, Error};

const ROWS: usize = 21;

/// Twenty calm readings and a GHI spike in the last row. Row 3 is missing
/// its GHI value and only the first row carries a comment.
fn site_csv() -> String {
    let mut csv = String::from("Date,GHI,DNI,DHI,Tamb,WS,WD,RH,Comments\n");
    for row in 0..ROWS {
        let ghi = match row {
            3 => String::new(),
            r if r == ROWS - 1 => "1000".to_string(),
            _ => "10".to_string(),
        };
        let comment = if row == 0 { "sensor cleaned" } else { "" };
        writeln!(
            csv,
            "2021-08-09 00:{:02},{ghi},{},{},25.{},{}.5,{},{},{comment}",
            row + 1,
            row * 2,
            row % 4,
            row % 10,
            row % 3,
            row * 10,
            40 + row,
        )
        .unwrap();
    }
    csv
}

fn setup(tag: &str) -> (PathBuf, Config) {
    let root = std::env::temp_dir().join(format!("solar_eda_it_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let data = root.join("data");
    std::fs::create_dir_all(&data).unwrap();
    for file in DatasetFile::ALL {
        std::fs::write(file.path_in(&data), site_csv()).unwrap();
    }

    let mut config = Config::default();
    config.paths.data_dir = data;
    config.paths.output_dir = root.join("Output");
    config.plots.enabled = false;
    (root, config)
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_full_run_writes_every_output() {
    let (root, config) = setup("full");

    let reports = pipeline::run(&config, &[]).unwrap();
    let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["benin-malanville", "sierraleone-bumbuna", "togo-dapaong_qc"]
    );

    for report in &reports {
        assert_eq!(report.rows, ROWS);
        assert!(report.plots.is_empty());

        let summary = read_lines(&report.summary_path);
        assert_eq!(summary[0], ",count,mean,std,min,25%,50%,75%,max,missing");
        let ghi = summary.iter().find(|l| l.starts_with("GHI,")).unwrap();
        assert!(ghi.starts_with("GHI,20.0,"));
        assert!(ghi.ends_with(",1"));
        assert!(
            !summary.iter().any(|l| l.starts_with("Date,") || l.starts_with("Comments,")),
            "text columns are not summarized"
        );

        let cleaned = read_lines(&report.cleaned_path);
        assert_eq!(cleaned[0], "GHI,DNI,DHI,Tamb,WS,WD,RH");
        assert_eq!(cleaned.len(), ROWS + 1);
        assert!(cleaned.iter().all(|l| !l.contains(",,") && !l.ends_with(',')));
        // Row 3's GHI is forward-filled from row 2
        assert!(cleaned[4].starts_with("10,6,"));
    }

    let missing = &reports[0].missing;
    let count = |name: &str| missing.iter().find(|c| c.column == name).unwrap().count;
    assert_eq!(count("GHI"), 1);
    assert_eq!(count("Comments"), ROWS - 1);
    assert_eq!(count("Tamb"), 0);

    // Comments is text, so GHI is scored over the 20 complete rows
    let outliers = reports[0].outliers.as_ref().unwrap();
    let ghi = outliers.iter().find(|c| c.column == "GHI").unwrap();
    assert_eq!(ghi.count, 1);

    let text = reports[0].render_text();
    assert!(text.starts_with("Processing dataset: benin-malanville\n"));
    assert!(text.ends_with("Finished processing dataset: benin-malanville\n"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_missing_file_aborts_before_processing() {
    let (root, config) = setup("missing");
    std::fs::remove_file(DatasetFile::SierraLeoneBumbuna.path_in(&config.paths.data_dir)).unwrap();

    let err = pipeline::run(&config, &[]).unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound { .. }));
    assert!(err.is_not_found());

    // Nothing was written for the datasets that did exist
    let written = std::fs::read_dir(config.summary_dir()).unwrap().count();
    assert_eq!(written, 0);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_selection_limits_run() {
    let (root, config) = setup("selection");

    let reports = pipeline::run(&config, &[DatasetFile::TogoDapaongQc]).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(config
        .processed_dir()
        .join("cleaned_togo-dapaong_qc.csv")
        .exists());
    assert!(!config
        .processed_dir()
        .join("cleaned_benin-malanville.csv")
        .exists());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_json_report() {
    let (root, config) = setup("json");

    let reports = pipeline::run(&config, &[DatasetFile::BeninMalanville]).unwrap();
    let json: serde_json::Value = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["name"], "benin-malanville");
    assert_eq!(json[0]["rows"], ROWS);
    assert!(json[0]["summary"].as_array().unwrap().len() >= 7);

    let _ = std::fs::remove_dir_all(&root);
}

fn plot_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_svg_plots_follow_available_columns() {
    let (root, mut config) = setup("svg");
    config.plots.enabled = true;
    config.plots.format = PlotFormat::Svg;

    // No Date and no WD; only two bubble variables
    let mut short = String::from("GHI,WS\n");
    // Date present but no irradiance or temperature series
    let mut wind_only = String::from("Date,WS,WD\n");
    for row in 0..ROWS {
        writeln!(short, "{},{}.5", row * 3, row % 4).unwrap();
        writeln!(wind_only, "2021-08-09 00:{:02},{}.5,{}", row + 1, row % 4, row * 10).unwrap();
    }
    let data = &config.paths.data_dir;
    std::fs::write(DatasetFile::SierraLeoneBumbuna.path_in(data), short).unwrap();
    std::fs::write(DatasetFile::TogoDapaongQc.path_in(data), wind_only).unwrap();

    let reports = pipeline::run(&config, &[]).unwrap();

    assert_eq!(
        plot_names(&reports[0].plots),
        vec![
            "time_series_benin-malanville.svg",
            "correlation_matrix_benin-malanville.svg",
            "wind_speed_distribution_benin-malanville.svg",
            "histograms_benin-malanville.svg",
            "bubble_chart_benin-malanville.svg",
        ]
    );
    assert_eq!(
        plot_names(&reports[1].plots),
        vec![
            "correlation_matrix_sierraleone-bumbuna.svg",
            "histograms_sierraleone-bumbuna.svg",
        ]
    );
    assert_eq!(
        plot_names(&reports[2].plots),
        vec![
            "correlation_matrix_togo-dapaong_qc.svg",
            "wind_speed_distribution_togo-dapaong_qc.svg",
            "histograms_togo-dapaong_qc.svg",
        ]
    );

    for path in reports.iter().flat_map(|r| &r.plots) {
        assert!(path.starts_with(config.plots_dir()));
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG document", path.display());
    }

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_bad_date_fails_with_plots_disabled() {
    let (root, config) = setup("bad_date");
    let path = DatasetFile::BeninMalanville.path_in(&config.paths.data_dir);
    std::fs::write(&path, "Date,GHI\nyesterday,1\n2021-08-09 00:02,2\n").unwrap();

    let err = pipeline::run(&config, &[DatasetFile::BeninMalanville]).unwrap_err();
    assert!(matches!(err, Error::DateParse { row: 1, .. }));
    assert!(!config
        .processed_dir()
        .join("cleaned_benin-malanville.csv")
        .exists());

    let _ = std::fs::remove_dir_all(&root);
}
