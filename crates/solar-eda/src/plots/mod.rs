//! The fixed visualization battery.
//!
//! Every plot implements [`Figure`], which draws onto any plotters backend.
//! [`save`] picks the bitmap or SVG backend from the configured
//! [`PlotFormat`], and [`render_all`] decides which plots apply to a dataset.

mod bubble;
pub mod colormap;
mod heatmap;
mod histogram;
mod time_series;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::dataset::{Dataset, DATE_COLUMN};
use crate::error::{Error, Result};
use crate::stats::{self, distribution::Histogram};

pub use bubble::{BubblePlot, BUBBLE_COLUMNS};
pub use heatmap::HeatmapPlot;
pub use histogram::{HistogramGrid, HistogramPanel, WindSpeedPlot, WIND_DIRECTION, WIND_SPEED};
pub use time_series::{TimeSeriesPlot, TIME_SERIES_COLUMNS};

/// Result of drawing onto a backend.
pub type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotFormat {
    /// Bitmap PNG.
    #[default]
    Png,
    /// Scalable vector graphics.
    Svg,
}

impl PlotFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl std::fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A plot that can draw itself onto any backend.
pub trait Figure {
    /// Canvas size in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw the whole figure onto `root`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if drawing fails.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB>;
}

/// Render `figure` to `path` in the given format.
///
/// # Errors
///
/// Returns [`Error::Plot`] if drawing or writing the image fails.
pub fn save(figure: &impl Figure, path: &Path, format: PlotFormat) -> Result<()> {
    let outcome = match format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
            figure
                .draw(&root)
                .and_then(|()| root.present())
                .map_err(|e| e.to_string())
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(path, figure.size()).into_drawing_area();
            figure
                .draw(&root)
                .and_then(|()| root.present())
                .map_err(|e| e.to_string())
        }
    };
    outcome.map_err(|message| Error::plot(path, message))?;
    debug!("Saved plot {}", path.display());
    Ok(())
}

/// `<dir>/<stem>_<name>.<ext>`
#[must_use]
pub fn plot_path(dir: &Path, stem: &str, name: &str, format: PlotFormat) -> PathBuf {
    dir.join(format!("{stem}_{name}.{}", format.extension()))
}

/// Render every plot that applies to `dataset` into the plots directory.
///
/// `times` holds the parsed [`DATE_COLUMN`], if the dataset has one.
/// Returns the paths written, in rendering order.
///
/// # Errors
///
/// Returns an error if a plot fails to render.
pub fn render_all(
    dataset: &Dataset,
    times: Option<&[Option<NaiveDateTime>]>,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let dir = config.plots_dir();
    let format = config.plots.format;
    let name = dataset.name.as_str();
    let mut written = Vec::new();

    match times.map(|times| TimeSeriesPlot::from_dataset(dataset, times)) {
        Some(Some(plot)) => {
            let path = plot_path(&dir, "time_series", name, format);
            save(&plot, &path, format)?;
            written.push(path);
        }
        Some(None) => warn!("No numeric data to plot over time in {}, skipping time series", name),
        None => debug!("No {} column in {}, skipping time series", DATE_COLUMN, name),
    }

    let correlation = stats::correlation_matrix(dataset);
    if correlation.is_empty() {
        warn!("No numeric columns in {}, skipping correlation matrix", name);
    } else {
        let path = plot_path(&dir, "correlation_matrix", name, format);
        save(&HeatmapPlot::new(name, correlation), &path, format)?;
        written.push(path);
    }

    if let Some(plot) = WindSpeedPlot::from_dataset(dataset) {
        let path = plot_path(&dir, "wind_speed_distribution", name, format);
        save(&plot, &path, format)?;
        written.push(path);
    }

    let path = plot_path(&dir, "histograms", name, format);
    save(&HistogramGrid::from_dataset(dataset), &path, format)?;
    written.push(path);

    match BubblePlot::from_dataset(dataset, config.bubble_point_limit()) {
        Some(plot) => {
            let path = plot_path(&dir, "bubble_chart", name, format);
            save(&plot, &path, format)?;
            written.push(path);
        }
        None => debug!("Fewer than three bubble variables in {}, skipping", name),
    }

    Ok(written)
}

/// Default single-series color (matplotlib `tab:blue`).
pub(crate) const SERIES_BLUE: RGBColor = RGBColor(31, 119, 180);

/// Matplotlib's default color cycle.
pub(crate) const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Histogram with an optional KDE overlay, ready to draw into a panel.
pub(crate) fn histogram_with_kde(values: &[f64]) -> Option<(Histogram, Vec<(f64, f64)>)> {
    let histogram = Histogram::auto(values)?;
    let kde = stats::distribution::gaussian_kde(values, histogram.bin_width());
    Some((histogram, kde))
}

/// Pad a degenerate axis range so plotters can build a coordinate system.
pub(crate) fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if hi > lo {
        let pad = (hi - lo) * 0.02;
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}
