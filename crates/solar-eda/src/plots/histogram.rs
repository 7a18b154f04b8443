//! Distribution plots: the wind-speed histogram and the per-column grid.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::{histogram_with_kde, padded_range, DrawResult, Figure, SERIES_BLUE};
use crate::dataset::Dataset;
use crate::stats::distribution::Histogram;

/// Wind speed column.
pub const WIND_SPEED: &str = "WS";

/// Wind direction column; the wind plot needs it alongside [`WIND_SPEED`].
pub const WIND_DIRECTION: &str = "WD";

const GRID_COLUMNS: usize = 3;

/// One histogram with its KDE curve.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPanel {
    /// Panel caption.
    pub title: String,
    /// Variable shown on the x axis.
    pub column: String,
    /// `None` when the column has no values.
    pub histogram: Option<Histogram>,
    /// KDE curve scaled to counts; empty if undefined.
    pub kde: Vec<(f64, f64)>,
}

impl HistogramPanel {
    /// Bin `values` and estimate their density.
    #[must_use]
    pub fn new(title: impl Into<String>, column: impl Into<String>, values: &[f64]) -> Self {
        let (histogram, kde) = match histogram_with_kde(values) {
            Some((h, k)) => (Some(h), k),
            None => (None, Vec::new()),
        };
        Self {
            title: title.into(),
            column: column.into(),
            histogram,
            kde,
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        caption_size: f64,
    ) -> DrawResult<DB> {
        let caption = FontDesc::new(FontFamily::SansSerif, caption_size, FontStyle::Normal);
        let Some(histogram) = &self.histogram else {
            area.titled(&self.title, caption)?;
            return Ok(());
        };

        let (x0, x1) = padded_range(histogram.edges[0], histogram.edges[histogram.edges.len() - 1]);
        let peak = self
            .kde
            .iter()
            .map(|p| p.1)
            .fold(histogram.max_count() as f64, f64::max);
        let y1 = if peak > 0.0 { peak * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, caption)
            .margin(8)
            .x_label_area_size(35)
            .y_label_area_size(55)
            .build_cartesian_2d(x0..x1, 0f64..y1)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_desc(self.column.as_str())
            .y_desc("Count")
            .draw()?;

        chart.draw_series(histogram.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], SERIES_BLUE.mix(0.6).filled())
        }))?;
        if !self.kde.is_empty() {
            chart.draw_series(LineSeries::new(
                self.kde.iter().copied(),
                SERIES_BLUE.stroke_width(2),
            ))?;
        }
        Ok(())
    }
}

/// Wind speed histogram with KDE.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSpeedPlot {
    panel: HistogramPanel,
}

impl WindSpeedPlot {
    /// Build the plot when both wind columns are present.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        if !dataset.has_column(WIND_DIRECTION) {
            return None;
        }
        let speed = dataset.column(WIND_SPEED)?;
        Some(Self {
            panel: HistogramPanel::new(
                format!("Wind Speed Distribution: {}", dataset.name),
                WIND_SPEED,
                &speed.present_values(),
            ),
        })
    }
}

impl Figure for WindSpeedPlot {
    fn size(&self) -> (u32, u32) {
        (800, 800)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        self.panel.draw(root, 22.0)
    }
}

/// One histogram panel per numeric column, three to a row.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramGrid {
    panels: Vec<HistogramPanel>,
}

impl HistogramGrid {
    /// Build a panel for every numeric column.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let panels = dataset
            .numeric_columns()
            .map(|c| {
                HistogramPanel::new(format!("Histogram: {}", c.name), &c.name, &c.present_values())
            })
            .collect();
        Self { panels }
    }

    /// Panels in column order.
    #[must_use]
    pub fn panels(&self) -> &[HistogramPanel] {
        &self.panels
    }

    /// Grid shape as `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.panels.len() / GRID_COLUMNS + 1, GRID_COLUMNS)
    }
}

impl Figure for HistogramGrid {
    fn size(&self) -> (u32, u32) {
        (1500, 1000)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let cells = root.split_evenly(self.shape());
        for (panel, cell) in self.panels.iter().zip(&cells) {
            panel.draw(cell, 16.0)?;
        }
        Ok(())
    }
}
