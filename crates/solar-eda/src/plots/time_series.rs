//! Irradiance and temperature over time.

use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{padded_range, DrawResult, Figure, TAB10};
use crate::dataset::{Dataset, DATE_COLUMN};

/// Series drawn against time, when present.
pub const TIME_SERIES_COLUMNS: [&str; 4] = ["GHI", "DNI", "DHI", "Tamb"];

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One named line, split wherever a timestamp or value is missing.
#[derive(Debug, Clone, PartialEq)]
struct Series {
    name: String,
    segments: Vec<Vec<(f64, f64)>>,
}

/// Line plot of [`TIME_SERIES_COLUMNS`] against [`DATE_COLUMN`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPlot {
    title: String,
    series: Vec<Series>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl TimeSeriesPlot {
    /// Build the plot from parsed `times`, one per row.
    ///
    /// Returns `None` when none of [`TIME_SERIES_COLUMNS`] is a numeric column.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset, times: &[Option<NaiveDateTime>]) -> Option<Self> {
        let times: Vec<Option<f64>> = times.iter().map(|t| t.map(epoch_seconds)).collect();

        let series: Vec<Series> = dataset
            .present(&TIME_SERIES_COLUMNS)
            .into_iter()
            .filter_map(|name| {
                let values = dataset.column(name)?.values.as_ref()?;
                Some(Series {
                    name: name.to_string(),
                    segments: segments(&times, values),
                })
            })
            .collect();
        if series.is_empty() {
            return None;
        }

        let points = || series.iter().flat_map(|s| s.segments.iter().flatten());
        let x_range = bounds(points().map(|p| p.0))
            .or_else(|| bounds(times.iter().flatten().copied()))
            .unwrap_or((0.0, 1.0));
        let y_range = bounds(points().map(|p| p.1)).unwrap_or((0.0, 1.0));

        Some(Self {
            title: format!("Time Series Analysis: {}", dataset.name),
            series,
            x_range: padded_range(x_range.0, x_range.1),
            y_range: padded_range(y_range.0, y_range.1),
        })
    }

    /// Names of the plotted series.
    #[must_use]
    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Total number of plotted points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| &s.segments)
            .map(Vec::len)
            .sum()
    }
}

impl Figure for TimeSeriesPlot {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        let span = x1 - x0;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(6)
            .x_label_formatter(&|x: &f64| format_tick(*x, span))
            .x_desc(DATE_COLUMN)
            .draw()?;

        for (series, &color) in self.series.iter().zip(TAB10.iter().cycle()) {
            for segment in &series.segments {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
            }
            chart
                .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), &color))?
                .label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        if !self.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }
}

fn epoch_seconds(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

/// Split paired samples into runs where both time and value are present.
fn segments(times: &[Option<f64>], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (t, v) in times.iter().zip(values) {
        if let (Some(t), Some(v)) = (t, v) {
            current.push((*t, *v));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Axis label for an epoch-seconds tick; dates only for spans over two days.
#[allow(clippy::cast_possible_truncation)]
fn format_tick(seconds: f64, span: f64) -> String {
    let fmt = if span > 2.0 * SECONDS_PER_DAY {
        "%Y-%m-%d"
    } else {
        "%m-%d %H:%M"
    };
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|t| t.format(fmt).to_string())
        .unwrap_or_default()
}
