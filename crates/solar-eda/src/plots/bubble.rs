//! Bubble chart of two variables sized and colored by a third.

use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{normalize, rocket};
use super::{padded_range, DrawResult, Figure};
use crate::dataset::Dataset;

/// Candidate variables, in priority order: x, y, then size and hue.
pub const BUBBLE_COLUMNS: [&str; 4] = ["GHI", "Tamb", "WS", "RH"];

/// Marker area range in square points.
const MIN_AREA: f64 = 40.0;
const MAX_AREA: f64 = 400.0;

const PIXELS_PER_POINT: f64 = 100.0 / 72.0;

const LEGEND_ENTRIES: usize = 3;

/// Scatter of `x` against `y`, one bubble per complete row.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePlot {
    title: String,
    x: String,
    y: String,
    size: String,
    points: Vec<[f64; 3]>,
    size_range: (f64, f64),
}

impl BubblePlot {
    /// Build the chart from the first three present [`BUBBLE_COLUMNS`].
    ///
    /// Rows missing any of the three values are skipped. With `limit`, the
    /// remaining rows are thinned by an even stride to at most that many.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset, limit: Option<usize>) -> Option<Self> {
        let columns: Vec<_> = BUBBLE_COLUMNS
            .iter()
            .filter_map(|name| {
                let column = dataset.column(name)?;
                Some((column.name.clone(), column.values.as_ref()?))
            })
            .take(3)
            .collect();
        let [(x, xs), (y, ys), (size, ss)] = <[_; 3]>::try_from(columns).ok()?;

        let complete: Vec<[f64; 3]> = xs
            .iter()
            .zip(ys)
            .zip(ss)
            .filter_map(|((x, y), s)| Some([(*x)?, (*y)?, (*s)?]))
            .collect();
        let points = thin(complete, limit);

        let size_range = points
            .iter()
            .map(|p| p[2])
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0));

        Some(Self {
            title: format!("Bubble Chart: {}", dataset.name),
            x,
            y,
            size,
            points,
            size_range,
        })
    }

    /// Number of bubbles drawn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no row had all three values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Marker radius in pixels for a size-variable value.
    #[must_use]
    pub fn marker_radius(&self, value: f64) -> u32 {
        let t = normalize(value, self.size_range.0, self.size_range.1);
        radius_for_area(MIN_AREA + t * (MAX_AREA - MIN_AREA))
    }

    fn marker_color(&self, value: f64) -> RGBColor {
        rocket(normalize(value, self.size_range.0, self.size_range.1))
    }

    fn axis_range(&self, index: usize) -> (f64, f64) {
        let (lo, hi) = self
            .points
            .iter()
            .map(|p| p[index])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        padded_range(lo, hi)
    }
}

impl Figure for BubblePlot {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let (x0, x1) = self.axis_range(0);
        let (y0, y1) = self.axis_range(1);
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x.as_str())
            .y_desc(self.y.as_str())
            .draw()?;

        chart.draw_series(self.points.iter().map(|&[x, y, s]| {
            Circle::new(
                (x, y),
                self.marker_radius(s),
                self.marker_color(s).mix(0.6).filled(),
            )
        }))?;

        if self.points.is_empty() {
            return Ok(());
        }
        let (lo, hi) = self.size_range;
        let steps = if hi > lo { LEGEND_ENTRIES } else { 1 };
        for i in 0..steps {
            let value = if steps == 1 {
                lo
            } else {
                lo + (hi - lo) * i as f64 / (steps - 1) as f64
            };
            let radius = self.marker_radius(value);
            let color = self.marker_color(value);
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), u32>>())?
                .label(format!("{} = {value:.1}", self.size))
                .legend(move |(x, y)| Circle::new((x + 10, y), radius, color.mix(0.6).filled()));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }
}

/// Radius in pixels of a marker whose area is `area` square points.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn radius_for_area(area: f64) -> u32 {
    (area.sqrt() * PIXELS_PER_POINT / 2.0).round().max(1.0) as u32
}

/// Keep every `ceil(len / limit)`-th point when over `limit`.
fn thin<T>(points: Vec<T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(limit) if limit > 0 && points.len() > limit => {
            let stride = points.len().div_ceil(limit);
            points.into_iter().step_by(stride).collect()
        }
        _ => points,
    }
}
