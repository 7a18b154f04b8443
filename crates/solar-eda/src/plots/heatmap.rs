//! Annotated correlation heatmap.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};

use super::colormap::{contrasting_text, coolwarm, format_two_significant, normalize};
use super::{DrawResult, Figure};
use crate::stats::CorrelationMatrix;

const COLORBAR_WIDTH: u32 = 120;
const COLORBAR_STEPS: usize = 100;

/// Pairwise correlation matrix drawn as colored, annotated cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPlot {
    title: String,
    matrix: CorrelationMatrix,
    range: (f64, f64),
}

impl HeatmapPlot {
    /// Build the heatmap for dataset `name`.
    #[must_use]
    pub fn new(name: &str, matrix: CorrelationMatrix) -> Self {
        let range = matrix.finite_range().unwrap_or((-1.0, 1.0));
        Self {
            title: format!("Correlation Matrix: {name}"),
            matrix,
            range,
        }
    }

    /// Fill color for a coefficient; `None` leaves the cell blank.
    #[must_use]
    pub fn cell_color(&self, value: f64) -> Option<RGBColor> {
        value
            .is_finite()
            .then(|| coolwarm(normalize(value, self.range.0, self.range.1)))
    }

    fn draw_colorbar<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        let (lo, hi) = if self.range.1 > self.range.0 {
            self.range
        } else {
            (self.range.0 - 0.5, self.range.1 + 0.5)
        };
        let mut chart = ChartBuilder::on(area)
            .margin_top(60)
            .margin_bottom(100)
            .margin_right(20)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..1f64, lo..hi)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v: &f64| format_two_significant(*v))
            .draw()?;

        let step = (hi - lo) / COLORBAR_STEPS as f64;
        chart.draw_series((0..COLORBAR_STEPS).map(|i| {
            let y0 = lo + step * i as f64;
            let color = coolwarm(normalize(y0 + step / 2.0, lo, hi));
            Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
        }))?;
        Ok(())
    }
}

impl Figure for HeatmapPlot {
    fn size(&self) -> (u32, u32) {
        (1000, 800)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let root = root.titled(&self.title, ("sans-serif", 22))?;
        let (width, _) = root.dim_in_pixel();
        let split = i32::try_from(width.saturating_sub(COLORBAR_WIDTH)).unwrap_or(i32::MAX);
        let (cells, colorbar) = root.split_horizontally(split);

        let n = self.matrix.len();
        let columns = &self.matrix.columns;
        // Row 0 is drawn at the top
        let label = |v: &SegmentValue<usize>, flip: bool| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                let index = if flip { n.checked_sub(i + 1) } else { Some(*i) };
                index
                    .and_then(|i| columns.get(i))
                    .cloned()
                    .unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };

        let mut chart = ChartBuilder::on(&cells)
            .margin(10)
            .x_label_area_size(100)
            .y_label_area_size(100)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_style(label_font(13.0).transform(FontTransform::Rotate90))
            .y_label_style(label_font(13.0))
            .x_label_formatter(&|v| label(v, false))
            .y_label_formatter(&|v| label(v, true))
            .draw()?;

        for row in 0..n {
            let y = n - 1 - row;
            for col in 0..n {
                let value = self.matrix.get(row, col);
                let Some(fill) = self.cell_color(value) else {
                    continue;
                };
                chart.draw_series(std::iter::once(Rectangle::new(
                    [
                        (SegmentValue::Exact(col), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(col + 1), SegmentValue::Exact(y + 1)),
                    ],
                    fill.filled(),
                )))?;
                let style = label_font(12.0)
                    .color(&contrasting_text(fill))
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(std::iter::once(Text::new(
                    format_two_significant(value),
                    (SegmentValue::CenterOf(col), SegmentValue::CenterOf(y)),
                    style,
                )))?;
            }
        }

        self.draw_colorbar(&colorbar)
    }
}

fn label_font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CorrelationMatrix {
        CorrelationMatrix {
            columns: vec!["GHI".to_string(), "DNI".to_string(), "Flat".to_string()],
            values: vec![
                vec![1.0, 0.5, f64::NAN],
                vec![0.5, 1.0, f64::NAN],
                vec![f64::NAN, f64::NAN, f64::NAN],
            ],
        }
    }

    #[test]
    fn test_title() {
        let plot = HeatmapPlot::new("benin-malanville", matrix());
        assert_eq!(plot.title, "Correlation Matrix: benin-malanville");
        assert_eq!(plot.size(), (1000, 800));
    }

    #[test]
    fn test_color_scale_spans_finite_values() {
        let plot = HeatmapPlot::new("t", matrix());
        assert_eq!(plot.range, (0.5, 1.0));
        assert_eq!(plot.cell_color(0.5), Some(coolwarm(0.0)));
        assert_eq!(plot.cell_color(1.0), Some(coolwarm(1.0)));
    }

    #[test]
    fn test_nan_cells_are_blank() {
        let plot = HeatmapPlot::new("t", matrix());
        assert_eq!(plot.cell_color(f64::NAN), None);
    }
}
