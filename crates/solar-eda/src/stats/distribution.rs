//! Histogram binning and kernel density estimation.
//!
//! Bin widths follow numpy's `auto` rule (the smaller of the Sturges and
//! Freedman-Diaconis estimates). The KDE is a Gaussian kernel with Scott's
//! bandwidth, evaluated from a fine pre-binned histogram so that samples of
//! several hundred thousand readings stay cheap.

use super::{quantile_sorted, sample_std};

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 500;

/// Number of points on the KDE evaluation grid.
pub const KDE_GRID_POINTS: usize = 200;

/// Bins used to pre-aggregate the sample before kernel evaluation.
const KDE_PREBINS: usize = 1024;

/// Equal-width histogram of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` using the `auto` rule. `None` for an empty sample.
    #[must_use]
    pub fn auto(values: &[f64]) -> Option<Self> {
        let edges = histogram_bins(values)?;
        Some(Self::with_edges(values, edges))
    }

    /// Count `values` into the given equal-width edges.
    ///
    /// The last bin is closed on the right.
    #[must_use]
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0; bins];
        if bins > 0 {
            let lo = edges[0];
            let hi = edges[bins];
            let width = (hi - lo) / bins as f64;
            for &v in values {
                if v < lo || v > hi {
                    continue;
                }
                counts[bin_index(v, lo, width, bins)] += 1;
            }
        }
        Self { edges, counts }
    }

    /// Width of each bin.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        match self.counts.len() {
            0 => 0.0,
            n => (self.edges[n] - self.edges[0]) / n as f64,
        }
    }

    /// Largest bin count.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left, right, count)` for each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bin_index(v: f64, lo: f64, width: f64, bins: usize) -> usize {
    if width <= 0.0 {
        return 0;
    }
    (((v - lo) / width) as usize).min(bins - 1)
}

/// Bin edges for `values` following numpy's `auto` estimator.
///
/// A sample with zero range gets a single bin of width 1 centred on the
/// value. Returns `None` for an empty sample or non-finite bounds.
#[must_use]
pub fn histogram_bins(values: &[f64]) -> Option<Vec<f64>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let mut sorted = finite;
    sorted.sort_by(f64::total_cmp);
    let lo = sorted[0];
    let hi = sorted[sorted.len() - 1];

    if lo == hi {
        return Some(vec![lo - 0.5, hi + 0.5]);
    }

    let n = sorted.len() as f64;
    let range = hi - lo;
    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);
    let step = range / bins as f64;
    Some(
        (0..=bins)
            .map(|i| if i == bins { hi } else { lo + step * i as f64 })
            .collect(),
    )
}

/// Gaussian KDE curve scaled to histogram counts.
///
/// Returns `(x, y)` points on a grid spanning the sample range, where `y` is
/// the density multiplied by `n * bin_width` so the curve overlays a count
/// histogram. Empty when the bandwidth is undefined (fewer than two values
/// or zero variance).
#[must_use]
pub fn gaussian_kde(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    let sd = sample_std(&finite);
    if n < 2 || !sd.is_finite() || sd == 0.0 {
        return Vec::new();
    }

    let bandwidth = sd * (n as f64).powf(-0.2);
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Pre-aggregate into fine bins and weight each bin centre by its count
    let fine = Histogram::with_edges(&finite, even_edges(lo, hi, KDE_PREBINS));
    let centres: Vec<(f64, f64)> = fine
        .bins()
        .filter(|&(_, _, c)| c > 0)
        .map(|(l, r, c)| ((l + r) / 2.0, c as f64))
        .collect();

    // Bin counts already carry the factor n
    let norm = bin_width / (bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    even_edges(lo, hi, KDE_GRID_POINTS - 1)
        .into_iter()
        .map(|x| {
            let density: f64 = centres
                .iter()
                .map(|&(c, w)| {
                    let z = (x - c) / bandwidth;
                    w * (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// `bins + 1` evenly spaced edges from `lo` to `hi` inclusive.
fn even_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + step * i as f64 })
        .collect()
}
