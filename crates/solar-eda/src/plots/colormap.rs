//! Colormaps and annotation formatting.

use plotters::style::RGBColor;

/// Control points of matplotlib's diverging `coolwarm` map.
const COOLWARM: [(f64, (u8, u8, u8)); 5] = [
    (0.0, (59, 76, 192)),
    (0.25, (141, 176, 254)),
    (0.5, (221, 221, 221)),
    (0.75, (244, 154, 123)),
    (1.0, (180, 4, 38)),
];

/// Control points of a dark-to-light sequential map (seaborn `rocket`).
const ROCKET: [(f64, (u8, u8, u8)); 5] = [
    (0.0, (250, 235, 221)),
    (0.25, (246, 145, 99)),
    (0.5, (203, 27, 79)),
    (0.75, (113, 31, 87)),
    (1.0, (35, 16, 54)),
];

/// Diverging blue-white-red color for `t` in `[0, 1]`.
#[must_use]
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(&COOLWARM, t)
}

/// Sequential color for `t` in `[0, 1]`, light for low values.
#[must_use]
pub fn rocket(t: f64) -> RGBColor {
    interpolate(&ROCKET, t)
}

/// Position of `value` within `[lo, hi]`, clamped; 0.5 for an empty range.
#[must_use]
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn interpolate(stops: &[(f64, (u8, u8, u8))], t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return RGBColor(lerp(c0.0, c1.0, f), lerp(c0.1, c1.1, f), lerp(c0.2, c1.2, f));
        }
    }
    let (_, last) = stops[stops.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(a: u8, b: u8, f: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round().clamp(0.0, 255.0) as u8
}

/// Black text on light cells, white on dark ones.
#[must_use]
pub fn contrasting_text(background: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = background;
    let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    if luminance > 140.0 {
        RGBColor(0, 0, 0)
    } else {
        RGBColor(255, 255, 255)
    }
}

/// Format with two significant digits, like printf's `%.2g`.
#[must_use]
pub fn format_two_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return String::new();
    }

    #[allow(clippy::cast_possible_truncation)]
    let exponent = value.abs().log10().floor() as i32;
    // Rounding can carry into the next decade (0.996 -> 1.0)
    let rounded = round_significant(value, 2);
    let exponent = if rounded.abs() >= 10f64.powi(exponent + 1) {
        exponent + 1
    } else {
        exponent
    };

    if !(-4..2).contains(&exponent) {
        let mantissa = rounded / 10f64.powi(exponent);
        let mantissa = trim_zeros(&format!("{mantissa:.1}"));
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }

    #[allow(clippy::cast_sign_loss)]
    let decimals = (1 - exponent).max(0) as usize;
    trim_zeros(&format!("{rounded:.decimals$}"))
}

fn round_significant(value: f64, digits: i32) -> f64 {
    let exponent = value.abs().log10().floor();
    #[allow(clippy::cast_possible_truncation)]
    let scale = 10f64.powi(digits - 1 - exponent as i32);
    (value * scale).round() / scale
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
