//! Ordinary-least-squares trend forecasting.
//!
//! One model only: a straight line fitted over a synthetic integer time
//! index, refit from scratch on every call. The index is a rank, not
//! elapsed time, so irregular calendar spacing (a missing day in the
//! series) silently biases the fitted trend. That is the documented
//! behaviour of this tool, kept for reproducibility; do not swap in a
//! calendar-aware regression here.

use crate::engine::classify::percent_change;
use crate::models::{ForecastResult, MetricSeries};

/// Minimum non-null observations required to fit a trend.
pub const MIN_POINTS: usize = 5;

/// Band edge (in percent) separating a "slight" projected move from a
/// "significant" one in narrative text.
pub const MAGNITUDE_EDGE_PCT: f64 = 2.0;

/// Fit a line `value = slope * index + intercept` over the non-null
/// points of `series` and extrapolate `steps_ahead` past the last one.
///
/// Returns `None`, the insufficient-history sentinel, when fewer than
/// [`MIN_POINTS`] non-null points remain. Callers render a "not enough
/// history" sentence for `None` rather than aborting the report.
pub fn forecast(series: &MetricSeries, steps_ahead: usize) -> Option<ForecastResult> {
    let values: Vec<f64> = series
        .iter()
        .filter_map(|(_, value)| *value)
        .filter(|v| !v.is_nan())
        .collect();

    let n = values.len();
    if n < MIN_POINTS {
        return None;
    }

    let (slope, intercept) = fit_line(&values);
    let future_index = (n - 1 + steps_ahead) as f64;
    let predicted = slope * future_index + intercept;

    let latest = values[n - 1];
    let delta_pct_vs_latest = percent_change(predicted, latest);

    Some(ForecastResult {
        predicted,
        horizon_steps: steps_ahead,
        delta_pct_vs_latest,
    })
}

/// Closed-form OLS over `x = 0..n-1`.
fn fit_line(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;

    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();

    // The denominator is the x-variance term; with distinct indices
    // 0..n-1 and n >= MIN_POINTS it is always positive.
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    (slope, intercept)
}

/// The adverb grading a projected move in narrative text.
pub fn magnitude_word(delta_pct: f64) -> &'static str {
    if delta_pct.abs() < MAGNITUDE_EDGE_PCT {
        "slightly"
    } else {
        "significantly"
    }
}
