//! Windowed aggregation over domain rows.
//!
//! Everything here is deterministic and order-invariant: shuffling the
//! input rows never changes an aggregate, and an empty selection yields
//! null metrics rather than an error.

use crate::models::{AggKind, KpiSnapshot, MetricSeries, MetricSpec, Period, Record};
use std::collections::BTreeMap;

/// A comparison window over periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    /// Closed interval `[start, end]`.
    Range { start: Period, end: Period },
    /// An explicit set of month keys (finance baselines).
    Months(Vec<u32>),
}

impl Window {
    /// Single-period window (the briefing's "latest day" current side).
    pub fn single(period: Period) -> Self {
        Window::Range {
            start: period,
            end: period,
        }
    }

    pub fn contains(&self, period: &Period) -> bool {
        match self {
            Window::Range { start, end } => start <= period && period <= end,
            Window::Months(keys) => match period {
                Period::Month(key) => keys.contains(key),
                Period::Day(_) => false,
            },
        }
    }
}

/// Apply one aggregation kind over non-null values.
///
/// `None` when no values matched: a metric with zero observations is
/// "no data for period", never zero.
fn aggregate_values(values: &[f64], agg: AggKind) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    match agg {
        AggKind::Sum => Some(sum),
        AggKind::Mean => Some(sum / values.len() as f64),
    }
}

/// Aggregate every metric of a spec table over the rows inside `window`.
///
/// An empty `rows` slice produces a snapshot with every metric null;
/// callers treat that as "no data for period".
pub fn aggregate<R: Record>(rows: &[R], specs: &[MetricSpec], window: &Window) -> KpiSnapshot {
    let mut snapshot = KpiSnapshot::default();

    for spec in specs {
        let values: Vec<f64> = rows
            .iter()
            .filter(|row| window.contains(&row.period()))
            .filter_map(|row| row.metric(spec.key))
            .filter(|v| !v.is_nan())
            .collect();
        snapshot.insert(spec.key, aggregate_values(&values, spec.agg));
    }

    snapshot
}

/// Group rows by period and aggregate one metric per group.
///
/// The result is sorted ascending with unique periods, which is the
/// invariant the forecaster relies on.
pub fn series_by_period<R: Record>(rows: &[R], key: &str, agg: AggKind) -> MetricSeries {
    let mut grouped: BTreeMap<Period, Vec<f64>> = BTreeMap::new();

    for row in rows {
        let bucket = grouped.entry(row.period()).or_default();
        if let Some(value) = row.metric(key) {
            if !value.is_nan() {
                bucket.push(value);
            }
        }
    }

    grouped
        .into_iter()
        .map(|(period, values)| (period, aggregate_values(&values, agg)))
        .collect()
}

/// Aggregate each period inside `window` separately, then average the
/// per-period aggregates.
///
/// This is the rolling-baseline shape: the finance baseline is a mean
/// of monthly aggregates and the production baseline a mean of daily
/// ones, not a pooled aggregate over all baseline rows. For sum metrics
/// (output volume, revenue) the two differ wildly; a pooled sum over
/// seven days is not comparable to a single day.
pub fn period_mean_snapshot<R: Record>(
    rows: &[R],
    specs: &[MetricSpec],
    window: &Window,
) -> KpiSnapshot {
    let mut snapshot = KpiSnapshot::default();

    for spec in specs {
        let values: Vec<f64> = series_by_period(rows, spec.key, spec.agg)
            .into_iter()
            .filter(|(period, _)| window.contains(period))
            .filter_map(|(_, value)| value)
            .collect();
        snapshot.insert(spec.key, aggregate_values(&values, AggKind::Mean));
    }

    snapshot
}

/// Latest period present in a domain's rows.
pub fn latest_period<R: Record>(rows: &[R]) -> Option<Period> {
    rows.iter().map(|row| row.period()).max()
}

/// Mean of one metric per entity within a window, for diagnostics.
///
/// Sorted by entity name so downstream min/max picks are deterministic
/// under ties.
pub fn rank_entities<R: Record>(rows: &[R], key: &str, window: &Window) -> Vec<(String, f64)> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in rows {
        if !window.contains(&row.period()) {
            continue;
        }
        let bucket = grouped.entry(row.entity().to_string()).or_default();
        if let Some(value) = row.metric(key) {
            if !value.is_nan() {
                bucket.push(value);
            }
        }
    }

    grouped
        .into_iter()
        .filter_map(|(entity, values)| {
            aggregate_values(&values, AggKind::Mean).map(|mean| (entity, mean))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domains::PRODUCTION_METRICS;
    use crate::models::ProductionRow;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn row(d: u32, site: &str, yield_pct: Option<f64>, output: Option<f64>) -> ProductionRow {
        ProductionRow {
            date: date(d),
            site_name: site.to_string(),
            yield_pct,
            output_volume_m3: output,
            downtime_hours: Some(1.0),
        }
    }

    #[test]
    fn test_window_contains_closed_interval() {
        let window = Window::Range {
            start: Period::Day(date(5)),
            end: Period::Day(date(10)),
        };
        assert!(window.contains(&Period::Day(date(5))));
        assert!(window.contains(&Period::Day(date(10))));
        assert!(!window.contains(&Period::Day(date(11))));
    }

    #[test]
    fn test_window_months_ignores_days() {
        let window = Window::Months(vec![202505, 202506]);
        assert!(window.contains(&Period::Month(202506)));
        assert!(!window.contains(&Period::Month(202504)));
        assert!(!window.contains(&Period::Day(date(1))));
    }

    #[test]
    fn test_aggregate_mean_and_sum() {
        let rows = vec![
            row(1, "Mill A", Some(0.8), Some(100.0)),
            row(2, "Mill A", Some(0.9), Some(200.0)),
        ];
        let window = Window::Range {
            start: Period::Day(date(1)),
            end: Period::Day(date(2)),
        };
        let snapshot = aggregate(&rows, PRODUCTION_METRICS, &window);

        assert!((snapshot.get("yield_pct").unwrap() - 0.85).abs() < 1e-12);
        assert!((snapshot.get("output_volume_m3").unwrap() - 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_is_order_invariant() {
        let mut rows = vec![
            row(1, "Mill A", Some(0.8), Some(100.0)),
            row(2, "Mill B", Some(0.9), Some(250.0)),
            row(3, "Mill A", Some(0.7), Some(50.0)),
        ];
        let window = Window::Range {
            start: Period::Day(date(1)),
            end: Period::Day(date(3)),
        };

        let forward = aggregate(&rows, PRODUCTION_METRICS, &window);
        rows.reverse();
        let reversed = aggregate(&rows, PRODUCTION_METRICS, &window);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_aggregate_no_matching_rows_yields_null() {
        let rows = vec![row(1, "Mill A", Some(0.8), Some(100.0))];
        let window = Window::single(Period::Day(date(20)));
        let snapshot = aggregate(&rows, PRODUCTION_METRICS, &window);
        assert!(snapshot.is_all_null());
    }

    #[test]
    fn test_aggregate_empty_dataset_yields_null() {
        let rows: Vec<ProductionRow> = Vec::new();
        let window = Window::single(Period::Day(date(1)));
        let snapshot = aggregate(&rows, PRODUCTION_METRICS, &window);
        assert!(snapshot.is_all_null());
    }

    #[test]
    fn test_aggregate_skips_null_values_only() {
        // One null yield should not drag the mean down to a wrong value.
        let rows = vec![
            row(1, "Mill A", Some(0.8), None),
            row(1, "Mill B", None, None),
        ];
        let window = Window::single(Period::Day(date(1)));
        let snapshot = aggregate(&rows, PRODUCTION_METRICS, &window);

        assert_eq!(snapshot.get("yield_pct"), Some(0.8));
        assert_eq!(snapshot.get("output_volume_m3"), None);
    }

    #[test]
    fn test_series_by_period_groups_and_sorts() {
        let rows = vec![
            row(3, "Mill B", Some(0.9), None),
            row(1, "Mill A", Some(0.8), None),
            row(1, "Mill B", Some(0.6), None),
        ];
        let series = series_by_period(&rows, "yield_pct", AggKind::Mean);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, Period::Day(date(1)));
        assert!((series[0].1.unwrap() - 0.7).abs() < 1e-12);
        assert_eq!(series[1].0, Period::Day(date(3)));
        assert_eq!(series[1].1, Some(0.9));
    }

    #[test]
    fn test_latest_period() {
        let rows = vec![
            row(3, "Mill A", None, None),
            row(9, "Mill A", None, None),
            row(5, "Mill B", None, None),
        ];
        assert_eq!(latest_period(&rows), Some(Period::Day(date(9))));

        let empty: Vec<ProductionRow> = Vec::new();
        assert_eq!(latest_period(&empty), None);
    }

    #[test]
    fn test_rank_entities_mean_per_entity() {
        let rows = vec![
            row(1, "Mill A", Some(0.78), None),
            row(2, "Mill A", Some(0.82), None),
            row(1, "Mill B", Some(0.90), None),
        ];
        let window = Window::Range {
            start: Period::Day(date(1)),
            end: Period::Day(date(2)),
        };
        let ranked = rank_entities(&rows, "yield_pct", &window);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, "Mill A");
        assert!((ranked[0].1 - 0.80).abs() < 1e-12);
        assert_eq!(ranked[1].0, "Mill B");
        assert!((ranked[1].1 - 0.90).abs() < 1e-12);
    }

    #[test]
    fn test_period_mean_snapshot_averages_monthly_aggregates() {
        use crate::engine::domains::FINANCE_METRICS;
        use crate::models::FinanceRow;

        let fin = |key: u32, revenue: f64| FinanceRow {
            month_key: key,
            region_name: "Northland".to_string(),
            revenue_nzd: Some(revenue),
            gross_margin_pct: Some(0.3),
            ebitda_margin_pct: None,
        };

        // 202504 has two rows (sum 300), 202505 one row (sum 50).
        let rows = vec![fin(202504, 100.0), fin(202504, 200.0), fin(202505, 50.0)];
        let snapshot =
            period_mean_snapshot(&rows, FINANCE_METRICS, &Window::Months(vec![202504, 202505]));

        // Mean of monthly revenue sums: (300 + 50) / 2, not sum / 3.
        assert!((snapshot.get("revenue_nzd").unwrap() - 175.0).abs() < 1e-9);
        assert!((snapshot.get("gross_margin_pct").unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(snapshot.get("ebitda_margin_pct"), None);
    }

    #[test]
    fn test_period_mean_snapshot_daily_sums() {
        // Two days of output at 500 each: the rolling baseline is the
        // mean daily sum, not the pooled two-day sum.
        let rows = vec![
            row(1, "Mill A", None, Some(200.0)),
            row(1, "Mill B", None, Some(300.0)),
            row(2, "Mill A", None, Some(500.0)),
        ];
        let window = Window::Range {
            start: Period::Day(date(1)),
            end: Period::Day(date(2)),
        };
        let snapshot = period_mean_snapshot(&rows, PRODUCTION_METRICS, &window);
        assert!((snapshot.get("output_volume_m3").unwrap() - 500.0).abs() < 1e-9);
    }
}
