//! Data models for the KPI engine.
//!
//! This module contains all the core data structures used throughout
//! the application: observation periods, domain row types, snapshots,
//! classification results, and the per-metric spec tables that drive
//! the generic narrator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One observation period: a calendar day or a `YYYYMM` month.
///
/// A single report never mixes the two variants within one series;
/// Production and Shipments are daily, Finance is monthly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    /// A calendar day.
    Day(NaiveDate),
    /// A month as a `YYYYMM` integer key (e.g. `202506`).
    Month(u32),
}

impl Period {
    /// First day of the month for a `YYYYMM` key, if the key is valid.
    pub fn month_start(key: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt((key / 100) as i32, key % 100, 1)
    }

    /// Human label for a month key, e.g. `June 2025`.
    ///
    /// Falls back to the raw key for malformed input so a bad row can
    /// never break report rendering.
    pub fn month_label(key: u32) -> String {
        match Self::month_start(key) {
            Some(date) => date.format("%B %Y").to_string(),
            None => key.to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Period::Month(key) => write!(f, "{}", Period::month_label(*key)),
        }
    }
}

/// The month keys immediately preceding `latest`, most recent first.
///
/// `previous_months(202502, 3)` is `[202501, 202412, 202411]`.
pub fn previous_months(latest: u32, count: usize) -> Vec<u32> {
    let mut year = (latest / 100) as i32;
    let mut month = (latest % 100) as i32;

    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        month -= 1;
        if month == 0 {
            month = 12;
            year -= 1;
        }
        keys.push((year * 100 + month) as u32);
    }
    keys
}

/// A time-ordered series of (period, aggregated value) pairs.
///
/// Built by per-period aggregation, so periods are unique and sorted
/// ascending. A `None` value means the period had rows but no non-null
/// observations for the metric.
pub type MetricSeries = Vec<(Period, Option<f64>)>;

/// Aggregated metric values for one window. `None` = no data matched.
///
/// Transient: created fresh per report invocation, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSnapshot {
    values: HashMap<&'static str, Option<f64>>,
}

impl KpiSnapshot {
    /// Record a metric aggregate (or `None` when no rows matched).
    pub fn insert(&mut self, key: &'static str, value: Option<f64>) {
        self.values.insert(key, value);
    }

    /// The aggregate for a metric, flattening "metric absent" and
    /// "metric had no data" into `None`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    /// True when every metric in the snapshot is null.
    #[allow(dead_code)] // Probe for "no data" snapshots, used by tests
    pub fn is_all_null(&self) -> bool {
        self.values.values().all(|v| v.is_none())
    }
}

/// Outcome of comparing a current value against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Moved past the band edge in the favourable direction.
    Improved,
    /// Within the band.
    Stable,
    /// Moved past the band edge in the unfavourable direction.
    Degraded,
    /// The comparison is undefined (null/zero/NaN baseline or current).
    Unknown,
}

/// Signed percent change plus its classification against a band edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeResult {
    /// `(current - baseline) / baseline * 100`, or `None` when undefined.
    pub delta_pct: Option<f64>,
    pub classification: Classification,
}

/// A single trend projection, immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastResult {
    /// Value of the fitted line at `(n - 1) + horizon_steps`.
    pub predicted: f64,
    /// How many index steps past the last observation.
    #[allow(dead_code)] // Result metadata; horizons are fixed per metric
    pub horizon_steps: usize,
    /// Percent change of the prediction vs. the last observed value.
    pub delta_pct_vs_latest: Option<f64>,
}

/// How values of one metric are aggregated within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    /// Arithmetic mean of non-null values (yield, margins, flags).
    Mean,
    /// Sum of non-null values (output volume, revenue).
    Sum,
}

/// How a metric value is rendered in narrative text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Fraction rendered as a percentage, e.g. `0.873` -> `87.3%`.
    Percent,
    /// One decimal place, e.g. lead time `12.3`.
    Decimal1,
    /// Two decimal places, e.g. downtime `3.25`.
    Decimal2,
    /// Rounded with thousands separators, e.g. `12,345`.
    Thousands,
}

/// The three narrative sentences for one compared metric.
///
/// Placeholders: `{value}` is the formatted current value, `{delta}`
/// the signed percent change.
#[derive(Debug, Clone, Copy)]
pub struct Templates {
    pub improved: &'static str,
    pub degraded: &'static str,
    pub stable: &'static str,
}

/// What the narrator does with a metric.
#[derive(Debug, Clone, Copy)]
pub enum Narration {
    /// Classify against the baseline and render one of three sentences.
    Compare(Templates),
    /// Always render the current value, no classification (revenue).
    /// Placeholders: `{value}` and `{period}`.
    ValueOnly(&'static str),
    /// Aggregate into the snapshot but produce no narrative line
    /// (on-time / in-full component flags).
    Silent,
}

/// Per-metric policy entry: one row of a domain's spec table.
///
/// These tables are static configuration, not state; thresholds and
/// direction sense are never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    /// Column key in the domain rows.
    pub key: &'static str,
    /// Display name used in logs and diagnostics.
    pub label: &'static str,
    pub agg: AggKind,
    /// Symmetric classification band edge in percentage points.
    /// `None` for metrics that are never classified.
    pub edge_pct: Option<f64>,
    /// When false (downtime, lead time) a positive delta is a degradation.
    pub higher_is_better: bool,
    pub format: DisplayFormat,
    pub narration: Narration,
}

/// Access to one domain's tabular rows, generically.
///
/// This is the seam that lets a single engine serve all three domains.
pub trait Record {
    fn period(&self) -> Period;
    /// The ranking entity for diagnostics (mill, customer, region).
    fn entity(&self) -> &str;
    /// A numeric column by key.
    ///
    /// Panics on an unknown key: an absent column is a programming
    /// error in a spec table, not a recoverable condition.
    fn metric(&self, key: &str) -> Option<f64>;
}

/// One day of production at one mill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRow {
    pub date: NaiveDate,
    pub site_name: String,
    pub yield_pct: Option<f64>,
    pub output_volume_m3: Option<f64>,
    pub downtime_hours: Option<f64>,
}

impl Record for ProductionRow {
    fn period(&self) -> Period {
        Period::Day(self.date)
    }

    fn entity(&self) -> &str {
        &self.site_name
    }

    fn metric(&self, key: &str) -> Option<f64> {
        match key {
            "yield_pct" => self.yield_pct,
            "output_volume_m3" => self.output_volume_m3,
            "downtime_hours" => self.downtime_hours,
            other => panic!("unknown production metric column: {}", other),
        }
    }
}

/// One shipment order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRow {
    pub order_date: NaiveDate,
    pub customer_name: String,
    pub otif_flag: Option<f64>,
    pub on_time_flag: Option<f64>,
    pub in_full_flag: Option<f64>,
    pub lead_time_days: Option<f64>,
}

impl Record for ShipmentRow {
    fn period(&self) -> Period {
        Period::Day(self.order_date)
    }

    fn entity(&self) -> &str {
        &self.customer_name
    }

    fn metric(&self, key: &str) -> Option<f64> {
        match key {
            "otif_flag" => self.otif_flag,
            "on_time_flag" => self.on_time_flag,
            "in_full_flag" => self.in_full_flag,
            "lead_time_days" => self.lead_time_days,
            other => panic!("unknown shipment metric column: {}", other),
        }
    }
}

/// One month of financial results for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRow {
    /// `YYYYMM` month key.
    pub month_key: u32,
    pub region_name: String,
    pub revenue_nzd: Option<f64>,
    pub gross_margin_pct: Option<f64>,
    pub ebitda_margin_pct: Option<f64>,
}

impl Record for FinanceRow {
    fn period(&self) -> Period {
        Period::Month(self.month_key)
    }

    fn entity(&self) -> &str {
        &self.region_name
    }

    fn metric(&self, key: &str) -> Option<f64> {
        match key {
            "revenue_nzd" => self.revenue_nzd,
            "gross_margin_pct" => self.gross_margin_pct,
            "ebitda_margin_pct" => self.ebitda_margin_pct,
            other => panic!("unknown finance metric column: {}", other),
        }
    }
}
