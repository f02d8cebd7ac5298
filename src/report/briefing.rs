//! The daily briefing: latest KPIs vs. rolling baselines, per domain.

use crate::engine::domains::{
    FINANCE_BASELINE_MONTHS, FINANCE_METRICS, PRODUCTION_BASELINE_DAYS, PRODUCTION_METRICS,
    SHIPMENT_METRICS, SHIPMENT_WINDOW_DAYS,
};
use crate::engine::narrator::narrate_comparison;
use crate::engine::window::{aggregate, latest_period, period_mean_snapshot, Window};
use crate::models::{previous_months, Period, Record};
use crate::store::{KpiStore, StoreError};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Latest calendar day present in a daily domain.
fn latest_day<R: Record>(rows: &[R]) -> Option<NaiveDate> {
    match latest_period(rows) {
        Some(Period::Day(date)) => Some(date),
        _ => None,
    }
}

/// Latest month key present in the finance rows.
fn latest_month<R: Record>(rows: &[R]) -> Option<u32> {
    match latest_period(rows) {
        Some(Period::Month(key)) => Some(key),
        _ => None,
    }
}

/// Operations: latest single day vs. the trailing 7-day window.
fn operations_lines<R: Record>(rows: &[R], latest: NaiveDate) -> Vec<String> {
    let current = Window::single(Period::Day(latest));
    let baseline = Window::Range {
        start: Period::Day(latest - Duration::days(PRODUCTION_BASELINE_DAYS)),
        end: Period::Day(latest - Duration::days(1)),
    };

    let current_snapshot = aggregate(rows, PRODUCTION_METRICS, &current);
    // Rolling baseline: mean of the daily aggregates, so a single day's
    // output compares against a typical day, not a 7-day total.
    let baseline_snapshot = period_mean_snapshot(rows, PRODUCTION_METRICS, &baseline);
    narrate_comparison(&current_snapshot, &baseline_snapshot, PRODUCTION_METRICS, None)
}

/// Supply chain: trailing 30 days vs. the 30 days before that.
fn supply_chain_lines<R: Record>(rows: &[R], latest: NaiveDate) -> Vec<String> {
    let current = Window::Range {
        start: Period::Day(latest - Duration::days(SHIPMENT_WINDOW_DAYS)),
        end: Period::Day(latest),
    };
    let baseline = Window::Range {
        start: Period::Day(latest - Duration::days(2 * SHIPMENT_WINDOW_DAYS)),
        end: Period::Day(latest - Duration::days(SHIPMENT_WINDOW_DAYS + 1)),
    };

    let current_snapshot = aggregate(rows, SHIPMENT_METRICS, &current);
    let baseline_snapshot = aggregate(rows, SHIPMENT_METRICS, &baseline);
    narrate_comparison(&current_snapshot, &baseline_snapshot, SHIPMENT_METRICS, None)
}

/// Finance: latest month vs. the mean of the preceding 3 months.
fn finance_lines<R: Record>(rows: &[R], latest: u32) -> Vec<String> {
    let current_snapshot = aggregate(rows, FINANCE_METRICS, &Window::Months(vec![latest]));
    let baseline_snapshot = period_mean_snapshot(
        rows,
        FINANCE_METRICS,
        &Window::Months(previous_months(latest, FINANCE_BASELINE_MONTHS)),
    );

    let label = Period::month_label(latest);
    narrate_comparison(
        &current_snapshot,
        &baseline_snapshot,
        FINANCE_METRICS,
        Some(&label),
    )
}

/// Append one domain section: header, lines, fallback, blank separator.
fn push_section(doc: &mut Vec<String>, header: &str, lines: Vec<String>, fallback: &str) {
    doc.push(header.to_string());
    if lines.is_empty() {
        doc.push(fallback.to_string());
    } else {
        doc.extend(lines);
    }
    doc.push(String::new());
}

/// Compose the daily briefing markdown.
///
/// `run_date` only labels the header; injecting it keeps the composer
/// deterministic, so two calls over the same data are byte-identical.
pub fn generate_briefing(store: &dyn KpiStore, run_date: NaiveDate) -> Result<String, StoreError> {
    let production = store.production()?;
    let shipments = store.shipments()?;
    let finance = store.finance()?;

    let ops_latest = latest_day(&production);
    let ship_latest = latest_day(&shipments);
    let fin_latest = latest_month(&finance);
    debug!(
        "Briefing data as of: ops={:?} ship={:?} fin={:?}",
        ops_latest, ship_latest, fin_latest
    );

    let mut doc: Vec<String> = Vec::new();
    doc.push("# Daily BI Briefing".to_string());
    doc.push(format!("_Generated on {}_", run_date.format("%Y-%m-%d")));
    doc.push(String::new());
    doc.push("**Data as of:**".to_string());
    doc.push(format!(
        "- Operations: {}",
        ops_latest.map_or_else(|| "n/a".to_string(), |d| d.format("%Y-%m-%d").to_string())
    ));
    doc.push(format!(
        "- Supply Chain: {}",
        ship_latest.map_or_else(|| "n/a".to_string(), |d| d.format("%Y-%m-%d").to_string())
    ));
    doc.push(format!(
        "- Finance: {}",
        fin_latest.map_or_else(|| "n/a".to_string(), Period::month_label)
    ));
    doc.push(String::new());

    push_section(
        &mut doc,
        "## 1. Operations – Mills & Yield",
        ops_latest.map_or_else(Vec::new, |latest| operations_lines(&production, latest)),
        "- No operations data available for this period.",
    );

    push_section(
        &mut doc,
        "## 2. Supply Chain – OTIF & Lead Time",
        ship_latest.map_or_else(Vec::new, |latest| supply_chain_lines(&shipments, latest)),
        "- No shipment data available for this period.",
    );

    push_section(
        &mut doc,
        "## 3. Finance – Revenue & Margins",
        fin_latest.map_or_else(Vec::new, |latest| finance_lines(&finance, latest)),
        "- No finance data available for this period.",
    );

    Ok(doc.join("\n"))
}
