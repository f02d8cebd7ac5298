//! The copilot report: diagnostic, predictive, prescriptive.

use crate::engine::domains::{
    DIAGNOSTIC_TRAILING_DAYS, FINANCE_DIAGNOSTIC_MONTHS, FINANCE_MARGIN_DIAGNOSTIC,
    MARGIN_FORECAST_STEPS, OTIF_FORECAST_STEPS, PRESCRIPTIVE_ACTIONS,
    PRODUCTION_DOWNTIME_DIAGNOSTIC, PRODUCTION_YIELD_DIAGNOSTIC, SHIPMENT_OTIF_DIAGNOSTIC,
    YIELD_FORECAST_STEPS,
};
use crate::engine::forecast::{forecast, magnitude_word};
use crate::engine::narrator::{diagnose, format_value};
use crate::engine::window::{latest_period, series_by_period, Window};
use crate::models::{previous_months, AggKind, DisplayFormat, Period, Record};
use crate::store::{KpiStore, StoreError};
use chrono::Duration;
use tracing::debug;

/// Trailing window ending at the latest period of a daily domain.
fn trailing_days_window<R: Record>(rows: &[R]) -> Option<Window> {
    match latest_period(rows) {
        Some(Period::Day(latest)) => Some(Window::Range {
            start: Period::Day(latest - Duration::days(DIAGNOSTIC_TRAILING_DAYS)),
            end: Period::Day(latest),
        }),
        _ => None,
    }
}

/// Trailing months window (latest month plus the preceding six).
fn trailing_months_window<R: Record>(rows: &[R]) -> Option<Window> {
    match latest_period(rows) {
        Some(Period::Month(latest)) => {
            let mut keys = previous_months(latest, FINANCE_DIAGNOSTIC_MONTHS);
            keys.push(latest);
            Some(Window::Months(keys))
        }
        _ => None,
    }
}

/// Weakest mill by yield and worst mill by downtime, or the no-data
/// sentence.
fn diagnostic_operations<R: Record>(rows: &[R]) -> Vec<String> {
    let Some(window) = trailing_days_window(rows) else {
        return vec!["No recent operations data.".to_string()];
    };

    let lines: Vec<String> = [
        diagnose(rows, &PRODUCTION_YIELD_DIAGNOSTIC, &window),
        diagnose(rows, &PRODUCTION_DOWNTIME_DIAGNOSTIC, &window),
    ]
    .into_iter()
    .flatten()
    .collect();

    if lines.is_empty() {
        vec!["No recent operations data.".to_string()]
    } else {
        lines
    }
}

fn diagnostic_supply_chain<R: Record>(rows: &[R]) -> Vec<String> {
    trailing_days_window(rows)
        .and_then(|window| diagnose(rows, &SHIPMENT_OTIF_DIAGNOSTIC, &window))
        .map(|line| vec![line])
        .unwrap_or_else(|| vec!["No recent shipment data.".to_string()])
}

fn diagnostic_finance<R: Record>(rows: &[R]) -> Vec<String> {
    trailing_months_window(rows)
        .and_then(|window| diagnose(rows, &FINANCE_MARGIN_DIAGNOSTIC, &window))
        .map(|line| vec![line])
        .unwrap_or_else(|| vec!["No recent finance data.".to_string()])
}

/// Forecast fleet yield one week out.
fn predictive_operations<R: Record>(rows: &[R]) -> String {
    let series = series_by_period(rows, "yield_pct", AggKind::Mean);
    if series.is_empty() {
        return "No data to forecast operations.".to_string();
    }

    match forecast(&series, YIELD_FORECAST_STEPS) {
        None => "Not enough history to forecast operations.".to_string(),
        Some(result) => {
            let value = format_value(result.predicted, DisplayFormat::Percent);
            match result.delta_pct_vs_latest {
                Some(delta) => format!(
                    "- Operations forecast: trend model suggests fleet yield could move to {} over the next week ({} change of {:.1}% vs today).",
                    value,
                    magnitude_word(delta),
                    delta
                ),
                // Undefined latest value: keep the projection, drop the
                // comparison clause rather than render a broken one.
                None => format!(
                    "- Operations forecast: trend model suggests fleet yield could move to {} over the next week.",
                    value
                ),
            }
        }
    }
}

/// Forecast OTIF a month out from the daily trend.
fn predictive_supply_chain<R: Record>(rows: &[R]) -> String {
    let series = series_by_period(rows, "otif_flag", AggKind::Mean);
    if series.is_empty() {
        return "No data to forecast OTIF.".to_string();
    }

    match forecast(&series, OTIF_FORECAST_STEPS) {
        None => "Not enough history to forecast OTIF.".to_string(),
        Some(result) => {
            let value = format_value(result.predicted, DisplayFormat::Percent);
            match result.delta_pct_vs_latest {
                Some(delta) => format!(
                    "- OTIF forecast: model points to around {} in ~1 month ({:.1}% vs the latest level).",
                    value, delta
                ),
                None => format!("- OTIF forecast: model points to around {} in ~1 month.", value),
            }
        }
    }
}

/// Forecast gross margin three months out from the monthly trend.
fn predictive_finance<R: Record>(rows: &[R]) -> String {
    let series = series_by_period(rows, "gross_margin_pct", AggKind::Mean);
    if series.is_empty() {
        return "No data to forecast margins.".to_string();
    }

    match forecast(&series, MARGIN_FORECAST_STEPS) {
        None => "Not enough history to forecast margins.".to_string(),
        Some(result) => {
            let value = format_value(result.predicted, DisplayFormat::Percent);
            match result.delta_pct_vs_latest {
                Some(delta) => format!(
                    "- Margin forecast: gross margin could trend toward {} in the next 3 months ({:.1}% vs the latest month).",
                    value, delta
                ),
                None => format!(
                    "- Margin forecast: gross margin could trend toward {} in the next 3 months.",
                    value
                ),
            }
        }
    }
}

/// Compose the copilot markdown: fixed section order, fixed headers.
///
/// Idempotent by construction; the only inputs are the store's rows.
pub fn generate_copilot(store: &dyn KpiStore) -> Result<String, StoreError> {
    let production = store.production()?;
    let shipments = store.shipments()?;
    let finance = store.finance()?;
    debug!(
        "Copilot over {} production, {} shipment, {} finance rows",
        production.len(),
        shipments.len(),
        finance.len()
    );

    let mut doc: Vec<String> = Vec::new();

    doc.push("## Copilot – Diagnostic, Predictive, Prescriptive".to_string());
    doc.push(String::new());

    doc.push("### 1. Diagnostic – What is driving performance?".to_string());
    doc.extend(diagnostic_operations(&production));
    doc.extend(diagnostic_supply_chain(&shipments));
    doc.extend(diagnostic_finance(&finance));
    doc.push(String::new());

    doc.push("### 2. Predictive – Where are we heading?".to_string());
    doc.push(predictive_operations(&production));
    doc.push(predictive_supply_chain(&shipments));
    doc.push(predictive_finance(&finance));
    doc.push(String::new());

    doc.push("### 3. Prescriptive – What should we do next?".to_string());
    doc.extend(PRESCRIPTIVE_ACTIONS.iter().map(|s| s.to_string()));
    doc.push(String::new());

    Ok(doc.join("\n"))
}
