//! Spec-table-driven narrative rendering.
//!
//! One narrator serves all three domains; everything domain-specific
//! (thresholds, direction sense, templates, display formats) comes in
//! through the spec tables in [`crate::engine::domains`].

use crate::engine::classify::classify;
use crate::engine::window::{rank_entities, Window};
use crate::models::{Classification, DisplayFormat, KpiSnapshot, MetricSpec, Narration, Record};
use tracing::debug;

/// Format a metric value for narrative text.
pub fn format_value(value: f64, format: DisplayFormat) -> String {
    match format {
        DisplayFormat::Percent => format!("{:.1}%", value * 100.0),
        DisplayFormat::Decimal1 => format!("{:.1}", value),
        DisplayFormat::Decimal2 => format!("{:.2}", value),
        DisplayFormat::Thousands => group_thousands(value),
    }
}

/// Round to a whole number and insert thousands separators.
fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();

    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Substitute template placeholders.
///
/// `{delta}` renders with an explicit sign so improved lines read
/// `(+4.2% ...)` and degraded lines `(-4.2% ...)`.
fn render(template: &str, value: &str, delta: Option<f64>, period: Option<&str>) -> String {
    let mut line = template.replace("{value}", value);
    if let Some(delta) = delta {
        line = line.replace("{delta}", &format!("{:+.1}", delta));
    }
    if let Some(period) = period {
        line = line.replace("{period}", period);
    }
    line
}

/// Render one narrative line per narrated metric in `specs`.
///
/// A metric whose comparison is [`Classification::Unknown`] is omitted
/// entirely: an undefined baseline must degrade the report to a shorter
/// one, never a broken one. `period_label` feeds the `{period}`
/// placeholder of value-only metrics (the finance month label).
pub fn narrate_comparison(
    current: &KpiSnapshot,
    baseline: &KpiSnapshot,
    specs: &[MetricSpec],
    period_label: Option<&str>,
) -> Vec<String> {
    let mut lines = Vec::new();

    for spec in specs {
        match spec.narration {
            Narration::Silent => {}
            Narration::ValueOnly(template) => {
                // No value, no line; the caller's no-data fallback covers it.
                if let Some(value) = current.get(spec.key) {
                    let formatted = format_value(value, spec.format);
                    lines.push(render(template, &formatted, None, period_label));
                }
            }
            Narration::Compare(templates) => {
                let edge = spec
                    .edge_pct
                    .unwrap_or_else(|| panic!("compared metric {} has no band edge", spec.key));
                let result = classify(
                    current.get(spec.key),
                    baseline.get(spec.key),
                    edge,
                    spec.higher_is_better,
                );

                let template = match result.classification {
                    Classification::Improved => templates.improved,
                    Classification::Degraded => templates.degraded,
                    Classification::Stable => templates.stable,
                    Classification::Unknown => {
                        debug!("Suppressing {} line: comparison undefined", spec.label);
                        continue;
                    }
                };

                // Unknown is ruled out above, so the current value exists.
                let formatted = format_value(current.get(spec.key).unwrap(), spec.format);
                lines.push(render(template, &formatted, result.delta_pct, None));
            }
        }
    }

    lines
}

/// Which end of the entity ranking a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    /// The weakest performer on a higher-is-better metric.
    Lowest,
    /// The worst offender on a lower-is-better metric (downtime).
    Highest,
}

/// One diagnostic ranking: metric, which extreme to report, and the
/// sentence template with `{entity}`, `{value}` and `{mean}` slots.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticSpec {
    pub key: &'static str,
    pub pick: Extreme,
    pub format: DisplayFormat,
    pub template: &'static str,
}

/// Rank entities by windowed mean and render the extreme against the
/// cohort mean (the mean of the per-entity means).
///
/// `None` when no entity has data in the window; the caller substitutes
/// the domain's no-data sentence.
pub fn diagnose<R: Record>(rows: &[R], spec: &DiagnosticSpec, window: &Window) -> Option<String> {
    let ranked = rank_entities(rows, spec.key, window);
    if ranked.is_empty() {
        return None;
    }

    let picked = match spec.pick {
        Extreme::Lowest => ranked
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)),
        Extreme::Highest => ranked
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)),
    }?;

    let cohort_mean = ranked.iter().map(|(_, v)| v).sum::<f64>() / ranked.len() as f64;

    Some(
        spec.template
            .replace("{entity}", &picked.0)
            .replace("{value}", &format_value(picked.1, spec.format))
            .replace("{mean}", &format_value(cohort_mean, spec.format)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domains::{FINANCE_METRICS, PRODUCTION_METRICS, SHIPMENT_METRICS};
    use crate::models::{Period, ProductionRow};
    use chrono::NaiveDate;

    fn snapshot(pairs: &[(&'static str, Option<f64>)]) -> KpiSnapshot {
        let mut snap = KpiSnapshot::default();
        for (key, value) in pairs {
            snap.insert(key, *value);
        }
        snap
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.873, DisplayFormat::Percent), "87.3%");
        assert_eq!(format_value(12.34, DisplayFormat::Decimal1), "12.3");
        assert_eq!(format_value(3.256, DisplayFormat::Decimal2), "3.26");
        assert_eq!(format_value(1234567.4, DisplayFormat::Thousands), "1,234,567");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(-45200.0), "-45,200");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn test_narrate_improved_line() {
        let current = snapshot(&[
            ("yield_pct", Some(0.90)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);
        let baseline = snapshot(&[
            ("yield_pct", Some(0.80)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);

        let lines = narrate_comparison(&current, &baseline, PRODUCTION_METRICS, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "- Yield improved to 90.0% (+12.5% vs 7-day average)."
        );
    }

    #[test]
    fn test_narrate_degraded_line_has_negative_delta() {
        let current = snapshot(&[
            ("yield_pct", Some(0.80)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);
        let baseline = snapshot(&[
            ("yield_pct", Some(0.90)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);

        let lines = narrate_comparison(&current, &baseline, PRODUCTION_METRICS, None);
        assert_eq!(
            lines[0],
            "- Yield decreased to 80.0% (-11.1% vs 7-day average)."
        );
    }

    #[test]
    fn test_narrate_stable_line() {
        let current = snapshot(&[
            ("yield_pct", Some(0.81)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);
        let baseline = snapshot(&[
            ("yield_pct", Some(0.80)),
            ("output_volume_m3", None),
            ("downtime_hours", None),
        ]);

        let lines = narrate_comparison(&current, &baseline, PRODUCTION_METRICS, None);
        assert_eq!(lines[0], "- Yield is stable around 81.0% vs 7-day average.");
    }

    #[test]
    fn test_unknown_comparison_suppresses_line() {
        // Zero baseline: no yield line at all, but output still narrates.
        let current = snapshot(&[
            ("yield_pct", Some(0.85)),
            ("output_volume_m3", Some(1200.0)),
            ("downtime_hours", None),
        ]);
        let baseline = snapshot(&[
            ("yield_pct", Some(0.0)),
            ("output_volume_m3", Some(1200.0)),
            ("downtime_hours", None),
        ]);

        let lines = narrate_comparison(&current, &baseline, PRODUCTION_METRICS, None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Total output"));
    }

    #[test]
    fn test_silent_metrics_produce_no_lines() {
        let current = snapshot(&[
            ("otif_flag", None),
            ("on_time_flag", Some(0.99)),
            ("in_full_flag", Some(0.97)),
            ("lead_time_days", None),
        ]);
        let baseline = current.clone();
        let lines = narrate_comparison(&current, &baseline, SHIPMENT_METRICS, None);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_value_only_revenue_line() {
        let current = snapshot(&[
            ("revenue_nzd", Some(4512345.0)),
            ("gross_margin_pct", None),
            ("ebitda_margin_pct", None),
        ]);
        let baseline = snapshot(&[]);

        let lines =
            narrate_comparison(&current, &baseline, FINANCE_METRICS, Some("June 2025"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "- For June 2025, total revenue is $4,512,345.");
    }

    #[test]
    fn test_diagnose_picks_weakest_mill() {
        use crate::engine::domains::PRODUCTION_YIELD_DIAGNOSTIC;

        let row = |d: u32, site: &str, yield_pct: f64| ProductionRow {
            date: NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
            site_name: site.to_string(),
            yield_pct: Some(yield_pct),
            output_volume_m3: None,
            downtime_hours: None,
        };
        let rows = vec![
            row(1, "Mill A", 0.78),
            row(2, "Mill A", 0.82),
            row(1, "Mill B", 0.90),
        ];
        let window = Window::Range {
            start: Period::Day(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            end: Period::Day(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
        };

        let line = diagnose(&rows, &PRODUCTION_YIELD_DIAGNOSTIC, &window).unwrap();
        assert_eq!(
            line,
            "- Operations: Mill **Mill A** has the lowest yield (80.0% vs fleet avg 85.0%) in the last 30 days."
        );
    }

    #[test]
    fn test_diagnose_empty_window_is_none() {
        use crate::engine::domains::PRODUCTION_YIELD_DIAGNOSTIC;

        let rows: Vec<ProductionRow> = Vec::new();
        let window = Window::single(Period::Day(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        ));
        assert_eq!(diagnose(&rows, &PRODUCTION_YIELD_DIAGNOSTIC, &window), None);
    }
}
