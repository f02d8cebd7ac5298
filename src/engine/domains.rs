//! Fixed per-domain policy tables.
//!
//! Window lengths, forecast horizons, band edges, direction sense, and
//! narrative templates all live here as static data. Consumers must not
//! make these configurable: downstream report parity depends on them.

use crate::models::{AggKind, DisplayFormat, MetricSpec, Narration, Templates};
use crate::engine::narrator::{DiagnosticSpec, Extreme};

// Briefing windows.
/// Production baseline: trailing days before the latest day.
pub const PRODUCTION_BASELINE_DAYS: i64 = 7;
/// Shipments current and baseline window length.
pub const SHIPMENT_WINDOW_DAYS: i64 = 30;
/// Finance baseline: months preceding the latest month.
pub const FINANCE_BASELINE_MONTHS: usize = 3;

// Diagnostic windows.
/// Trailing days for Production and Shipments entity rankings.
pub const DIAGNOSTIC_TRAILING_DAYS: i64 = 30;
/// Trailing months for the Finance entity ranking.
pub const FINANCE_DIAGNOSTIC_MONTHS: usize = 6;

// Predictive horizons, in index steps of each metric's native period.
pub const YIELD_FORECAST_STEPS: usize = 7;
pub const OTIF_FORECAST_STEPS: usize = 30;
pub const MARGIN_FORECAST_STEPS: usize = 3;

/// Production: daily yield, output volume, and downtime per mill.
pub const PRODUCTION_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "yield_pct",
        label: "Yield",
        agg: AggKind::Mean,
        edge_pct: Some(2.0),
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Compare(Templates {
            improved: "- Yield improved to {value} ({delta}% vs 7-day average).",
            degraded: "- Yield decreased to {value} ({delta}% vs 7-day average).",
            stable: "- Yield is stable around {value} vs 7-day average.",
        }),
    },
    MetricSpec {
        key: "output_volume_m3",
        label: "Total output",
        agg: AggKind::Sum,
        edge_pct: Some(5.0),
        higher_is_better: true,
        format: DisplayFormat::Thousands,
        narration: Narration::Compare(Templates {
            improved: "- Total output increased to {value} m³ ({delta}% vs 7-day average).",
            degraded: "- Total output softened to {value} m³ ({delta}% vs 7-day average).",
            stable: "- Total output is broadly in line with the 7-day average ({value} m³).",
        }),
    },
    MetricSpec {
        key: "downtime_hours",
        label: "Downtime",
        agg: AggKind::Mean,
        edge_pct: Some(10.0),
        higher_is_better: false,
        format: DisplayFormat::Decimal2,
        narration: Narration::Compare(Templates {
            improved: "- Downtime improved to {value} hrs/day ({delta}% vs 7-day average).",
            degraded: "- Downtime increased to {value} hrs/day ({delta}% vs 7-day average).",
            stable: "- Downtime is roughly stable at {value} hrs/day.",
        }),
    },
];

/// Shipments: OTIF and lead time narrate; the component flags are
/// aggregated for the snapshot but carry no sentences of their own.
pub const SHIPMENT_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "otif_flag",
        label: "OTIF",
        agg: AggKind::Mean,
        edge_pct: Some(3.0),
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Compare(Templates {
            improved: "- OTIF improved to {value} ({delta}% vs prior 30 days).",
            degraded: "- OTIF dropped to {value} ({delta}% vs prior 30 days).",
            stable: "- OTIF remains stable around {value} vs prior 30 days.",
        }),
    },
    MetricSpec {
        key: "on_time_flag",
        label: "On time",
        agg: AggKind::Mean,
        edge_pct: None,
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Silent,
    },
    MetricSpec {
        key: "in_full_flag",
        label: "In full",
        agg: AggKind::Mean,
        edge_pct: None,
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Silent,
    },
    MetricSpec {
        key: "lead_time_days",
        label: "Average lead time",
        agg: AggKind::Mean,
        edge_pct: Some(5.0),
        higher_is_better: false,
        format: DisplayFormat::Decimal1,
        narration: Narration::Compare(Templates {
            improved: "- Average lead time improved to {value} days ({delta}% vs baseline).",
            degraded: "- Average lead time increased to {value} days ({delta}% vs baseline).",
            stable: "- Lead time is broadly stable at {value} days.",
        }),
    },
];

/// Finance: revenue reports its value only; margins classify at ±3.
pub const FINANCE_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "revenue_nzd",
        label: "Total revenue",
        agg: AggKind::Sum,
        edge_pct: None,
        higher_is_better: true,
        format: DisplayFormat::Thousands,
        narration: Narration::ValueOnly("- For {period}, total revenue is ${value}."),
    },
    MetricSpec {
        key: "gross_margin_pct",
        label: "Gross margin",
        agg: AggKind::Mean,
        edge_pct: Some(3.0),
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Compare(Templates {
            improved: "- Gross margin improved to {value} ({delta}% vs prior months).",
            degraded: "- Gross margin eased to {value} ({delta}% vs prior months).",
            stable: "- Gross margin is stable around {value} versus recent months.",
        }),
    },
    MetricSpec {
        key: "ebitda_margin_pct",
        label: "EBITDA margin",
        agg: AggKind::Mean,
        edge_pct: Some(3.0),
        higher_is_better: true,
        format: DisplayFormat::Percent,
        narration: Narration::Compare(Templates {
            improved: "- EBITDA margin strengthened to {value} ({delta}% vs prior months).",
            degraded: "- EBITDA margin softened to {value} ({delta}% vs prior months).",
            stable: "- EBITDA margin is broadly stable at {value}.",
        }),
    },
];

/// Weakest mill by mean yield over the trailing 30 days.
pub const PRODUCTION_YIELD_DIAGNOSTIC: DiagnosticSpec = DiagnosticSpec {
    key: "yield_pct",
    pick: Extreme::Lowest,
    format: DisplayFormat::Percent,
    template: "- Operations: Mill **{entity}** has the lowest yield ({value} vs fleet avg {mean}) in the last 30 days.",
};

/// Highest mean downtime over the trailing 30 days.
pub const PRODUCTION_DOWNTIME_DIAGNOSTIC: DiagnosticSpec = DiagnosticSpec {
    key: "downtime_hours",
    pick: Extreme::Highest,
    format: DisplayFormat::Decimal2,
    template: "- Downtime: Mill **{entity}** carries the highest downtime ({value} hrs/day vs avg {mean} hrs).",
};

/// Weakest customer by mean OTIF over the trailing 30 days.
pub const SHIPMENT_OTIF_DIAGNOSTIC: DiagnosticSpec = DiagnosticSpec {
    key: "otif_flag",
    pick: Extreme::Lowest,
    format: DisplayFormat::Percent,
    template: "- Supply chain: Customer **{entity}** has the weakest OTIF ({value} vs overall {mean} in the last 30 days).",
};

/// Weakest region by mean gross margin over the trailing 6 months.
pub const FINANCE_MARGIN_DIAGNOSTIC: DiagnosticSpec = DiagnosticSpec {
    key: "gross_margin_pct",
    pick: Extreme::Lowest,
    format: DisplayFormat::Percent,
    template: "- Finance: Region **{entity}** has the weakest gross margin ({value} vs overall {mean} over the last 6 months).",
};

/// The prescriptive rule table: fixed recommended actions, no
/// computation behind them.
pub const PRESCRIPTIVE_ACTIONS: &[&str] = &[
    "- Run a short root-cause session on the weakest mill: focus on top 1–2 downtime drivers and quick maintenance wins.",
    "- Sit down with the lowest-OTIF customer and map their order-to-delivery steps: agree on cut-off times and booking rules.",
    "- For the weakest-margin region, review price vs cost-to-serve and consider a small price uplift or a product mix shift.",
    "- Feed these patterns back into planning: use the forecast as a simple early-warning signal rather than a hard budget.",
];
