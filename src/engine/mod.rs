//! The temporal KPI comparison and forecasting engine.
//!
//! Leaf-first: `window` selects and aggregates rows, `classify` turns a
//! current/baseline pair into a classified percent change, `forecast`
//! fits a trend line, and `narrator` renders spec-table-driven
//! narrative lines. `domains` holds the fixed per-domain policy tables.

pub mod classify;
pub mod domains;
pub mod forecast;
pub mod narrator;
pub mod window;
