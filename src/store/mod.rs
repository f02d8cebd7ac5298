//! Read-only access to the tabular KPI data.
//!
//! The store is an external collaborator behind a trait: composers
//! receive it by reference, which keeps the engine testable against
//! fixed in-memory fixtures and leaves connection management (or a real
//! relational backend) to the caller.

pub mod loader;

use crate::models::{FinanceRow, ProductionRow, ShipmentRow};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the data collaborator's read path.
///
/// A failed read is fatal to the single report call that issued it; the
/// core never retries, it propagates with enough context (domain, path)
/// for the caller to log and decide.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {domain} data from {path}")]
    Io {
        domain: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {domain} data in {path}")]
    Parse {
        domain: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {domain} data file found under {dir}")]
    Missing { domain: &'static str, dir: PathBuf },

    /// Query-time failure for non-file-backed store implementations.
    #[allow(dead_code)] // Reserved for live database backends
    #[error("query for {domain} rows failed: {reason}")]
    Query { domain: &'static str, reason: String },
}

/// The three abstract tabular read operations, one per domain.
pub trait KpiStore {
    fn production(&self) -> Result<Vec<ProductionRow>, StoreError>;
    fn shipments(&self) -> Result<Vec<ShipmentRow>, StoreError>;
    fn finance(&self) -> Result<Vec<FinanceRow>, StoreError>;
}

/// Row vectors held in memory, the default backing for report runs and
/// the only one used in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub production: Vec<ProductionRow>,
    pub shipments: Vec<ShipmentRow>,
    pub finance: Vec<FinanceRow>,
}

impl KpiStore for MemoryStore {
    fn production(&self) -> Result<Vec<ProductionRow>, StoreError> {
        Ok(self.production.clone())
    }

    fn shipments(&self) -> Result<Vec<ShipmentRow>, StoreError> {
        Ok(self.shipments.clone())
    }

    fn finance(&self) -> Result<Vec<FinanceRow>, StoreError> {
        Ok(self.finance.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore {
            production: vec![ProductionRow {
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                site_name: "Mill A".to_string(),
                yield_pct: Some(0.88),
                output_volume_m3: Some(640.0),
                downtime_hours: Some(1.5),
            }],
            shipments: Vec::new(),
            finance: Vec::new(),
        };

        assert_eq!(store.production().unwrap().len(), 1);
        assert!(store.shipments().unwrap().is_empty());
        assert!(store.finance().unwrap().is_empty());
    }

    #[test]
    fn test_store_error_carries_domain_context() {
        let err = StoreError::Missing {
            domain: "finance",
            dir: PathBuf::from("/data"),
        };
        let message = err.to_string();
        assert!(message.contains("finance"));
        assert!(message.contains("/data"));
    }
}
