//! Data directory loading.
//!
//! Discovers the three domain record files (`production.json`,
//! `shipments.json`, `finance.json`) anywhere under a data directory
//! and decodes them into a [`MemoryStore`]. Matching is by file stem,
//! case-insensitive, so `Data/2025/Production.json` works too.

use crate::store::{MemoryStore, StoreError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Find the data file for one domain under `dir`.
///
/// The first match in walk order wins; later duplicates are logged and
/// ignored.
fn find_domain_file(dir: &Path, domain: &'static str) -> Option<PathBuf> {
    let mut found: Option<PathBuf> = None;

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let stem_matches = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.eq_ignore_ascii_case(domain));

        if !(is_json && stem_matches) {
            continue;
        }

        if let Some(first) = &found {
            warn!(
                "Ignoring duplicate {} data file {} (using {})",
                domain,
                path.display(),
                first.display()
            );
        } else {
            debug!("Found {} data: {}", domain, path.display());
            found = Some(path.to_path_buf());
        }
    }

    found
}

/// Read and decode one domain file.
fn load_rows<T: DeserializeOwned>(dir: &Path, domain: &'static str) -> Result<Vec<T>, StoreError> {
    let path = find_domain_file(dir, domain).ok_or_else(|| StoreError::Missing {
        domain,
        dir: dir.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
        domain,
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        domain,
        path,
        source,
    })
}

/// Load all three domains from a data directory.
pub fn load_dir(dir: &Path) -> Result<MemoryStore, StoreError> {
    let store = MemoryStore {
        production: load_rows(dir, "production")?,
        shipments: load_rows(dir, "shipments")?,
        finance: load_rows(dir, "finance")?,
    };

    debug!(
        "Loaded {} production, {} shipment, {} finance rows",
        store.production.len(),
        store.shipments.len(),
        store.finance.len()
    );

    Ok(store)
}
