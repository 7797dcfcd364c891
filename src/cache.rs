//! Per-sheet memoization of normalized records.

use crate::error::Result;
use crate::model::MaterialRecord;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Normalized records of one sheet, shared between requests.
pub type SheetRecords = Arc<Vec<MaterialRecord>>;

/// Cache of normalized sheets keyed by sheet name.
///
/// Entries are filled on first request and never evicted. Each key has its
/// own one-time cell, so concurrent misses for the same sheet run the
/// initializer once while other sheets proceed independently.
#[derive(Debug, Default)]
pub struct SheetCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<SheetRecords>>>>,
}

impl SheetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached records for a sheet, if already populated.
    pub fn get(&self, name: &str) -> Option<SheetRecords> {
        self.entries
            .lock()
            .get(name)
            .and_then(|cell| cell.get().cloned())
    }

    /// Get the cached records for a sheet, computing them with `init` on a
    /// miss.
    ///
    /// If `init` fails nothing is stored and the error is returned; the next
    /// call retries.
    pub async fn get_or_try_insert_with<F>(&self, name: &str, init: F) -> Result<SheetRecords>
    where
        F: FnOnce() -> Result<Vec<MaterialRecord>>,
    {
        let cell = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(name.to_string()).or_default())
        };

        if let Some(records) = cell.get() {
            tracing::trace!(sheet = name, "sheet cache hit");
            return Ok(Arc::clone(records));
        }

        cell.get_or_try_init(|| async move {
            let records = init()?;
            tracing::debug!(sheet = name, rows = records.len(), "sheet normalized and cached");
            Ok(Arc::new(records))
        })
        .await
        .map(Arc::clone)
    }

    /// Whether a sheet's records are cached.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of populated entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Check if no entry is populated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
