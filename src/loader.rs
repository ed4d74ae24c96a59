//! Spreadsheet loading and the memoized table handle.
//!
//! [`Loader::load`] never fails: any fetch or parse problem becomes an empty
//! table plus a warning. [`SharedTable`] keeps the last outcome until it is
//! explicitly invalidated.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::logging;
use crate::storage::{FetchBlob, StorageLocation};
use crate::table::{RecordTable, parse_xlsx};

/// Result of one load attempt
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: RecordTable,
    /// Set when the fetch or parse failed; the table is then empty
    pub warning: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadOutcome {
    pub fn is_success(&self) -> bool {
        self.warning.is_none()
    }
}

pub struct Loader {
    fetcher: Arc<dyn FetchBlob>,
    location: StorageLocation,
}

impl Loader {
    pub fn new(fetcher: Arc<dyn FetchBlob>, location: StorageLocation) -> Self {
        Self { fetcher, location }
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Single attempt, no retries
    pub async fn load(&self) -> LoadOutcome {
        let started = Instant::now();

        match self.try_load().await {
            Ok((table, bytes)) => {
                logging::log_load_success(
                    &self.location,
                    bytes,
                    &table,
                    started.elapsed().as_millis(),
                );
                LoadOutcome {
                    table,
                    warning: None,
                    loaded_at: Utc::now(),
                }
            }
            Err(err) => {
                let message = format!("Failed to load data from Azure Blob: {err}");
                logging::log_warning(&message);
                LoadOutcome {
                    table: RecordTable::empty(),
                    warning: Some(message),
                    loaded_at: Utc::now(),
                }
            }
        }
    }

    async fn try_load(&self) -> Result<(RecordTable, usize)> {
        let bytes = self.fetcher.fetch(&self.location).await?;
        let table = parse_xlsx(&bytes)?;
        Ok((table, bytes.len()))
    }
}

/// Once-initialized, read-only shared handle to the loaded table.
///
/// The first reader loads under the write lock, so concurrent first reads
/// fetch once. Failed loads are kept as well: the empty table and its
/// warning stay until [`SharedTable::invalidate`] or
/// [`SharedTable::refresh`].
pub struct SharedTable {
    loader: Loader,
    slot: RwLock<Option<Arc<LoadOutcome>>>,
    loads: AtomicU64,
}

impl SharedTable {
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            slot: RwLock::new(None),
            loads: AtomicU64::new(0),
        }
    }

    pub fn location(&self) -> &StorageLocation {
        self.loader.location()
    }

    pub async fn get(&self) -> Arc<LoadOutcome> {
        if let Some(outcome) = self.slot.read().await.as_ref() {
            return Arc::clone(outcome);
        }

        let mut slot = self.slot.write().await;
        if let Some(outcome) = slot.as_ref() {
            return Arc::clone(outcome);
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        let outcome = Arc::new(self.loader.load().await);
        *slot = Some(Arc::clone(&outcome));
        outcome
    }

    /// Drop the memoized outcome; the next `get` fetches again
    pub async fn invalidate(&self) {
        self.slot.write().await.take();
    }

    pub async fn refresh(&self) -> Arc<LoadOutcome> {
        self.invalidate().await;
        self.get().await
    }

    /// Number of fetches performed so far
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}
