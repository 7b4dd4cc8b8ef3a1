// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{MetricsStore, TranslationStore};
use crate::cache::{CacheEntry, CacheKey};
use crate::common::Error;
use crate::dedup::ProcessedMarker;
use crate::hash::ContentDigest;
use crate::metrics::StoredMetric;
use crate::time_id::{RecordId, UnixMillis};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Laid out like the Dynamo DB tables: translations by `translation_id`,
/// metrics by (`function_name`, `timestamp`).
#[derive(Default)]
struct Tables {
    translations: HashMap<RecordId, CacheEntry>,
    markers: HashMap<ContentDigest, Vec<ProcessedMarker>>,
    metrics: BTreeMap<(String, String), StoredMetric>,
}

/// A `TranslationStore` and `MetricsStore` held in memory.
///
/// `set_available(false)` makes every call fail as if the network were down,
/// and `set_latency` delays every call, so degraded paths can be exercised.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
    reads: AtomicUsize,
}

impl MemoryStore {
    /// An empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let millis = latency.as_millis().try_into().unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of read calls that reached the store (including failed ones).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of stored translation records (duplicates of a key included).
    pub fn translation_count(&self) -> usize {
        self.tables
            .lock()
            .map(|t| t.translations.len())
            .unwrap_or(0)
    }

    /// Markers stored for `digest`.
    pub fn markers(&self, digest: &ContentDigest) -> Vec<ProcessedMarker> {
        self.tables
            .lock()
            .ok()
            .and_then(|t| t.markers.get(digest).cloned())
            .unwrap_or_default()
    }

    /// Number of stored metric records.
    pub fn metric_count(&self) -> usize {
        self.tables.lock().map(|t| t.metrics.len()).unwrap_or(0)
    }

    /// Add a raw metric record (possibly malformed) directly.
    pub fn insert_metric(&self, record: StoredMetric) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.metrics.insert(
                (record.function_name.clone(), record.timestamp.clone()),
                record,
            );
        }
    }

    async fn enter(&self, operation: &str, read: bool) -> Result<(), Error> {
        if read {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::String(format!("{operation}: store unavailable")))
        } else {
            Ok(())
        }
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, Error> {
        self.tables
            .lock()
            .map_err(|_| Error::String("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn find_translation(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        self.enter("find_translation", true).await?;
        // Oldest first, like the index returning any one of the duplicates.
        Ok(self
            .tables()?
            .translations
            .values()
            .filter(|entry| entry.key() == *key)
            .min_by_key(|entry| (entry.created_at, entry.translation_id))
            .cloned())
    }

    async fn contains_digest(&self, digest: &ContentDigest) -> Result<bool, Error> {
        self.enter("contains_digest", true).await?;
        let tables = self.tables()?;
        Ok(tables.markers.contains_key(digest)
            || tables
                .translations
                .values()
                .any(|entry| &entry.content_hash == digest))
    }

    async fn put_translation(&self, entry: &CacheEntry) -> Result<(), Error> {
        self.enter("put_translation", false).await?;
        self.tables()?
            .translations
            .insert(entry.translation_id, entry.clone());
        Ok(())
    }

    async fn put_marker(&self, marker: &ProcessedMarker) -> Result<(), Error> {
        self.enter("put_marker", false).await?;
        self.tables()?
            .markers
            .entry(marker.content_hash.clone())
            .or_default()
            .push(marker.clone());
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn query_metrics(
        &self,
        function_name: Option<&str>,
        since: UnixMillis,
    ) -> Result<Vec<StoredMetric>, Error> {
        self.enter("query_metrics", true).await?;
        // Same string comparison as the Dynamo DB range condition.
        let after = since.add_millis(1).to_rfc3339();
        Ok(self
            .tables()?
            .metrics
            .values()
            .filter(|record| function_name.map_or(true, |f| record.function_name == f))
            .filter(|record| record.timestamp.as_str() >= after.as_str())
            .cloned()
            .collect())
    }

    async fn put_metric(&self, record: &StoredMetric) -> Result<(), Error> {
        self.enter("put_metric", false).await?;
        self.tables()?.metrics.insert(
            (record.function_name.clone(), record.timestamp.clone()),
            record.clone(),
        );
        Ok(())
    }
}
