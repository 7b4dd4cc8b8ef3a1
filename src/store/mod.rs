// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// In-memory stores, for tests and local runs.
mod memory;

pub use self::memory::MemoryStore;

use crate::cache::{CacheEntry, CacheKey};
use crate::common::Error;
use crate::dedup::ProcessedMarker;
use crate::hash::ContentDigest;
use crate::metrics::StoredMetric;
use crate::time_id::UnixMillis;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Persistent key-value store behind the translation cache and the dedup filter.
///
/// Implementations only need single-key atomicity.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Get an entry by composite key (`content_hash`, `language_pair`).
    async fn find_translation(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error>;

    /// Whether any record (translation or marker) exists for the digest.
    async fn contains_digest(&self, digest: &ContentDigest) -> Result<bool, Error>;

    /// Insert (or overwrite) a translation.
    async fn put_translation(&self, entry: &CacheEntry) -> Result<(), Error>;

    /// Insert a processed marker.
    async fn put_marker(&self, marker: &ProcessedMarker) -> Result<(), Error>;
}

/// Bulk storage of raw metric records.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Records strictly after `since`, for one function or for all of them.
    /// Records whose timestamp cannot be compared are returned as is; callers
    /// decode and filter.
    async fn query_metrics(
        &self,
        function_name: Option<&str>,
        since: UnixMillis,
    ) -> Result<Vec<StoredMetric>, Error>;

    /// Write one record.  A record with the same function and range key is
    /// overwritten.
    async fn put_metric(&self, record: &StoredMetric) -> Result<(), Error>;
}

/// Run a store call with a time limit; running out of time is an `Error::Timeout`.
pub async fn with_timeout<T, F>(label: String, limit: Duration, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(label)),
    }
}
