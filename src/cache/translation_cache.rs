// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{CacheEntry, CacheKey, LanguagePair};
use crate::common::CacheSettings;
use crate::hash::ContentDigest;
use crate::log::RunLog;
use crate::store::{with_timeout, TranslationStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Result of `TranslationCache::store`.  Neither variant is an error for the
/// caller; the translation itself already succeeded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreOutcome {
    /// Persisted.
    Stored,
    /// Not persisted; logged.
    Failed,
}

/// Counters since the cache was constructed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Lookups treated as misses because the store failed.
    pub degraded: u64,
    /// Successful stores.
    pub stored: u64,
    /// Failed stores.
    pub store_failures: u64,
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    degraded: AtomicU64,
    stored: AtomicU64,
    store_failures: AtomicU64,
}

/// Write-once, read-many cache of translations keyed by text digest and
/// language pair.  An optimization only: store failures never reach the caller.
pub struct TranslationCache {
    store: Arc<dyn TranslationStore>,
    timeout: Duration,
    log: RunLog,
    stats: AtomicStats,
}

impl TranslationCache {
    /// A cache over `store`, bounding each call by `settings.timeout_ms`.
    pub fn new(store: Arc<dyn TranslationStore>, settings: &CacheSettings, log: RunLog) -> Self {
        Self {
            store,
            timeout: settings.timeout(),
            log,
            stats: Default::default(),
        }
    }

    /// The backing store, for sharing with an `ImageDedupFilter`.
    pub fn backing_store(&self) -> Arc<dyn TranslationStore> {
        Arc::clone(&self.store)
    }

    /// Cached translation of `digest` along `pair`, if any.  A store failure or
    /// timeout is logged and reported as a miss.
    pub async fn lookup(&self, digest: &ContentDigest, pair: &LanguagePair) -> Option<String> {
        let key = CacheKey::new(digest.clone(), pair.clone());
        let label = format!("cache lookup(h={digest}, p={})", pair.index_value());
        let result = with_timeout(label.clone(), self.timeout, self.store.find_translation(&key)).await;
        match self.log.degrade(label, result) {
            Some(Some(entry)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.translated_text)
            }
            Some(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.stats.degraded.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Persist a translation.  Callers look up first; storing an existing key
    /// writes another record with the same text.
    pub async fn store(
        &self,
        digest: &ContentDigest,
        pair: &LanguagePair,
        translated_text: &str,
    ) -> StoreOutcome {
        let key = CacheKey::new(digest.clone(), pair.clone());
        let entry = CacheEntry::new(&key, translated_text.to_string());
        let label = format!("cache store(h={digest}, p={})", pair.index_value());
        let result = with_timeout(label.clone(), self.timeout, self.store.put_translation(&entry)).await;
        match self.log.degrade(label, result) {
            Some(()) => {
                self.stats.stored.fetch_add(1, Ordering::Relaxed);
                StoreOutcome::Stored
            }
            None => {
                self.stats.store_failures.fetch_add(1, Ordering::Relaxed);
                StoreOutcome::Failed
            }
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            degraded: self.stats.degraded.load(Ordering::Relaxed),
            stored: self.stats.stored.load(Ordering::Relaxed),
            store_failures: self.stats.store_failures.load(Ordering::Relaxed),
        }
    }
}
