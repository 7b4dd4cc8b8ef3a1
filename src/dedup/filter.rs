// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::ProcessedMarker;
use crate::cache::StoreOutcome;
use crate::common::CacheSettings;
use crate::hash::ContentDigest;
use crate::log::RunLog;
use crate::store::{with_timeout, TranslationStore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Why content was judged a duplicate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DuplicateReason {
    /// The source URL was already handled in this run.
    Url,
    /// The store holds a record with the same digest.
    Content,
}

/// Result of `ImageDedupFilter::check_duplicate`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DedupVerdict {
    /// Digest of the checked content.
    pub digest: ContentDigest,
    /// `Some` for duplicates.
    pub reason: Option<DuplicateReason>,
}

impl DedupVerdict {
    /// Whether the content should be skipped.
    pub fn is_duplicate(&self) -> bool {
        self.reason.is_some()
    }

    /// `(is_duplicate, digest)`.
    pub fn into_parts(self) -> (bool, ContentDigest) {
        (self.reason.is_some(), self.digest)
    }
}

/// Keeps images from being processed twice.
///
/// The persistent check (any record with the same digest) is what holds across
/// runs.  The URL set only lives as long as the filter and saves store round
/// trips within a batch.  Store failures count as "not a duplicate".
pub struct ImageDedupFilter {
    store: Arc<dyn TranslationStore>,
    timeout: Duration,
    processed_urls: Mutex<HashSet<String>>,
    log: RunLog,
}

impl ImageDedupFilter {
    /// A filter over `store` (normally the translation cache's store).
    pub fn new(store: Arc<dyn TranslationStore>, settings: &CacheSettings, log: RunLog) -> Self {
        Self {
            store,
            timeout: settings.timeout(),
            processed_urls: Mutex::new(HashSet::new()),
            log,
        }
    }

    /// Decide whether `content` was already processed.
    pub async fn check_duplicate(&self, content: &[u8], source_url: Option<&str>) -> DedupVerdict {
        let digest = ContentDigest::of_bytes(content);

        if let Some(url) = source_url {
            let seen = self
                .processed_urls
                .lock()
                .map(|urls| urls.contains(url))
                .unwrap_or(false);
            if seen {
                self.log.trace(format!("duplicate url {url}"));
                return DedupVerdict {
                    digest,
                    reason: Some(DuplicateReason::Url),
                };
            }
        }

        let label = format!("dedup contains_digest(h={digest})");
        let result = with_timeout(label.clone(), self.timeout, self.store.contains_digest(&digest)).await;
        let reason = match self.log.degrade(label, result) {
            Some(true) => {
                self.log.trace(format!("duplicate content {digest}"));
                Some(DuplicateReason::Content)
            }
            Some(false) | None => None,
        };
        DedupVerdict { digest, reason }
    }

    /// Remember `source_url` for the rest of this run, whatever the outcome was.
    /// Returns `false` if it was already remembered.
    pub fn mark_processed(&self, source_url: &str) -> bool {
        self.processed_urls
            .lock()
            .map(|mut urls| urls.insert(source_url.to_string()))
            .unwrap_or(false)
    }

    /// Persist `marker` so later runs see its digest as processed.  Failures
    /// are logged, not returned.
    pub async fn remember(&self, marker: &ProcessedMarker) -> StoreOutcome {
        let label = format!("dedup put_marker(h={})", marker.content_hash);
        let result = with_timeout(label.clone(), self.timeout, self.store.put_marker(marker)).await;
        match self.log.degrade(label, result) {
            Some(()) => StoreOutcome::Stored,
            None => StoreOutcome::Failed,
        }
    }

    /// URLs remembered in this run.
    pub fn processed_url_count(&self) -> usize {
        self.processed_urls.lock().map(|urls| urls.len()).unwrap_or(0)
    }
}
