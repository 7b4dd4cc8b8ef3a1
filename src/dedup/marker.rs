// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::hash::ContentDigest;
use crate::time_id::{RecordId, UnixMillis};
use serde::{Deserialize, Serialize};

/// What happened to a piece of content.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessOutcome {
    /// Text was extracted and results were stored.
    Stored,
    /// Nothing was stored (duplicate, no text found, etc.).
    Skipped,
}

/// Records that content was handled.  Markers share the translation table so the
/// content hash index answers "seen before?" for images and text alike.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProcessedMarker {
    /// Primary key, shared key space with `CacheEntry`.
    pub translation_id: RecordId,
    /// Index hash key.
    pub content_hash: ContentDigest,
    /// Always `ProcessedMarker::LANGUAGE_PAIR`.
    pub language_pair: String,
    /// Outcome.
    pub outcome: ProcessOutcome,
    /// Where the content came from, e.g. a subreddit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// ID of the post that carried the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// URL the content was downloaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// When the content was handled.
    pub created_at: UnixMillis,
}

impl ProcessedMarker {
    /// Index range key value of markers.  Never equal to a `LanguagePair::index_value`,
    /// which always contains a `:`.
    pub const LANGUAGE_PAIR: &'static str = "#processed";

    /// A marker for `digest`, timestamped now.
    pub fn new(content_hash: ContentDigest, outcome: ProcessOutcome) -> Self {
        Self {
            translation_id: RecordId::generate(),
            content_hash,
            language_pair: Self::LANGUAGE_PAIR.to_string(),
            outcome,
            source: None,
            post_id: None,
            source_url: None,
            created_at: UnixMillis::now(),
        }
    }

    /// Sets the source (subreddit, feed name, ...).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the post ID.
    pub fn post_id(mut self, post_id: impl Into<String>) -> Self {
        self.post_id = Some(post_id.into());
        self
    }

    /// Sets the source URL.
    pub fn source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }
}
