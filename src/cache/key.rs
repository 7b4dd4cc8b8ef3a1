// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use crate::hash::ContentDigest;
use crate::time_id::{RecordId, UnixMillis};
use crate::{impl_wrapper_str, serde_str};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A language code such as `en` or `zh-TW`, compared exactly as given.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct LanguageCode(String);
impl_wrapper_str!(LanguageCode);
serde_str!(LanguageCode);

impl LanguageCode {
    /// Rejects empty (or blank) codes.
    pub fn new(code: impl Into<String>) -> Result<Self, Error> {
        let code = code.into();
        if code.trim().is_empty() {
            Err(Error::String("language code must not be empty".to_string()))
        } else {
            Ok(Self(code))
        }
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An ordered (source, target) translation direction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LanguagePair {
    /// Language of the text being translated.
    pub source: LanguageCode,
    /// Language to translate into.
    pub target: LanguageCode,
}

impl LanguagePair {
    /// Separator of the stored `language_pair` attribute.
    pub const SEPARATOR: char = ':';

    /// Both codes must be non-empty.
    pub fn new(source: &str, target: &str) -> Result<Self, Error> {
        Ok(Self {
            source: LanguageCode::new(source)?,
            target: LanguageCode::new(target)?,
        })
    }

    /// Whether translating would be a no-op.
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// Value of the `language_pair` index attribute, e.g. `en:es`.
    pub fn index_value(&self) -> String {
        format!("{}{}{}", self.source, Self::SEPARATOR, self.target)
    }
}

impl Display for LanguagePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// Composite cache key.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CacheKey {
    /// Digest of the source text.
    pub digest: ContentDigest,
    /// Translation direction.
    pub pair: LanguagePair,
}

impl CacheKey {
    /// Key for `digest` translated along `pair`.
    pub fn new(digest: ContentDigest, pair: LanguagePair) -> Self {
        Self { digest, pair }
    }
}

/// A stored translation.  Written once per key, never updated.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CacheEntry {
    /// Primary key.
    pub translation_id: RecordId,
    /// Index hash key.
    pub content_hash: ContentDigest,
    /// Index range key, see `LanguagePair::index_value`.
    pub language_pair: String,
    /// Source language.
    pub source_language: LanguageCode,
    /// Target language.
    pub target_language: LanguageCode,
    /// The translation.
    pub translated_text: String,
    /// When the entry was stored.
    pub created_at: UnixMillis,
}

impl CacheEntry {
    /// Creates an entry with a fresh ID, timestamped now.
    pub fn new(key: &CacheKey, translated_text: String) -> Self {
        Self {
            translation_id: RecordId::generate(),
            content_hash: key.digest.clone(),
            language_pair: key.pair.index_value(),
            source_language: key.pair.source.clone(),
            target_language: key.pair.target.clone(),
            translated_text,
            created_at: UnixMillis::now(),
        }
    }

    /// The key this entry answers.
    pub fn key(&self) -> CacheKey {
        CacheKey {
            digest: self.content_hash.clone(),
            pair: LanguagePair {
                source: self.source_language.clone(),
                target: self.target_language.clone(),
            },
        }
    }
}
