// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Translator;
use crate::cache::{LanguagePair, TranslationCache};
use crate::common::Error;
use crate::hash::ContentDigest;
use crate::metrics::PerformanceRecorder;
use std::sync::Arc;

/// Result of `CachedTranslator::translate`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Translation {
    /// Translated (or unchanged) text.
    pub text: String,
    /// Whether the text came from the cache.
    pub cached: bool,
}

/// Looks translations up in a `TranslationCache` before calling the backend,
/// and stores what the backend returns.
pub struct CachedTranslator {
    translator: Arc<dyn Translator>,
    cache: Arc<TranslationCache>,
    recorder: Option<Arc<PerformanceRecorder>>,
}

impl CachedTranslator {
    /// A translator over `translator` and `cache`.
    pub fn new(translator: Arc<dyn Translator>, cache: Arc<TranslationCache>) -> Self {
        Self {
            translator,
            cache,
            recorder: None,
        }
    }

    /// Time backend calls as `translate_text` operations.
    pub fn with_recorder(mut self, recorder: Arc<PerformanceRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// The cache in use.
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate `text` along `pair`.  Blank text and identity pairs are
    /// returned as is.  Backend errors are returned; cache errors are not.
    pub async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<Translation, Error> {
        if text.trim().is_empty() || pair.is_identity() {
            return Ok(Translation {
                text: text.to_string(),
                cached: false,
            });
        }

        let digest = ContentDigest::of_text(text);
        if let Some(text) = self.cache.lookup(&digest, pair).await {
            return Ok(Translation { text, cached: true });
        }

        let call = self.translator.translate_text(text, pair);
        let translated = match &self.recorder {
            Some(recorder) => recorder.time("translate_text", call).await?,
            None => call.await?,
        };
        self.cache.store(&digest, pair, &translated).await;
        Ok(Translation {
            text: translated,
            cached: false,
        })
    }
}
