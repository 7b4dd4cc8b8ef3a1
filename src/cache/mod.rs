// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Language codes, pairs, cache keys and entries.
mod key;
/// The translation cache.
mod translation_cache;

pub use self::key::{CacheEntry, CacheKey, LanguageCode, LanguagePair};
pub use self::translation_cache::{CacheStats, StoreOutcome, TranslationCache};
