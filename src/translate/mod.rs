// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Lookup, translate, store.
mod cached;

pub use self::cached::{CachedTranslator, Translation};

use crate::cache::LanguagePair;
use crate::common::Error;
use async_trait::async_trait;

/// A machine translation backend.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` along `pair`.
    async fn translate_text(&self, text: &str, pair: &LanguagePair) -> Result<String, Error>;
}
