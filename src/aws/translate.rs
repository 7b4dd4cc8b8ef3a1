// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::load_aws_config;
use crate::cache::LanguagePair;
use crate::common::{Config, Error};
use crate::translate::Translator;
use async_trait::async_trait;
use aws_sdk_translate::Client;

/// A convenient alias for translate client so consuming code doesn't need to add it to `Cargo.toml`
pub type TranslateClient = aws_sdk_translate::Client;

/// Creates a Translate client.
pub async fn new_translate_client(config: &Config) -> TranslateClient {
    let aws_config = load_aws_config(config).await;
    Client::new(&aws_config)
}

/// Translates text from one language to another.
pub async fn translate_text(
    client: &TranslateClient,
    source_text: &str,
    source_language_code: &str,
    target_language_code: &str,
) -> Result<String, Error> {
    let output = client
        .translate_text()
        .source_language_code(source_language_code.to_owned())
        .target_language_code(target_language_code.to_owned())
        .text(source_text)
        .send()
        .await
        .map_err(|e| {
            Error::Anyhow(
                e.into(),
                format!("translate_text({source_language_code}->{target_language_code})"),
            )
        })?;
    Ok(output.translated_text().to_owned())
}

/// `Translator` backed by AWS Translate.
pub struct AwsTranslator {
    client: TranslateClient,
}

impl AwsTranslator {
    /// Wraps an existing client.
    pub fn new(client: TranslateClient) -> Self {
        Self { client }
    }

    /// Creates a client configured by the `[aws]` section.
    pub async fn from_config(config: &Config) -> Self {
        Self::new(new_translate_client(config).await)
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    async fn translate_text(&self, text: &str, pair: &LanguagePair) -> Result<String, Error> {
        translate_text(&self.client, text, &pair.source, &pair.target).await
    }
}
