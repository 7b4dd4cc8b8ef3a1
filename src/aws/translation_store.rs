// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{new_ddb_client, put_ddb_item, query_ddb, to_dynamo_av, DynamoDbClient, DynamoQuery};
use crate::cache::{CacheEntry, CacheKey};
use crate::common::{CacheSettings, Config, Error};
use crate::dedup::ProcessedMarker;
use crate::hash::ContentDigest;
use crate::store::TranslationStore;
use async_trait::async_trait;
use serde::de::IgnoredAny;

/// `TranslationStore` on a Dynamo DB table with a `content_hash`/`language_pair`
/// global secondary index.  The index must project all attributes.
pub struct DynamoTranslationStore {
    client: DynamoDbClient,
    table: String,
    content_index: String,
}

impl DynamoTranslationStore {
    /// A store on `settings.table` using an existing client.
    pub fn new(client: DynamoDbClient, settings: &CacheSettings) -> Self {
        Self {
            client,
            table: settings.table.clone(),
            content_index: settings.content_index.clone(),
        }
    }

    /// A store configured by the `[aws]` and `[cache]` sections.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let settings = config.settings()?;
        let client = new_ddb_client(config).await;
        Ok(Self::new(client, &settings.cache))
    }

    fn by_digest(&self, digest: &ContentDigest) -> Result<DynamoQuery<'_>, Error> {
        Ok(DynamoQuery {
            table: &self.table,
            index: Some(&self.content_index),
            hash: ("content_hash", to_dynamo_av(digest)?),
            range: None,
            limit: Some(1),
            ignore_corrupt: false,
        })
    }
}

#[async_trait]
impl TranslationStore for DynamoTranslationStore {
    async fn find_translation(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        let pair = to_dynamo_av(key.pair.index_value())?;
        let query = DynamoQuery {
            range: Some(("language_pair", Some(pair.clone()), Some(pair))),
            ..self.by_digest(&key.digest)?
        };
        let entries: Vec<CacheEntry> = query_ddb(&self.client, &query).await?;
        Ok(entries.into_iter().next())
    }

    async fn contains_digest(&self, digest: &ContentDigest) -> Result<bool, Error> {
        // Translations and markers both count; their attributes don't matter.
        let items: Vec<IgnoredAny> = query_ddb(&self.client, &self.by_digest(digest)?).await?;
        Ok(!items.is_empty())
    }

    async fn put_translation(&self, entry: &CacheEntry) -> Result<(), Error> {
        put_ddb_item(&self.client, entry, &self.table).await
    }

    async fn put_marker(&self, marker: &ProcessedMarker) -> Result<(), Error> {
        put_ddb_item(&self.client, marker, &self.table).await
    }
}
