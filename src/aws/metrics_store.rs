// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{
    new_ddb_client, put_ddb_item, query_ddb, scan_ddb, to_dynamo_av, DynamoDbClient, DynamoQuery,
};
use crate::common::{Config, Error, MetricsSettings};
use crate::metrics::StoredMetric;
use crate::store::MetricsStore;
use crate::time_id::UnixMillis;
use async_trait::async_trait;

/// `MetricsStore` on a Dynamo DB table keyed by `function_name` and `timestamp`.
pub struct DynamoMetricsStore {
    client: DynamoDbClient,
    table: String,
}

impl DynamoMetricsStore {
    /// A store on `settings.table` using an existing client.
    pub fn new(client: DynamoDbClient, settings: &MetricsSettings) -> Self {
        Self {
            client,
            table: settings.table.clone(),
        }
    }

    /// A store configured by the `[aws]` and `[metrics]` sections.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let settings = config.settings()?;
        let client = new_ddb_client(config).await;
        Ok(Self::new(client, &settings.metrics))
    }
}

#[async_trait]
impl MetricsStore for DynamoMetricsStore {
    async fn query_metrics(
        &self,
        function_name: Option<&str>,
        since: UnixMillis,
    ) -> Result<Vec<StoredMetric>, Error> {
        // Keys at `since` carry an ID suffix and compare greater than `since`
        // itself, so the exclusive bound starts at the next millisecond.
        let since = to_dynamo_av(since.add_millis(1).to_rfc3339())?;
        match function_name {
            Some(function_name) => {
                let query = DynamoQuery {
                    table: &self.table,
                    index: None,
                    hash: ("function_name", to_dynamo_av(function_name)?),
                    range: Some(("timestamp", Some(since), None)),
                    limit: None,
                    ignore_corrupt: true,
                };
                query_ddb(&self.client, &query).await
            }
            // No hash key to query by.
            None => scan_ddb(&self.client, &self.table, Some(("timestamp", since))).await,
        }
    }

    async fn put_metric(&self, record: &StoredMetric) -> Result<(), Error> {
        put_ddb_item(&self.client, record, &self.table).await
    }
}
