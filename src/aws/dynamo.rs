// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::{Config, Error};
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::{BehaviorVersion, ConfigLoader, SdkConfig};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// A convenient alias for Dynamo DB client so consuming code doesn't need to add it to `Cargo.toml`
pub type DynamoDbClient = aws_sdk_dynamodb::Client;

type LastEvaluatedKey = Option<HashMap<String, AttributeValue>>;

/// Create an AWS config loader with profile and region.
pub fn create_aws_config_loader(config: &Config) -> ConfigLoader {
    let mut config_loader = aws_config::defaults(BehaviorVersion::v2023_11_09());
    if let Ok(settings) = config.settings() {
        if let Some(profile_name) = settings.aws.profile {
            if config.debug() {
                println!("AWS using profile name {profile_name}");
            }
            let region = ProfileFileRegionProvider::builder()
                .profile_name(&profile_name)
                .build();
            config_loader = config_loader.profile_name(&profile_name).region(region)
        }
    };
    config_loader
}

/// Load AWS configuration with profile and region.
pub async fn load_aws_config(config: &Config) -> SdkConfig {
    let config_loader = create_aws_config_loader(config);
    config_loader.load().await
}

/// Creates a Dynamo DB client.
pub async fn new_ddb_client(config: &Config) -> DynamoDbClient {
    let config = load_aws_config(config).await;
    Client::new(&config)
}

/// Key condition of a query on `#h` (hash key) and optionally `#r` (range key).
///
/// `lo == hi` is an equality condition.
pub(crate) fn key_condition_expression(
    lo: Option<&AttributeValue>,
    hi: Option<&AttributeValue>,
) -> &'static str {
    match (lo, hi) {
        (None, None) => "#h = :hv",
        (Some(lo), Some(hi)) if lo == hi => "#h = :hv AND #r = :lo",
        (Some(_), None) => "#h = :hv AND #r >= :lo",
        (None, Some(_)) => "#h = :hv AND #r <= :hi",
        (Some(_), Some(_)) => "#h = :hv AND #r BETWEEN :lo AND :hi",
    }
}

/// Parameters of one query.  `index` queries a global secondary index, which
/// can only be read with eventual consistency.
pub struct DynamoQuery<'a> {
    /// Table name.
    pub table: &'a str,
    /// Global secondary index, if any.
    pub index: Option<&'a str>,
    /// Hash key name and value.
    pub hash: (&'a str, AttributeValue),
    /// Range key name with optional lower and upper bounds.
    pub range: Option<(&'a str, Option<AttributeValue>, Option<AttributeValue>)>,
    /// Stop after this many items.
    pub limit: Option<i32>,
    /// Skip items that fail to deserialize instead of failing the query.
    pub ignore_corrupt: bool,
}

impl DynamoQuery<'_> {
    fn context(&self) -> String {
        match self.index {
            Some(index) => format!("query(t={}, i={index}, h={})", self.table, self.hash.0),
            None => format!("query(t={}, h={})", self.table, self.hash.0),
        }
    }
}

async fn query_inner<O: DeserializeOwned>(
    client: &DynamoDbClient,
    query: &DynamoQuery<'_>,
    last_evaluated_key: LastEvaluatedKey,
) -> Result<(Vec<O>, LastEvaluatedKey), Error> {
    let mut scan = client
        .query()
        .consistent_read(query.index.is_none())
        .table_name(query.table)
        .set_index_name(query.index.map(str::to_string))
        .set_limit(query.limit)
        .expression_attribute_names("#h", query.hash.0)
        .expression_attribute_values(":hv", query.hash.1.clone())
        .set_exclusive_start_key(last_evaluated_key);

    if let Some((range_name, lo, hi)) = &query.range {
        scan = scan
            .key_condition_expression(key_condition_expression(lo.as_ref(), hi.as_ref()))
            .expression_attribute_names("#r", *range_name);
        if let Some(lo) = lo {
            scan = scan.expression_attribute_values(":lo", lo.clone());
        }
        if let Some(hi) = hi.as_ref().filter(|hi| Some(*hi) != lo.as_ref()) {
            scan = scan.expression_attribute_values(":hi", hi.clone());
        }
    } else {
        scan = scan.key_condition_expression(key_condition_expression(None, None));
    }

    let scan_output = scan
        .send()
        .await
        .map_err(|e| Error::Dynamo(e.into(), query.context()))?;

    let mut ret = Vec::new();
    for item in scan_output.items.unwrap_or_default() {
        match serde_dynamo::from_item(item) {
            Err(e) => {
                if !query.ignore_corrupt {
                    return Err(Error::Serde(e));
                }
            }
            Ok(de) => ret.push(de),
        }
    }
    Ok((ret, scan_output.last_evaluated_key))
}

/// Query and return items, following pages until `limit` items were read or
/// the table is exhausted.
pub async fn query_ddb<O: DeserializeOwned>(
    client: &DynamoDbClient,
    query: &DynamoQuery<'_>,
) -> Result<Vec<O>, Error> {
    let limit = query
        .limit
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(usize::MAX);
    let mut ret = Vec::new();
    let mut last_evaluated_key = None;
    loop {
        let (mut items, lek) = query_inner(client, query, last_evaluated_key).await?;
        ret.append(&mut items);
        last_evaluated_key = lek;

        if last_evaluated_key.is_none() || ret.len() >= limit {
            break;
        }
    }
    ret.truncate(limit);
    Ok(ret)
}

/// Put an item into the specified Dynamo DB table.
pub async fn put_ddb_item<I: Serialize>(
    client: &DynamoDbClient,
    item: I,
    table: &str,
) -> Result<(), Error> {
    let ser = to_dynamo_item(item)?;

    let req = client.put_item().table_name(table).set_item(Some(ser));

    match req.send().await {
        Err(e) => Err(Error::Dynamo(e.into(), format!("put_item(t={table})"))),
        Ok(_) => Ok(()),
    }
}

async fn scan_inner<O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    at_least: Option<&(&str, AttributeValue)>,
    last_evaluated_key: LastEvaluatedKey,
) -> Result<(Vec<O>, LastEvaluatedKey), Error> {
    let mut scan = client
        .scan()
        .consistent_read(true)
        .table_name(table)
        .set_exclusive_start_key(last_evaluated_key);
    if let Some((name, lo)) = at_least {
        scan = scan
            .filter_expression("#f >= :lo")
            .expression_attribute_names("#f", *name)
            .expression_attribute_values(":lo", lo.clone());
    }
    let scan_output = scan
        .send()
        .await
        .map_err(|e| Error::Dynamo(e.into(), format!("scan(t={table})")))?;

    // Corrupt items are skipped; scans feed reports, not lookups.
    let ret = scan_output
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| serde_dynamo::from_item(item).ok())
        .collect();
    Ok((ret, scan_output.last_evaluated_key))
}

/// Scan and return items from the specified Dynamo DB table, optionally only
/// those whose attribute `at_least.0` is at least `at_least.1`.
pub async fn scan_ddb<O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    at_least: Option<(&str, AttributeValue)>,
) -> Result<Vec<O>, Error> {
    let mut ret = Vec::new();
    let mut last_evaluated_key = None;
    loop {
        let (mut items, lek) =
            scan_inner(client, table, at_least.as_ref(), last_evaluated_key).await?;
        ret.append(&mut items);
        last_evaluated_key = lek;

        if last_evaluated_key.is_none() {
            break;
        }
    }

    Ok(ret)
}

/// Packs a Dynamo DB `AttributeValue`.
pub fn to_dynamo_av<T: Serialize>(value: T) -> Result<AttributeValue, Error> {
    serde_dynamo::to_attribute_value(value).map_err(Error::Serde)
}

/// Packs a Dynamo DB item.
pub fn to_dynamo_item<T: Serialize>(value: T) -> Result<HashMap<String, AttributeValue>, Error> {
    serde_dynamo::to_item(value).map_err(Error::Serde)
}
