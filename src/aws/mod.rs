// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// A wrapper around Dynamo DB client.
mod dynamo;
/// `MetricsStore` on Dynamo DB.
mod metrics_store;
/// Unit tests.
mod tests;
/// A wrapper around Translate client.
mod translate;
/// `TranslationStore` on Dynamo DB.
mod translation_store;

pub use crate::aws::dynamo::{
    create_aws_config_loader, load_aws_config, new_ddb_client, put_ddb_item, query_ddb, scan_ddb,
    to_dynamo_av, to_dynamo_item, DynamoDbClient, DynamoQuery,
};
pub use crate::aws::metrics_store::DynamoMetricsStore;
pub use crate::aws::translate::{new_translate_client, translate_text, AwsTranslator, TranslateClient};
pub use crate::aws::translation_store::DynamoTranslationStore;
