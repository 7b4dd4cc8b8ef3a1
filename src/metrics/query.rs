// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{decode_stored_metrics, MetricsAggregator, MetricsReport, ServiceCatalog, TimeRange};
use crate::common::{Error, MetricsSettings};
use crate::log::RunLog;
use crate::store::{with_timeout, MetricsStore};
use crate::time_id::UnixMillis;
use std::sync::Arc;
use std::time::Duration;

/// Answers dashboard queries from a `MetricsStore`.
///
/// Unlike the cache, a store failure here is reported to the caller.
pub struct MetricsQuery {
    store: Arc<dyn MetricsStore>,
    aggregator: MetricsAggregator,
    timeout: Duration,
    log: RunLog,
}

impl MetricsQuery {
    /// Query `store` with the timeout and service catalog of `settings`.
    pub fn new(store: Arc<dyn MetricsStore>, settings: &MetricsSettings, log: RunLog) -> Self {
        let catalog = match &settings.known_services {
            Some(known) => ServiceCatalog::new(known.iter().cloned()),
            None => ServiceCatalog::default(),
        };
        Self {
            store,
            aggregator: MetricsAggregator::new(catalog),
            timeout: settings.timeout(),
            log,
        }
    }

    /// Report over `range` ending now, optionally for one function.
    pub async fn report(
        &self,
        range: TimeRange,
        function_name: Option<&str>,
    ) -> Result<MetricsReport, Error> {
        self.report_at(range, function_name, UnixMillis::now()).await
    }

    /// Report over `range` ending at `now`, optionally for one function.
    pub async fn report_at(
        &self,
        range: TimeRange,
        function_name: Option<&str>,
        now: UnixMillis,
    ) -> Result<MetricsReport, Error> {
        let since = now.sub_millis(range.span_millis());
        let label = format!(
            "query_metrics(f={}, range={range})",
            function_name.unwrap_or("*")
        );
        let records = with_timeout(
            label.clone(),
            self.timeout,
            self.store.query_metrics(function_name, since),
        )
        .await;
        let records = self.log.call(label, records)?;
        let (samples, skipped) = decode_stored_metrics(&records, &self.log);
        let mut report = self.aggregator.ingest_at(&samples, range, now);
        report.summary.skipped_records = skipped;
        Ok(report)
    }
}
