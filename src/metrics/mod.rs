// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Bucketing of samples by time.
mod aggregate;
/// Fixed width time buckets.
mod bucket;
/// Dashboard queries against a metrics store.
mod query;
/// Time ranges and their bucket widths.
mod range;
/// Per-process sample collection.
mod recorder;
/// Samples and their stored form.
mod sample;
/// Service names from operation names.
mod service;
mod tests;

pub use self::aggregate::{
    MetricsAggregator, MetricsReport, OverallSummary, SeriesSummary, TimeSeriesPoint,
};
pub use self::bucket::{average_duration, success_rate, MetricBucket};
pub use self::query::MetricsQuery;
pub use self::range::TimeRange;
pub use self::recorder::{OperationTotals, PerformanceRecorder};
pub use self::sample::{decode_stored_metrics, MetricSample, StoredMetric, RANGE_KEY_SEPARATOR};
pub use self::service::{ServiceCatalog, DEFAULT_KNOWN_SERVICES, UNKNOWN_SERVICE};
