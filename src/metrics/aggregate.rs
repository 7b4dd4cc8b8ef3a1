// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::bucket::{average_duration, success_rate};
use super::{MetricBucket, MetricSample, ServiceCatalog, TimeRange};
use crate::time_id::UnixMillis;
use serde::Serialize;
use std::collections::BTreeMap;

/// One chart point (one bucket).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Bucket start, RFC 3339.
    pub timestamp: String,
    /// Short axis label.
    pub label: String,
    /// Calls in the bucket.
    pub calls: u64,
    /// Failed calls in the bucket.
    pub failures: u64,
    /// Mean duration in seconds.
    pub avg_response_time: f64,
    /// Percentage of successful calls.
    pub success_rate: f64,
}

/// Totals and time series of one function or service.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    /// Calls in the window.
    pub total_calls: u64,
    /// Sum of durations, in seconds.
    pub total_duration: f64,
    /// Failed calls.
    pub total_failures: u64,
    /// `total_duration / total_calls`, or 0.
    pub avg_response_time: f64,
    /// Percentage of successful calls, or 100.
    pub success_rate: f64,
    /// One point per bucket of the window, oldest first.
    pub time_series: Vec<TimeSeriesPoint>,
}

/// Totals across all functions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    /// Calls in the window.
    pub total_calls: u64,
    /// Sum of durations, in seconds.
    pub total_duration: f64,
    /// Failed calls.
    pub total_failures: u64,
    /// `total_duration / total_calls`, or 0.
    pub avg_response_time: f64,
    /// Percentage of successful calls, or 100.
    pub success_rate: f64,
    /// Functions with at least one call in the window.
    pub function_count: usize,
    /// Services with at least one call in the window.
    pub service_count: usize,
    /// Stored records that could not be decoded.
    pub skipped_records: usize,
}

/// Result of `MetricsAggregator::ingest`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    /// Requested range.
    pub time_range: TimeRange,
    /// Exclusive window start, RFC 3339.
    pub window_start: String,
    /// Exclusive window end, RFC 3339.
    pub window_end: String,
    /// Per function name.
    pub functions: BTreeMap<String, SeriesSummary>,
    /// Per service name.
    pub services: BTreeMap<String, SeriesSummary>,
    /// Across everything.
    pub summary: OverallSummary,
}

/// Buckets of one series, keyed by bucket start.
#[derive(Default)]
struct Series {
    buckets: BTreeMap<UnixMillis, MetricBucket>,
}

impl Series {
    fn add(&mut self, sample: &MetricSample, width_millis: i64) {
        let bucket = MetricBucket::containing(sample.timestamp, width_millis);
        self.buckets
            .entry(bucket.start())
            .or_insert(bucket)
            .add(sample);
    }

    fn summarize(&self, window: &Window) -> SeriesSummary {
        let total_calls = self.buckets.values().map(|b| b.total_calls).sum();
        let total_duration = self
            .buckets
            .values()
            .map(|b| b.total_duration_seconds)
            .sum();
        let total_failures = self.buckets.values().map(|b| b.failures).sum();
        let time_series = window
            .bucket_starts()
            .map(|start| {
                let empty;
                let bucket = match self.buckets.get(&start) {
                    Some(bucket) => bucket,
                    None => {
                        empty = MetricBucket::containing(start, window.width_millis);
                        &empty
                    }
                };
                TimeSeriesPoint {
                    timestamp: start.to_rfc3339(),
                    label: start.format(window.range.label_format()),
                    calls: bucket.total_calls,
                    failures: bucket.failures,
                    avg_response_time: bucket.avg_duration(),
                    success_rate: bucket.success_rate(),
                }
            })
            .collect();
        SeriesSummary {
            total_calls,
            total_duration,
            total_failures,
            avg_response_time: average_duration(total_duration, total_calls),
            success_rate: success_rate(total_calls, total_failures),
            time_series,
        }
    }
}

/// The window `(now - span, now)` and its bucket grid.
struct Window {
    range: TimeRange,
    start: UnixMillis,
    end: UnixMillis,
    width_millis: i64,
}

impl Window {
    fn new(range: TimeRange, now: UnixMillis) -> Self {
        Self {
            range,
            start: now.sub_millis(range.span_millis()),
            end: now,
            width_millis: range.bucket_millis(),
        }
    }

    fn contains(&self, time: UnixMillis) -> bool {
        self.start < time && time < self.end
    }

    fn bucket_starts(&self) -> impl Iterator<Item = UnixMillis> {
        let width = self.width_millis;
        let first = self.start.add_millis(1).floor_to(width).0;
        let last = self.end.sub_millis(1).floor_to(width).0;
        (0..)
            .map(move |i: i64| UnixMillis(first + i * width))
            .take_while(move |start| start.0 <= last)
    }
}

/// Aggregates samples into time buckets per function and per service.
#[derive(Clone, Debug, Default)]
pub struct MetricsAggregator {
    catalog: ServiceCatalog,
}

impl MetricsAggregator {
    /// An aggregator that names services with `catalog`.
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self { catalog }
    }

    /// Service catalog in use.
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Aggregate `samples` over the `range` ending now.
    pub fn ingest(&self, samples: &[MetricSample], range: TimeRange) -> MetricsReport {
        self.ingest_at(samples, range, UnixMillis::now())
    }

    /// Aggregate `samples` over the `range` ending at `now`.  Samples at or
    /// before `now - range`, or at or after `now`, are discarded.
    pub fn ingest_at(
        &self,
        samples: &[MetricSample],
        range: TimeRange,
        now: UnixMillis,
    ) -> MetricsReport {
        let window = Window::new(range, now);
        let mut functions: BTreeMap<String, Series> = BTreeMap::new();
        let mut services: BTreeMap<String, Series> = BTreeMap::new();
        let mut overall = Series::default();

        for sample in samples.iter().filter(|s| window.contains(s.timestamp)) {
            functions
                .entry(sample.function_name.clone())
                .or_default()
                .add(sample, window.width_millis);
            services
                .entry(self.catalog.service_for(&sample.operation))
                .or_default()
                .add(sample, window.width_millis);
            overall.add(sample, window.width_millis);
        }

        let overall = overall.summarize(&window);
        let summary = OverallSummary {
            total_calls: overall.total_calls,
            total_duration: overall.total_duration,
            total_failures: overall.total_failures,
            avg_response_time: overall.avg_response_time,
            success_rate: overall.success_rate,
            function_count: functions.len(),
            service_count: services.len(),
            skipped_records: 0,
        };

        MetricsReport {
            time_range: range,
            window_start: window.start.to_rfc3339(),
            window_end: window.end.to_rfc3339(),
            functions: functions
                .iter()
                .map(|(name, series)| (name.clone(), series.summarize(&window)))
                .collect(),
            services: services
                .iter()
                .map(|(name, series)| (name.clone(), series.summarize(&window)))
                .collect(),
            summary,
        }
    }
}
