// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::bucket::{average_duration, success_rate};
use super::MetricSample;
use crate::common::Error;
use crate::log::RunLog;
use crate::store::{with_timeout, MetricsStore};
use crate::time_id::UnixMillis;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Running totals of one operation since the recorder was created.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTotals {
    /// Calls recorded.
    pub total_calls: u64,
    /// Sum of durations, in seconds.
    pub total_duration: f64,
    /// Failed calls.
    pub failures: u64,
    /// Mean duration, or 0.
    pub avg_duration: f64,
    /// Percentage of successful calls, or 100.
    pub success_rate: f64,
}

impl OperationTotals {
    fn add(&mut self, duration_seconds: f64, success: bool) {
        self.total_calls += 1;
        self.total_duration += duration_seconds;
        if !success {
            self.failures += 1;
        }
        self.avg_duration = average_duration(self.total_duration, self.total_calls);
        self.success_rate = success_rate(self.total_calls, self.failures);
    }
}

#[derive(Default)]
struct RecorderInner {
    pending: Vec<MetricSample>,
    totals: BTreeMap<String, OperationTotals>,
}

/// Collects samples of one processing unit until they are flushed to a
/// `MetricsStore`.  Construct one per invocation (or per process) and pass it
/// to whatever needs timing.
pub struct PerformanceRecorder {
    function_name: String,
    inner: Mutex<RecorderInner>,
    log: RunLog,
}

impl PerformanceRecorder {
    /// A recorder attributing samples to `function_name`.
    pub fn new(function_name: impl Into<String>, log: RunLog) -> Self {
        Self {
            function_name: function_name.into(),
            inner: Mutex::new(Default::default()),
            log,
        }
    }

    /// Function samples are attributed to.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Record one operation that finished now.
    pub fn record(&self, operation: &str, duration_seconds: f64, success: bool) {
        self.record_at(operation, duration_seconds, success, UnixMillis::now());
    }

    /// Record one operation that finished at `timestamp`.  Negative or
    /// non-finite durations are recorded as 0.
    pub fn record_at(
        &self,
        operation: &str,
        duration_seconds: f64,
        success: bool,
        timestamp: UnixMillis,
    ) {
        let duration_seconds = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            0.0
        };
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .totals
                .entry(operation.to_string())
                .or_default()
                .add(duration_seconds, success);
            inner.pending.push(MetricSample {
                function_name: self.function_name.clone(),
                operation: operation.to_string(),
                duration_seconds,
                success,
                timestamp,
            });
        }
    }

    /// Await `fut`, recording its duration and whether it returned `Ok`.
    pub async fn time<T, F>(&self, operation: &str, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.record(operation, start.elapsed().as_secs_f64(), result.is_ok());
        result
    }

    /// Running totals per operation.
    pub fn current(&self) -> BTreeMap<String, OperationTotals> {
        self.inner
            .lock()
            .map(|inner| inner.totals.clone())
            .unwrap_or_default()
    }

    /// Samples not yet flushed.
    pub fn pending(&self) -> usize {
        self.inner.lock().map(|inner| inner.pending.len()).unwrap_or(0)
    }

    /// Write pending samples to `store`, one record at a time, oldest first.
    /// On failure the samples not yet written are kept for the next flush and
    /// the error is returned.  Returns the number written.
    pub async fn flush(&self, store: &dyn MetricsStore, limit: Duration) -> Result<usize, Error> {
        let samples = match self.inner.lock() {
            Ok(mut inner) => std::mem::take(&mut inner.pending),
            Err(_) => return Err(Error::String("recorder poisoned".to_string())),
        };
        if samples.is_empty() {
            return Ok(0);
        }
        let mut written = 0;
        let mut failure = None;
        for sample in &samples {
            let result = match sample.to_stored() {
                Ok(record) => {
                    with_timeout(
                        format!("put_metric(f={})", self.function_name),
                        limit,
                        store.put_metric(&record),
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => written += 1,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        match failure {
            None => {
                self.log.trace(format!(
                    "flushed {written} metric samples for {}",
                    self.function_name
                ));
                Ok(written)
            }
            Some(e) => {
                self.log.warn(format!(
                    "flush of metric samples for {} failed after {written} of {}: {e}",
                    self.function_name,
                    samples.len()
                ));
                if let Ok(mut inner) = self.inner.lock() {
                    let unwritten = samples.into_iter().skip(written);
                    let newer = std::mem::replace(&mut inner.pending, unwritten.collect());
                    inner.pending.extend(newer);
                }
                Err(e)
            }
        }
    }
}
