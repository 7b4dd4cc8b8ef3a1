// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::MetricSample;
use crate::time_id::UnixMillis;

/// Mean duration, or 0 when there were no calls.
pub fn average_duration(total_duration_seconds: f64, total_calls: u64) -> f64 {
    if total_calls == 0 {
        0.0
    } else {
        total_duration_seconds / total_calls as f64
    }
}

/// Percentage of calls that succeeded, or 100 when there were no calls.
pub fn success_rate(total_calls: u64, failures: u64) -> f64 {
    if total_calls == 0 {
        100.0
    } else {
        total_calls.saturating_sub(failures) as f64 / total_calls as f64 * 100.0
    }
}

/// Counters of one series over `[start, start + width)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricBucket {
    start: UnixMillis,
    width_millis: i64,
    /// Calls in the bucket.
    pub total_calls: u64,
    /// Sum of call durations.
    pub total_duration_seconds: f64,
    /// Failed calls.
    pub failures: u64,
}

impl MetricBucket {
    /// An empty bucket whose start is `time` floored to `width_millis`.
    pub fn containing(time: UnixMillis, width_millis: i64) -> Self {
        Self {
            start: time.floor_to(width_millis),
            width_millis,
            total_calls: 0,
            total_duration_seconds: 0.0,
            failures: 0,
        }
    }

    /// Inclusive start.
    pub fn start(&self) -> UnixMillis {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> UnixMillis {
        self.start.add_millis(self.width_millis)
    }

    /// Whether `time` falls in this bucket.
    pub fn contains(&self, time: UnixMillis) -> bool {
        self.start <= time && time < self.end()
    }

    /// Count a sample.  The caller picks the bucket.
    pub fn add(&mut self, sample: &MetricSample) {
        debug_assert!(self.contains(sample.timestamp));
        self.total_calls += 1;
        self.total_duration_seconds += sample.duration_seconds;
        if !sample.success {
            self.failures += 1;
        }
    }

    /// See `average_duration`.
    pub fn avg_duration(&self) -> f64 {
        average_duration(self.total_duration_seconds, self.total_calls)
    }

    /// See `success_rate`.
    pub fn success_rate(&self) -> f64 {
        success_rate(self.total_calls, self.failures)
    }
}
