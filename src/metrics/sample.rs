// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use crate::log::RunLog;
use crate::time_id::{RecordId, UnixMillis};
use serde::{Deserialize, Serialize};

/// One timed operation.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    /// The processing unit (e.g. Lambda function) that ran the operation.
    pub function_name: String,
    /// Operation name, e.g. `translate_text` or `rekognition_detect_text`.
    pub operation: String,
    /// Wall time.
    pub duration_seconds: f64,
    /// Whether the operation succeeded.
    pub success: bool,
    /// When the operation finished.
    pub timestamp: UnixMillis,
}

/// A metric record as kept in the metrics table.  Fields are left raw so that a
/// malformed record can be skipped without failing the whole query.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredMetric {
    /// Hash key.
    pub function_name: String,
    /// Range key: RFC 3339 time, `#`, then a random record ID so that samples
    /// of the same millisecond don't overwrite each other.  A bare RFC 3339
    /// time is also accepted when decoding.
    pub timestamp: String,
    /// JSON, see `SamplePayload`.
    pub payload: String,
}

/// Separates the time from the record ID in `StoredMetric::timestamp`.  Keys
/// still sort by time, so range conditions on a bare time work.
pub const RANGE_KEY_SEPARATOR: char = '#';

#[derive(Deserialize, Serialize)]
struct SamplePayload {
    operation: String,
    duration: f64,
    success: bool,
}

impl MetricSample {
    /// Encode for the metrics table.
    pub fn to_stored(&self) -> Result<StoredMetric, Error> {
        let payload = serde_json::to_string(&SamplePayload {
            operation: self.operation.clone(),
            duration: self.duration_seconds,
            success: self.success,
        })?;
        Ok(StoredMetric {
            function_name: self.function_name.clone(),
            timestamp: format!(
                "{}{RANGE_KEY_SEPARATOR}{}",
                self.timestamp.to_rfc3339(),
                RecordId::generate()
            ),
            payload,
        })
    }

    /// Decode a stored record.
    pub fn from_stored(record: &StoredMetric) -> Result<Self, Error> {
        let time = record
            .timestamp
            .split_once(RANGE_KEY_SEPARATOR)
            .map_or(record.timestamp.as_str(), |(time, _)| time);
        let timestamp = UnixMillis::from_rfc3339(time)?;
        let payload: SamplePayload = serde_json::from_str(&record.payload)?;
        if !payload.duration.is_finite() || payload.duration < 0.0 {
            return Err(Error::String(format!(
                "{}: invalid duration {}",
                payload.operation, payload.duration
            )));
        }
        Ok(Self {
            function_name: record.function_name.clone(),
            operation: payload.operation,
            duration_seconds: payload.duration,
            success: payload.success,
            timestamp,
        })
    }
}

/// Decode records, skipping (and logging) malformed ones.  Returns the samples
/// and the number of records skipped.
pub fn decode_stored_metrics(records: &[StoredMetric], log: &RunLog) -> (Vec<MetricSample>, usize) {
    let mut samples = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        match MetricSample::from_stored(record) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                skipped += 1;
                log.warn(format!(
                    "skipping metric record (f={}, t={}): {e}",
                    record.function_name, record.timestamp
                ));
            }
        }
    }
    (samples, skipped)
}
