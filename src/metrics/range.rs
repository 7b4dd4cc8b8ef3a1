// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use crate::time_id::UnixMillis;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Time range selectable on the metrics dashboard.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TimeRange {
    /// Last hour, 5 minute buckets.
    #[default]
    OneHour,
    /// Last 6 hours, 30 minute buckets.
    SixHours,
    /// Last 24 hours, 2 hour buckets.
    OneDay,
    /// Last 7 days, 1 day buckets.
    SevenDays,
}

impl TimeRange {
    /// All ranges, shortest first.
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::OneDay,
        TimeRange::SevenDays,
    ];

    /// Length of the range.
    pub fn span_millis(self) -> i64 {
        match self {
            TimeRange::OneHour => UnixMillis::MILLIS_PER_HOUR,
            TimeRange::SixHours => 6 * UnixMillis::MILLIS_PER_HOUR,
            TimeRange::OneDay => UnixMillis::MILLIS_PER_DAY,
            TimeRange::SevenDays => 7 * UnixMillis::MILLIS_PER_DAY,
        }
    }

    /// Width of each bucket.
    pub fn bucket_millis(self) -> i64 {
        match self {
            TimeRange::OneHour => 5 * UnixMillis::MILLIS_PER_MINUTE,
            TimeRange::SixHours => 30 * UnixMillis::MILLIS_PER_MINUTE,
            TimeRange::OneDay => 2 * UnixMillis::MILLIS_PER_HOUR,
            TimeRange::SevenDays => UnixMillis::MILLIS_PER_DAY,
        }
    }

    /// `chrono` format of bucket labels.
    pub fn label_format(self) -> &'static str {
        match self {
            TimeRange::SevenDays => "%m-%d",
            _ => "%H:%M",
        }
    }

    /// Query parameter spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::OneDay => "24h",
            TimeRange::SevenDays => "7d",
        }
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| Error::String(format!("{s}: unsupported time range (1h, 6h, 24h, 7d)")))
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
