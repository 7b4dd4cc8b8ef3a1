// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::Error;
use chrono::offset::LocalResult;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix date/time which contains the number of non leap milliseconds since (or before) 1970.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub struct UnixMillis(pub i64);

impl UnixMillis {
    /// Milliseconds per second.
    pub const MILLIS_PER_SECOND: i64 = 1000;
    /// Milliseconds per minute.
    pub const MILLIS_PER_MINUTE: i64 = 60 * Self::MILLIS_PER_SECOND;
    /// Milliseconds per hour.
    pub const MILLIS_PER_HOUR: i64 = 60 * Self::MILLIS_PER_MINUTE;
    /// Milliseconds per day.
    pub const MILLIS_PER_DAY: i64 = 24 * Self::MILLIS_PER_HOUR;

    /// Creates a `UnixMillis` with the current date and time.
    pub fn now() -> Self {
        // A clock before 1970 is treated as 1970.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(millis.try_into().unwrap_or(i64::MAX))
    }

    /// Adds (or subtracts) milliseconds and returns the result.
    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Subtracts milliseconds and returns the result.
    pub fn sub_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_sub(millis))
    }

    /// Returns the date/time rounded down to a multiple of `width` milliseconds
    /// since the epoch.  Rounds toward negative infinity for times before 1970.
    pub fn floor_to(&self, width: i64) -> Self {
        if width <= 0 {
            return *self;
        }
        Self(self.0.div_euclid(width) * width)
    }

    /// Parses an RFC 3339 date/time, such as `2024-05-01T12:00:00.000Z`.
    pub fn from_rfc3339(s: &str) -> Result<Self, Error> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.timestamp_millis()))
            .map_err(|e| Error::String(format!("{s}: {e}")))
    }

    /// Seconds (with fraction) since the specified date/time.
    pub fn seconds_since(&self, earlier: UnixMillis) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / Self::MILLIS_PER_SECOND as f64
    }

    /// Formats as RFC 3339 UTC with millisecond precision and a `Z` suffix, which
    /// sorts lexicographically in time order.
    pub fn to_rfc3339(&self) -> String {
        self.to_date_time_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Format with a `chrono` format string (UTC).
    pub fn format(&self, fmt: &str) -> String {
        self.to_date_time_utc().format(fmt).to_string()
    }

    fn to_date_time_utc(&self) -> DateTime<Utc> {
        match Utc.timestamp_millis_opt(self.0) {
            LocalResult::Single(dt) => dt,
            // Out of range for chrono; clamp rather than panic.
            _ if self.0 < 0 => DateTime::<Utc>::MIN_UTC,
            _ => DateTime::<Utc>::MAX_UTC,
        }
    }
}

impl From<i64> for UnixMillis {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

impl From<UnixMillis> for i64 {
    fn from(value: UnixMillis) -> Self {
        value.0
    }
}

impl Display for UnixMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        if f.alternate() {
            return f.write_str(&self.to_rfc3339());
        }
        Display::fmt(&self.0, f)
    }
}
