// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RunLogInner {
    lines: VecDeque<String>,
    warnings: usize,
}

/// Thread-safe, line oriented log of one run (a batch job or a request).
///
/// Clones share the same lines, so a log handed to several components
/// collects everything they report.  Only the newest `limit` lines are kept;
/// the warning count covers every warning ever logged.
#[derive(Clone)]
pub struct RunLog {
    debug: bool,
    limit: usize,
    inner: Arc<Mutex<RunLogInner>>,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RunLog {
    /// Lines kept by `RunLog::new`.
    pub const DEFAULT_LIMIT: usize = 1000;

    /// Create a new run log.  With `debug` set, every line is also printed.
    pub fn new(debug: bool) -> Self {
        Self::with_limit(debug, Self::DEFAULT_LIMIT)
    }

    /// Create a new run log keeping at most `limit` lines (at least one).
    pub fn with_limit(debug: bool, limit: usize) -> Self {
        Self {
            debug,
            limit: limit.max(1),
            inner: Arc::new(Mutex::new(Default::default())),
        }
    }

    /// Call a function and trace the result.
    pub fn call<T>(&self, line: String, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => self.trace(format!("{line} succeeded")),
            Err(e) => self.warn(format!("{line} failed: {e}")),
        }
        result
    }

    /// Whether the log contains any warnings.
    pub fn contains_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Log a failure and continue without a value (fail-open).
    pub fn degrade<T>(&self, line: String, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.warn(format!("{line} failed (continuing): {e}"));
                None
            }
        }
    }

    /// Add all lines from the specified log to this log.
    pub fn extend(&self, other: &RunLog) {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return;
        }
        let (lines, warnings) = match other.inner.lock() {
            Ok(from_inner) => (from_inner.lines.clone(), from_inner.warnings),
            Err(_) => return,
        };
        if let Ok(mut to_inner) = self.inner.lock() {
            to_inner.lines.extend(lines);
            to_inner.warnings += warnings;
            self.truncate(&mut to_inner);
        }
    }

    /// A copy of the lines kept so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Add a trace line to this log.
    pub fn trace(&self, line: String) {
        self.push(line, false);
    }

    /// Add a warning or error line to this log.
    pub fn warn(&self, line: String) {
        self.push(line, true);
    }

    /// Number of warning lines.
    pub fn warning_count(&self) -> usize {
        self.inner
            .lock()
            .ok()
            .map(|inner| inner.warnings)
            .unwrap_or(0)
    }

    fn push(&self, line: String, warning: bool) {
        if line.is_empty() {
            return;
        }
        if self.debug {
            if warning {
                println!("WARN {line}");
            } else {
                println!("{line}");
            }
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.lines.push_back(line);
            if warning {
                inner.warnings += 1;
            }
            self.truncate(&mut inner);
        }
    }

    fn truncate(&self, inner: &mut RunLogInner) {
        while inner.lines.len() > self.limit {
            inner.lines.pop_front();
        }
    }
}

impl Display for RunLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner.lock() {
            Ok(inner) => {
                for (i, line) in inner.lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    f.write_str(line)?;
                }
                Ok(())
            }
            Err(_) => Ok(()),
        }
    }
}
