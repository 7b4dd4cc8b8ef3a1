// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Thread-safe run log.
mod run_log;
mod tests;

pub use self::run_log::RunLog;
