// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Random record IDs.
mod id;
/// Thin wrapper around Unix timestamp (non leap milliseconds since 1970).
mod time;

pub use self::id::RecordId;
pub use self::time::UnixMillis;
