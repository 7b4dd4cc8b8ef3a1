// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Duplicate checks by content digest and source URL.
mod filter;
/// Persistent processed markers.
mod marker;

pub use self::filter::{DedupVerdict, DuplicateReason, ImageDedupFilter};
pub use self::marker::{ProcessOutcome, ProcessedMarker};
