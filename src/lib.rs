// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! This crate holds the caching and bookkeeping core of an image translation
//! pipeline: content digests, a write-once translation cache, image dedup and
//! the aggregation of per-operation performance metrics into time buckets.

#[cfg(feature = "aws")]
/// DynamoDB and Translate backed implementations of the store and translator traits.
pub mod aws;
#[cfg(feature = "aws")]
pub use aws::*;

/// Translation cache keyed by content digest and language pair.
pub mod cache;
pub use cache::*;

/// Types common to multiple modules.
pub mod common;
pub use common::*;

/// Detects images that were already processed, within and across runs.
pub mod dedup;
pub use dedup::*;

/// Stable content digests used as cache and dedup keys.
pub mod hash;
pub use hash::*;

#[cfg(feature = "http")]
/// A small `axum` API for metrics reports.
pub mod http;
#[cfg(feature = "http")]
pub use http::*;

/// Thread-safe logging.
pub mod log;
pub use log::*;

/// Performance samples, their recorder and time bucket aggregation.
pub mod metrics;
pub use metrics::*;

/// Macros used with `serde` serialization and wrapper types.
pub mod serde_utils;
pub use serde_utils::*;

/// Backing store traits and an in-memory implementation.
pub mod store;
pub use store::*;

/// Unix timestamps (in milliseconds) and random record IDs.
pub mod time_id;
pub use time_id::*;

/// Translation with lookup-before-translate caching.
pub mod translate;
pub use translate::*;
