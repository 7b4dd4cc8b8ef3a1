// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// TOML configuration and its typed sections.
mod config;
/// An enum that encapsulates a variety of error types.
mod error;
#[cfg(feature = "http")]
mod http;

pub use self::config::{AwsSettings, CacheSettings, Config, ConfigBuilder, MetricsSettings, Settings};
pub use self::error::Error;
#[cfg(feature = "aws")]
pub use self::error::{AnyhowError, DynamoError, SerdeError};
#[cfg(feature = "http")]
pub use self::http::create_error_response;
