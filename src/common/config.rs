// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[allow(deprecated)]
use std::env::home_dir;
use std::fs::read_to_string;
use std::time::Duration;

/// Configuration parameters (TOML) for the cache, dedup and metrics components.
#[derive(Debug)]
pub struct Config {
    debug_enabled: bool,
    toml: String,
}

impl Config {
    /// Creates a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: None,
            debug_enabled: false,
            error: None,
        }
    }

    /// Returns `true` if debug is enabled.
    pub fn debug(&self) -> bool {
        self.debug_enabled
    }

    /// Returns configuration parameters.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        toml::from_str(&self.toml).map_err(|e: toml::de::Error| Error::String(format!("toml: {e}")))
    }

    /// Returns all typed sections, with defaults for anything missing.
    pub fn settings(&self) -> Result<Settings, Error> {
        self.get()
    }
}

/// Builds a `Config` from a TOML string or file.
pub struct ConfigBuilder {
    config: Option<Config>,
    debug_enabled: bool,
    error: Option<Error>,
}

impl ConfigBuilder {
    /// Returns the configuration, or the first error encountered while building it.
    pub fn build(self) -> Result<Config, Error> {
        if let Some(error) = self.error {
            Err(error)
        } else if let Some(config) = self.config {
            Ok(config)
        } else {
            Err(Error::String("config not set".to_string()))
        }
    }

    /// Echo log lines to stdout.
    pub fn debug(mut self, debug_enabled: bool) -> Self {
        self.debug_enabled = debug_enabled;
        if let Some(config) = self.config.as_mut() {
            config.debug_enabled = debug_enabled;
        }
        self
    }

    /// Reads `file_name` from the home directory, falling back to the current directory.
    pub fn toml_file(self, file_name: &str) -> Self {
        #[allow(deprecated)]
        let home_path = home_dir()
            .and_then(|pathbuf| pathbuf.to_str().map(|path| format!("{path}/{file_name}")));
        let local_path = format!("./{file_name}");
        match home_path
            .and_then(|path| read_to_string(path).ok())
            .map(Ok)
            .unwrap_or_else(|| {
                read_to_string(&local_path)
                    .map_err(|_| Error::String(format!("{local_path}: cannot read")))
            }) {
            Ok(toml) => self.toml_string(toml),
            Err(e) => Self {
                config: None,
                debug_enabled: self.debug_enabled,
                error: Some(e),
            },
        }
    }

    /// Uses a TOML string.
    pub fn toml_str(self, toml: &str) -> Self {
        self.toml_string(toml.to_string())
    }

    /// Uses an owned TOML string.
    pub fn toml_string(self, toml: String) -> Self {
        Self {
            config: Some(Config {
                debug_enabled: self.debug_enabled,
                toml,
            }),
            debug_enabled: self.debug_enabled,
            error: None,
        }
    }
}

/// All configuration sections.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    /// `[aws]`
    #[serde(default)]
    pub aws: AwsSettings,
    /// `[cache]`
    #[serde(default)]
    pub cache: CacheSettings,
    /// `[metrics]`
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// `[aws]` section.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AwsSettings {
    /// Named profile from `~/.aws/config`, if any.
    pub profile: Option<String>,
}

/// `[cache]` section, shared by the translation cache and the dedup filter.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Translation table name.
    pub table: String,
    /// Secondary index on (`content_hash`, `language_pair`).
    pub content_index: String,
    /// Bound on each store call.
    pub timeout_ms: u64,
}

impl CacheSettings {
    /// Store call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            table: "translations".to_string(),
            content_index: "content_hash-language_pair-index".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// `[metrics]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Metrics table name (hash key `function_name`, range key `timestamp`).
    pub table: String,
    /// Bound on each store call.
    pub timeout_ms: u64,
    /// Service name prefixes, replacing the built-in list when present.
    pub known_services: Option<Vec<String>>,
}

impl MetricsSettings {
    /// Store call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            table: "performance-metrics".to_string(),
            timeout_ms: 5000,
            known_services: None,
        }
    }
}
