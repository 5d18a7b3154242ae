// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Purger configuration
//!
//! Loaded from TOML; every field is optional.

use crate::request::DEFAULT_POLL_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by every purge a process schedules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgerConfig {
    /// Poll interval for purge-when-empty requests that don't set one
    #[serde(with = "humantime_serde")]
    pub default_poll_interval: Duration,
    /// Ask the timer to interrupt in-flight purges when unscheduling
    pub interrupt_on_unschedule: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for PurgerConfig {
    fn default() -> Self {
        Self {
            default_poll_interval: DEFAULT_POLL_INTERVAL,
            interrupt_on_unschedule: false,
            log_filter: "info".to_string(),
        }
    }
}

impl PurgerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "purger_tests.rs"]
mod tests;
