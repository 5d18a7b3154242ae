// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fpurge plan <file>` - run every purge listed in a TOML plan
//!
//! ```toml
//! [purger]
//! default_poll_interval = "1m"
//!
//! [[purge]]
//! path = "/var/tmp/export.csv"
//! after = "10m"
//!
//! [[purge]]
//! path = "/var/spool/inbox"
//! when_empty = true
//! expires_after = "2h"
//! force = true
//! ```

use super::{ensure_directory_or_missing, from_now};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use fp_core::{PurgeRequest, PurgeWhenEmpty, PurgerConfig, ScheduledPurge};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args)]
pub struct PlanArgs {
    /// Plan file (TOML)
    pub file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Overrides the `--config` file when present
    pub purger: Option<PurgerConfig>,
    #[serde(default)]
    pub purge: Vec<PlanEntry>,
}

/// One `[[purge]]` table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub when_empty: bool,
    pub at: Option<DateTime<Utc>>,
    #[serde(default, with = "humantime_serde")]
    pub after: Option<Duration>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, with = "humantime_serde")]
    pub expires_after: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
    #[serde(default)]
    pub contents_only: bool,
    #[serde(default)]
    pub force: bool,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading plan {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid plan {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn requests(&self, config: &PurgerConfig) -> Result<Vec<PurgeRequest>> {
        if self.purge.is_empty() {
            bail!("plan has no [[purge]] entries");
        }
        self.purge
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .to_request(config)
                    .with_context(|| format!("purge #{} ({})", i + 1, entry.path.display()))
            })
            .collect()
    }
}

impl PlanEntry {
    fn to_request(&self, config: &PurgerConfig) -> Result<PurgeRequest> {
        if self.when_empty {
            self.when_empty_request(config)
        } else {
            self.scheduled_request()
        }
    }

    fn scheduled_request(&self) -> Result<PurgeRequest> {
        if self.expires_at.is_some() || self.expires_after.is_some() || self.poll_interval.is_some()
        {
            bail!("expires_at, expires_after and poll_interval need `when_empty = true`");
        }
        let execute_at = match (self.at, self.after) {
            (Some(at), None) => at,
            (None, Some(after)) => from_now(after)?,
            _ => bail!("set exactly one of `at` or `after`"),
        };

        let mut request = ScheduledPurge::new(&self.path, execute_at);
        if self.contents_only {
            request = request.contents_only();
        }
        if self.force {
            request = request.forced();
        }
        Ok(request.into())
    }

    fn when_empty_request(&self, config: &PurgerConfig) -> Result<PurgeRequest> {
        if self.at.is_some() || self.after.is_some() {
            bail!("`at` and `after` don't apply to when_empty purges");
        }
        if self.contents_only {
            bail!("when_empty purges always remove the whole directory");
        }
        ensure_directory_or_missing(&self.path)?;
        let expires_at = match (self.expires_at, self.expires_after) {
            (Some(at), None) => at,
            (None, Some(after)) => from_now(after)?,
            _ => bail!("set exactly one of `expires_at` or `expires_after`"),
        };

        let mut request = PurgeWhenEmpty::new(&self.path, expires_at)
            .with_poll_interval(self.poll_interval.unwrap_or(config.default_poll_interval));
        if self.force {
            request = request.forced();
        }
        Ok(request.into())
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
