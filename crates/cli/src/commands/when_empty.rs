// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fpurge when-empty <dir> --expires-at <time> | --expires-after <duration>`

use super::{ensure_directory_or_missing, from_now, parse_rfc3339};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fp_core::{PurgeRequest, PurgeWhenEmpty, PurgerConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct WhenEmptyArgs {
    /// Directory to purge once empty
    pub path: PathBuf,

    /// Give up (or force) after this time (RFC 3339)
    #[arg(
        long,
        value_parser = parse_rfc3339,
        conflicts_with = "expires_after",
        required_unless_present = "expires_after"
    )]
    pub expires_at: Option<DateTime<Utc>>,

    /// Give up (or force) after this long (e.g. 1h)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub expires_after: Option<Duration>,

    /// How often to check the directory [default: from config, 5m]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll: Option<Duration>,

    /// Delete the directory even if it is not empty
    #[arg(long)]
    pub force: bool,
}

impl WhenEmptyArgs {
    pub fn into_request(self, config: &PurgerConfig) -> Result<PurgeRequest> {
        ensure_directory_or_missing(&self.path)?;
        let expires_at = match (self.expires_at, self.expires_after) {
            (Some(at), _) => at,
            (None, Some(after)) => from_now(after)?,
            (None, None) => Utc::now(),
        };

        let mut request = PurgeWhenEmpty::new(self.path, expires_at)
            .with_poll_interval(self.poll.unwrap_or(config.default_poll_interval));
        if self.force {
            request = request.forced();
        }
        Ok(request.into())
    }
}
