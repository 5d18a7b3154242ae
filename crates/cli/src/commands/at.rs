// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fpurge at <path> --at <time> | --after <duration>`

use super::{from_now, parse_rfc3339};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fp_core::{PurgeRequest, ScheduledPurge};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct AtArgs {
    /// File or directory to purge
    pub path: PathBuf,

    /// When to purge (RFC 3339, e.g. 2026-01-31T18:00:00Z)
    #[arg(
        long,
        value_parser = parse_rfc3339,
        conflicts_with = "after",
        required_unless_present = "after"
    )]
    pub at: Option<DateTime<Utc>>,

    /// Delay before purging (e.g. 90s, 10m, 2h)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub after: Option<Duration>,

    /// Delete only the directory's children, keeping the directory
    #[arg(long)]
    pub contents_only: bool,

    /// Delete a non-empty directory
    #[arg(long)]
    pub force: bool,
}

impl AtArgs {
    pub fn into_request(self) -> Result<PurgeRequest> {
        let execute_at = match (self.at, self.after) {
            (Some(at), _) => at,
            (None, Some(after)) => from_now(after)?,
            (None, None) => Utc::now(),
        };

        let mut request = ScheduledPurge::new(self.path, execute_at);
        if self.contents_only {
            request = request.contents_only();
        }
        if self.force {
            request = request.forced();
        }
        Ok(request.into())
    }
}
