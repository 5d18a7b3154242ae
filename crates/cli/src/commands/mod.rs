// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommands: each turns its arguments into purge requests

pub mod at;
pub mod plan;
pub mod when_empty;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::path::Path;
use std::time::Duration;

/// Clap value parser for RFC 3339 timestamps
pub(crate) fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time `{s}`: {e}"))
}

/// `now + after`, failing if the result is out of range
pub(crate) fn from_now(after: Duration) -> Result<DateTime<Utc>> {
    TimeDelta::from_std(after)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .with_context(|| format!("{} from now is out of range", humantime::format_duration(after)))
}

/// Refuse a when-empty target that exists but can never become an empty
/// directory. A missing path is fine: it may be created later.
pub(crate) fn ensure_directory_or_missing(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        bail!("`{}` exists but is not a directory", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
