// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Purge requests
//!
//! A request names exactly one path and says when and how it should be
//! deleted. Requests are immutable; what kind of node the path is gets
//! evaluated lazily against a [`FileSystem`] at execution time.

use crate::fs::FileSystem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Poll interval used when a purge-when-empty request does not specify one
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

/// What a request will delete, given the current state of its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeTarget {
    /// A single regular file
    File,
    /// A directory and everything in it
    DirectoryWhole,
    /// Everything in a directory, but not the directory itself
    DirectoryContents,
}

/// Delete a file, directory, or directory contents at a fixed time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledPurge {
    path: PathBuf,
    execute_at: DateTime<Utc>,
    #[serde(default)]
    contents_only: bool,
    #[serde(default)]
    force: bool,
}

impl ScheduledPurge {
    pub fn new(path: impl Into<PathBuf>, execute_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            execute_at,
            contents_only: false,
            force: false,
        }
    }

    /// Purge only the children of the directory, keeping the directory
    pub fn contents_only(mut self) -> Self {
        self.contents_only = true;
        self
    }

    /// Permit deleting a directory that is not empty
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn execute_at(&self) -> DateTime<Utc> {
        self.execute_at
    }
}

impl fmt::Display for ScheduledPurge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scheduled purge (path: {}, at: {}, contents_only: {}, force: {})",
            self.path.display(),
            self.execute_at.to_rfc3339(),
            self.contents_only,
            self.force
        )
    }
}

/// Delete a directory once it has become empty
///
/// If the directory is still not empty once `expires_at` has passed, `force`
/// decides between deleting it anyway and giving up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurgeWhenEmpty {
    path: PathBuf,
    expires_at: DateTime<Utc>,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    poll_interval: Duration,
    #[serde(default)]
    force: bool,
}

impl PurgeWhenEmpty {
    pub fn new(path: impl Into<PathBuf>, expires_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            expires_at,
            poll_interval: DEFAULT_POLL_INTERVAL,
            force: false,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Delete the directory even if it is not empty
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl fmt::Display for PurgeWhenEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "purge when empty (path: {}, expires: {}, poll: {}, force: {})",
            self.path.display(),
            self.expires_at.to_rfc3339(),
            humantime::format_duration(self.poll_interval),
            self.force
        )
    }
}

/// A request to purge a single path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurgeRequest {
    Scheduled(ScheduledPurge),
    WhenEmpty(PurgeWhenEmpty),
}

impl PurgeRequest {
    /// The path to purge; the uniqueness key of the registry
    pub fn path(&self) -> &Path {
        match self {
            PurgeRequest::Scheduled(r) => &r.path,
            PurgeRequest::WhenEmpty(r) => &r.path,
        }
    }

    pub fn contents_only(&self) -> bool {
        match self {
            PurgeRequest::Scheduled(r) => r.contents_only,
            PurgeRequest::WhenEmpty(_) => false,
        }
    }

    pub fn force(&self) -> bool {
        match self {
            PurgeRequest::Scheduled(r) => r.force,
            PurgeRequest::WhenEmpty(r) => r.force,
        }
    }

    /// Name of the request variant, for logs and errors
    pub fn variant(&self) -> &'static str {
        match self {
            PurgeRequest::Scheduled(_) => "ScheduledPurge",
            PurgeRequest::WhenEmpty(_) => "PurgeWhenEmpty",
        }
    }

    /// Work out what this request would delete right now
    ///
    /// Returns `None` when the path is missing or is neither a regular file
    /// nor a directory.
    pub fn classify(&self, fs: &impl FileSystem) -> Option<PurgeTarget> {
        let path = self.path();
        if fs.is_file(path) {
            Some(PurgeTarget::File)
        } else if fs.is_dir(path) && self.contents_only() {
            Some(PurgeTarget::DirectoryContents)
        } else if fs.is_dir(path) {
            Some(PurgeTarget::DirectoryWhole)
        } else {
            None
        }
    }

    pub fn is_to_purge_file(&self, fs: &impl FileSystem) -> bool {
        self.classify(fs) == Some(PurgeTarget::File)
    }

    pub fn is_to_purge_directory(&self, fs: &impl FileSystem) -> bool {
        self.classify(fs) == Some(PurgeTarget::DirectoryWhole)
    }

    pub fn is_to_purge_directory_contents(&self, fs: &impl FileSystem) -> bool {
        self.classify(fs) == Some(PurgeTarget::DirectoryContents)
    }

    pub fn exists(&self, fs: &impl FileSystem) -> bool {
        fs.exists(self.path())
    }
}

impl From<ScheduledPurge> for PurgeRequest {
    fn from(request: ScheduledPurge) -> Self {
        PurgeRequest::Scheduled(request)
    }
}

impl From<PurgeWhenEmpty> for PurgeRequest {
    fn from(request: PurgeWhenEmpty) -> Self {
        PurgeRequest::WhenEmpty(request)
    }
}

impl fmt::Display for PurgeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurgeRequest::Scheduled(r) => r.fmt(f),
            PurgeRequest::WhenEmpty(r) => r.fmt(f),
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
