// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polled purge of a directory once it has become empty
//!
//! Each invocation is one poll. Until the directory is empty, forced, or
//! expired, an invocation returns without publishing anything or
//! fulfilling the completion signal.

use super::{delete_recursively, TaskCore};
use crate::clock::Clock;
use crate::completion::CompletionSignal;
use crate::error::PurgeError;
use crate::events::EventPublisher;
use crate::fs::{FileSystem, FsError};
use crate::request::{PurgeRequest, PurgeWhenEmpty};
use crate::timer::PurgeJob;
use chrono::{DateTime, Utc};

/// Executes a [`PurgeWhenEmpty`] request on every poll tick
pub struct PurgeWhenEmptyTask<F, C, P> {
    core: TaskCore<P>,
    expires_at: DateTime<Utc>,
    fs: F,
    clock: C,
}

impl<F: FileSystem, C: Clock, P: EventPublisher> PurgeWhenEmptyTask<F, C, P> {
    pub fn new(
        request: PurgeWhenEmpty,
        signal: CompletionSignal,
        fs: F,
        clock: C,
        publisher: P,
    ) -> Self {
        Self {
            expires_at: request.expires_at(),
            core: TaskCore::new(request.into(), signal, publisher),
            fs,
            clock,
        }
    }

    fn is_expired(&self) -> bool {
        self.clock.now() > self.expires_at
    }

    /// Once expired, purge anyway if forced, otherwise give up
    fn handle_expiration(&self) -> Result<(), PurgeError> {
        if self.core.request.force() {
            return self.force_purge();
        }
        self.core.fail("directory never became empty")
    }

    fn force_purge(&self) -> Result<(), PurgeError> {
        match delete_recursively(&self.fs, self.core.request.path()) {
            Ok(()) => self.core.succeed(),
            Err(reason) => self.core.fail(reason),
        }
    }
}

impl<F: FileSystem, C: Clock, P: EventPublisher> PurgeJob for PurgeWhenEmptyTask<F, C, P> {
    fn request(&self) -> &PurgeRequest {
        &self.core.request
    }

    fn run(&self) -> Result<(), PurgeError> {
        if self.core.is_finished() {
            return Ok(());
        }

        let path = self.core.request.path();
        let span = tracing::debug_span!("purge.when_empty", path = %path.display());
        let _guard = span.enter();

        if !self.fs.exists(path) {
            return self.core.fail("file does not exist");
        }

        match self.fs.is_empty_dir(path) {
            Ok(true) => {}
            Ok(false) if self.core.request.force() => return self.force_purge(),
            Ok(false) if self.is_expired() => return self.handle_expiration(),
            Ok(false) => {
                tracing::debug!("directory not empty yet");
                return Ok(());
            }
            Err(FsError::NotADirectory(_)) => {
                tracing::debug!("path is not a directory yet");
                return Ok(());
            }
            Err(e) => return self.core.fail(e.to_string()),
        }

        match self.fs.remove_empty_dir(path) {
            Ok(()) => self.core.succeed(),
            // Something was written between the emptiness check and the delete
            Err(_) if matches!(self.fs.is_empty_dir(path), Ok(false)) => Ok(()),
            Err(e) => self.core.fail(e.to_string()),
        }
    }
}
