// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Purge tasks: the delete decision for one request
//!
//! A task is bound to one request and one completion signal. It ends in
//! exactly one of two ways:
//! - success: publish `Purged`, fulfil the signal
//! - failure: publish `Failed`, fulfil the signal, return the error to the
//!   scheduler so it shows up in the executor's own reporting
//!
//! A purge-when-empty task may also return without ending ("not yet").

mod scheduled;
mod when_empty;

pub use scheduled::ScheduledPurgeTask;
pub use when_empty::PurgeWhenEmptyTask;

use crate::completion::{Completed, CompletionSignal, PurgeOutcome};
use crate::error::PurgeError;
use crate::event::PurgeEvent;
use crate::events::EventPublisher;
use crate::fs::FileSystem;
use crate::request::PurgeRequest;
use std::path::Path;

/// State and terminal transitions shared by every task kind
struct TaskCore<P> {
    request: PurgeRequest,
    signal: CompletionSignal,
    publisher: P,
}

impl<P: EventPublisher> TaskCore<P> {
    fn new(request: PurgeRequest, signal: CompletionSignal, publisher: P) -> Self {
        Self {
            request,
            signal,
            publisher,
        }
    }

    /// Whether this task already reached a terminal outcome
    fn is_finished(&self) -> bool {
        self.signal.is_complete()
    }

    fn succeed(&self) -> Result<(), PurgeError> {
        tracing::info!(request = %self.request, "path purged");
        self.publisher.publish(PurgeEvent::Purged {
            request: self.request.clone(),
        });
        self.complete(PurgeOutcome::Purged);
        Ok(())
    }

    fn fail(&self, reason: impl Into<String>) -> Result<(), PurgeError> {
        let reason = reason.into();
        self.end_failed(&reason);
        Err(PurgeError::PurgeFailed {
            request: Box::new(self.request.clone()),
            reason,
        })
    }

    /// Fail because the path is neither a file nor a directory
    fn unsupported(&self) -> Result<(), PurgeError> {
        let reason = "path is neither a regular file nor a directory";
        self.end_failed(reason);
        Err(PurgeError::unsupported(&self.request, reason))
    }

    fn end_failed(&self, reason: &str) {
        tracing::error!(reason, request = %self.request, "purge failed");
        self.publisher.publish(PurgeEvent::Failed {
            request: self.request.clone(),
            reason: reason.to_string(),
        });
        self.complete(PurgeOutcome::Failed {
            reason: reason.to_string(),
        });
    }

    fn complete(&self, outcome: PurgeOutcome) {
        self.signal.complete(Completed {
            request: self.request.clone(),
            outcome,
        });
    }
}

/// Delete `path` and everything under it, describing any failure
fn delete_recursively(fs: &impl FileSystem, path: &Path) -> Result<(), String> {
    if fs.delete_recursively(path) {
        Ok(())
    } else {
        Err(format!("unable to recursively delete {}", path.display()))
    }
}

#[cfg(test)]
#[path = "scheduled_tests.rs"]
mod scheduled_tests;

#[cfg(test)]
#[path = "when_empty_tests.rs"]
mod when_empty_tests;
