// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Purge outcome events

use crate::request::PurgeRequest;
use serde::Serialize;

/// Notification of a purge lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PurgeEvent {
    /// A handler armed the timer for the request
    Scheduled { request: PurgeRequest },
    /// A caller cancelled the request
    Unscheduled { request: PurgeRequest },
    /// The path was deleted
    Purged { request: PurgeRequest },
    /// A delete attempt failed
    Failed {
        request: PurgeRequest,
        reason: String,
    },
}

impl PurgeEvent {
    /// Event name used for subscription pattern matching
    pub fn name(&self) -> &'static str {
        match self {
            PurgeEvent::Scheduled { .. } => "purge:scheduled",
            PurgeEvent::Unscheduled { .. } => "purge:unscheduled",
            PurgeEvent::Purged { .. } => "purge:purged",
            PurgeEvent::Failed { .. } => "purge:failed",
        }
    }

    pub fn request(&self) -> &PurgeRequest {
        match self {
            PurgeEvent::Scheduled { request }
            | PurgeEvent::Unscheduled { request }
            | PurgeEvent::Purged { request }
            | PurgeEvent::Failed { request, .. } => request,
        }
    }
}

impl std::fmt::Display for PurgeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurgeEvent::Failed { request, reason } => {
                write!(f, "{} {} ({})", self.name(), request.path().display(), reason)
            }
            _ => write!(f, "{} {}", self.name(), self.request().path().display()),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
