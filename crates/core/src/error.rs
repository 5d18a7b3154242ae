// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for purge scheduling and execution

use crate::request::PurgeRequest;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scheduling, unscheduling or executing a purge
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("purge already scheduled for {}", path.display())]
    AlreadyScheduled { path: PathBuf },

    #[error("no purge scheduled for {}", path.display())]
    NotScheduled { path: PathBuf },

    #[error("cannot process unsupported request ({variant}): {reason}")]
    Unsupported {
        variant: &'static str,
        reason: String,
    },

    #[error("purge scheduling failed (reason: {reason}) (request: {request})")]
    SchedulingFailed {
        request: Box<PurgeRequest>,
        reason: String,
    },

    #[error("purge failed (reason: {reason}) (request: {request})")]
    PurgeFailed {
        request: Box<PurgeRequest>,
        reason: String,
    },
}

impl PurgeError {
    pub fn unsupported(request: &PurgeRequest, reason: impl Into<String>) -> Self {
        PurgeError::Unsupported {
            variant: request.variant(),
            reason: reason.into(),
        }
    }

    pub fn scheduling_failed(request: &PurgeRequest, reason: impl Into<String>) -> Self {
        PurgeError::SchedulingFailed {
            request: Box::new(request.clone()),
            reason: reason.into(),
        }
    }
}
