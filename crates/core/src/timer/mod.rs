// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer/executor seam
//!
//! Schedule handlers arm purge jobs through [`TaskScheduler`] and keep the
//! returned [`ScheduledHandle`] so the registry can disarm them later.

mod manual;

pub use manual::ManualScheduler;

use crate::error::PurgeError;
use crate::request::PurgeRequest;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from arming a job
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("repeat interval must be greater than zero")]
    InvalidInterval,
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
    #[error("scheduler is shut down")]
    ShutDown,
}

/// Unit of work run by a scheduler
pub trait PurgeJob: Send + Sync + 'static {
    /// The request this job executes
    fn request(&self) -> &PurgeRequest;

    /// Run one invocation.
    ///
    /// An error is terminal: schedulers report it and never fire the job
    /// again.
    fn run(&self) -> Result<(), PurgeError>;
}

/// Handle to an armed job
pub trait Cancellable: Send + Sync {
    /// Disarm the job.
    ///
    /// `interrupt_if_running` additionally asks for an in-flight run to be
    /// interrupted (best effort). Returns false if the job had already
    /// finished or been cancelled.
    fn cancel(&self, interrupt_if_running: bool) -> bool;

    fn is_cancelled(&self) -> bool;

    /// True once the job will never run again for a reason other than
    /// cancellation
    fn is_done(&self) -> bool;
}

pub type ScheduledHandle = Box<dyn Cancellable>;

/// Executes jobs once at an instant, or repeatedly on a fixed period
pub trait TaskScheduler: Send + Sync + 'static {
    fn schedule_once(
        &self,
        job: Arc<dyn PurgeJob>,
        at: DateTime<Utc>,
    ) -> Result<ScheduledHandle, TimerError>;

    /// Fire `job` now and then every `interval`; runs never overlap
    fn schedule_repeating(
        &self,
        job: Arc<dyn PurgeJob>,
        interval: Duration,
    ) -> Result<ScheduledHandle, TimerError>;
}

/// Report of a single job invocation
#[derive(Debug)]
pub struct JobRun {
    pub request: PurgeRequest,
    pub result: Result<(), PurgeError>,
}

/// `at + duration`, or `None` if the result is not representable
pub(crate) fn offset(at: DateTime<Utc>, duration: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(duration)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
}
