// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! fp-core: deferred filesystem purge scheduling
//!
//! This crate provides:
//! - Purge requests (fixed-time and purge-when-empty) and their outcome events
//! - Per-request purge tasks that decide whether, how and when to delete
//! - Schedule handler dispatch over request variants
//! - The `Purger` registry guaranteeing at most one active purge per path
//! - Collaborator traits (filesystem, timer, clock, event publisher)

pub mod clock;
pub mod completion;
pub mod config;
pub mod error;
pub mod event;
pub mod events;
pub mod fs;
pub mod handler;
pub mod purger;
pub mod request;
pub mod task;
pub mod timer;

pub use clock::{Clock, FakeClock, SystemClock};
pub use completion::{Completed, Completion, CompletionSignal, PurgeOutcome};
pub use config::{ConfigError, PurgerConfig};
pub use error::PurgeError;
pub use event::PurgeEvent;
pub use events::{EventBus, EventPattern, EventPublisher, EventReceiver, Subscription};
pub use fs::{FileSystem, FsError};
pub use handler::{HandlerSet, PurgeWhenEmptyHandler, ScheduleHandler, ScheduledPurgeHandler};
pub use purger::{Purger, PurgerDeps};
pub use request::{PurgeRequest, PurgeTarget, PurgeWhenEmpty, ScheduledPurge};
pub use task::{PurgeWhenEmptyTask, ScheduledPurgeTask};
pub use timer::{
    Cancellable, JobRun, ManualScheduler, PurgeJob, ScheduledHandle, TaskScheduler, TimerError,
};

#[cfg(any(test, feature = "test-support"))]
pub use fs::FakeFileSystem;
