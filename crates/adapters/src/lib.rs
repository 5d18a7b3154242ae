// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the local filesystem and the tokio timer

pub mod local_fs;
pub mod tokio_scheduler;
pub mod traced;

pub use local_fs::LocalFileSystem;
pub use tokio_scheduler::TokioScheduler;
pub use traced::TracedFileSystem;
