// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::completion::Completion;
use crate::events::{EventBus, EventReceiver};
use crate::fs::{FakeFileSystem, FsCall};
use crate::request::ScheduledPurge;
use crate::timer::PurgeJob;
use chrono::Utc;
use std::path::PathBuf;

struct Harness {
    fs: FakeFileSystem,
    bus: EventBus,
    events: EventReceiver,
}

impl Harness {
    fn new() -> Self {
        let bus = EventBus::new();
        let events = bus.set_global_handler();
        Self {
            fs: FakeFileSystem::new(),
            bus,
            events,
        }
    }

    fn task(
        &self,
        request: ScheduledPurge,
    ) -> (ScheduledPurgeTask<FakeFileSystem, EventBus>, Completion) {
        let (signal, completion) = CompletionSignal::new();
        let task = ScheduledPurgeTask::new(request, signal, self.fs.clone(), self.bus.clone());
        (task, completion)
    }

    fn events(&mut self) -> Vec<PurgeEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }
}

fn reason_of(result: Result<(), PurgeError>) -> String {
    match result {
        Err(PurgeError::PurgeFailed { reason, .. }) => reason,
        other => panic!("expected PurgeFailed, got {other:?}"),
    }
}

#[test]
fn missing_path_fails_without_touching_filesystem() {
    let mut h = Harness::new();
    let (task, completion) = h.task(ScheduledPurge::new("/data/missing", Utc::now()));

    let reason = reason_of(task.run());

    assert_eq!(reason, "file does not exist");
    assert!(h.fs.calls().is_empty());
    assert!(matches!(
        h.events().as_slice(),
        [PurgeEvent::Failed { reason, .. }] if reason == "file does not exist"
    ));
    assert!(matches!(
        completion.try_get().map(|c| c.outcome),
        Some(PurgeOutcome::Failed { .. })
    ));
}

#[test]
fn special_path_is_unsupported() {
    let mut h = Harness::new();
    h.fs.add_special("/run/app.sock");
    let (task, completion) = h.task(ScheduledPurge::new("/run/app.sock", Utc::now()));

    let err = task.run().unwrap_err();

    assert!(matches!(
        err,
        PurgeError::Unsupported {
            variant: "ScheduledPurge",
            ..
        }
    ));
    assert!(h.fs.calls().is_empty());
    assert!(h.fs.exists(Path::new("/run/app.sock")));
    assert!(matches!(
        h.events().as_slice(),
        [PurgeEvent::Failed { reason, .. }] if reason.contains("neither a regular file")
    ));
    assert!(matches!(
        completion.try_get().map(|c| c.outcome),
        Some(PurgeOutcome::Failed { .. })
    ));
}

#[test]
fn file_is_deleted() {
    let mut h = Harness::new();
    h.fs.add_file("/data/report.csv");
    let (task, completion) = h.task(ScheduledPurge::new("/data/report.csv", Utc::now()));

    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/report.csv")));
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Purged { .. }]));
    assert_eq!(completion.try_get().unwrap().outcome, PurgeOutcome::Purged);
}

#[test]
fn denied_file_delete_fails_with_reason() {
    let h = Harness::new();
    h.fs.add_file("/data/report.csv");
    h.fs.deny("/data/report.csv");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/report.csv", Utc::now()));

    let reason = reason_of(task.run());

    assert!(reason.contains("permission denied"), "reason: {reason}");
    assert!(h.fs.exists(Path::new("/data/report.csv")));
}

#[test]
fn non_empty_directory_without_force_is_kept() {
    let mut h = Harness::new();
    h.fs.add_file("/data/full/a.txt");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/full", Utc::now()));

    let reason = reason_of(task.run());

    assert_eq!(reason, "directory not empty, not forced");
    assert!(h.fs.exists(Path::new("/data/full/a.txt")));
    assert!(h.fs.calls().is_empty());
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Failed { .. }]));
}

#[test]
fn non_empty_directory_with_force_is_deleted() {
    let h = Harness::new();
    h.fs.add_file("/data/full/a.txt");
    h.fs.add_file("/data/full/nested/b.txt");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/full", Utc::now()).forced());

    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/full")));
    assert!(h.fs.exists(Path::new("/data")));
}

#[test]
fn empty_directory_is_deleted_without_force() {
    let h = Harness::new();
    h.fs.add_dir("/data/empty");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/empty", Utc::now()));

    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/empty")));
}

#[test]
fn incomplete_recursive_delete_fails() {
    let h = Harness::new();
    h.fs.add_file("/data/full/a.txt");
    h.fs.fail_recursive_delete("/data/full");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/full", Utc::now()).forced());

    let reason = reason_of(task.run());

    assert_eq!(reason, "unable to recursively delete /data/full");
}

#[test]
fn contents_only_keeps_directory() {
    let h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    h.fs.add_file("/data/inbox/sub/b.txt");
    let (task, _completion) =
        h.task(ScheduledPurge::new("/data/inbox", Utc::now()).contents_only());

    task.run().unwrap();

    assert!(h.fs.is_dir(Path::new("/data/inbox")));
    assert_eq!(h.fs.descendant_count("/data/inbox"), 0);
    assert_eq!(
        h.fs.calls(),
        vec![FsCall::DeleteDirContents(PathBuf::from("/data/inbox"))]
    );
}

#[test]
fn finished_task_ignores_later_runs() {
    let mut h = Harness::new();
    h.fs.add_file("/data/report.csv");
    let (task, _completion) = h.task(ScheduledPurge::new("/data/report.csv", Utc::now()));

    task.run().unwrap();
    h.fs.add_file("/data/report.csv");
    task.run().unwrap();

    assert!(h.fs.exists(Path::new("/data/report.csv")));
    assert_eq!(h.events().len(), 1);
}
