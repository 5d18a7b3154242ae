// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fp_core::FakeFileSystem;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<T>(f: impl FnOnce() -> T) -> (String, T) {
    let logs = CapturedLogs::new();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[test]
fn traced_contents_delete_rejects_file() {
    let fake = FakeFileSystem::new();
    fake.add_file("/data/a.txt");
    let traced = TracedFileSystem::new(fake.clone());

    let err = traced
        .delete_dir_contents(Path::new("/data/a.txt"))
        .unwrap_err();

    assert!(matches!(err, FsError::NotADirectory(_)));
    assert!(fake.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_delete_file_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| {
        let fake = FakeFileSystem::new();
        fake.add_file("/data/report.csv");
        TracedFileSystem::new(fake).delete_file(Path::new("/data/report.csv"))
    });

    assert!(result.is_ok(), "delete should succeed: {:?}", result);
    assert!(logs.contains("fs.delete_file"), "Logs:\n{}", logs);
    assert!(logs.contains("/data/report.csv"), "Logs:\n{}", logs);
    assert!(logs.contains("file deleted"), "Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Logs:\n{}", logs);
}

#[test]
fn traced_delete_file_logs_failure() {
    let (logs, result) = with_tracing(|| {
        let fake = FakeFileSystem::new();
        fake.add_file("/data/report.csv");
        fake.deny("/data/report.csv");
        TracedFileSystem::new(fake).delete_file(Path::new("/data/report.csv"))
    });

    assert!(result.is_err());
    assert!(logs.contains("file deleted failed"), "Logs:\n{}", logs);
    assert!(logs.contains("ERROR"), "Logs:\n{}", logs);
}

#[test]
fn traced_recursive_delete_logs_incomplete_tree() {
    let (logs, deleted) = with_tracing(|| {
        let fake = FakeFileSystem::new();
        fake.add_file("/data/full/a.txt");
        fake.fail_recursive_delete("/data/full");
        TracedFileSystem::new(fake).delete_recursively(Path::new("/data/full"))
    });

    assert!(!deleted);
    assert!(logs.contains("fs.delete_recursively"), "Logs:\n{}", logs);
    assert!(logs.contains("tree not fully deleted"), "Logs:\n{}", logs);
}

#[test]
fn traced_probes_log_at_trace() {
    let (logs, exists) = with_tracing(|| {
        let fake = FakeFileSystem::new();
        fake.add_dir("/data/empty");
        let traced = TracedFileSystem::new(fake);
        traced.is_empty_dir(Path::new("/data/empty")).unwrap();
        traced.exists(Path::new("/data/empty"))
    });

    assert!(exists);
    assert!(logs.contains("TRACE"), "Logs:\n{}", logs);
    assert!(logs.contains("probed"), "Logs:\n{}", logs);
    assert!(logs.contains("checked"), "Logs:\n{}", logs);
}

#[test]
fn traced_passes_results_through() {
    let fake = FakeFileSystem::new();
    fake.add_file("/data/full/a.txt");
    let traced = TracedFileSystem::new(fake.clone());

    assert!(traced.is_dir(Path::new("/data/full")));
    assert!(!traced.is_empty_dir(Path::new("/data/full")).unwrap());
    traced
        .delete_dir_contents(Path::new("/data/full"))
        .unwrap();
    assert!(traced.is_empty_dir(Path::new("/data/full")).unwrap());
    assert_eq!(traced.inner().descendant_count("/data/full"), 0);
}
