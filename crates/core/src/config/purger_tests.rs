// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn empty_config_uses_defaults() {
    let config = PurgerConfig::parse("").unwrap();

    assert_eq!(config, PurgerConfig::default());
    assert_eq!(config.default_poll_interval, Duration::from_secs(300));
    assert!(!config.interrupt_on_unschedule);
    assert_eq!(config.log_filter, "info");
}

#[test]
fn durations_are_humantime() {
    let config = PurgerConfig::parse(
        r#"
        default_poll_interval = "30s"
        interrupt_on_unschedule = true
        log_filter = "fp_core=debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.default_poll_interval, Duration::from_secs(30));
    assert!(config.interrupt_on_unschedule);
    assert_eq!(config.log_filter, "fp_core=debug");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = PurgerConfig::parse("poll = \"30s\"").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "default_poll_interval = \"2m\"").unwrap();

    let config = PurgerConfig::load(file.path()).unwrap();

    assert_eq!(config.default_poll_interval, Duration::from_secs(120));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = PurgerConfig::load(dir.path().join("missing.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("missing.toml"));
}
