// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use crate::runner::Summary;
use fp_core::PurgeEvent;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print one value: its `Display` form, or a single JSON line
pub fn print<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

pub fn print_event(event: &PurgeEvent, format: OutputFormat) {
    print(event, format);
}

pub fn print_summary(summary: &Summary, format: OutputFormat) {
    print(summary, format);
}
