// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fpurge - deferred filesystem purges

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;
mod runner;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{at, plan, when_empty};
use fp_core::PurgerConfig;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "fpurge",
    version,
    about = "Delete files and directories later, or once they are empty"
)]
struct Cli {
    /// Purger configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print events as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Purge a path at a fixed time
    At(at::AtArgs),
    /// Purge a directory once it has become empty
    WhenEmpty(when_empty::WhenEmptyArgs),
    /// Run every purge listed in a plan file
    Plan(plan::PlanArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PurgerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PurgerConfig::default(),
    };

    let requests = match cli.command {
        Commands::At(args) => vec![args.into_request()?],
        Commands::WhenEmpty(args) => vec![args.into_request(&config)?],
        Commands::Plan(args) => {
            let plan = plan::Plan::load(&args.file)?;
            if let Some(purger) = plan.purger.clone() {
                config = purger;
            }
            plan.requests(&config)?
        }
    };

    setup_logging(&config);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let summary = runner::run(requests, &config, format).await?;
    output::print_summary(&summary, format);

    Ok(summary.exit_code())
}

fn setup_logging(config: &PurgerConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
