// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tofui: publish CI reports into a seven-slot rotation on a static dashboard

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::commands::publish::PublishArgs;
use crate::commands::slots::SlotsArgs;
use crate::exit_error::{ExitError, FAILURE};

const VERBOSE_FILTER: &str = "warn,tofui=debug,tofui_core=debug,tofui_adapters=debug,tofui_engine=debug";

#[derive(Parser)]
#[command(
    name = "tofui",
    version = env::VERSION,
    styles = color::styles(),
    about = "Publish CI reports into a seven-slot rotation on a static dashboard"
)]
struct Cli {
    /// Log protocol activity to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a report into the next slot of its rotation
    Publish(PublishArgs),
    /// Show the seven slots of a rotation
    Slots(SlotsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        let code = e.downcast_ref::<ExitError>().map(|exit| exit.code).unwrap_or(FAILURE);
        eprintln!("error: {e:#}");
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Publish(args) => {
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, stopping before the next attempt");
                    interrupt.cancel();
                }
            });
            commands::publish::handle(args, cancel).await
        }
        Commands::Slots(args) => commands::slots::handle(args).await,
    }
}

/// Logs go to stderr so stdout stays machine readable.
fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
