// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tofui publish`

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use clap::Args;
use regex::Regex;
use tofui_adapters::RemoteStore;
use tofui_core::{Catalog, ReportDraft, Statuses, SystemClock};
use tofui_engine::{PublishError, PublishExecutor, PublishOutcome};
use tokio_util::sync::CancellationToken;

use super::{Store, StoreArgs, TargetArgs};
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{format_published, OutputFormat};

#[allow(clippy::expect_used)]
static STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+):(-?\d+)$").expect("constant regex pattern is valid")
});

#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Status code for a status type, e.g. `build:0` (repeatable)
    #[arg(long = "status", value_name = "TYPE:CODE", value_parser = parse_status)]
    pub statuses: Vec<(String, i64)>,
    /// Name of the CI run being reported
    #[arg(long)]
    pub build_name: String,
    /// Title shown on the dashboard (defaults to the build name)
    #[arg(long)]
    pub display_name: Option<String>,
    /// Link to the full report
    #[arg(long, value_name = "URL")]
    pub html_url: Option<String>,
    /// Dashboard catalog (status types and registered repositories)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

pub(crate) fn parse_status(s: &str) -> Result<(String, i64), String> {
    let caps = STATUS
        .captures(s.trim())
        .ok_or_else(|| format!("invalid status '{s}': must be type:code with an integer code"))?;
    let code = caps[2].parse::<i64>().map_err(|e| format!("invalid status code in '{s}': {e}"))?;
    Ok((caps[1].to_string(), code))
}

/// Statuses in the order given, refusing a type given twice.
pub(crate) fn collect_statuses(pairs: &[(String, i64)]) -> Result<Statuses, ExitError> {
    let mut statuses = Statuses::new();
    for (status_type, code) in pairs {
        if statuses.insert(status_type.clone(), *code).is_some() {
            return Err(ExitError::invalid_input(format!(
                "status type '{status_type}' given more than once"
            )));
        }
    }
    Ok(statuses)
}

pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog, ExitError> {
    match path {
        Some(path) => Catalog::load(path).map_err(|e| ExitError::invalid_input(e.to_string())),
        None => Ok(Catalog::default()),
    }
}

impl PublishArgs {
    pub(crate) fn draft(&self) -> Result<ReportDraft, ExitError> {
        let key = self.target.key()?;
        let build_name = self.build_name.trim();
        if build_name.is_empty() {
            return Err(ExitError::invalid_input("--build-name must not be empty"));
        }
        Ok(ReportDraft {
            source_repo: key.source_repo(),
            folder: self.target.folder().map(str::to_string),
            kind: key.kind(),
            build_name: build_name.to_string(),
            display_name: self.display_name.clone().filter(|d| !d.trim().is_empty()),
            html_url: self.html_url.clone(),
            statuses: collect_statuses(&self.statuses)?,
        })
    }
}

pub async fn handle(args: PublishArgs, cancel: CancellationToken) -> Result<()> {
    let draft = args.draft()?;
    let catalog = load_catalog(args.config.as_deref())?;
    catalog
        .validate_target(&draft.source_repo, draft.folder.as_deref())
        .map_err(|e| ExitError::invalid_input(e.to_string()))?;

    let outcome = match args.store.open()? {
        Store::Dir(store) => publish(store, &draft, &cancel).await,
        Store::GitHub(store) => publish(store, &draft, &cancel).await,
    }
    .map_err(ExitError::from)?;

    let dashboard_url = args.store.dashboard_url();
    println!("{}", format_published(&outcome, &catalog, dashboard_url.as_deref(), args.output)?);
    Ok(())
}

async fn publish<S: RemoteStore>(
    store: S,
    draft: &ReportDraft,
    cancel: &CancellationToken,
) -> Result<PublishOutcome, PublishError> {
    PublishExecutor::new(store, SystemClock, env::publish_config()).publish(draft, cancel).await
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
