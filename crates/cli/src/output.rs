// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tofui_core::{Catalog, Occupancy, Report, RotationKey, SlotState, Statuses};
use tofui_engine::PublishOutcome;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Dashboard URL served from the dashboard repository's Pages site.
///
/// Public GitHub serves `owner.github.io/repo`; Enterprise serves Pages from
/// a `pages.` subdomain of the server with the full repository path.
pub fn pages_url(dashboard: &str, enterprise_url: Option<&str>) -> Option<String> {
    let (owner, repo) = dashboard.split_once('/')?;
    match enterprise_url {
        Some(base) => Some(format!(
            "{}/{owner}/{repo}",
            base.trim_end_matches('/').replacen("https://", "https://pages.", 1)
        )),
        None => Some(format!("https://{owner}.github.io/{repo}")),
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One line per status, using catalog labels where the catalog has them.
pub fn status_lines(statuses: &Statuses, catalog: &Catalog) -> Vec<String> {
    statuses
        .iter()
        .map(|(status_type, code)| {
            let name = catalog.status_name(status_type);
            match catalog.describe(status_type, *code) {
                Some(display) if display.emoji.is_empty() => {
                    format!("{name}: {} ({code})", display.label)
                }
                Some(display) => format!("{name}: {} {} ({code})", display.emoji, display.label),
                None => format!("{name}: {code}"),
            }
        })
        .collect()
}

fn compact_statuses(statuses: &Statuses) -> String {
    statuses.iter().map(|(t, c)| format!("{t}={c}")).collect::<Vec<_>>().join(" ")
}

#[derive(Serialize)]
struct PublishedJson<'a> {
    slot: u8,
    path: &'a str,
    attempts: u32,
    report: &'a Report,
    replaced: Option<&'a Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard_url: Option<&'a str>,
}

pub fn format_published(
    outcome: &PublishOutcome,
    catalog: &Catalog,
    dashboard_url: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let report = &outcome.report;
    if format == OutputFormat::Json {
        let json = PublishedJson {
            slot: report.slot_number.get(),
            path: &outcome.path,
            attempts: outcome.attempts,
            report,
            replaced: outcome.replaced.as_ref(),
            dashboard_url,
        };
        return Ok(serde_json::to_string_pretty(&json)?);
    }

    let mut lines = vec![format!(
        "Published {} to slot {} of {}/{}/{}",
        report.title(),
        report.slot_number,
        report.source_repo,
        report.folder,
        report.report_type,
    )];
    lines.push(format!("  file:      {}", outcome.path));
    if let Some(replaced) = &outcome.replaced {
        lines.push(format!(
            "  replaced:  {} from {}",
            replaced.title(),
            format_timestamp(&replaced.timestamp)
        ));
    }
    if outcome.attempts > 1 {
        lines.push(format!("  attempts:  {}", outcome.attempts));
    }
    for status in status_lines(&report.statuses, catalog) {
        lines.push(format!("  status:    {status}"));
    }
    if let Some(url) = dashboard_url {
        lines.push(format!("  dashboard: {url}"));
    }
    Ok(lines.join("\n"))
}

#[derive(Serialize)]
struct SlotJson<'a> {
    slot: u8,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a Report>,
}

pub fn format_slots(
    key: &RotationKey,
    occupancy: &Occupancy,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let slots: Vec<_> = occupancy
            .iter()
            .map(|record| SlotJson {
                slot: record.slot.get(),
                state: if record.is_empty() { "empty" } else { "occupied" },
                version: record.version.as_ref().map(|v| v.as_str()),
                report: record.report(),
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&serde_json::json!({
            "key": key.to_string(),
            "slots": slots,
        }))?);
    }

    let newest = occupancy.newest().map(|r| r.slot_number);
    let mut lines = vec![
        format!("{} ({} of 7 occupied)", key, occupancy.occupied_count()),
        color::header(&format!("{:<5} {:<24} {:<25} {}", "SLOT", "BUILD", "CREATED", "STATUSES")),
    ];
    for record in occupancy.iter() {
        let line = match &record.state {
            SlotState::Empty => color::muted(&format!("{:<5} -", record.slot)),
            SlotState::Occupied { report, .. } => {
                let marker = if newest == Some(record.slot) { "*" } else { "" };
                format!(
                    "{:<5} {:<24} {:<25} {}",
                    format!("{}{marker}", record.slot),
                    report.title(),
                    format_timestamp(&report.timestamp),
                    color::context(&compact_statuses(&report.statuses)),
                )
            }
        };
        lines.push(line.trim_end().to_string());
    }
    Ok(lines.join("\n"))
}
