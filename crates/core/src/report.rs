// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Published report records.
//!
//! A [`Report`] is the JSON document stored in one slot. It is written whole
//! and never patched: republishing a slot replaces every field.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::key::{KeyError, RotationKey};
use crate::slot::SlotNumber;

/// Status-type name to integer code, in caller order.
pub type Statuses = IndexMap<String, i64>;

/// Which rotation a report belongs to: pull-request tests or merge builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Test,
    #[default]
    Build,
}

crate::simple_display! {
    ReportKind {
        Test => "test",
        Build => "build",
    }
}

impl FromStr for ReportKind {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(ReportKind::Test),
            "build" => Ok(ReportKind::Build),
            other => Err(KeyError::UnknownReportKind(other.to_string())),
        }
    }
}

/// One CI run's metadata as stored in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub source_repo: String,
    pub folder: String,
    pub report_type: ReportKind,
    pub build_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default)]
    pub statuses: Statuses,
    #[serde(with = "utc_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub slot_number: SlotNumber,
}

impl Report {
    /// Name shown on the dashboard.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.build_name)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// A report before it has been given a slot and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub source_repo: String,
    pub folder: Option<String>,
    pub kind: ReportKind,
    pub build_name: String,
    pub display_name: Option<String>,
    pub html_url: Option<String>,
    pub statuses: Statuses,
}

crate::builder! {
    pub struct ReportDraftBuilder => ReportDraft {
        into {
            source_repo: String = "acme/infra",
            build_name: String = "nightly",
        }
        set {
            kind: ReportKind = ReportKind::Build,
            statuses: Statuses = Statuses::new(),
        }
        option {
            folder: String = None,
            display_name: String = None,
            html_url: String = None,
        }
    }
}

impl ReportDraft {
    /// Resolve the rotation key this draft publishes into.
    pub fn key(&self) -> Result<RotationKey, KeyError> {
        RotationKey::resolve(&self.source_repo, self.folder.as_deref(), self.kind)
    }

    /// Produce the final report for `slot`.
    ///
    /// The display name falls back to the build name.
    pub fn stamp(&self, key: &RotationKey, slot: SlotNumber, timestamp: DateTime<Utc>) -> Report {
        Report {
            source_repo: key.source_repo(),
            folder: key.folder().to_string(),
            report_type: key.kind(),
            build_name: self.build_name.clone(),
            display_name: Some(self.display_name.clone().unwrap_or_else(|| self.build_name.clone())),
            html_url: self.html_url.clone(),
            statuses: self.statuses.clone(),
            timestamp,
            slot_number: slot,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision and a `Z` suffix.
///
/// Older writers emitted naive timestamps; those parse as UTC.
mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
