// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation keys and slot file naming.
//!
//! A key is the `(repository, folder, report kind)` triple. Each key owns
//! seven files named `{owner}-{repo}-{folder}-{kind}-{slot:03}.json` under
//! [`REPORTS_DIR`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::report::ReportKind;
use crate::slot::SlotNumber;

/// Folder used when the caller gives none.
pub const ROOT_FOLDER: &str = "_root";

/// Remote directory holding every slot file.
pub const REPORTS_DIR: &str = "reports";

#[allow(clippy::expect_used)]
static REPOSITORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static FOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("constant regex pattern is valid"));

/// Errors resolving a rotation key. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("repository is required")]
    MissingRepository,
    #[error("repository must be in format 'owner/repo', got '{0}'")]
    MalformedRepository(String),
    #[error("invalid folder name '{0}': use letters, digits, '.', '_' or '-'")]
    MalformedFolder(String),
    #[error("unknown report kind '{0}' (expected 'test' or 'build')")]
    UnknownReportKind(String),
}

/// Canonical identity of one seven-slot rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RotationKey {
    owner: String,
    repo: String,
    folder: String,
    kind: ReportKind,
}

impl RotationKey {
    /// Resolve a key from caller input.
    ///
    /// An absent or empty folder maps to [`ROOT_FOLDER`].
    pub fn resolve(
        repository: &str,
        folder: Option<&str>,
        kind: ReportKind,
    ) -> Result<Self, KeyError> {
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(KeyError::MissingRepository);
        }
        let caps = REPOSITORY
            .captures(repository)
            .ok_or_else(|| KeyError::MalformedRepository(repository.to_string()))?;

        let folder = match folder.map(str::trim) {
            None | Some("") => ROOT_FOLDER.to_string(),
            Some(f) if FOLDER.is_match(f) => f.to_string(),
            Some(f) => return Err(KeyError::MalformedFolder(f.to_string())),
        };

        Ok(Self { owner: caps[1].to_string(), repo: caps[2].to_string(), folder, kind })
    }

    /// Like [`RotationKey::resolve`], with the report kind given as text.
    pub fn parse(repository: &str, folder: Option<&str>, kind: &str) -> Result<Self, KeyError> {
        Self::resolve(repository, folder, kind.parse()?)
    }

    /// `owner/repo`
    pub fn source_repo(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Filename prefix shared by all seven slots, e.g. `acme-infra-_root-build-`.
    pub fn file_prefix(&self) -> String {
        format!("{}-{}-{}-{}-", self.owner, self.repo, self.folder, self.kind)
    }

    /// Filename stem for `slot`, e.g. `acme-infra-_root-build-003`.
    pub fn file_stem(&self, slot: SlotNumber) -> String {
        format!("{}{}", self.file_prefix(), slot.padded())
    }

    pub fn file_name(&self, slot: SlotNumber) -> String {
        format!("{}.json", self.file_stem(slot))
    }

    /// Store path for `slot`, e.g. `reports/acme-infra-_root-build-003.json`.
    pub fn slot_path(&self, slot: SlotNumber) -> String {
        format!("{}/{}", REPORTS_DIR, self.file_name(slot))
    }
}

impl fmt::Display for RotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.owner, self.repo, self.folder, self.kind)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
