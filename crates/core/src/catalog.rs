// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard configuration catalog.
//!
//! Holds status-type display rules and the registry of repositories and
//! folders the dashboard knows about. Publishing only reads it to validate
//! input and to label status codes; slot allocation never consults it.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating against the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("repository '{0}' is not registered in the dashboard config")]
    UnknownRepository(String),
    #[error("folder '{folder}' is not registered for repository '{repository}'")]
    UnknownFolder { repository: String, folder: String },
}

/// How one status code renders on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDisplay {
    pub label: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusType {
    pub name: String,
    /// Keyed by the code rendered as a string (`"0"`, `"2"`).
    #[serde(default)]
    pub mappings: IndexMap<String, StatusDisplay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub display_name: String,
    #[serde(default)]
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub status_types: IndexMap<String, StatusType>,
    /// Keyed by `owner/repo`.
    #[serde(default)]
    pub repositories: IndexMap<String, RepositoryEntry>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Check a publish target against the registry.
    ///
    /// An empty registry accepts everything, as does a repository without a
    /// folder list. A missing folder always passes (it maps to the root).
    pub fn validate_target(&self, repository: &str, folder: Option<&str>) -> Result<(), CatalogError> {
        if self.repositories.is_empty() {
            return Ok(());
        }
        let entry = self
            .repositories
            .get(repository)
            .ok_or_else(|| CatalogError::UnknownRepository(repository.to_string()))?;

        match folder {
            Some(folder) if !entry.folders.is_empty() && !entry.folders.iter().any(|f| f == folder) => {
                Err(CatalogError::UnknownFolder {
                    repository: repository.to_string(),
                    folder: folder.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Display rule for a status code, if the catalog defines one.
    pub fn describe(&self, status_type: &str, code: i64) -> Option<&StatusDisplay> {
        self.status_types.get(status_type)?.mappings.get(&code.to_string())
    }

    /// Human name of a status type, falling back to its key.
    pub fn status_name<'a>(&'a self, status_type: &'a str) -> &'a str {
        self.status_types.get(status_type).map(|t| t.name.as_str()).unwrap_or(status_type)
    }

    /// Display name of a registered repository.
    pub fn repository_name(&self, repository: &str) -> Option<&str> {
        self.repositories.get(repository).map(|r| r.display_name.as_str())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
