// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod publish;
pub mod slots;

use std::path::PathBuf;

use clap::Args;
use tofui_adapters::{DirStore, GitHubConfig, GitHubStore};
use tofui_core::{ReportKind, RotationKey};

use crate::env;
use crate::exit_error::ExitError;

/// Which rotation a command works on.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Source repository the report is about, `owner/name`
    #[arg(long)]
    pub repo: String,
    /// Folder within the repository (root when omitted)
    #[arg(long)]
    pub folder: Option<String>,
    /// Report kind: build or test
    #[arg(long, value_parser = parse_mode, default_value = "build")]
    pub mode: ReportKind,
}

impl TargetArgs {
    pub fn key(&self) -> Result<RotationKey, ExitError> {
        RotationKey::resolve(&self.repo, self.folder(), self.mode)
            .map_err(|e| ExitError::invalid_input(e.to_string()))
    }

    /// The folder as given, if non-empty.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }
}

pub(crate) fn parse_mode(s: &str) -> Result<ReportKind, String> {
    s.parse().map_err(|e: tofui_core::KeyError| e.to_string())
}

/// Where the slot files live.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Dashboard repository holding the published reports, `owner/repo`
    #[arg(long, required_unless_present = "store_dir")]
    pub dashboard: Option<String>,
    /// GitHub Enterprise base URL, e.g. https://github.example.com
    #[arg(long, value_name = "URL")]
    pub enterprise_url: Option<String>,
    /// Branch of the dashboard repository to publish to
    #[arg(long, default_value = "gh-pages")]
    pub branch: String,
    /// Use a local directory as the store instead of GitHub
    #[arg(long, value_name = "DIR", conflicts_with = "dashboard")]
    pub store_dir: Option<PathBuf>,
}

pub enum Store {
    Dir(DirStore),
    GitHub(GitHubStore),
}

impl StoreArgs {
    pub fn open(&self) -> Result<Store, ExitError> {
        if let Some(dir) = &self.store_dir {
            return Ok(Store::Dir(DirStore::new(dir)));
        }
        let dashboard = self.dashboard()?;
        let token = env::github_token().ok_or_else(|| {
            ExitError::invalid_input("GITHUB_TOKEN is not set; it is required to publish to GitHub")
        })?;
        let store = GitHubStore::new(GitHubConfig {
            repository: dashboard.to_string(),
            branch: self.branch.clone(),
            token,
            enterprise_url: self.enterprise_url.clone(),
            timeout: env::remote_timeout(),
        })
        .map_err(|e| ExitError::new(crate::exit_error::FAILURE, e.to_string()))?;
        Ok(Store::GitHub(store))
    }

    fn dashboard(&self) -> Result<&str, ExitError> {
        let dashboard = self.dashboard.as_deref().map(str::trim).unwrap_or_default();
        match dashboard.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(dashboard)
            }
            _ => Err(ExitError::invalid_input(format!(
                "invalid dashboard repository '{dashboard}': expected owner/repo"
            ))),
        }
    }

    /// Pages URL of the dashboard, when publishing to GitHub.
    pub fn dashboard_url(&self) -> Option<String> {
        if self.store_dir.is_some() {
            return None;
        }
        crate::output::pages_url(self.dashboard.as_deref()?, self.enterprise_url.as_deref())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
