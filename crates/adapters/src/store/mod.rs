// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store adapters.
//!
//! The publishing protocol needs two primitives from wherever slot files
//! live: read one file with its version, and write a file only if its
//! version is still the one the caller observed. Slot paths are derived from
//! the rotation key, so nothing ever enumerates a directory.

mod dir;
mod github;

pub use dir::DirStore;
pub use github::{GitHubConfig, GitHubStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tofui_core::ObjectVersion;

/// Errors from store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The file changed since it was observed.
    #[error("write conflict: {0}")]
    Conflict(String),
    /// Network, auth, throttling or server failure reaching the store.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store refused the request outright; retrying will not help.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StoreError::Rejected(_))
    }
}

/// A file as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub content: Vec<u8>,
    pub version: ObjectVersion,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Condition a write is accepted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// No file may exist at the path.
    Absent,
    /// The file must still be at this version.
    Matches(ObjectVersion),
}

impl Precondition {
    /// Precondition matching what a read observed.
    pub fn observed(version: Option<&ObjectVersion>) -> Self {
        match version {
            Some(v) => Precondition::Matches(v.clone()),
            None => Precondition::Absent,
        }
    }

    /// Whether a file currently at `current` satisfies this precondition.
    pub fn holds(&self, current: Option<&ObjectVersion>) -> bool {
        match (self, current) {
            (Precondition::Absent, None) => true,
            (Precondition::Matches(expected), Some(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Key-addressed file storage with optimistic concurrency.
#[async_trait]
pub trait RemoteStore: Clone + Send + Sync + 'static {
    /// Read a file. `Ok(None)` means it does not exist.
    async fn read(&self, path: &str) -> Result<Option<RemoteObject>, StoreError>;

    /// Write `content` to `path` if `precondition` still holds, returning the
    /// new version. Fails with [`StoreError::Conflict`] otherwise.
    async fn write_if(
        &self,
        path: &str,
        content: &[u8],
        precondition: &Precondition,
        message: &str,
    ) -> Result<ObjectVersion, StoreError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
