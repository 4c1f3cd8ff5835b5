// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local directory store.
//!
//! Mirrors the published layout on disk, e.g. a checked-out `gh-pages`
//! worktree or a shared volume. The version of a file is the SHA-256 of its
//! content. Conditional writes serialize on an exclusive lock of
//! `<root>/.tofui.lock`, held only across the compare and the rename.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use tofui_core::ObjectVersion;

use super::{Precondition, RemoteObject, RemoteStore, StoreError};

const LOCK_FILE: &str = ".tofui.lock";

#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a store path under the root, refusing anything that escapes it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(StoreError::Rejected(format!("invalid store path '{path}'")));
        }
        Ok(self.root.join(relative))
    }
}

pub(crate) fn content_version(content: &[u8]) -> ObjectVersion {
    let digest = Sha256::digest(content);
    ObjectVersion::new(digest.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

fn io_error(context: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{context} {}: {e}", path.display()))
}

fn read_version(path: &Path) -> Result<Option<ObjectVersion>, StoreError> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content_version(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("failed to read", path, e)),
    }
}

/// Compare-and-rename under the directory lock. Blocking.
fn write_locked(
    root: &Path,
    target: &Path,
    content: &[u8],
    precondition: &Precondition,
) -> Result<ObjectVersion, StoreError> {
    fs::create_dir_all(root).map_err(|e| io_error("failed to create", root, e))?;
    let lock_path = root.join(LOCK_FILE);
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| io_error("failed to open lock", &lock_path, e))?;
    lock.lock_exclusive().map_err(|e| io_error("failed to lock", &lock_path, e))?;

    let result = replace_if(target, content, precondition);
    if let Err(e) = FileExt::unlock(&lock) {
        tracing::warn!(path = %lock_path.display(), error = %e, "failed to release store lock");
    }
    result
}

fn replace_if(
    target: &Path,
    content: &[u8],
    precondition: &Precondition,
) -> Result<ObjectVersion, StoreError> {
    let current = read_version(target)?;
    if !precondition.holds(current.as_ref()) {
        return Err(StoreError::Conflict(format!(
            "{} changed (expected {}, found {})",
            target.display(),
            describe(precondition),
            current.as_ref().map(ObjectVersion::as_str).unwrap_or("no file"),
        )));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("failed to create", parent, e))?;
    }
    write_atomic(target, content)?;
    Ok(content_version(content))
}

/// Write through a sibling temp file, removing it again if anything fails.
fn write_atomic(target: &Path, content: &[u8]) -> Result<(), StoreError> {
    let tmp = target.with_extension(format!("tmp.{}", std::process::id()));
    let result = write_then_rename(&tmp, target, content);
    if result.is_err() {
        match fs::remove_file(&tmp) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                tracing::warn!(path = %tmp.display(), error = %e, "failed to remove temp file");
            }
            _ => {}
        }
    }
    result
}

fn write_then_rename(tmp: &Path, target: &Path, content: &[u8]) -> Result<(), StoreError> {
    let mut file = File::create(tmp).map_err(|e| io_error("failed to create", tmp, e))?;
    file.write_all(content).map_err(|e| io_error("failed to write", tmp, e))?;
    file.sync_all().map_err(|e| io_error("failed to sync", tmp, e))?;
    fs::rename(tmp, target).map_err(|e| io_error("failed to rename", tmp, e))
}

fn describe(precondition: &Precondition) -> &str {
    match precondition {
        Precondition::Absent => "no file",
        Precondition::Matches(v) => v.as_str(),
    }
}

#[async_trait]
impl RemoteStore for DirStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteObject>, StoreError> {
        let full = self.resolve(path)?;
        let content = match tokio::fs::read(&full).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("failed to read", &full, e)),
        };
        let last_modified = tokio::fs::metadata(&full)
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Ok(Some(RemoteObject { version: content_version(&content), content, last_modified }))
    }

    async fn write_if(
        &self,
        path: &str,
        content: &[u8],
        precondition: &Precondition,
        _message: &str,
    ) -> Result<ObjectVersion, StoreError> {
        let target = self.resolve(path)?;
        let root = self.root.clone();
        let content = content.to_vec();
        let precondition = precondition.clone();
        tokio::task::spawn_blocking(move || write_locked(&root, &target, &content, &precondition))
            .await
            .map_err(|e| StoreError::Unavailable(format!("write task failed: {e}")))?
    }
}

#[cfg(test)]
#[path = "dir_tests.rs"]
mod tests;
