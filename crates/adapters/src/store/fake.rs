// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store with scripted failures, for tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tofui_core::ObjectVersion;

use super::{Precondition, RemoteObject, RemoteStore, StoreError};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Read { path: String },
    Write { path: String, precondition: Precondition, message: String },
}

#[derive(Clone)]
struct Entry {
    content: Vec<u8>,
    version: u64,
    last_modified: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct FakeStoreState {
    files: BTreeMap<String, Entry>,
    next_version: u64,
    calls: Vec<StoreCall>,
    unavailable_reads: usize,
    unavailable_writes: usize,
    forced_conflicts: usize,
    always_conflict: bool,
    rejected_writes: Option<String>,
    foreign_writes: VecDeque<(String, Vec<u8>)>,
}

impl FakeStoreState {
    fn put(&mut self, path: &str, content: Vec<u8>) -> u64 {
        self.next_version += 1;
        let version = self.next_version;
        self.files.insert(path.to_string(), Entry { content, version, last_modified: None });
        version
    }
}

/// Fake remote store for testing.
///
/// Versions are a store-wide counter, so every write produces a version no
/// earlier read can have observed. Every operation yields to the scheduler
/// first, letting concurrent publishers interleave between read and write.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly, bypassing preconditions.
    pub fn put(&self, path: &str, content: impl Into<Vec<u8>>) -> ObjectVersion {
        let version = self.inner.lock().put(path, content.into());
        ObjectVersion::new(version.to_string())
    }

    /// Current content of a file.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().files.get(path).map(|e| e.content.clone())
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.inner.lock().files.keys().cloned().collect()
    }

    pub fn set_last_modified(&self, path: &str, at: DateTime<Utc>) {
        if let Some(entry) = self.inner.lock().files.get_mut(path) {
            entry.last_modified = Some(at);
        }
    }

    /// The next `n` reads fail as unavailable.
    pub fn fail_reads(&self, n: usize) {
        self.inner.lock().unavailable_reads = n;
    }

    /// The next `n` writes fail as unavailable without storing anything.
    pub fn fail_writes(&self, n: usize) {
        self.inner.lock().unavailable_writes = n;
    }

    /// The next `n` writes are refused as conflicts without storing anything.
    pub fn conflict_writes(&self, n: usize) {
        self.inner.lock().forced_conflicts = n;
    }

    /// Refuse every write as a conflict.
    pub fn always_conflict(&self) {
        self.inner.lock().always_conflict = true;
    }

    /// Refuse every write as a fatal rejection.
    pub fn reject_writes(&self, reason: &str) {
        self.inner.lock().rejected_writes = Some(reason.to_string());
    }

    /// Land a write from another publisher just before the next write call,
    /// as if it won the race between our read and our write.
    pub fn race_next_write(&self, path: &str, content: impl Into<Vec<u8>>) {
        self.inner.lock().foreign_writes.push_back((path.to_string(), content.into()));
    }

    /// All calls made, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    pub fn write_attempts(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| matches!(c, StoreCall::Write { .. })).count()
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteObject>, StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.inner.lock();
        state.calls.push(StoreCall::Read { path: path.to_string() });
        if state.unavailable_reads > 0 {
            state.unavailable_reads -= 1;
            return Err(StoreError::Unavailable(format!("injected read failure for {path}")));
        }
        Ok(state.files.get(path).map(|entry| RemoteObject {
            content: entry.content.clone(),
            version: ObjectVersion::new(entry.version.to_string()),
            last_modified: entry.last_modified,
        }))
    }

    async fn write_if(
        &self,
        path: &str,
        content: &[u8],
        precondition: &Precondition,
        message: &str,
    ) -> Result<ObjectVersion, StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.inner.lock();
        state.calls.push(StoreCall::Write {
            path: path.to_string(),
            precondition: precondition.clone(),
            message: message.to_string(),
        });

        if let Some(reason) = &state.rejected_writes {
            return Err(StoreError::Rejected(reason.clone()));
        }
        if state.unavailable_writes > 0 {
            state.unavailable_writes -= 1;
            return Err(StoreError::Unavailable(format!("injected write failure for {path}")));
        }
        if state.always_conflict {
            return Err(StoreError::Conflict(format!("injected conflict for {path}")));
        }
        if state.forced_conflicts > 0 {
            state.forced_conflicts -= 1;
            return Err(StoreError::Conflict(format!("injected conflict for {path}")));
        }
        if let Some((foreign_path, foreign)) = state.foreign_writes.pop_front() {
            state.put(&foreign_path, foreign);
        }

        let current = state.files.get(path).map(|e| ObjectVersion::new(e.version.to_string()));
        if !precondition.holds(current.as_ref()) {
            return Err(StoreError::Conflict(format!("{path} changed since it was read")));
        }
        let version = state.put(path, content.to_vec());
        Ok(ObjectVersion::new(version.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
