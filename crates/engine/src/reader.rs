// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot state reader
//!
//! Builds an [`Occupancy`] snapshot for one key by reading each of its seven
//! slot paths directly. A missing file is an empty slot.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tofui_adapters::{RemoteObject, RemoteStore, StoreError};
use tofui_core::{Occupancy, Report, RotationKey, SlotNumber, SlotRecord};

/// A slot file that could not be used. The slot reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotWarning {
    #[error("{path}: {reason}")]
    Malformed { slot: SlotNumber, path: String, reason: String },
}

#[derive(Clone)]
pub struct SlotStateReader<S> {
    store: S,
    timeout: Duration,
}

impl<S: RemoteStore> SlotStateReader<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Observe all seven slots of `key`.
    pub async fn read(&self, key: &RotationKey) -> Result<Occupancy, StoreError> {
        let mut occupancy = Occupancy::vacant();
        for slot in SlotNumber::all() {
            let path = key.slot_path(slot);
            let Some(object) = within(self.timeout, &path, self.store.read(&path)).await? else {
                continue;
            };
            let record = match inspect(slot, &path, object) {
                Ok(record) => record,
                Err((record, warning)) => {
                    tracing::warn!(key = %key, slot = slot.get(), error = %warning, "malformed slot data");
                    record
                }
            };
            occupancy.set(record);
        }
        tracing::debug!(key = %key, occupied = occupancy.occupied_count(), "read slots");
        Ok(occupancy)
    }
}

/// Turn a slot file into a record. An unusable file still yields an empty
/// record carrying its version, so replacing it stays conditional.
fn inspect(
    slot: SlotNumber,
    path: &str,
    object: RemoteObject,
) -> Result<SlotRecord, (SlotRecord, SlotWarning)> {
    let malformed = |reason: String| {
        let record = SlotRecord { version: Some(object.version.clone()), ..SlotRecord::empty(slot) };
        (record, SlotWarning::Malformed { slot, path: path.to_string(), reason })
    };
    let report = Report::from_json(&object.content).map_err(|e| malformed(e.to_string()))?;
    if report.slot_number != slot {
        return Err(malformed(format!("report claims slot {}", report.slot_number)));
    }
    Ok(SlotRecord::occupied(slot, report, object.last_modified, object.version))
}

/// Bound a store call, reporting a timeout as an unavailable store.
pub(crate) async fn within<T>(
    limit: Duration,
    target: &str,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Unavailable(format!("{target}: timed out after {limit:?}"))),
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
