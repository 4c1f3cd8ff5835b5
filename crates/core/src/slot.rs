// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot numbering and per-key occupancy snapshots.
//!
//! Every rotation key owns exactly [`SLOT_COUNT`] slots. A slot number is a
//! stable identifier encoded in the slot's filename, so it can only be built
//! through [`SlotNumber::new`], which rejects anything outside `1..=7`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::Report;

/// Number of slots in every rotation.
pub const SLOT_COUNT: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot number {0} is outside 1..=7")]
pub struct SlotRangeError(pub u8);

/// One of the seven fixed positions of a rotation (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotNumber(u8);

impl SlotNumber {
    pub fn new(n: u8) -> Result<Self, SlotRangeError> {
        if (1..=SLOT_COUNT).contains(&n) {
            Ok(Self(n))
        } else {
            Err(SlotRangeError(n))
        }
    }

    pub const fn first() -> Self {
        Self(1)
    }

    /// All slot numbers in ascending order.
    pub fn all() -> impl Iterator<Item = SlotNumber> {
        (1..=SLOT_COUNT).map(SlotNumber)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-padded form used in filenames (`001`..`007`).
    pub fn padded(self) -> String {
        format!("{:03}", self.0)
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for SlotNumber {
    type Error = SlotRangeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<SlotNumber> for u8 {
    fn from(slot: SlotNumber) -> Self {
        slot.0
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque remote object version (a blob sha, a content digest, a counter).
///
/// Only ever compared for equality; it is the precondition of a conditional
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectVersion(String);

impl ObjectVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Empty,
    Occupied { report: Report, last_modified: Option<DateTime<Utc>> },
}

/// Observed state of one slot.
///
/// `version` is the remote version seen when the slot was read. It is `None`
/// only when no file exists; a corrupt file is `Empty` but keeps its version
/// so an overwrite is still conditional on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRecord {
    pub slot: SlotNumber,
    pub state: SlotState,
    pub version: Option<ObjectVersion>,
}

impl SlotRecord {
    pub fn empty(slot: SlotNumber) -> Self {
        Self { slot, state: SlotState::Empty, version: None }
    }

    pub fn occupied(
        slot: SlotNumber,
        report: Report,
        last_modified: Option<DateTime<Utc>>,
        version: ObjectVersion,
    ) -> Self {
        Self { slot, state: SlotState::Occupied { report, last_modified }, version: Some(version) }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SlotState::Empty)
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            SlotState::Occupied { report, .. } => Some(report),
            SlotState::Empty => None,
        }
    }
}

/// Immutable snapshot of all seven slots of one key, ordered by slot number.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy {
    slots: [SlotRecord; SLOT_COUNT as usize],
}

impl Occupancy {
    /// Seven empty slots, as seen for a key with no files.
    pub fn vacant() -> Self {
        Self {
            slots: std::array::from_fn(|i| SlotRecord::empty(SlotNumber(i as u8 + 1))),
        }
    }

    /// Replace the record for `record.slot`.
    pub fn set(&mut self, record: SlotRecord) {
        let index = record.slot.index();
        self.slots[index] = record;
    }

    pub fn get(&self, slot: SlotNumber) -> &SlotRecord {
        &self.slots[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotRecord> {
        self.slots.iter()
    }

    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.slots.iter().filter_map(SlotRecord::report)
    }

    pub fn occupied_count(&self) -> usize {
        self.reports().count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == usize::from(SLOT_COUNT)
    }

    /// Most recently created report, if any.
    pub fn newest(&self) -> Option<&Report> {
        self.reports().max_by_key(|r| r.timestamp)
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::vacant()
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
