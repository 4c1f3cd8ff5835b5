// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{DateTime, Utc};

use crate::{ObjectVersion, Occupancy, Report, ReportDraft, RotationKey, SlotNumber, SlotRecord};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for slot snapshots.
pub mod strategies {
    use super::{base_time, occupancy_of, test_key};
    use crate::{Occupancy, SLOT_COUNT};
    use proptest::prelude::*;

    /// Seven slots, each empty or holding a report created within a few
    /// minutes of [`base_time`] so that ties are common.
    pub fn arb_occupancy() -> impl Strategy<Value = Occupancy> {
        proptest::collection::vec(proptest::option::of(0i64..5), usize::from(SLOT_COUNT)).prop_map(
            |minutes| {
                let created: Vec<_> = minutes
                    .into_iter()
                    .map(|m| m.map(|m| base_time() + chrono::Duration::minutes(m)))
                    .collect();
                occupancy_of(&test_key(), &created)
            },
        )
    }
}

/// 2024-01-01T00:00:00Z
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

/// `acme/infra`, root folder, build rotation.
pub fn test_key() -> RotationKey {
    RotationKey::resolve("acme/infra", None, crate::ReportKind::Build)
        .unwrap_or_else(|e| unreachable!("static test key is valid: {e}"))
}

/// A report for `key` in `slot`, created at `timestamp`.
pub fn report_at(key: &RotationKey, slot: SlotNumber, timestamp: DateTime<Utc>) -> Report {
    ReportDraft::builder()
        .source_repo(key.source_repo())
        .build_name(format!("build-{}", timestamp.timestamp()))
        .build()
        .stamp(key, slot, timestamp)
}

/// Build a snapshot from seven optional creation times (index 0 is slot 1).
pub fn occupancy_of(key: &RotationKey, created: &[Option<DateTime<Utc>>]) -> Occupancy {
    let mut occupancy = Occupancy::vacant();
    for (slot, timestamp) in SlotNumber::all().zip(created) {
        if let Some(timestamp) = timestamp {
            let report = report_at(key, slot, *timestamp);
            occupancy.set(SlotRecord::occupied(
                slot,
                report,
                Some(*timestamp),
                ObjectVersion::new(format!("v{}", slot)),
            ));
        }
    }
    occupancy
}

/// Slot number from a literal known to be in range.
pub fn slot(n: u8) -> SlotNumber {
    SlotNumber::new(n).unwrap_or_else(|e| unreachable!("{e}"))
}
