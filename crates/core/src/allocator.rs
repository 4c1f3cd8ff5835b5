// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target slot selection.

use crate::slot::{Occupancy, SlotNumber};

/// Choose the slot a new report should occupy.
///
/// The lowest-numbered empty slot wins. When all seven are occupied, the slot
/// holding the oldest report is evicted, lowest slot number first on ties.
pub fn allocate(occupancy: &Occupancy) -> SlotNumber {
    if let Some(empty) = occupancy.iter().find(|record| record.is_empty()) {
        return empty.slot;
    }

    // min_by_key keeps the first of equal elements, and iteration is in slot order
    occupancy
        .iter()
        .filter_map(|record| record.report().map(|report| (record.slot, report.timestamp)))
        .min_by_key(|(_, timestamp)| *timestamp)
        .map(|(slot, _)| slot)
        .unwrap_or_else(SlotNumber::first)
}

#[cfg(test)]
#[path = "allocator_tests.rs"]
mod tests;
