// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tofui-core: report model and slot rotation rules for the tofui dashboard

pub mod macros;

pub mod allocator;
pub mod catalog;
pub mod clock;
pub mod key;
pub mod report;
pub mod slot;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use allocator::allocate;
pub use catalog::{Catalog, CatalogError, RepositoryEntry, StatusDisplay, StatusType};
pub use clock::{Clock, FakeClock, SystemClock};
pub use key::{KeyError, RotationKey, REPORTS_DIR, ROOT_FOLDER};
#[cfg(any(test, feature = "test-support"))]
pub use report::ReportDraftBuilder;
pub use report::{Report, ReportDraft, ReportKind, Statuses};
pub use slot::{ObjectVersion, Occupancy, SlotNumber, SlotRangeError, SlotRecord, SlotState, SLOT_COUNT};
