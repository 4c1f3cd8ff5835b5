// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tofui-engine: the publishing protocol
//!
//! Reads a key's slots, allocates one, and writes it conditionally, retrying
//! from a fresh read whenever another publisher got there first.

pub mod backoff;
pub mod error;
pub mod executor;
pub mod reader;

pub use backoff::{RetryPolicy, MAX_ATTEMPTS};
pub use error::PublishError;
pub use executor::{PublishConfig, PublishExecutor, PublishOutcome};
pub use reader::{SlotStateReader, SlotWarning};
