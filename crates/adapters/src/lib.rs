// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the remote stores that hold published slot files

pub mod store;

pub use store::{
    DirStore, GitHubConfig, GitHubStore, Precondition, RemoteObject, RemoteStore, StoreError,
};

#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
