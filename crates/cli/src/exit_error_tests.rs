// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tofui_adapters::StoreError;
use tofui_core::KeyError;

#[test]
fn invalid_key_is_invalid_input() {
    let exit = ExitError::from(PublishError::InvalidKey(KeyError::MissingRepository));
    assert_eq!(exit.code, INVALID_INPUT);
}

#[test]
fn exhausted_names_attempts_and_last_error() {
    let exit = ExitError::from(PublishError::Exhausted {
        attempts: 12,
        errors: vec![
            StoreError::Unavailable("502 Bad Gateway".into()),
            StoreError::Conflict("409 sha mismatch".into()),
        ],
    });
    assert_eq!(exit.code, FAILURE);
    assert_eq!(exit.message, "publish gave up after 12 attempts: write conflict: 409 sha mismatch");
}

#[yare::parameterized(
    rejected  = { PublishError::Rejected(StoreError::Rejected("404 Not Found".into())) },
    cancelled = { PublishError::Cancelled { attempts: 2 } },
)]
fn other_failures_exit_one(error: PublishError) {
    assert_eq!(ExitError::from(error).code, FAILURE);
}
