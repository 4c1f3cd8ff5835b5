// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish errors

use thiserror::Error;
use tofui_adapters::StoreError;
use tofui_core::KeyError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    InvalidKey(#[from] KeyError),

    /// Store could not be reached. Only surfaced by single reads; the
    /// publish loop retries these and reports [`PublishError::Exhausted`].
    #[error(transparent)]
    RemoteUnavailable(StoreError),

    #[error(transparent)]
    Rejected(StoreError),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("publish gave up after {attempts} attempts: {}", last_error(.errors))]
    Exhausted { attempts: u32, errors: Vec<StoreError> },

    #[error("publish cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl From<StoreError> for PublishError {
    fn from(e: StoreError) -> Self {
        if e.is_retryable() {
            PublishError::RemoteUnavailable(e)
        } else {
            PublishError::Rejected(e)
        }
    }
}

fn last_error(errors: &[StoreError]) -> String {
    errors.last().map(ToString::to_string).unwrap_or_else(|| "no attempts made".to_string())
}
