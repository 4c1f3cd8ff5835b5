// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use tofui_engine::PublishError;

/// Exhausted retries, rejected writes and anything else fatal.
pub const FAILURE: i32 = 1;
/// Bad key, status syntax, catalog mismatch or missing credential.
pub const INVALID_INPUT: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(INVALID_INPUT, message)
    }
}

impl From<PublishError> for ExitError {
    fn from(e: PublishError) -> Self {
        match e {
            PublishError::InvalidKey(_) => Self::invalid_input(e.to_string()),
            _ => Self::new(FAILURE, e.to_string()),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
