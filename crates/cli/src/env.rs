// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::time::Duration;

use tofui_engine::{PublishConfig, RetryPolicy};

/// Version with build hash, e.g. `0.2.0 (1a2b3c4)`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")");

/// Token for the GitHub contents API
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Bound on each store request (default 30s)
pub fn remote_timeout() -> Duration {
    millis("TOFUI_REMOTE_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

/// Backoff after the first failed attempt (default 1s)
pub fn retry_base() -> Duration {
    millis("TOFUI_RETRY_BASE_MS").unwrap_or(Duration::from_secs(1))
}

/// Cap on any single backoff (default 30s)
pub fn retry_max() -> Duration {
    millis("TOFUI_RETRY_MAX_MS").unwrap_or(Duration::from_secs(30))
}

/// Jitter is on unless `TOFUI_RETRY_JITTER=0`.
pub fn retry_jitter() -> bool {
    !std::env::var("TOFUI_RETRY_JITTER").is_ok_and(|v| v == "0")
}

pub fn publish_config() -> PublishConfig {
    PublishConfig {
        retry: RetryPolicy {
            base_delay: retry_base(),
            max_delay: retry_max(),
            jitter: retry_jitter(),
            ..RetryPolicy::default()
        },
        remote_timeout: remote_timeout(),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
