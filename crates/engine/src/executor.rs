// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish executor
//!
//! One attempt is a full read, allocate, conditional-write cycle. A failed
//! write is never replayed: every retry starts again from a fresh read, so a
//! publisher that lost a race allocates against what the winner left behind.

use std::time::Duration;

use tofui_adapters::{Precondition, RemoteStore, StoreError};
use tofui_core::{allocate, Clock, Occupancy, Report, ReportDraft, RotationKey};
use tokio_util::sync::CancellationToken;

use crate::backoff::RetryPolicy;
use crate::error::PublishError;
use crate::reader::{within, SlotStateReader};

/// Tunables for [`PublishExecutor`]
#[derive(Debug, Clone, PartialEq)]
pub struct PublishConfig {
    pub retry: RetryPolicy,
    /// Bound on each individual store call
    pub remote_timeout: Duration,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self { retry: RetryPolicy::default(), remote_timeout: Duration::from_secs(30) }
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub report: Report,
    /// Store path the report was written to
    pub path: String,
    /// Attempts used, the successful one included
    pub attempts: u32,
    /// Report evicted from the slot, if it held one
    pub replaced: Option<Report>,
}

enum Failure {
    Retry(StoreError),
    Fatal(PublishError),
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        if e.is_retryable() {
            Failure::Retry(e)
        } else {
            Failure::Fatal(PublishError::Rejected(e))
        }
    }
}

/// Publishes reports into their key's seven-slot rotation.
#[derive(Clone)]
pub struct PublishExecutor<S, C> {
    store: S,
    clock: C,
    config: PublishConfig,
}

impl<S, C> PublishExecutor<S, C>
where
    S: RemoteStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, config: PublishConfig) -> Self {
        Self { store, clock, config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub fn reader(&self) -> SlotStateReader<S> {
        SlotStateReader::new(self.store.clone(), self.config.remote_timeout)
    }

    /// Single read of a key's slots, without retries.
    pub async fn occupancy(&self, key: &RotationKey) -> Result<Occupancy, PublishError> {
        Ok(self.reader().read(key).await?)
    }

    /// Publish `draft` into a slot of its key.
    ///
    /// Gives up with [`PublishError::Exhausted`] once the retry budget is
    /// spent, or [`PublishError::Cancelled`] when `cancel` fires before an
    /// attempt or during a backoff wait.
    pub async fn publish(
        &self,
        draft: &ReportDraft,
        cancel: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        let key = draft.key()?;
        let reader = self.reader();
        let retry = &self.config.retry;
        let mut errors = Vec::new();

        for attempt in 1..=retry.max_attempts {
            if cancel.is_cancelled() {
                return Err(PublishError::Cancelled { attempts: attempt - 1 });
            }

            let error = match self.attempt(&reader, &key, draft, attempt).await {
                Ok(outcome) => {
                    tracing::info!(
                        key = %key,
                        slot = outcome.report.slot_number.get(),
                        attempt,
                        replaced = outcome.replaced.is_some(),
                        "published report"
                    );
                    return Ok(outcome);
                }
                Err(Failure::Fatal(e)) => {
                    tracing::error!(key = %key, attempt, error = %e, "publish failed");
                    return Err(e);
                }
                Err(Failure::Retry(e)) => e,
            };

            if error.is_conflict() {
                tracing::warn!(key = %key, attempt, error = %error, "lost slot race, re-reading");
            } else {
                tracing::warn!(key = %key, attempt, error = %error, "store unavailable");
            }
            errors.push(error);

            if attempt == retry.max_attempts {
                break;
            }
            let delay = retry.delay(attempt);
            tracing::debug!(key = %key, attempt, delay_ms = delay.as_millis() as u64, "backing off");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(PublishError::Cancelled { attempts: attempt });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::error!(key = %key, attempts = errors.len(), "publish exhausted");
        Err(PublishError::Exhausted { attempts: errors.len() as u32, errors })
    }

    async fn attempt(
        &self,
        reader: &SlotStateReader<S>,
        key: &RotationKey,
        draft: &ReportDraft,
        attempt: u32,
    ) -> Result<PublishOutcome, Failure> {
        let occupancy = reader.read(key).await?;
        let slot = allocate(&occupancy);
        let observed = occupancy.get(slot);

        let report = draft.stamp(key, slot, self.clock.now_utc());
        let content = report.to_json().map_err(|e| Failure::Fatal(e.into()))?;
        let path = key.slot_path(slot);
        let precondition = Precondition::observed(observed.version.as_ref());
        let message =
            format!("Add report: {}/{}/{}", report.source_repo, report.folder, report.build_name);

        tracing::debug!(key = %key, slot = slot.get(), attempt, path, "writing slot");
        within(
            self.config.remote_timeout,
            &path,
            self.store.write_if(&path, &content, &precondition, &message),
        )
        .await?;

        Ok(PublishOutcome { replaced: observed.report().cloned(), report, path, attempts: attempt })
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
