// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub contents API store.
//!
//! Slot files live on a branch (usually `gh-pages`) of the dashboard
//! repository. The blob `sha` returned by the contents API is the object
//! version, and a `PUT` carrying the observed `sha` is the conditional write:
//! GitHub refuses it when the file moved on.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tofui_core::ObjectVersion;

use super::{Precondition, RemoteObject, RemoteStore, StoreError};

const PUBLIC_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("tofui/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GitHubStore`]
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Dashboard repository, `owner/repo`
    pub repository: String,
    /// Branch holding the published files
    pub branch: String,
    pub token: String,
    /// GitHub Enterprise base URL, e.g. `https://github.example.com`
    pub enterprise_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

/// API root for public GitHub or an Enterprise server.
pub fn api_base(enterprise_url: Option<&str>) -> String {
    match enterprise_url {
        Some(url) => format!("{}/api/v3", url.trim_end_matches('/')),
        None => PUBLIC_API.to_string(),
    }
}

#[derive(Clone)]
pub struct GitHubStore {
    http: Client,
    api_base: String,
    repository: String,
    branch: String,
    token: String,
}

#[derive(Deserialize)]
struct FileBody {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: FileBody,
}

impl GitHubStore {
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Rejected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_base: api_base(config.enterprise_url.as_deref()),
            repository: config.repository,
            branch: config.branch,
            token: config.token,
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.repository, path)
    }

    async fn get(&self, path: &str) -> Result<Response, StoreError> {
        self.http
            .get(self.contents_url(path))
            .query(&[("ref", self.branch.as_str())])
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(transport_error)
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteObject>, StoreError> {
        tracing::debug!(path, branch = %self.branch, "github read");
        let response = self.get(path).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body));
        }

        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);
        let body: FileBody = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("unreadable contents response for {path}: {e}")))?;

        Ok(Some(RemoteObject {
            content: decode_content(&body.content)?,
            version: ObjectVersion::new(body.sha),
            last_modified,
        }))
    }

    async fn write_if(
        &self,
        path: &str,
        content: &[u8],
        precondition: &Precondition,
        message: &str,
    ) -> Result<ObjectVersion, StoreError> {
        let sha = match precondition {
            Precondition::Absent => None,
            Precondition::Matches(version) => Some(version.as_str()),
        };
        tracing::debug!(path, sha = sha.unwrap_or("-"), "github conditional write");

        let body = PutBody { message, content: STANDARD.encode(content), branch: &self.branch, sha };
        let response = self
            .http
            .put(self.contents_url(path))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body));
        }
        let written: PutResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("unreadable write response for {path}: {e}")))?;
        Ok(ObjectVersion::new(written.content.sha))
    }
}

/// Map a non-success status to a store error.
///
/// 409 is a sha mismatch; 422 is what GitHub answers when a file appeared
/// after we saw it absent (no `sha` supplied). Both mean someone else won.
pub(crate) fn classify(status: StatusCode, body: &str) -> StoreError {
    let detail = format!("{} {}", status.as_u16(), summarize(body));
    match status.as_u16() {
        409 | 422 => StoreError::Conflict(detail),
        401 | 403 | 408 | 429 => StoreError::Unavailable(detail),
        s if s >= 500 => StoreError::Unavailable(detail),
        _ => StoreError::Rejected(detail),
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("request timed out: {e}"))
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

/// First line of the API error message, falling back to the raw body.
fn summarize(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => body.lines().next().unwrap_or_default().chars().take(200).collect(),
    }
}

/// The contents API wraps base64 at 60 columns.
pub(crate) fn decode_content(encoded: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Unavailable(format!("undecodable file content: {e}")))
}

pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value).ok().map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
