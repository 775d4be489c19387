//! HTTP seam to the results backend.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{ResultsSnapshot, VoteOption},
    protocol::{ApiBanner, VoteReceipt},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Failures observed while talking to the backend.
///
/// Display text is what ends up in the status line, so the status variants
/// carry fixed human-readable messages.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to fetch results.")]
    ResultsUnavailable { status: StatusCode },
    #[error("Vote failed to submit.")]
    VoteRejected { status: StatusCode },
    #[error("API banner unavailable (status {status}).")]
    BannerUnavailable { status: StatusCode },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::ResultsUnavailable { status }
            | BackendError::VoteRejected { status }
            | BackendError::BannerUnavailable { status } => Some(*status),
            BackendError::Transport(err) => err.status(),
        }
    }
}

#[async_trait]
pub trait ResultsBackend: Send + Sync {
    async fn fetch_results(&self) -> Result<ResultsSnapshot, BackendError>;
    async fn submit_vote(&self, option: VoteOption) -> Result<(), BackendError>;
}

pub struct HttpResultsBackend {
    http: Client,
    base_url: String,
}

impl HttpResultsBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn api_banner(&self) -> Result<ApiBanner, BackendError> {
        let res = self.http.get(format!("{}/", self.base_url)).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::BannerUnavailable {
                status: res.status(),
            });
        }
        Ok(res.json().await?)
    }
}

#[async_trait]
impl ResultsBackend for HttpResultsBackend {
    async fn fetch_results(&self) -> Result<ResultsSnapshot, BackendError> {
        let url = format!("{}/results", self.base_url);
        debug!(%url, "requesting results");
        let res = self.http.get(&url).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::ResultsUnavailable {
                status: res.status(),
            });
        }
        Ok(res.json::<ResultsSnapshot>().await?)
    }

    async fn submit_vote(&self, option: VoteOption) -> Result<(), BackendError> {
        let url = format!("{}/vote/{}", self.base_url, option.as_str());
        debug!(%url, "submitting vote");
        let res = self.http.post(&url).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::VoteRejected {
                status: res.status(),
            });
        }

        let body = res.bytes().await?;
        match VoteReceipt::parse_lenient(&body) {
            Some(receipt) => debug!(
                option = option.as_str(),
                message = receipt.message.as_deref().unwrap_or_default(),
                "vote acknowledged"
            ),
            None => debug!(option = option.as_str(), "vote accepted without receipt"),
        }
        Ok(())
    }
}

/// Validates an absolute http(s) origin and strips any trailing slash so
/// endpoint paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid API base url '{raw}'"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow!(
                "API base url '{raw}' must use http or https, got '{other}'"
            ))
        }
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(anyhow!(
            "API base url '{raw}' must not carry a query or fragment"
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
