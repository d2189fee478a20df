//! Outbound metadata fetching with explicit degradation.
//!
//! Scorers consume upstream metadata (README text, file tree listings, the
//! structured artifact record) through a shared [`MetadataClient`]. Every
//! fetch returns a [`FetchResult`] instead of an error: timeouts, non-2xx
//! statuses, and malformed bodies all collapse into
//! [`FetchResult::Unavailable`] so that a failing upstream degrades a scorer
//! to a less-informed computation instead of aborting the rating.

use crate::Result;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;
use serde_json::Value;

const LOG_TARGET: &str = "       fetch";

/// Fixed timeout applied to every outbound metadata request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default metadata hub queried for README text, file listings, and
/// structured records.
pub const DEFAULT_BASE_URL: &str = "https://huggingface.co";

/// Outcome of a single metadata fetch.
///
/// There is deliberately no error variant: the rating engine treats every
/// failure mode identically, so the distinction would never be consumed.
#[derive(Debug, Clone)]
pub enum FetchResult<T> {
    /// The fetch succeeded and the body parsed.
    Found(T),

    /// The data could not be obtained (timeout, non-2xx, malformed body).
    Unavailable,
}

impl<T> FetchResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into an `Option`, discarding the unavailable case.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(data) => Some(data),
            Self::Unavailable => None,
        }
    }
}

/// One entry of an artifact's file tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

/// Shared HTTP client for upstream metadata, injected into every scorer.
///
/// Carries a request counter so callers can observe how many outbound
/// fetches a computation performed (cache hits must perform none).
#[derive(Debug)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    requests: AtomicU64,
}

impl MetadataClient {
    /// Create a client against the given hub, or [`DEFAULT_BASE_URL`] when
    /// `base_url` is `None`. Tests point this at a mock server.
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("artifact-rank/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .into_app_err("unable to create HTTP client")?;

        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string();
        let _ = url::Url::parse(&base_url).into_app_err_with(|| format!("invalid hub base URL '{base_url}'"))?;

        Ok(Self {
            http,
            base_url,
            requests: AtomicU64::new(0),
        })
    }

    /// The hub base URL this client resolves paths against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Total number of outbound requests issued through this client.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Fetch a text body from a path below the hub base URL.
    pub async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        let Some(response) = self.get(path).await else {
            return FetchResult::Unavailable;
        };

        match response.text().await {
            Ok(body) => FetchResult::Found(body),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "could not read body of '{path}': {e:#}");
                FetchResult::Unavailable
            }
        }
    }

    /// Fetch and parse a JSON body from a path below the hub base URL.
    pub async fn fetch_json(&self, path: &str) -> FetchResult<Value> {
        let Some(response) = self.get(path).await else {
            return FetchResult::Unavailable;
        };

        match response.json().await {
            Ok(value) => FetchResult::Found(value),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "could not parse body of '{path}': {e:#}");
                FetchResult::Unavailable
            }
        }
    }

    /// Fetch the artifact's README text.
    pub async fn readme(&self, artifact: &str) -> FetchResult<String> {
        self.fetch_text(&format!("/{artifact}/raw/main/README.md")).await
    }

    /// Fetch the artifact's file tree listing.
    pub async fn file_tree(&self, artifact: &str) -> FetchResult<Vec<TreeEntry>> {
        match self.fetch_json(&format!("/api/models/{artifact}/tree/main")).await {
            FetchResult::Found(value) => match serde_json::from_value(value) {
                Ok(entries) => FetchResult::Found(entries),
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "unexpected file tree shape for '{artifact}': {e:#}");
                    FetchResult::Unavailable
                }
            },
            FetchResult::Unavailable => FetchResult::Unavailable,
        }
    }

    /// Fetch one raw file from the artifact's tree.
    pub async fn raw_file(&self, artifact: &str, path: &str) -> FetchResult<String> {
        self.fetch_text(&format!("/{artifact}/raw/main/{path}")).await
    }

    /// Fetch the artifact's structured record.
    pub async fn model_record(&self, artifact: &str) -> FetchResult<Value> {
        self.fetch_json(&format!("/api/models/{artifact}")).await
    }

    async fn get(&self, path: &str) -> Option<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        let _ = self.requests.fetch_add(1, Ordering::Relaxed);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => Some(response),
            Ok(response) => {
                log::debug!(target: LOG_TARGET, "GET {url} returned {}", response.status());
                None
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "GET {url} failed: {e:#}");
                None
            }
        }
    }
}
