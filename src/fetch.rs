//! Outbound metadata fetch.
//!
//! Both fetch handlers go through a [`MetadataFetch`]; only the fixed one asks
//! the [`UrlValidator`](crate::UrlValidator) first.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Violation;

/// Default bound on one outbound request, connect through body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues a GET and decodes the response body as JSON.
#[async_trait]
pub trait MetadataFetch: Send + Sync {
    /// Fetches `url` and returns the decoded body.
    ///
    /// # Errors
    ///
    /// `FetchFailed` for transport errors, timeouts and non-JSON bodies.
    async fn fetch_json(&self, url: &str) -> Result<Value, Violation>;
}

/// Fetcher backed by a shared reqwest client.
///
/// The response status is not inspected; any body that decodes as JSON is
/// returned. Redirects are followed with reqwest's default policy, so an
/// allowed host can still send the request on to an internal address.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MetadataFetch for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, Violation> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Violation::fetch_failed)?;

        tracing::debug!(url, status = %response.status(), "metadata response");

        response.json::<Value>().await.map_err(Violation::fetch_failed)
    }
}

/// Offline fetcher that records every requested URL.
///
/// Returns a canned body, or a canned failure, without touching the network.
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use seclab_core::fetch::{MetadataFetch, RecordingFetcher};
///
/// let fetcher = RecordingFetcher::new(serde_json::json!({"name": "NFT"}));
/// let body = fetcher.fetch_json("https://ipfs.io/x").await.unwrap();
///
/// assert_eq!(body["name"], "NFT");
/// assert_eq!(fetcher.requests(), vec!["https://ipfs.io/x".to_string()]);
/// # }
/// ```
#[derive(Debug)]
pub struct RecordingFetcher {
    response: Result<Value, String>,
    requests: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    /// Answers every request with `body`.
    pub fn new(body: Value) -> Self {
        Self {
            response: Ok(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with `FetchFailed` carrying `cause`.
    pub fn failing(cause: impl Into<String>) -> Self {
        Self {
            response: Err(cause.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MetadataFetch for RecordingFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, Violation> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());

        self.response.clone().map_err(Violation::fetch_failed)
    }
}
