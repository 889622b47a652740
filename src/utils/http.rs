//! Shared HTTP client with timeout and bounded retry.
//!
//! Third-party API calls recur across features and all want the same
//! shape: an explicit timeout and a couple of retries with backoff,
//! after which the error propagates to a call site that logs it.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Client with the default 30s per-request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { inner }
    }

    /// POST a JSON body and parse a JSON response, retrying transient
    /// failures (network errors, 5xx) up to 3 attempts with doubling
    /// backoff. 4xx responses fail immediately.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let mut backoff = INITIAL_BACKOFF;
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.inner.post(url).json(body).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .json::<T>()
                            .await
                            .context("failed to decode response body");
                    }
                    if status.is_client_error() {
                        anyhow::bail!("request to {url} rejected: {status}");
                    }
                    last_err = Some(anyhow::anyhow!("server error from {url}: {status}"));
                }
                Err(e) => last_err = Some(anyhow::Error::new(e).context(format!("request to {url} failed"))),
            }

            if attempt < MAX_ATTEMPTS {
                warn!("retrying {} (attempt {}/{})", url, attempt + 1, MAX_ATTEMPTS);
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("request to {url} failed")))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
