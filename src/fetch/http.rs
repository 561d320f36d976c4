// src/fetch/http.rs
// =============================================================================
// This module makes the actual HTTP requests.
//
// Key functionality:
// - One shared reqwest Client (connection pooling, common User-Agent)
// - A per-request timeout (listing pages and files use different values)
// - Any non-2xx status is treated as an error
// - A polite pause after every successful response
//
// Failed requests don't pause: the caller logs the failure and moves on.
//
// Rust concepts:
// - thiserror: #[derive(Error)] writes the Display and From impls for us
// - async/await: Requests run on the tokio runtime, one at a time
// =============================================================================

use crate::config::MirrorConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// Redirects are common on archive.org (captures get redirected to the
// nearest timestamp), so follow a few of them
const MAX_REDIRECTS: usize = 10;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },
}

#[derive(Clone)]
pub struct Transport {
    client: Client,
    delay: Duration,
}

impl Transport {
    pub fn new(config: &MirrorConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            delay: config.request_delay,
        })
    }

    // Fetches a page and returns it as text (listing pages, markup views)
    pub async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self.send(url, timeout).await?;
        let text = response.text().await?;
        self.pause().await;
        Ok(text)
    }

    // Fetches a resource and returns the raw bytes (checkout downloads)
    pub async fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self.send(url, timeout).await?;
        let bytes = response.bytes().await?;
        self.pause().await;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }

    // Polite crawling: don't hammer the archive
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
