//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client with user agent and timeouts
//! - GET requests for page markup
//! - GET requests whose body is streamed by the caller (images)
//!
//! The fetcher never retries; retry policy belongs to the image downloader.

use crate::config::HttpConfig;
use crate::{HarvestError, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use img_harvest::config::HttpConfig;
/// use img_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Thin wrapper over a shared [`Client`]
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let client = build_http_client(config).map_err(|source| HarvestError::Http {
            url: String::new(),
            source,
        })?;
        Ok(Self::new(client))
    }

    /// Sends a GET request and checks the status
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - 2xx response; the body has not been read yet
    /// * `Err(HarvestError::Http)` - Connection, timeout or protocol failure
    /// * `Err(HarvestError::Status)` - Any non-success status code
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Fetches a URL and returns its body as text
    ///
    /// Bodies that are not valid UTF-8 (a direct image URL, say) are decoded
    /// lossily instead of failing.
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
    }
}
