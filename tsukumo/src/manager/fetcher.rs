//! HTTP-based archive fetcher.
//!
//! Retrieves package archives from a repository with a single GET request
//! per resource. Non-success statuses are reported as "not found" so the
//! installer can move on to the next archive extension.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::error::{ManagerError, ManagerResult};
use super::traits::{resource_url, Fetcher};

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for reading response bodies (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// HTTP implementation of [`Fetcher`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with the default timeout.
    pub fn new() -> ManagerResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> ManagerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tsukumo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ManagerError::HttpError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Read the whole response body into memory.
    fn read_body(url: &str, mut response: reqwest::blocking::Response) -> ManagerResult<Vec<u8>> {
        let capacity = response.content_length().unwrap_or(0) as usize;
        let mut body = Vec::with_capacity(capacity);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read =
                response
                    .read(&mut buffer)
                    .map_err(|e| ManagerError::DownloadFailed {
                        url: url.to_string(),
                        reason: format!("Read error: {}", e),
                    })?;

            if bytes_read == 0 {
                break;
            }

            body.extend_from_slice(&buffer[..bytes_read]);
        }

        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, base_url: &str, resource: &str) -> ManagerResult<Option<Vec<u8>>> {
        let url = resource_url(base_url, resource);
        info!(resource, url = %url, "Downloading");

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                ManagerError::Timeout {
                    url: url.clone(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                ManagerError::DownloadFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            info!(resource, status = status.as_u16(), "Failed to download");
            return Ok(None);
        }

        let body = Self::read_body(&url, response)?;
        debug!(resource, bytes = body.len(), "Downloaded");
        Ok(Some(body))
    }
}
