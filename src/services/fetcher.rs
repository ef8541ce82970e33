// src/services/fetcher.rs

//! Content retrieval service.
//!
//! Fetches tracked documents over HTTP(S). A cheap HEAD probe recovers
//! revalidation headers first; the body is always retrieved with a full
//! GET because some hosts answer HEAD with stale or missing metadata.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ETAG, LAST_MODIFIED};

use crate::error::{AppError, Result};
use crate::models::{FetchResult, WatcherConfig};
use crate::utils::http;

/// Trait for resource content retrieval.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the current content of a resource.
    ///
    /// Fails only when the full content retrieval fails; a failed
    /// metadata probe just leaves the revalidation fields empty.
    async fn fetch(&self, url: &str) -> Result<FetchResult>;
}

/// Fetcher backed by a reqwest client.
pub struct HttpFetcher {
    client: Client,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from the watcher configuration.
    pub fn new(config: &WatcherConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }

    /// Probe revalidation headers with a HEAD request.
    ///
    /// Advisory only: any failure is reduced to "no metadata available".
    async fn probe_metadata(&self, url: &str) -> (Option<String>, Option<String>) {
        let response = match self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!("HEAD probe failed for {url}: {e}");
                return (None, None);
            }
        };

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        (header(LAST_MODIFIED), header(ETAG))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let (last_modified, etag) = self.probe_metadata(url).await;

        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        Ok(FetchResult {
            bytes: bytes.to_vec(),
            last_modified,
            etag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_config_timeouts() {
        let config = WatcherConfig {
            user_agent: "test/1.0".into(),
            probe_timeout_secs: 5,
            fetch_timeout_secs: 7,
        };

        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.probe_timeout, Duration::from_secs(5));
        assert_eq!(fetcher.fetch_timeout, Duration::from_secs(7));
    }
}
