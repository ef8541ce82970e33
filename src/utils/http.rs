// src/utils/http.rs

//! HTTP client utilities.

use crate::error::Result;
use crate::models::WatcherConfig;

/// Create a configured asynchronous HTTP client.
///
/// Redirects are followed with reqwest's default policy. Timeouts are
/// applied per request by the fetcher, since the HEAD probe and the full
/// GET use different bounds.
pub fn create_async_client(config: &WatcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}
