//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TrackedResource;
use crate::utils::url::slug_for;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetching behavior settings
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Notification message settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// URLs of the documents to track, in notification order
    #[serde(default = "defaults::resources")]
    pub resources: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("watcher.user_agent is empty"));
        }
        if self.watcher.probe_timeout_secs == 0 {
            return Err(AppError::validation(
                "watcher.probe_timeout_secs must be > 0",
            ));
        }
        if self.watcher.fetch_timeout_secs == 0 {
            return Err(AppError::validation(
                "watcher.fetch_timeout_secs must be > 0",
            ));
        }
        if self.notify.subject.trim().is_empty() {
            return Err(AppError::validation("notify.subject is empty"));
        }
        if self.resources.is_empty() {
            return Err(AppError::validation("No resources defined"));
        }

        // Distinct URLs must map to distinct state keys, otherwise two
        // documents would share a digest file and mask each other's changes.
        let mut seen = HashSet::new();
        for url in &self.resources {
            let slug = slug_for(url)
                .map_err(|e| AppError::validation(format!("Invalid resource URL {url}: {e}")))?;
            if !seen.insert(slug.clone()) {
                return Err(AppError::validation(format!(
                    "Resources collide on state key '{slug}'"
                )));
            }
        }

        Ok(())
    }

    /// The configured resource list as tracked resources, in order.
    pub fn tracked_resources(&self) -> Vec<TrackedResource> {
        self.resources
            .iter()
            .map(|url| TrackedResource::new(url.clone()))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watcher: WatcherConfig::default(),
            notify: NotifyConfig::default(),
            resources: defaults::resources(),
        }
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for the metadata HEAD probe, in seconds
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for the full content GET, in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            probe_timeout_secs: defaults::probe_timeout(),
            fetch_timeout_secs: defaults::fetch_timeout(),
        }
    }
}

/// Notification message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Subject line prepended to the aggregate change message
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Timeout for the notification API call, in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            subject: defaults::subject(),
            timeout_secs: defaults::notify_timeout(),
        }
    }
}

mod defaults {
    // Watcher defaults
    pub fn user_agent() -> String {
        "pagewatch/1.0".into()
    }
    pub fn probe_timeout() -> u64 {
        30
    }
    pub fn fetch_timeout() -> u64 {
        60
    }

    // Notify defaults
    pub fn subject() -> String {
        "Tracked pages updated".into()
    }
    pub fn notify_timeout() -> u64 {
        30
    }

    // Resource defaults
    pub fn resources() -> Vec<String> {
        vec![
            "https://www.castleschool.co.uk/calendar/academic-year-diary.htm".into(),
            "https://www.castleschool.co.uk/uploads/pdf-files/1055-Academic_Year_Diary_202526.pdf"
                .into(),
        ]
    }
}
