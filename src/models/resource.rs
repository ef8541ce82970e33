//! Tracked resource data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::url::slug_for;

/// A remote document tracked for changes, identified by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResource {
    /// Full URL of the document
    pub url: String,
}

impl TrackedResource {
    /// Create a tracked resource for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Stable state-store key derived from the URL.
    pub fn slug(&self) -> Result<String> {
        slug_for(&self.url)
    }
}

/// Raw outcome of fetching a resource. Ephemeral; only derived fields
/// are persisted.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Exact response body bytes
    pub bytes: Vec<u8>,

    /// Last-Modified header from the metadata probe, if available
    pub last_modified: Option<String>,

    /// ETag header from the metadata probe, if available
    pub etag: Option<String>,
}

/// Persisted observation state for one resource.
///
/// Fully overwritten every run. Fields are declared in alphabetical order
/// so the pretty-printed JSON artifact has stable, sorted keys and diffs
/// cleanly across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRecord {
    /// UTC timestamp of the observation
    pub checked_at: DateTime<Utc>,

    /// ETag reported by the server, if any
    pub etag: Option<String>,

    /// Last-Modified reported by the server, if any
    pub last_modified: Option<String>,

    /// Hex SHA-256 digest of the exact bytes observed at `checked_at`
    pub sha256: String,

    /// Byte length of the observed content
    pub size_bytes: u64,

    /// Full URL of the document
    pub url: String,
}

/// A detected content change for one resource. Ephemeral; exists only
/// within a run and is folded into the aggregate notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Full URL of the changed document
    pub url: String,

    /// Digest from the previous run, absent on first observation
    pub previous: Option<String>,

    /// Digest of the current content
    pub current: String,

    /// Last-Modified reported alongside the current content, if any
    pub last_modified: Option<String>,

    /// ETag reported alongside the current content, if any
    pub etag: Option<String>,
}

impl ChangeEvent {
    /// Whether this event records the first-ever observation of the resource.
    pub fn is_first_observation(&self) -> bool {
        self.previous.is_none()
    }
}
