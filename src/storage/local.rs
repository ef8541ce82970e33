//! Local filesystem state store.
//!
//! Backs the watcher in production. The state directory is created on
//! first use; every write goes through a temp-file + rename so a crashed
//! run never leaves a truncated artifact behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ResourceRecord;
use crate::storage::StateStore;

/// Filesystem-backed state store.
#[derive(Clone)]
pub struct LocalStore {
    state_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.state_dir.join(key)
    }

    fn digest_key(slug: &str) -> String {
        format!("{slug}.sha256")
    }

    fn record_key(slug: &str) -> String {
        format!("{slug}.json")
    }

    /// Ensure the state directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.state_dir).await?;
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;
        let path = self.path(key);

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl StateStore for LocalStore {
    async fn read_prior_digest(&self, slug: &str) -> Result<Option<String>> {
        match self.read_bytes(&Self::digest_key(slug)).await? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).trim().to_string())),
            None => Ok(None),
        }
    }

    async fn write_record(&self, slug: &str, record: &ResourceRecord) -> Result<()> {
        // Digest first: it is the artifact change comparison depends on.
        self.write_bytes(&Self::digest_key(slug), record.sha256.as_bytes())
            .await?;

        let json = serde_json::to_vec_pretty(record)?;
        self.write_bytes(&Self::record_key(slug), &json).await
    }

    async fn read_record(&self, slug: &str) -> Result<Option<ResourceRecord>> {
        match self.read_bytes(&Self::record_key(slug)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
