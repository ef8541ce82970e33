//! In-memory state store for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::ResourceRecord;
use crate::storage::StateStore;

/// HashMap-backed state store. Substituted for [`LocalStore`] in tests;
/// nothing survives the process.
///
/// [`LocalStore`]: crate::storage::LocalStore
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, ResourceRecord>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slugs with a stored record.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn read_prior_digest(&self, slug: &str) -> Result<Option<String>> {
        let records = self.records.lock().await;
        Ok(records.get(slug).map(|r| r.sha256.clone()))
    }

    async fn write_record(&self, slug: &str, record: &ResourceRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(slug.to_string(), record.clone());
        Ok(())
    }

    async fn read_record(&self, slug: &str) -> Result<Option<ResourceRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_record(digest: &str) -> ResourceRecord {
        ResourceRecord {
            checked_at: Utc::now(),
            etag: None,
            last_modified: None,
            sha256: digest.into(),
            size_bytes: 3,
            url: "https://example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_read_missing() {
        let store = MemoryStore::new();
        assert!(store.read_prior_digest("x").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let store = MemoryStore::new();
        store.write_record("x", &sample_record("d1")).await.unwrap();
        store.write_record("x", &sample_record("d2")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.read_prior_digest("x").await.unwrap(),
            Some("d2".to_string())
        );
    }
}
