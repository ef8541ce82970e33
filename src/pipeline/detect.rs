// src/pipeline/detect.rs

//! Per-resource change detection.

use chrono::Utc;

use crate::error::Result;
use crate::models::{ChangeEvent, ResourceRecord, TrackedResource};
use crate::services::Fetcher;
use crate::storage::StateStore;

/// Detects content changes for individual resources.
///
/// Borrows the fetcher and store seams so tests can substitute stub
/// implementations.
pub struct ChangeDetector<'a> {
    fetcher: &'a dyn Fetcher,
    store: &'a dyn StateStore,
}

impl<'a> ChangeDetector<'a> {
    /// Create a detector over the given fetcher and state store.
    pub fn new(fetcher: &'a dyn Fetcher, store: &'a dyn StateStore) -> Self {
        Self { fetcher, store }
    }

    /// Check one resource for changes.
    ///
    /// Always persists a fresh observation record so `checked_at` moves
    /// forward even when nothing changed. Returns the record plus a
    /// change event when the digest differs from the prior run, or when
    /// the resource has never been observed before.
    pub async fn detect(
        &self,
        resource: &TrackedResource,
    ) -> Result<(ResourceRecord, Option<ChangeEvent>)> {
        let slug = resource.slug()?;
        let fetched = self.fetcher.fetch(&resource.url).await?;
        let digest = crate::utils::sha256_hex(&fetched.bytes);

        // Prior digest must be read before the overwrite below.
        let prior = self.store.read_prior_digest(&slug).await?;

        let event = if prior.as_deref() != Some(digest.as_str()) {
            Some(ChangeEvent {
                url: resource.url.clone(),
                previous: prior,
                current: digest.clone(),
                last_modified: fetched.last_modified.clone(),
                etag: fetched.etag.clone(),
            })
        } else {
            None
        };

        let record = ResourceRecord {
            checked_at: Utc::now(),
            etag: fetched.etag,
            last_modified: fetched.last_modified,
            sha256: digest,
            size_bytes: fetched.bytes.len() as u64,
            url: resource.url.clone(),
        };

        self.store.write_record(&slug, &record).await?;

        Ok((record, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::FetchResult;
    use crate::storage::MemoryStore;
    use crate::utils::sha256_hex;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Fetcher serving canned bodies per URL.
    struct StubFetcher {
        bodies: HashMap<String, Vec<u8>>,
        last_modified: Option<String>,
    }

    impl StubFetcher {
        fn new(bodies: &[(&str, &[u8])]) -> Self {
            Self {
                bodies: bodies
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_vec()))
                    .collect(),
                last_modified: None,
            }
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResult> {
            match self.bodies.get(url) {
                Some(body) => Ok(FetchResult {
                    bytes: body.clone(),
                    last_modified: self.last_modified.clone(),
                    etag: None,
                }),
                None => Err(AppError::fetch(url, "stub: no body configured")),
            }
        }
    }

    const URL: &str = "https://example.com/news/today.htm";

    #[tokio::test]
    async fn test_first_observation_is_a_change() {
        let fetcher = StubFetcher::new(&[(URL, b"v1")]);
        let store = MemoryStore::new();
        let detector = ChangeDetector::new(&fetcher, &store);

        let (record, event) = detector
            .detect(&TrackedResource::new(URL))
            .await
            .unwrap();

        let event = event.expect("first observation must produce a change event");
        assert!(event.is_first_observation());
        assert_eq!(event.current, sha256_hex(b"v1"));
        assert_eq!(record.sha256, event.current);
        assert_eq!(record.size_bytes, 2);
    }

    #[tokio::test]
    async fn test_identical_content_is_not_a_change() {
        let fetcher = StubFetcher::new(&[(URL, b"v1")]);
        let store = MemoryStore::new();
        let detector = ChangeDetector::new(&fetcher, &store);
        let resource = TrackedResource::new(URL);

        let (first, _) = detector.detect(&resource).await.unwrap();
        let (second, event) = detector.detect(&resource).await.unwrap();

        assert!(event.is_none());
        assert_eq!(second.sha256, first.sha256);
        // "Last checked" still moves forward on a no-op run.
        assert!(second.checked_at >= first.checked_at);
    }

    #[tokio::test]
    async fn test_changed_content_produces_event_with_both_digests() {
        let store = MemoryStore::new();
        let resource = TrackedResource::new(URL);

        let fetcher = StubFetcher::new(&[(URL, b"v1")]);
        ChangeDetector::new(&fetcher, &store)
            .detect(&resource)
            .await
            .unwrap();

        let fetcher = StubFetcher::new(&[(URL, b"v2")]);
        let (record, event) = ChangeDetector::new(&fetcher, &store)
            .detect(&resource)
            .await
            .unwrap();

        let event = event.expect("changed digest must produce a change event");
        assert_eq!(event.previous, Some(sha256_hex(b"v1")));
        assert_eq!(event.current, sha256_hex(b"v2"));
        assert_eq!(record.sha256, sha256_hex(b"v2"));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_state_untouched() {
        let store = MemoryStore::new();
        let resource = TrackedResource::new(URL);

        let fetcher = StubFetcher::new(&[(URL, b"v1")]);
        ChangeDetector::new(&fetcher, &store)
            .detect(&resource)
            .await
            .unwrap();

        let failing = StubFetcher::new(&[]);
        let result = ChangeDetector::new(&failing, &store).detect(&resource).await;

        assert!(result.is_err());
        assert_eq!(
            store.read_prior_digest(&resource.slug().unwrap()).await.unwrap(),
            Some(sha256_hex(b"v1"))
        );
    }

    #[tokio::test]
    async fn test_record_carries_probe_metadata() {
        let mut fetcher = StubFetcher::new(&[(URL, b"v1")]);
        fetcher.last_modified = Some("Sun, 01 Feb 2026 09:00:00 GMT".into());
        let store = MemoryStore::new();

        let (record, event) = ChangeDetector::new(&fetcher, &store)
            .detect(&TrackedResource::new(URL))
            .await
            .unwrap();

        assert_eq!(
            record.last_modified.as_deref(),
            Some("Sun, 01 Feb 2026 09:00:00 GMT")
        );
        assert_eq!(
            event.unwrap().last_modified.as_deref(),
            Some("Sun, 01 Feb 2026 09:00:00 GMT")
        );
    }
}
