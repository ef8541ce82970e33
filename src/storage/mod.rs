//! State storage abstractions for resource observations.
//!
//! Each tracked resource persists two artifacts under its slug:
//!
//! ```text
//! {state_dir}/
//! ├── config.toml            # Watcher Configuration
//! ├── {slug}.sha256          # Bare hex digest (comparison path)
//! └── {slug}.json            # Full observation record (diagnostic path)
//! ```
//!
//! The digest artifact is deliberately separate from the record: change
//! comparison only needs the previous digest, and keeping it as a bare
//! hex file means the comparison state survives even if the richer
//! record write is interrupted.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ResourceRecord;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Trait for resource state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the digest persisted by the last write for this slug.
    ///
    /// Returns `None` if the slug has never been written; absence is a
    /// normal state, not an error.
    async fn read_prior_digest(&self, slug: &str) -> Result<Option<String>>;

    /// Durably persist the observation record for this slug, fully
    /// replacing any prior record.
    ///
    /// The digest must be persisted in the form `read_prior_digest`
    /// consumes before the full record is written.
    async fn write_record(&self, slug: &str, record: &ResourceRecord) -> Result<()>;

    /// Read the full observation record for this slug, if present.
    async fn read_record(&self, slug: &str) -> Result<Option<ResourceRecord>>;
}
