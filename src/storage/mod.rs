// file: src/storage/mod.rs
// description: artifact storage backends and the remote/local persistence router
// reference: internal module structure

pub mod local;
pub mod memory;
pub mod router;
pub mod s3;

pub use local::LocalStaging;
pub use memory::{DisabledObjectStore, MemoryObjectStore};
pub use router::PersistenceRouter;
pub use s3::S3ObjectStore;

use crate::config::StorageConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

#[cfg(test)]
use mockall::automock;

/// Primary store for generated artifacts: a single put-by-key.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// Human readable location, e.g. `s3://bucket`.
    fn location(&self) -> String;
}

/// S3 when a bucket is configured, otherwise a store that routes everything to the fallback dir.
pub async fn remote_store_from_config(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match config.bucket.as_deref().map(str::trim) {
        Some(bucket) if !bucket.is_empty() => {
            Arc::new(S3ObjectStore::from_config(bucket, config).await)
        }
        _ => {
            warn!(
                "No storage bucket configured; artifacts will be written to {}",
                config.fallback_dir.display()
            );
            Arc::new(DisabledObjectStore::new("no bucket configured"))
        }
    }
}
