use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Trait for whole-object reads and writes against durable storage.
///
/// This is the seam between the tile cache and the blob store, so the cache
/// logic can run against S3 in production and an in-memory map in tests.
/// Implementations must be thread-safe and are shared by every request.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the object at `key`.
    ///
    /// Returns `Ok(None)` when the object does not exist. That is a normal
    /// outcome for a cache, not a fault.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Write `body` to `key`, replacing any existing object.
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError>;

    /// Get a unique identifier for an object (for logging).
    ///
    /// For S3, this would typically be `s3://bucket/key`.
    fn identifier(&self, key: &str) -> String;
}
