//! Durable tile cache.
//!
//! This module stores full tiles as single objects in an [`ObjectStore`],
//! keyed by tile size and aligned start.
//!
//! # Cache Key
//!
//! `<prefix>tile_size=<size>/<start>.postcard.zst`. There is no versioning and
//! no content hash: log history is immutable, so the content for a given
//! `(size, start)` never changes. Concurrent writers racing on the same tile
//! store identical bytes, and nothing is ever evicted.
//!
//! # Integrity
//!
//! Both directions check that the batch holds exactly `tile.size()` entries
//! and that the tile bounds agree with its size. Partial tiles are never
//! written.

use std::sync::Arc;

use tracing::debug;

use crate::error::CacheError;
use crate::io::ObjectStore;
use crate::log::EntryBatch;

use super::codec;
use super::Tile;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The full tile was stored
    Hit(EntryBatch),

    /// No object for this tile; fetch it from the backend
    Miss,
}

/// Blob cache of full tiles.
///
/// Cheap to clone; clones share the same store.
pub struct TileCache<O: ObjectStore> {
    store: Arc<O>,
    prefix: String,
}

impl<O: ObjectStore> Clone for TileCache<O> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            prefix: self.prefix.clone(),
        }
    }
}

impl<O: ObjectStore> TileCache<O> {
    /// Create a cache writing under `prefix`.
    ///
    /// A non-empty prefix without a trailing `/` gets one, so tiles of
    /// different logs never share a key.
    pub fn new(store: O, prefix: impl Into<String>) -> Self {
        Self::with_shared_store(Arc::new(store), prefix)
    }

    /// Create a cache over a store that is also used elsewhere.
    pub fn with_shared_store(store: Arc<O>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { store, prefix }
    }

    /// Full object key for `tile`.
    pub fn key(&self, tile: &Tile) -> String {
        format!("{}{}", self.prefix, tile.key())
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<O> {
        &self.store
    }

    /// Look up `tile`.
    ///
    /// A missing object is [`CacheLookup::Miss`]. A stored object that does
    /// not decode to exactly one full tile is an error.
    pub async fn get(&self, tile: &Tile) -> Result<CacheLookup, CacheError> {
        let key = self.key(tile);

        let data = match self.store.get(&key).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(key = %key, "tile cache miss");
                return Ok(CacheLookup::Miss);
            }
            Err(source) => return Err(CacheError::Store { key, source }),
        };

        let batch = codec::decode(&data).map_err(|source| CacheError::Codec {
            key: key.clone(),
            source,
        })?;
        check_full(tile, &batch)?;

        debug!(key = %key, entries = batch.len(), "tile cache hit");
        Ok(CacheLookup::Hit(batch))
    }

    /// Store a full tile.
    ///
    /// Overwriting an existing object is allowed; its content is identical.
    pub async fn put(&self, tile: &Tile, batch: &EntryBatch) -> Result<(), CacheError> {
        check_full(tile, batch)?;

        let key = self.key(tile);
        let body = codec::encode(batch).map_err(|source| CacheError::Codec {
            key: key.clone(),
            source,
        })?;
        let bytes = body.len();

        self.store
            .put(&key, body)
            .await
            .map_err(|source| CacheError::Store {
                key: key.clone(),
                source,
            })?;

        debug!(key = %key, bytes, "tile stored");
        Ok(())
    }
}

fn check_full(tile: &Tile, batch: &EntryBatch) -> Result<(), CacheError> {
    if batch.len() as u64 != tile.size() || !tile.is_consistent() {
        return Err(CacheError::Inconsistent {
            len: batch.len(),
            start: tile.start(),
            end: tile.end(),
            size: tile.size(),
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
