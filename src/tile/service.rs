//! Tile Service for answering get-entries requests.
//!
//! The TileService is the per-request controller. It orchestrates:
//! - Tile alignment of the requested range
//! - Cache lookups
//! - Backend fetches on miss
//! - Write-through of full tiles
//! - Truncation to the caller's range
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_entries()                        │    │
//! │  │  1. Align tile        4. Store if full                  │    │
//! │  │  2. Check cache       5. Truncate to range              │    │
//! │  │  3. Fetch on miss     6. Return with source             │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                                        │            │
//! │           ▼                                        ▼            │
//! │    ┌───────────┐                          ┌──────────────────┐  │
//! │    │ TileCache │                          │    LogBackend    │  │
//! │    └───────────┘                          └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests share nothing mutable. Two requests missing on the same tile
//! both fetch and both store it; the stored bytes are identical.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::TileError;
use crate::io::ObjectStore;
use crate::log::{EntryBatch, LogBackend};

use super::cache::{CacheLookup, TileCache};
use super::Tile;

// =============================================================================
// Entry Range
// =============================================================================

/// A requested run of entries as the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRange {
    start: u64,
    end: u64,
}

impl EntryRange {
    /// Build a range from the closed interval `[first, last]` used by the CT
    /// protocol.
    pub fn from_closed(first: u64, last: u64) -> Result<Self, TileError> {
        if last < first {
            return Err(TileError::InvertedRange {
                start: first,
                end: last,
            });
        }
        let end = last.checked_add(1).ok_or(TileError::InvalidParameter {
            name: "end",
            value: last.to_string(),
        })?;
        Ok(Self { start: first, end })
    }

    /// First requested index.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last requested index.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of entries requested.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

// =============================================================================
// Entries Response
// =============================================================================

/// Where the entries of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fetched from the upstream CT log
    Log,

    /// Read from the tile cache
    Cache,
}

impl Source {
    /// Value of the `X-Source` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Log => "CT log",
            Source::Cache => "S3",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response from the tile service.
#[derive(Debug, Clone)]
pub struct EntriesResponse {
    /// Entries in the requested range, in log order
    pub entries: EntryBatch,

    /// Cache or backend
    pub source: Source,

    /// Whether the tile was the partial tail of the log
    pub partial: bool,
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service answering get-entries requests through the tile cache.
///
/// # Type Parameters
///
/// * `B` - The upstream log backend (e.g., [`crate::log::HttpLogBackend`])
/// * `O` - The object store holding cached tiles (e.g., [`crate::io::S3ObjectStore`])
///
/// # Example
///
/// ```ignore
/// use ctile::tile::{EntryRange, TileCache, TileService};
/// use ctile::log::HttpLogBackend;
///
/// let cache = TileCache::new(S3ObjectStore::new(client, "bucket"), "https://oak.example/2023");
/// let service = TileService::new(backend, cache, "https://oak.example/2023", 256);
///
/// let response = service.get_entries(EntryRange::from_closed(1234, 1240)?).await?;
/// println!("{} entries from {}", response.entries.len(), response.source);
/// ```
pub struct TileService<B: LogBackend, O: ObjectStore> {
    backend: Arc<B>,
    cache: TileCache<O>,
    log_url: String,
    tile_size: u64,
}

impl<B: LogBackend, O: ObjectStore> TileService<B, O> {
    /// Create a new tile service.
    ///
    /// `tile_size` must match the maximum get-entries batch of the backend.
    pub fn new(backend: B, cache: TileCache<O>, log_url: impl Into<String>, tile_size: u64) -> Self {
        Self::with_shared_backend(Arc::new(backend), cache, log_url, tile_size)
    }

    /// Create a new tile service with a shared backend.
    pub fn with_shared_backend(
        backend: Arc<B>,
        cache: TileCache<O>,
        log_url: impl Into<String>,
        tile_size: u64,
    ) -> Self {
        Self {
            backend,
            cache,
            log_url: log_url.into(),
            tile_size,
        }
    }

    /// Tile size used for alignment.
    pub fn tile_size(&self) -> u64 {
        self.tile_size
    }

    /// Get a reference to the tile cache.
    pub fn cache(&self) -> &TileCache<O> {
        &self.cache
    }

    /// Get entries for `range`, using the cache when available.
    ///
    /// Only the tile containing `range.start` is consulted, so the response
    /// may hold fewer entries than requested, as CT clients expect.
    ///
    /// # Errors
    ///
    /// - [`TileError::CacheRead`] / [`TileError::CacheWrite`] on cache faults
    /// - [`TileError::Backend`] on backend faults, including passthrough statuses
    /// - [`TileError::PastEndOfLog`] when `range.start` is beyond a partial tile
    pub async fn get_entries(&self, range: EntryRange) -> Result<EntriesResponse, TileError> {
        let tile = Tile::containing(range.start, self.tile_size, &self.log_url)?;

        let (mut entries, source, partial) = match self
            .cache
            .get(&tile)
            .await
            .map_err(TileError::CacheRead)?
        {
            CacheLookup::Hit(entries) => (entries, Source::Cache, false),
            CacheLookup::Miss => {
                let entries = self.backend.fetch(&tile).await?;

                // A short tile is the still-growing end of the log. Serve it
                // but never store it.
                let partial = (entries.len() as u64) < tile.size();
                if partial {
                    debug!(
                        tile_start = tile.start(),
                        tile_size = tile.size(),
                        entries = entries.len(),
                        "partial tile, not caching"
                    );
                } else {
                    self.cache
                        .put(&tile, &entries)
                        .await
                        .map_err(TileError::CacheWrite)?;
                }
                (entries, Source::Log, partial)
            }
        };

        // The tile start was inside the log, but the requested start may be
        // past the entries a partial tile holds. The log itself answers 400
        // for ranges past its end, so do the same.
        let prefix = (range.start - tile.start()) as usize;
        let requested = usize::try_from(range.len()).unwrap_or(usize::MAX);
        if !entries.window(prefix, requested) {
            return Err(TileError::PastEndOfLog);
        }

        Ok(EntriesResponse {
            entries,
            source,
            partial,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
