//! Tile addressing.
//!
//! A tile is a fixed-size, grid-aligned block of log entries and the unit of
//! caching. Everything here is pure arithmetic on `(start, size)`.
//!
//! Internally tiles use the half-open interval `[start, end)`. The CT protocol
//! uses closed intervals, so the backend URL asks for `[start, end - 1]`.
//! <https://datatracker.ietf.org/doc/html/rfc6962#section-4.6>

use crate::error::TileError;

/// Suffix of every stored tile object: postcard serialization, zstd compressed.
pub const TILE_OBJECT_SUFFIX: &str = ".postcard.zst";

/// Path of the CT get-entries endpoint, relative to a log's base URL.
pub const GET_ENTRIES_PATH: &str = "/ct/v1/get-entries";

/// An aligned block of log entries.
///
/// Invariants: `size > 0`, `start % size == 0`, `end == start + size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    start: u64,
    end: u64,
    size: u64,
    log_url: String,
}

impl Tile {
    /// Build the tile of `size` entries that contains `offset`.
    ///
    /// The resulting tile's start is less than or equal to `offset`.
    pub fn containing(offset: u64, size: u64, log_url: &str) -> Result<Self, TileError> {
        if size == 0 {
            return Err(TileError::InvalidTile {
                start: offset,
                size,
            });
        }
        let start = offset - offset % size;
        let end = start
            .checked_add(size)
            .ok_or(TileError::InvalidTile { start, size })?;

        Ok(Self {
            start,
            end,
            size,
            log_url: log_url.trim_end_matches('/').to_string(),
        })
    }

    /// First entry index in the tile (inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last entry index in the tile (exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of entries a full tile holds.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the tile bounds agree with its size.
    pub fn is_consistent(&self) -> bool {
        self.start.checked_add(self.size) == Some(self.end)
    }

    /// Object key of this tile in the cache, relative to the store prefix.
    pub fn key(&self) -> String {
        format!("tile_size={}/{}{}", self.size, self.start, TILE_OBJECT_SUFFIX)
    }

    /// URL to fetch this tile from the backend log.
    pub fn url(&self) -> String {
        format!(
            "{}{}?start={}&end={}",
            self.log_url,
            GET_ENTRIES_PATH,
            self.start,
            self.end - 1
        )
    }
}
