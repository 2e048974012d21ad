//! Tile layer.
//!
//! Requests for arbitrary entry ranges are mapped onto fixed-size,
//! grid-aligned tiles, which are the unit of caching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileCache   │  │   LogBackend    │  │
//! │  │  (S3, full   │  │  (CT log, on    │  │
//! │  │   tiles)     │  │   cache miss)   │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Tile`]: Aligned tile arithmetic, cache key and backend URL
//! - [`TileCache`]: Blob cache of full tiles over an object store
//! - [`TileService`]: Per-request cache-aside orchestration
//! - [`EntryRange`]: Half-open range of requested entries
//! - [`EntriesResponse`]: Entries plus source and partial-tile flag
//!
//! # Example
//!
//! ```
//! use ctile::tile::Tile;
//!
//! let tile = Tile::containing(1234, 1000, "https://oak.ct.letsencrypt.org/2023").unwrap();
//! assert_eq!((tile.start(), tile.end()), (1000, 2000));
//! assert_eq!(tile.key(), "tile_size=1000/1000.postcard.zst");
//! assert!(tile.url().ends_with("/ct/v1/get-entries?start=1000&end=1999"));
//! ```

mod addressing;
mod cache;
pub mod codec;
mod service;

pub use addressing::{Tile, GET_ENTRIES_PATH, TILE_OBJECT_SUFFIX};
pub use cache::{CacheLookup, TileCache};
pub use service::{EntriesResponse, EntryRange, Source, TileService};
