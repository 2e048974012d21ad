//! # ctile
//!
//! A read-through tile cache for the Certificate Transparency get-entries
//! endpoint, backed by S3-compatible object storage.
//!
//! Clients request any range of log entries. ctile maps the range onto a
//! fixed-size, aligned tile, serves the tile from S3 if present, and
//! otherwise fetches it from the upstream log, stores it if it is full, and
//! returns just the requested entries.
//!
//! ## Features
//!
//! - **Tile alignment**: Arbitrary ranges map onto grid-aligned tiles, so every request shares the same cache objects
//! - **Write-through caching**: Full tiles are stored once and never expire; log history is immutable
//! - **Partial tiles**: The still-growing tail of the log is served but never cached
//! - **Passthrough errors**: Backend error statuses and bodies reach the client unchanged
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`tile`] - Tile addressing, blob cache adapter and request orchestration
//! - [`log`] - CT entry types and the upstream log client
//! - [`io`] - Object store abstraction and S3 implementation
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use ctile::{create_router, create_s3_client, HttpLogBackend, RouterConfig, S3ObjectStore, TileCache, TileService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let log_url = "https://oak.ct.letsencrypt.org/2023";
//!
//!     let s3 = create_s3_client(None, "us-east-1").await;
//!     let cache = TileCache::new(S3ObjectStore::new(s3, "ct-tiles"), log_url);
//!     let backend = HttpLogBackend::with_connect_timeout(Duration::from_secs(2))?;
//!     let service = TileService::new(backend, cache, log_url, 256);
//!
//!     let router = create_router(service, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod log;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use config::Config;
pub use error::{BackendError, CacheError, CodecError, StoreError, TileError};
pub use io::{create_s3_client, ObjectStore, S3ObjectStore};
pub use log::{Entry, EntryBatch, HttpLogBackend, LogBackend};
pub use server::{create_router, get_entries_handler, parse_range, AppState, RouterConfig};
pub use tile::{
    CacheLookup, EntriesResponse, EntryRange, Source, Tile, TileCache, TileService,
    GET_ENTRIES_PATH,
};
