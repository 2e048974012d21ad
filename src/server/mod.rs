//! HTTP server layer for ctile.
//!
//! This module provides the HTTP surface of the tile cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │            GET <prefix>/ct/v1/get-entries?start=&end=           │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (range parsing, headers) │  │ (router config, tracing)    │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    get_entries_handler, parse_range, AppState, DEFAULT_REQUEST_TIMEOUT, X_PARTIAL_TILE,
    X_RESPONSE_LEN, X_SOURCE,
};
pub use routes::{create_router, RouterConfig};
