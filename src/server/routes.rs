//! Router configuration for ctile.
//!
//! # Route Structure
//!
//! ```text
//! <any prefix>/ct/v1/get-entries   - Entries endpoint
//! everything else                  - 404
//! ```
//!
//! The log path prefix is not fixed, so the handler is installed as the
//! fallback and matches on the path suffix itself.
//!
//! # Example
//!
//! ```ignore
//! use ctile::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new().with_request_timeout(Duration::from_secs(4));
//! let router = create_router(tile_service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{get_entries_handler, AppState, DEFAULT_REQUEST_TIMEOUT};
use crate::io::ObjectStore;
use crate::log::LogBackend;
use crate::tile::TileService;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// End-to-end deadline for each request
    pub request_timeout: Duration,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - Request timeout is 4 seconds
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            enable_tracing: true,
        }
    }

    /// Set the end-to-end request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `tile_service` - The tile service for handling get-entries requests
/// * `config` - Router configuration
pub fn create_router<B, O>(tile_service: TileService<B, O>, config: RouterConfig) -> Router
where
    B: LogBackend + 'static,
    O: ObjectStore + 'static,
{
    let app_state = AppState::with_request_timeout(tile_service, config.request_timeout);

    let router = Router::new()
        .fallback(get_entries_handler::<B, O>)
        .with_state(app_state);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
