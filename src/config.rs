//! Configuration management for ctile.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `CTILE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use ctile::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//! config.validate()?;
//!
//! println!("Listening on {}", config.listen_address);
//! println!("Caching {} in s3://{}/{}", config.log_url, config.s3_bucket, config.s3_prefix());
//! ```
//!
//! # Environment Variables
//!
//! - `CTILE_LOG_URL` - CT log base URL (required)
//! - `CTILE_TILE_SIZE` - Tile size, must match the log's get-entries limit (required)
//! - `CTILE_S3_BUCKET` - S3 bucket for cached tiles (required)
//! - `CTILE_S3_PREFIX` - Key prefix for cached tiles (default: the log URL)
//! - `CTILE_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `CTILE_S3_REGION` - AWS region (default: us-east-1)
//! - `CTILE_LISTEN_ADDRESS` - Bind address (default: 0.0.0.0:8080)
//! - `CTILE_FULL_REQUEST_TIMEOUT_MS` - Per-request deadline (default: 4000)
//! - `CTILE_BACKEND_CONNECT_TIMEOUT_MS` - Backend connect timeout (default: 2000)

use std::time::Duration;

use clap::Parser;
use url::Url;

// =============================================================================
// Default Values
// =============================================================================

/// Default listen address.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default end-to-end request timeout in milliseconds.
pub const DEFAULT_FULL_REQUEST_TIMEOUT_MS: u64 = 4000;

/// Default backend connect timeout in milliseconds.
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_MS: u64 = 2000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// ctile - A read-through tile cache for CT logs.
///
/// Serves get-entries requests from full tiles cached in S3, fetching
/// missing tiles from the backing CT log.
#[derive(Parser, Debug, Clone)]
#[command(name = "ctile")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Backend Configuration
    // =========================================================================
    /// CT log URL, e.g. https://oak.ct.letsencrypt.org/2023
    #[arg(long, env = "CTILE_LOG_URL")]
    pub log_url: String,

    /// Tile size. Must match the value used by the backend.
    #[arg(long, env = "CTILE_TILE_SIZE")]
    pub tile_size: u64,

    /// Connect timeout for the backend HTTP client, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_BACKEND_CONNECT_TIMEOUT_MS, env = "CTILE_BACKEND_CONNECT_TIMEOUT_MS")]
    pub backend_connect_timeout_ms: u64,

    // =========================================================================
    // S3 Configuration
    // =========================================================================
    /// S3 bucket to use for caching.
    #[arg(long, env = "CTILE_S3_BUCKET")]
    pub s3_bucket: String,

    /// Prefix for S3 keys. Defaults to the value of --log-url.
    #[arg(long, env = "CTILE_S3_PREFIX")]
    pub s3_prefix: Option<String>,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "CTILE_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "CTILE_S3_REGION")]
    pub s3_region: String,

    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS, env = "CTILE_LISTEN_ADDRESS")]
    pub listen_address: String,

    /// Max time to spend in the HTTP handler, in milliseconds.
    ///
    /// Covers the S3 read, the backend fetch, the S3 write and the response.
    #[arg(long, default_value_t = DEFAULT_FULL_REQUEST_TIMEOUT_MS, env = "CTILE_FULL_REQUEST_TIMEOUT_MS")]
    pub full_request_timeout_ms: u64,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.log_url.is_empty() {
            return Err("missing required flag: --log-url (or CTILE_LOG_URL)".to_string());
        }
        match Url::parse(&self.log_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(format!(
                    "log_url must be an absolute http(s) URL, got {:?}",
                    self.log_url
                ))
            }
        }

        if self.s3_bucket.is_empty() {
            return Err("missing required flag: --s3-bucket (or CTILE_S3_BUCKET)".to_string());
        }

        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }

        if self.full_request_timeout_ms == 0 {
            return Err("full_request_timeout_ms may not be 0".to_string());
        }

        Ok(())
    }

    /// Log URL without a trailing slash.
    pub fn log_url(&self) -> &str {
        self.log_url.trim_end_matches('/')
    }

    /// Key prefix for cached tiles, defaulting to the log URL.
    pub fn s3_prefix(&self) -> &str {
        self.s3_prefix.as_deref().unwrap_or(self.log_url())
    }

    /// End-to-end request timeout.
    pub fn full_request_timeout(&self) -> Duration {
        Duration::from_millis(self.full_request_timeout_ms)
    }

    /// Backend connect timeout.
    pub fn backend_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_connect_timeout_ms)
    }
}

// =============================================================================
// Tests
// =============================================================================
