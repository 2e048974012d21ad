//! Upstream CT log client.
//!
//! One GET per tile fetch; no retries. A non-200 answer is surfaced as
//! [`BackendError::Status`] so its status and body can be passed through to
//! the caller (for instance a 400 for a range past the end of the log).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::BackendError;
use crate::tile::Tile;

use super::EntryBatch;

/// Source of tiles on cache miss.
///
/// Implementations must be thread-safe; one instance serves every request.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// Fetch the entries of `tile`.
    ///
    /// On success the batch holds between 1 and `tile.size()` entries. A
    /// shorter batch is the still-growing tail of the log.
    async fn fetch(&self, tile: &Tile) -> Result<EntryBatch, BackendError>;
}

/// [`LogBackend`] speaking the RFC 6962 get-entries protocol over HTTP.
#[derive(Clone)]
pub struct HttpLogBackend {
    client: reqwest::Client,
}

impl HttpLogBackend {
    /// Wrap an existing HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a pooled HTTP client with the given connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("ctile/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl LogBackend for HttpLogBackend {
    async fn fetch(&self, tile: &Tile) -> Result<EntryBatch, BackendError> {
        let url = tile.url();
        debug!(url = %url, "fetching tile from backend");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| BackendError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if status != StatusCode::OK {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let batch: EntryBatch =
            serde_json::from_slice(&body).map_err(|e| BackendError::Protocol {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if batch.is_empty() || batch.len() as u64 > tile.size() {
            return Err(BackendError::Protocol {
                url,
                message: format!("expected {} entries, got {}", tile.size(), batch.len()),
            });
        }

        Ok(batch)
    }
}
