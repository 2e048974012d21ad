//! HTTP request handlers for the ctile get-entries API.
//!
//! # Endpoints
//!
//! - `GET <prefix>/ct/v1/get-entries?start=<n>&end=<m>` - Serve log entries
//!
//! Any other path answers 404.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use tracing::{debug, error};
use url::form_urlencoded;

use crate::error::{BackendError, TileError};
use crate::io::ObjectStore;
use crate::log::LogBackend;
use crate::tile::{EntriesResponse, EntryRange, TileService, GET_ENTRIES_PATH};

/// `CT log` or `S3`, depending on where the entries came from.
pub const X_SOURCE: HeaderName = HeaderName::from_static("x-source");

/// `true` when the served tile was the partial tail of the log.
pub const X_PARTIAL_TILE: HeaderName = HeaderName::from_static("x-partial-tile");

/// Number of entries in the response body.
pub const X_RESPONSE_LEN: HeaderName = HeaderName::from_static("x-response-len");

/// Default end-to-end budget for one request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration =
    Duration::from_millis(crate::config::DEFAULT_FULL_REQUEST_TIMEOUT_MS);

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<B: LogBackend, O: ObjectStore> {
    /// The tile service for processing get-entries requests
    pub tile_service: Arc<TileService<B, O>>,

    /// Deadline covering cache read, backend fetch, cache write and encoding
    pub request_timeout: Duration,
}

impl<B: LogBackend, O: ObjectStore> AppState<B, O> {
    /// Create a new application state with the default request timeout.
    pub fn new(tile_service: TileService<B, O>) -> Self {
        Self::with_request_timeout(tile_service, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new application state with a custom request timeout.
    pub fn with_request_timeout(tile_service: TileService<B, O>, request_timeout: Duration) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            request_timeout,
        }
    }
}

impl<B: LogBackend, O: ObjectStore> Clone for AppState<B, O> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            request_timeout: self.request_timeout,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Parse `start` and `end` from a get-entries query string.
///
/// The query uses the CT closed interval `[start, end]`; the result is the
/// half-open `[start, end + 1)`. The first occurrence of a repeated key wins
/// and an empty value counts as missing.
pub fn parse_range(query: Option<&str>) -> Result<EntryRange, TileError> {
    let mut start = None;
    let mut end = None;
    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "start" if start.is_none() => start = Some(value.into_owned()),
            "end" if end.is_none() => end = Some(value.into_owned()),
            _ => {}
        }
    }

    let start = start
        .filter(|v| !v.is_empty())
        .ok_or(TileError::MissingParameter("start"))?;
    let end = end
        .filter(|v| !v.is_empty())
        .ok_or(TileError::MissingParameter("end"))?;

    let start = parse_index("start", &start)?;
    let end = parse_index("end", &end)?;
    EntryRange::from_closed(start, end)
}

fn parse_index(name: &'static str, value: &str) -> Result<u64, TileError> {
    match value.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n as u64),
        _ => Err(TileError::InvalidParameter {
            name,
            value: value.to_string(),
        }),
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TileError to HTTP response.
///
/// Bodies are one line of plain text, except backend status errors, whose
/// status and body are passed through verbatim.
///
/// This implementation logs errors appropriately based on their severity:
/// - 4xx errors are logged at DEBUG level (client errors)
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            TileError::Backend(BackendError::Status { status, body }) => {
                let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                debug!(
                    error_type = "backend_status",
                    status = status.as_u16(),
                    "Passing through backend status"
                );
                return (status, body.clone()).into_response();
            }

            TileError::MissingParameter(_)
            | TileError::InvalidParameter { .. }
            | TileError::InvertedRange { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),

            TileError::PastEndOfLog => (StatusCode::BAD_REQUEST, "past_end_of_log"),

            TileError::CacheRead(_) => (StatusCode::INTERNAL_SERVER_ERROR, "cache_read_error"),
            TileError::CacheWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "cache_write_error"),
            TileError::Backend(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backend_error"),
            TileError::InvalidTile { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_tile"),
            TileError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "encode_error"),

            TileError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "timeout"),
        };

        let message = self.to_string();

        // Log based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let body = if matches!(self, TileError::PastEndOfLog) {
            message
        } else {
            format!("{}\n", message)
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle get-entries requests.
///
/// # Endpoint
///
/// `GET <prefix>/ct/v1/get-entries`
///
/// # Query Parameters
///
/// - `start`: First entry index (inclusive)
/// - `end`: Last entry index (inclusive), `end >= start`
///
/// # Response
///
/// - `200 OK`: Pretty-printed JSON `{"entries": [...]}`
/// - `400 Bad Request`: Missing or invalid range, or range past the end of the log
/// - `404 Not Found`: Path is not a get-entries path
/// - `500 Internal Server Error`: Cache or backend fault
/// - `503 Service Unavailable`: Request timeout
/// - Any backend non-200 status is passed through with its body
///
/// # Headers
///
/// - `X-Source: CT log|S3`
/// - `X-Partial-Tile: true` (only for partial tiles)
/// - `X-Response-Len: <count>`
pub async fn get_entries_handler<B, O>(State(state): State<AppState<B, O>>, uri: Uri) -> Response
where
    B: LogBackend + 'static,
    O: ObjectStore + 'static,
{
    if !uri.path().ends_with(GET_ENTRIES_PATH) {
        debug!(path = uri.path(), "Client error: invalid path");
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("invalid path {:?}\n", uri.path()),
        )
            .into_response();
    }

    // Dropping the future on timeout aborts any in-flight cache or backend I/O
    let work = async {
        let range = parse_range(uri.query())?;
        let response = state.tile_service.get_entries(range).await?;
        entries_response(response)
    };

    match tokio::time::timeout(state.request_timeout, work).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => e.into_response(),
        Err(_) => TileError::Timeout.into_response(),
    }
}

/// Build the 200 response for a set of entries.
fn entries_response(response: EntriesResponse) -> Result<Response, TileError> {
    let mut body = serde_json::to_vec_pretty(&response.entries)
        .map_err(|e| TileError::Encode(e.to_string()))?;
    body.push(b'\n');

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(X_SOURCE, HeaderValue::from_static(response.source.as_str()));
    if response.partial {
        headers.insert(X_PARTIAL_TILE, HeaderValue::from_static("true"));
    }
    headers.insert(X_RESPONSE_LEN, HeaderValue::from(response.entries.len()));

    Ok((StatusCode::OK, headers, body).into_response())
}

// =============================================================================
// Tests
// =============================================================================
