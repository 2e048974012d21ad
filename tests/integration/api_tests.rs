//! API integration tests for get-entries and error handling.
//!
//! Tests verify:
//! - Range alignment and truncation
//! - Partial tiles at the tail of the log
//! - Error cases (bad parameters, invalid path, backend passthrough)
//! - HTTP response codes and headers

use std::time::Duration;

use axum::http::StatusCode;

use super::test_utils::{
    ctile_router, dead_log_url, get_uri, header, log_entry, parse_entries, spawn_fake_log,
    FakeLog, MemoryStore,
};

const TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Full Tiles
// =============================================================================

#[tokio::test]
async fn test_single_entry_from_backend() {
    let log = FakeLog::new(5000, 1000);
    let url = spawn_fake_log(log.clone()).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1234&end=1234").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "x-source"), Some("CT log"));
    assert_eq!(header(&headers, "x-response-len"), Some("1"));
    assert!(header(&headers, "x-partial-tile").is_none());
    assert_eq!(header(&headers, "content-type"), Some("application/json"));

    let batch = parse_entries(&body);
    assert_eq!(batch.entries, vec![log_entry(1234)]);

    // The backend was asked for the whole aligned tile, as a closed interval
    assert_eq!(log.queries(), vec![(1000, 1999)]);
}

#[tokio::test]
async fn test_response_is_pretty_printed_base64() {
    let log = FakeLog::new(100, 10);
    let url = spawn_fake_log(log).await;
    let router = ctile_router(&url, MemoryStore::new(), 10, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/testlog/ct/v1/get-entries?start=0&end=0").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("\n  \"entries\": ["));
    assert!(text.ends_with("}\n"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    // "leaf-0" in base64
    assert_eq!(json["entries"][0]["leaf_input"], "bGVhZi0w");
}

#[tokio::test]
async fn test_range_within_tile() {
    let log = FakeLog::new(5000, 1000);
    let url = spawn_fake_log(log).await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1000&end=1004").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "x-response-len"), Some("5"));
    let expected: Vec<_> = (1000..=1004).map(log_entry).collect();
    assert_eq!(parse_entries(&body).entries, expected);
}

#[tokio::test]
async fn test_range_crossing_tile_boundary_is_truncated() {
    let log = FakeLog::new(5000, 1000);
    let url = spawn_fake_log(log.clone()).await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1990&end=2010").await;

    assert_eq!(status, StatusCode::OK);
    // Only the tile containing `start` is served
    assert_eq!(header(&headers, "x-response-len"), Some("10"));
    let expected: Vec<_> = (1990..2000).map(log_entry).collect();
    assert_eq!(parse_entries(&body).entries, expected);
    assert_eq!(log.request_count(), 1);
}

#[tokio::test]
async fn test_any_path_prefix_is_accepted() {
    let log = FakeLog::new(100, 10);
    let url = spawn_fake_log(log).await;
    let router = ctile_router(&url, MemoryStore::new(), 10, TIMEOUT);

    for uri in [
        "/ct/v1/get-entries?start=3&end=3",
        "/some/other/prefix/ct/v1/get-entries?start=3&end=3",
    ] {
        let (status, _, body) = get_uri(&router, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(parse_entries(&body).entries, vec![log_entry(3)]);
    }
}

// =============================================================================
// Partial Tiles
// =============================================================================

#[tokio::test]
async fn test_partial_tile_served_but_not_cached() {
    // Tile [1000, 2000) holds only 700 entries
    let log = FakeLog::new(1700, 1000);
    let url = spawn_fake_log(log.clone()).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1001&end=1001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "x-partial-tile"), Some("true"));
    assert_eq!(header(&headers, "x-source"), Some("CT log"));
    assert_eq!(header(&headers, "x-response-len"), Some("1"));
    assert_eq!(parse_entries(&body).entries, vec![log_entry(1001)]);
    assert_eq!(store.put_count(), 0);
    assert!(store.keys().is_empty());

    // The tail is fetched again on every request
    let (status, _, _) = get_uri(&router, "/testlog/ct/v1/get-entries?start=1001&end=1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log.request_count(), 2);
}

#[tokio::test]
async fn test_partial_tile_range_truncated_to_available() {
    let log = FakeLog::new(1700, 1000);
    let url = spawn_fake_log(log).await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1690&end=1999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "x-response-len"), Some("10"));
    let expected: Vec<_> = (1690..1700).map(log_entry).collect();
    assert_eq!(parse_entries(&body).entries, expected);
}

#[tokio::test]
async fn test_offset_past_partial_tile() {
    let log = FakeLog::new(1700, 1000);
    let url = spawn_fake_log(log).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (status, _, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1999&end=1999").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"requested range is past the end of the log");
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_tile_becomes_cacheable_once_full() {
    let log = FakeLog::new(1700, 1000);
    let url = spawn_fake_log(log.clone()).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (_, headers, _) = get_uri(&router, "/testlog/ct/v1/get-entries?start=1500&end=1500").await;
    assert_eq!(header(&headers, "x-partial-tile"), Some("true"));

    // The log grows past the end of the tile
    log.set_tree_size(2300);

    let (status, headers, body) =
        get_uri(&router, "/testlog/ct/v1/get-entries?start=1999&end=1999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(header(&headers, "x-partial-tile").is_none());
    assert_eq!(parse_entries(&body).entries, vec![log_entry(1999)]);
    assert_eq!(store.put_count(), 1);
}

// =============================================================================
// Parameter Errors
// =============================================================================

#[tokio::test]
async fn test_missing_start() {
    let url = dead_log_url().await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?end=5").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("missing start parameter"), "{}", text);
}

#[tokio::test]
async fn test_missing_end() {
    let url = dead_log_url().await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?start=5").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("missing end parameter"));
}

#[tokio::test]
async fn test_invalid_parameters() {
    let url = dead_log_url().await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    for query in [
        "start=-1&end=5",
        "start=x&end=5",
        "start=1&end=y",
        "start=10&end=9",
    ] {
        let uri = format!("/ct/v1/get-entries?{}", query);
        let (status, _, _) = get_uri(&router, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
    }

    // Parameter errors never touch the cache
    assert_eq!(store.get_count(), 0);
}

#[tokio::test]
async fn test_invalid_path() {
    let url = dead_log_url().await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    for uri in ["/", "/ct/v1/get-sth", "/ct/v1/get-entries/extra?start=0&end=0"] {
        let (status, _, body) = get_uri(&router, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(String::from_utf8_lossy(&body).starts_with("invalid path"));
    }
}

// =============================================================================
// Backend Errors
// =============================================================================

#[tokio::test]
async fn test_backend_status_passthrough() {
    let log = FakeLog::new(5000, 1000);
    log.fail_with(StatusCode::NOT_FOUND, "no such log");
    let url = spawn_fake_log(log).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?start=0&end=0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"no such log");
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_backend_past_end_of_log_passthrough() {
    let log = FakeLog::new(1000, 1000);
    let url = spawn_fake_log(log).await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?start=1500&end=1500").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("tree_size"));
}

#[tokio::test]
async fn test_backend_garbage_is_internal_error() {
    let log = FakeLog::new(5000, 1000);
    log.send_garbage();
    let url = spawn_fake_log(log).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, TIMEOUT);

    let (status, _, _) = get_uri(&router, "/ct/v1/get-entries?start=0&end=0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_backend_too_many_entries_is_internal_error() {
    let log = FakeLog::new(5000, 1000);
    log.send_overfill();
    let url = spawn_fake_log(log).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 100, TIMEOUT);

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?start=0&end=0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8_lossy(&body).contains("expected 100 entries, got 101"));
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_backend_unreachable_is_internal_error() {
    let url = dead_log_url().await;
    let router = ctile_router(&url, MemoryStore::new(), 1000, TIMEOUT);

    let (status, _, _) = get_uri(&router, "/ct/v1/get-entries?start=0&end=0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Deadline
// =============================================================================

#[tokio::test]
async fn test_slow_backend_times_out() {
    let log = FakeLog::new(5000, 1000);
    log.set_delay(Duration::from_secs(2));
    let url = spawn_fake_log(log).await;
    let store = MemoryStore::new();
    let router = ctile_router(&url, store.clone(), 1000, Duration::from_millis(100));

    let (status, _, body) = get_uri(&router, "/ct/v1/get-entries?start=0&end=0").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(String::from_utf8_lossy(&body).contains("full request timeout"));
    assert_eq!(store.put_count(), 0);
}
